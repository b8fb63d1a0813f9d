//! Command line interface
//!
//! Flag names follow the older logger assistant tools, with GNU style double
//! dashes: `-xat` becomes `--xat`, `-xmb` becomes `--xmb` and so on. `-t`
//! stays a short flag.

use clap::{ArgGroup, Parser, ValueEnum};

use crate::config::{Command, SessionConfig};
use crate::constants::DEFAULT_UNLOCK_CODE;
use crate::error::AssistResult;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Minimal single-line output
    Compact,
    /// JSON lines
    Json,
}

/// Read WiFi credentials from a logger stick or talk AT / Modbus to it
#[derive(Parser, Debug, Clone)]
#[command(name = "logger-assist", version, about, long_about = None)]
#[command(group(
    ArgGroup::new("command")
        .args(["at_command", "modbus_read", "modbus_write"])
        .multiple(false)
))]
pub struct Cli {
    /// The IP and port of the logger's assistant endpoint [10.10.100.254:48899]
    #[arg(short = 't', long = "target", value_name = "HOST:PORT")]
    pub target: String,

    /// Local source address
    #[arg(long = "xs", value_name = "ADDR")]
    pub source: Option<String>,

    /// WiFi configuration code [WIFIKIT-214028-READ or HF-A11ASSISTHREAD]
    #[arg(long = "xc", value_name = "CODE", default_value = DEFAULT_UNLOCK_CODE)]
    pub unlock_code: String,

    /// Send AT command instead of reading credentials
    #[arg(long = "xat", value_name = "CMD")]
    pub at_command: Option<String>,

    /// Send Modbus read register instead of reading credentials [00120001] -> register 0x0012, length 1
    #[arg(long = "xmb", value_name = "HEX")]
    pub modbus_read: Option<String>,

    /// Send Modbus write register instead of reading credentials [00280001020064] -> register 0x0028, length 1, 2 bytes, value 0x0064
    #[arg(long = "xmw", value_name = "HEX")]
    pub modbus_write: Option<String>,

    /// Output all communication with the logger
    #[arg(long = "xv")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOGGER_ASSIST_LOG_LEVEL")]
    pub log_level: String,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Validate the options and turn them into a session configuration.
    pub fn into_config(self) -> AssistResult<SessionConfig> {
        let command = Command::from_options(
            self.at_command.as_deref(),
            self.modbus_read.as_deref(),
            self.modbus_write.as_deref(),
        )?;

        let mut config = SessionConfig::new(self.target)
            .with_unlock_code(self.unlock_code)
            .with_verbose(self.verbose)
            .with_command(command);
        if let Some(source) = self.source.filter(|s| !s.is_empty()) {
            config = config.with_local(source);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistError;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("logger-assist").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-t", "10.10.100.254:48899"]).unwrap();
        assert_eq!(cli.unlock_code, "WIFIKIT-214028-READ");
        assert!(!cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Text);

        let config = cli.into_config().unwrap();
        assert_eq!(config.command, Command::CredentialQuery);
        assert_eq!(config.local, None);
    }

    #[test]
    fn test_single_dash_long_flags_rejected() {
        assert!(parse(&["-t", "10.10.100.254", "-xat", "AT+VER"]).is_err());
        assert!(parse(&["-t", "10.10.100.254", "--xat", "AT+VER"]).is_ok());
    }

    #[test]
    fn test_target_required() {
        assert!(parse(&["--xv"]).is_err());
    }

    #[test]
    fn test_modbus_read() {
        let cli = parse(&["-t", "10.10.100.254", "--xmb", "00120001", "--xv"]).unwrap();
        let config = cli.into_config().unwrap();
        assert!(config.verbose);
        assert_eq!(
            config.command,
            Command::ModbusRead {
                payload: "00120001".into()
            }
        );
    }

    #[test]
    fn test_conflicting_commands_rejected_by_parser() {
        let err = parse(&["-t", "10.10.100.254", "--xat", "AT+VER", "--xmb", "00120001"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_conflicting_commands_rejected_by_config() {
        let cli = Cli {
            target: "10.10.100.254".into(),
            source: None,
            unlock_code: DEFAULT_UNLOCK_CODE.into(),
            at_command: Some("AT+VER".into()),
            modbus_read: None,
            modbus_write: Some("00280001020064".into()),
            verbose: false,
            log_level: "info".into(),
            log_format: LogFormat::Text,
        };
        assert!(matches!(
            cli.into_config(),
            Err(AssistError::Configuration { .. })
        ));
    }

    #[test]
    fn test_short_read_payload() {
        let cli = parse(&["-t", "10.10.100.254", "--xmb", "0012"]).unwrap();
        assert!(matches!(
            cli.into_config(),
            Err(AssistError::Configuration { .. })
        ));
    }

    #[test]
    fn test_source_and_code() {
        let cli = parse(&[
            "-t",
            "10.10.100.254:48899",
            "--xs",
            "10.10.100.150",
            "--xc",
            "HF-A11ASSISTHREAD",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.local.as_deref(), Some("10.10.100.150"));
        assert_eq!(config.unlock_code, "HF-A11ASSISTHREAD");
    }
}
