//! # Session Configuration
//!
//! A [`SessionConfig`] is built once at startup and handed to the session
//! driver by value. Nothing downstream reads options from anywhere else.
//!
//! ## Command selection
//!
//! Exactly one [`Command`] runs per session. The operator may pick at most one
//! of AT passthrough, Modbus read and Modbus write; with none of them the
//! credential query runs.

use std::time::Duration;

use crate::constants::{
    DEFAULT_PACING, DEFAULT_RESPONSE_TIMEOUT, DEFAULT_UNLOCK_CODE, MIN_WRITE_PAYLOAD_HEX_LEN,
    READ_PAYLOAD_HEX_LEN,
};
use crate::error::{AssistError, AssistResult};
use crate::frame::decode_hex;

/// Pacing and deadlines for every exchange of a session.
///
/// # Example
///
/// ```rust
/// use logger_assist::ExchangeTiming;
/// use std::time::Duration;
///
/// let timing = ExchangeTiming::new()
///     .with_pacing(Duration::from_millis(500))
///     .with_response_timeout(Duration::from_secs(2));
///
/// assert_eq!(timing.pacing, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTiming {
    /// Wait after each write.
    pub pacing: Duration,
    /// Maximum wait for a response datagram.
    pub response_timeout: Duration,
}

impl ExchangeTiming {
    /// Create timing with the device defaults (1s pacing, 5s timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pacing delay.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Set the response timeout.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

impl Default for ExchangeTiming {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

/// The command sequence a session runs between unlock and quit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// Read AP, station and web settings
    #[default]
    CredentialQuery,
    /// Send one raw AT command
    AtPassthrough { command: String },
    /// Read holding registers; payload is address + quantity as hex
    ModbusRead { payload: String },
    /// Write holding registers; payload is address + quantity + byte count + values as hex
    ModbusWrite { payload: String },
}

impl Command {
    /// Select the command from the mutually exclusive operator options.
    ///
    /// Empty strings count as "not given".
    pub fn from_options(
        at_command: Option<&str>,
        modbus_read: Option<&str>,
        modbus_write: Option<&str>,
    ) -> AssistResult<Self> {
        let at_command = at_command.filter(|s| !s.is_empty());
        let modbus_read = modbus_read.filter(|s| !s.is_empty());
        let modbus_write = modbus_write.filter(|s| !s.is_empty());

        let given = [at_command.is_some(), modbus_read.is_some(), modbus_write.is_some()]
            .iter()
            .filter(|&&set| set)
            .count();
        if given > 1 {
            return Err(AssistError::configuration(
                "AT command, Modbus read and Modbus write are mutually exclusive",
            ));
        }

        if let Some(command) = at_command {
            return Ok(Self::AtPassthrough {
                command: command.to_string(),
            });
        }
        if let Some(payload) = modbus_read {
            validate_read_payload(payload)?;
            return Ok(Self::ModbusRead {
                payload: payload.to_string(),
            });
        }
        if let Some(payload) = modbus_write {
            validate_write_payload(payload)?;
            return Ok(Self::ModbusWrite {
                payload: payload.to_string(),
            });
        }
        Ok(Self::CredentialQuery)
    }

    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::CredentialQuery => "credential query",
            Self::AtPassthrough { .. } => "AT passthrough",
            Self::ModbusRead { .. } => "Modbus read",
            Self::ModbusWrite { .. } => "Modbus write",
        }
    }
}

fn validate_read_payload(payload: &str) -> AssistResult<()> {
    if payload.len() != READ_PAYLOAD_HEX_LEN {
        return Err(AssistError::configuration(format!(
            "Modbus read needs first register address and length, e.g. 00120001 \
             (register 0x0012, length 0x0001), got '{}'",
            payload
        )));
    }
    validate_hex(payload)
}

fn validate_write_payload(payload: &str) -> AssistResult<()> {
    if payload.len() < MIN_WRITE_PAYLOAD_HEX_LEN {
        return Err(AssistError::configuration(format!(
            "Modbus write needs register address, length, byte count and values, \
             e.g. 00280001020064 (register 0x0028, length 1, 2 bytes, value 0x0064), got '{}'",
            payload
        )));
    }
    validate_hex(payload)
}

fn validate_hex(payload: &str) -> AssistResult<()> {
    decode_hex(payload)
        .map(|_| ())
        .map_err(|e| AssistError::configuration(e.to_string()))
}

/// Everything a session needs, fixed before the socket is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Assistant endpoint, `host[:port]`
    pub remote: String,
    /// Optional local source address
    pub local: Option<String>,
    /// Vendor unlock code
    pub unlock_code: String,
    /// Surface every protocol line
    pub verbose: bool,
    /// Command sequence to run
    pub command: Command,
    /// Pacing and deadlines
    pub timing: ExchangeTiming,
}

impl SessionConfig {
    /// Configuration for `remote` with defaults everywhere else.
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            local: None,
            unlock_code: DEFAULT_UNLOCK_CODE.to_string(),
            verbose: false,
            command: Command::default(),
            timing: ExchangeTiming::default(),
        }
    }

    /// Set the local source address.
    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local = Some(local.into());
        self
    }

    /// Set the unlock code.
    pub fn with_unlock_code(mut self, code: impl Into<String>) -> Self {
        self.unlock_code = code.into();
        self
    }

    /// Enable or disable protocol line output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the command.
    pub fn with_command(mut self, command: Command) -> Self {
        self.command = command;
        self
    }

    /// Set exchange timing.
    pub fn with_timing(mut self, timing: ExchangeTiming) -> Self {
        self.timing = timing;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
