//! Logger Assist
//!
//! Reads the WiFi settings of a logger stick, or sends it a raw AT command or
//! a tunnelled Modbus read/write.
//!
//! Usage: logger-assist -t 10.10.100.254:48899 [--xat CMD | --xmb HEX | --xmw HEX] [--xv]

use clap::Parser;
use tracing::{debug, error};

use logger_assist::cli::Cli;
use logger_assist::logging::init_logging;
use logger_assist::{AssistResult, Session};

async fn run(cli: Cli) -> AssistResult<()> {
    let config = cli.into_config()?;
    debug!("{}", logger_assist::info());

    let mut session = Session::connect(config).await?;
    let report = session.run().await?;

    let stats = session.get_stats();
    debug!(
        "Requests: {}, Responses: {}, Bytes sent: {}, received: {}",
        stats.requests_sent, stats.responses_received, stats.bytes_sent, stats.bytes_received
    );

    println!("{}", report);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}
