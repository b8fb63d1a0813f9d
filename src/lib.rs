//! # Logger Assist - WiFi Logger Stick Configuration Client
//!
//! **Author:** Evan Liu <liuyifanz.1996@gmail.com>
//! **License:** MIT
//!
//! Talks to WiFi-serial bridge sticks ("loggers", HF-LPB100 and friends)
//! through their UDP assistant endpoint. A session unlocks the stick with a
//! vendor code, runs one command sequence and leaves command mode again.
//!
//! ## Commands
//!
//! | Command | Sent | Answer |
//! |---------|------|--------|
//! | Credential query | `AT+WAP`, `AT+WAKEY`, `AT+WSSSID`, `AT+WSKEY`, `AT+WANN`, `AT+WEBU` | `+ok=` stripped |
//! | AT passthrough | any AT command | raw |
//! | Modbus read (0x03) | `AT+INVDATA=<n>,<rtu frame>` | 0x10 bytes stripped |
//! | Modbus write (0x10) | `AT+INVDATA=<n>,<rtu frame>` | 0x10 bytes stripped |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logger_assist::{AssistResult, Command, Session, SessionConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> AssistResult<()> {
//!     let command = Command::from_options(None, Some("00120001"), None)?;
//!     let config = SessionConfig::new("10.10.100.254:48899").with_command(command);
//!
//!     let mut session = Session::connect(config).await?;
//!     println!("{}", session.run().await?);
//!     Ok(())
//! }
//! ```

// ============================================================================
// Core modules
// ============================================================================

/// Core error types and result handling
pub mod error;

/// Assistant protocol constants
pub mod constants;

/// Modbus CRC16
pub mod crc;

/// Modbus RTU frames tunnelled through AT commands
pub mod frame;

/// Response cleanup
pub mod normalize;

/// UDP transport
pub mod transport;

/// Paced request/response exchanges
pub mod exchange;

/// Session configuration
pub mod config;

/// Session protocol driver
pub mod session;

/// Session results
pub mod report;

// ============================================================================
// Binary support
// ============================================================================

/// Command line interface
pub mod cli;

/// Logging setup
pub mod logging;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{Command, ExchangeTiming, SessionConfig};
pub use error::{AssistError, AssistResult};
pub use exchange::Exchange;
pub use frame::{FrameBuilder, ModbusFrame, ModbusFunction};
pub use report::{CredentialReport, SessionReport};
pub use session::{Session, SessionState};
pub use transport::{AssistTransport, TransportStats, UdpTransport};

pub use constants::{ASSIST_PORT, DEFAULT_UNLOCK_CODE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn info() -> String {
    format!("Logger Assist v{} - WiFi logger stick configuration client", VERSION)
}
