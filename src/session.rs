//! Session protocol driver
//!
//! A session is one strictly sequential conversation with a logger:
//!
//! ```text
//! Unlocking -> Acknowledging -> Executing -> Quitting -> Done
//! ```
//!
//! 1. **Unlocking**: send the vendor unlock code and wait for the device to
//!    answer. No answer means there is no logger at that address.
//! 2. **Acknowledging**: send `+ok`, no answer expected.
//! 3. **Executing**: run the configured [`Command`].
//! 4. **Quitting**: send `AT+Q`, no answer expected.
//! 5. **Done**: the socket is released.
//!
//! Any failure aborts the session at the point it happens. In particular a
//! failed command does not reach `Quitting`.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_assist::{Session, SessionConfig, AssistResult};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> AssistResult<()> {
//!     let config = SessionConfig::new("10.10.100.254:48899");
//!     let mut session = Session::connect(config).await?;
//!     let report = session.run().await?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{Command, SessionConfig};
use crate::constants::{
    ACK, ASSIST_PORT, AT_QUIT, AT_WAKEY, AT_WANN, AT_WAP, AT_WEBU, AT_WSKEY, AT_WSSSID,
};
use crate::error::{AssistError, AssistResult};
use crate::exchange::{execute, Exchange};
use crate::frame::{ModbusFrame, ModbusFunction};
use crate::normalize::strip_control_byte;
use crate::report::{CredentialReport, SessionReport};
use crate::transport::{resolve_endpoint, AssistTransport, TransportStats, UdpTransport};

/// Credential queries in the order the device answers them
pub const CREDENTIAL_QUERIES: [&str; 6] = [AT_WAP, AT_WAKEY, AT_WSSSID, AT_WSKEY, AT_WANN, AT_WEBU];

/// Protocol state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Sending the unlock code
    Unlocking,
    /// Confirming the handshake
    Acknowledging,
    /// Running the selected command
    Executing,
    /// Leaving command mode
    Quitting,
    /// Socket released
    Done,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unlocking => "unlocking",
            Self::Acknowledging => "acknowledging",
            Self::Executing => "executing",
            Self::Quitting => "quitting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Drives one configuration session over a transport
pub struct Session<T: AssistTransport> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
}

impl Session<UdpTransport> {
    /// Resolve the configured endpoints and open the UDP socket.
    pub async fn connect(config: SessionConfig) -> AssistResult<Self> {
        let remote = resolve_endpoint(&config.remote, ASSIST_PORT).await?;
        let local = match config.local.as_deref() {
            Some(local) if !local.is_empty() => Some(resolve_endpoint(local, 0).await?),
            _ => None,
        };

        let transport = UdpTransport::connect(local, remote).await?;
        info!(
            "* Connecting {} -> {}...",
            transport.local_addr(),
            transport.remote_addr()
        );

        Ok(Self::new(transport, config))
    }
}

impl<T: AssistTransport> Session<T> {
    /// Create a session over an already connected transport
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Unlocking,
        }
    }

    /// Current protocol state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get transport statistics
    pub fn get_stats(&self) -> TransportStats {
        self.transport.get_stats()
    }

    fn enter(&mut self, state: SessionState) {
        debug!("Session {} -> {}", self.state, state);
        self.state = state;
    }

    async fn exchange(&mut self, exchange: Exchange) -> AssistResult<Option<String>> {
        execute(&mut self.transport, &exchange, self.config.verbose).await
    }

    /// Send `message` and return its answer.
    async fn request(&mut self, message: impl Into<String>) -> AssistResult<String> {
        let exchange = Exchange::request(message, &self.config.timing);
        let response = self.exchange(exchange).await?;
        response.ok_or_else(|| AssistError::transport("Exchange returned no response"))
    }

    /// Send `message` without waiting for an answer.
    async fn notify(&mut self, message: &str, pacing: Duration) -> AssistResult<()> {
        self.exchange(Exchange::notify(message, pacing)).await?;
        Ok(())
    }

    /// Run the whole session and release the transport.
    pub async fn run(&mut self) -> AssistResult<SessionReport> {
        if self.state != SessionState::Unlocking {
            return Err(AssistError::configuration(format!(
                "Session cannot be started in state '{}'",
                self.state
            )));
        }

        self.unlock().await?;

        self.enter(SessionState::Acknowledging);
        self.notify(ACK, Duration::ZERO).await?;

        self.enter(SessionState::Executing);
        let command = self.config.command.clone();
        info!("Running {}", command.name());
        let report = match &command {
            Command::CredentialQuery => self.query_credentials().await?,
            Command::AtPassthrough { command } => self.at_passthrough(command).await?,
            Command::ModbusRead { payload } => {
                self.modbus(ModbusFunction::ReadHoldingRegisters, payload)
                    .await?
            }
            Command::ModbusWrite { payload } => {
                self.modbus(ModbusFunction::WriteMultipleRegisters, payload)
                    .await?
            }
        };

        self.enter(SessionState::Quitting);
        let pacing = self.config.timing.pacing;
        self.notify(AT_QUIT, pacing).await?;

        self.enter(SessionState::Done);
        self.transport.close().await?;

        Ok(report)
    }

    async fn unlock(&mut self) -> AssistResult<()> {
        let code = self.config.unlock_code.clone();
        match self.request(code).await {
            Ok(response) if response.is_empty() => {
                warn!("Logger at {} sent an empty answer", self.config.remote);
                Err(AssistError::EmptyResponse)
            }
            Ok(response) => {
                info!("Logger found: {}", response);
                Ok(())
            }
            Err(AssistError::Timeout { .. }) => {
                warn!("No logger answered at {}", self.config.remote);
                Err(AssistError::EmptyResponse)
            }
            Err(e) => Err(e),
        }
    }

    async fn query_credentials(&mut self) -> AssistResult<SessionReport> {
        let mut raw = Vec::with_capacity(CREDENTIAL_QUERIES.len());
        for query in CREDENTIAL_QUERIES {
            raw.push(self.request(query).await?);
        }

        let report = CredentialReport::from_raw([
            raw[0].as_str(),
            raw[1].as_str(),
            raw[2].as_str(),
            raw[3].as_str(),
            raw[4].as_str(),
            raw[5].as_str(),
        ]);
        Ok(SessionReport::Credentials(report))
    }

    async fn at_passthrough(&mut self, command: &str) -> AssistResult<SessionReport> {
        let response = self.request(format!("{}\n", command)).await?;
        Ok(SessionReport::AtResponse(response))
    }

    async fn modbus(
        &mut self,
        function: ModbusFunction,
        payload: &str,
    ) -> AssistResult<SessionReport> {
        let frame = ModbusFrame::from_payload_hex(function, payload)?;
        let request = frame.to_at_command();
        let response = self.request(request.clone()).await?;

        Ok(SessionReport::ModbusResponse {
            request: request.trim_end().to_string(),
            response: strip_control_byte(&response),
        })
    }
}
