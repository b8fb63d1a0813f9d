//! One paced send, optionally followed by a deadline-bound receive
//!
//! The device needs settling time after every write, so each exchange sleeps
//! for its pacing delay before it reads or lets the next command go out. A
//! read that misses its deadline fails the exchange; nothing is retried.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, info};

use crate::config::ExchangeTiming;
use crate::constants::RECV_BUFFER_SIZE;
use crate::error::{AssistError, AssistResult};
use crate::transport::AssistTransport;

/// A single request on the assistant socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Text written to the socket, sent verbatim
    pub message: String,
    /// Wait after the write completes
    pub pacing: Duration,
    /// Read deadline, measured from the end of the pacing delay
    pub timeout: Duration,
    /// Whether a response datagram is read
    pub expect_response: bool,
}

impl Exchange {
    /// An exchange that waits for an answer
    pub fn request(message: impl Into<String>, timing: &ExchangeTiming) -> Self {
        Self {
            message: message.into(),
            pacing: timing.pacing,
            timeout: timing.response_timeout,
            expect_response: true,
        }
    }

    /// A fire-and-forget exchange
    pub fn notify(message: impl Into<String>, pacing: Duration) -> Self {
        Self {
            message: message.into(),
            pacing,
            timeout: Duration::ZERO,
            expect_response: false,
        }
    }
}

/// Log a protocol line with its direction marker.
fn log_line(verbose: bool, direction: char, line: &str) {
    if verbose {
        info!("{} {}", direction, line);
    } else {
        debug!("{} {}", direction, line);
    }
}

/// Run one exchange on `transport`.
///
/// Returns the trimmed response text when one is expected, `None` otherwise.
pub async fn execute<T: AssistTransport>(
    transport: &mut T,
    exchange: &Exchange,
    verbose: bool,
) -> AssistResult<Option<String>> {
    log_line(verbose, '>', exchange.message.trim());

    let payload = exchange.message.as_bytes();
    let written = transport.send(payload).await?;
    if written != payload.len() {
        return Err(AssistError::transport(format!(
            "Short write: {} of {} bytes",
            written,
            payload.len()
        )));
    }

    sleep(exchange.pacing).await;

    if !exchange.expect_response {
        return Ok(None);
    }

    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let len = match timeout(exchange.timeout, transport.recv(&mut buf)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(AssistError::timeout(
                format!("No response to '{}'", exchange.message.trim()),
                exchange.timeout.as_millis() as u64,
            ))
        }
    };

    let response = String::from_utf8_lossy(&buf[..len]).trim().to_string();
    log_line(verbose, '<', &response);

    Ok(Some(response))
}
