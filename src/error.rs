//! Error types for the assistant client
//!
//! Every failure in a session is fatal: components return an [`AssistError`]
//! and the binary's single top-level handler reports it and exits with
//! [`AssistError::exit_code`].

use thiserror::Error;

/// Result alias used throughout the crate.
pub type AssistResult<T> = Result<T, AssistError>;

/// Errors raised while configuring or driving an assistant session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistError {
    /// Conflicting or malformed options, detected before any socket I/O.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Local or remote endpoint could not be resolved.
    #[error("Cannot resolve address '{address}': {message}")]
    AddressResolution { address: String, message: String },

    /// Send or receive failure on the datagram socket.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// No datagram arrived before the read deadline.
    #[error("Timeout: {message} (after {timeout_ms}ms)")]
    Timeout { message: String, timeout_ms: u64 },

    /// The device did not answer the unlock code.
    #[error("Empty response from logger")]
    EmptyResponse,

    /// Modbus payload is not valid hex.
    #[error("Malformed hex input: {message}")]
    MalformedHex { message: String },
}

impl AssistError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an address resolution error
    pub fn address_resolution<A: Into<String>, S: Into<String>>(address: A, message: S) -> Self {
        Self::AddressResolution {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(message: S, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms,
        }
    }

    /// Create a malformed hex error
    pub fn malformed_hex<S: Into<String>>(message: S) -> Self {
        Self::MalformedHex {
            message: message.into(),
        }
    }

    /// True for every failure that happened on the wire.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::EmptyResponse
        )
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration { .. } => 1,
            Self::AddressResolution { .. } => 2,
            Self::Transport { .. } | Self::Timeout { .. } | Self::EmptyResponse => 3,
            Self::MalformedHex { .. } => 4,
        }
    }
}

impl From<std::io::Error> for AssistError {
    fn from(err: std::io::Error) -> Self {
        Self::transport(err.to_string())
    }
}

impl From<hex::FromHexError> for AssistError {
    fn from(err: hex::FromHexError) -> Self {
        Self::malformed_hex(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(AssistError::transport("send failed").is_transport());
        assert!(AssistError::timeout("no answer", 5000).is_transport());
        assert!(AssistError::EmptyResponse.is_transport());
        assert!(!AssistError::configuration("bad").is_transport());
        assert!(!AssistError::malformed_hex("odd length").is_transport());
    }

    #[test]
    fn test_exit_codes_are_non_zero() {
        let errors = [
            AssistError::configuration("x"),
            AssistError::address_resolution("host", "x"),
            AssistError::transport("x"),
            AssistError::timeout("x", 1),
            AssistError::EmptyResponse,
            AssistError::malformed_hex("x"),
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
        assert_eq!(AssistError::configuration("x").exit_code(), 1);
    }

    #[test]
    fn test_io_error_maps_to_transport() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: AssistError = io.into();
        assert!(matches!(err, AssistError::Transport { .. }));
    }

    #[test]
    fn test_display() {
        let err = AssistError::timeout("waiting for AT+WAP", 5000);
        assert_eq!(err.to_string(), "Timeout: waiting for AT+WAP (after 5000ms)");
    }
}
