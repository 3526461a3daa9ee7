//! Error types for APWine

use thiserror::Error;

/// Core errors that can occur in the APWine SDK
#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Ledger transport errors.
///
/// These are produced by whatever talks to the chain and are passed through
/// the engine untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("RPC endpoint unreachable at {url}")]
    Unreachable { url: String },

    #[error("RPC returned error: {message}")]
    Rpc { message: String },

    #[error("Transaction {hash} reverted: {reason}")]
    Reverted { hash: String, reason: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Protocol-level input errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Protocol not available on {network}")]
    NetworkNotSupported { network: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("Unknown token: {name}")]
    UnknownToken { name: String },

    #[error("Unknown pool id: {id}")]
    UnknownPool { id: u8 },
}

/// Result type alias for APWine operations
pub type Result<T> = std::result::Result<T, Error>;

impl ProtocolError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NetworkNotSupported { .. } => "network_not_supported",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidAddress { .. } => "invalid_address",
            Self::UnknownToken { .. } => "unknown_token",
            Self::UnknownPool { .. } => "unknown_pool",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } | Self::InvalidAddress { .. } => 400,
            Self::UnknownToken { .. } | Self::UnknownPool { .. } => 400,
            Self::NetworkNotSupported { .. } => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_codes() {
        let err = ProtocolError::InvalidAmount {
            message: "test".into(),
        };
        assert_eq!(err.error_code(), "invalid_amount");
        assert_eq!(err.status_code(), 400);

        let err = ProtocolError::NetworkNotSupported {
            network: "ropsten".into(),
        };
        assert_eq!(err.error_code(), "network_not_supported");
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::Rpc {
            message: "nonce too low".into(),
        }
        .into();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: RPC returned error: nonce too low");
    }
}
