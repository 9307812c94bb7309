//! Gateway client errors

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::protocol::{CloseCode, OpCode};
use crate::rest::RestError;

/// Why a gateway connection ended
#[derive(Debug, Error)]
pub enum GatewayError {
    /// WebSocket transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Timed out connecting to the gateway")]
    ConnectTimeout,

    /// First frame was not Hello
    #[error("Expected Hello, received {0}")]
    UnexpectedOpCode(OpCode),

    /// Frame could not be encoded or decoded
    #[error("Invalid gateway payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Server closed with a code that allows reconnecting
    #[error("Gateway closed the connection (code {code:?}): {reason}")]
    Closed { code: Option<u16>, reason: String },

    /// Server closed with a code that needs a configuration change
    #[error("Gateway closed the connection: {0}")]
    FatalClose(CloseCode),

    /// No Heartbeat ACK between two heartbeats
    #[error("Heartbeat not acknowledged, connection is zombied")]
    ZombieConnection,

    /// Server sent op 7
    #[error("Gateway requested a reconnect")]
    ReconnectRequested,

    /// Server sent op 9
    #[error("Session invalidated (resumable: {resumable})")]
    InvalidSession { resumable: bool },

    #[error("REST client error: {0}")]
    Rest(#[from] RestError),
}

impl GatewayError {
    /// Whether the client must stop instead of reconnecting
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalClose(_) | Self::Rest(RestError::InvalidToken))
    }

    /// Whether the current session may be resumed on the next connection
    pub fn can_resume(&self) -> bool {
        match self {
            Self::InvalidSession { resumable } => *resumable,
            Self::Closed { code: Some(code), .. } => {
                CloseCode::from_u16(*code).map_or(true, CloseCode::can_resume)
            }
            Self::FatalClose(_) | Self::UnexpectedOpCode(_) => false,
            _ => true,
        }
    }

    /// Close code carried by the error, if any
    pub fn close_code(&self) -> Option<u16> {
        match self {
            Self::Closed { code, .. } => *code,
            Self::FatalClose(code) => Some(code.as_u16()),
            _ => None,
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal() {
        assert!(GatewayError::FatalClose(CloseCode::AuthenticationFailed).is_fatal());
        assert!(!GatewayError::ZombieConnection.is_fatal());
        assert!(!GatewayError::ReconnectRequested.is_fatal());
    }

    #[test]
    fn test_can_resume() {
        assert!(GatewayError::ReconnectRequested.can_resume());
        assert!(GatewayError::ZombieConnection.can_resume());
        assert!(GatewayError::InvalidSession { resumable: true }.can_resume());
        assert!(!GatewayError::InvalidSession { resumable: false }.can_resume());

        let timed_out = GatewayError::Closed {
            code: Some(4009),
            reason: String::new(),
        };
        assert!(!timed_out.can_resume());

        let abnormal = GatewayError::Closed {
            code: Some(1006),
            reason: String::new(),
        };
        assert!(abnormal.can_resume());
    }

    #[test]
    fn test_close_code() {
        assert_eq!(
            GatewayError::FatalClose(CloseCode::DisallowedIntents).close_code(),
            Some(4014)
        );
        assert_eq!(GatewayError::ZombieConnection.close_code(), None);
    }
}
