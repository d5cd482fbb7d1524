//! Error taxonomy for the remote boundary.

use thiserror::Error;

/// How a remote call failed.
///
/// Every kind leaves the caller in a retryable position; the distinction
/// exists so the user-facing layer can word the message sensibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RemoteErrorKind {
    /// The envelope arrived but carried a non-success code.
    ServerRejected { code: u16 },
    /// The request never produced a usable response (timeout, connectivity).
    NetworkFailure,
    /// The body did not match the expected envelope shape.
    Malformed,
}

/// A failed remote call, with a message fit for user display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    #[must_use]
    pub fn server_rejected(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            format!("the server rejected the request (code {code})")
        } else {
            message
        };
        Self {
            kind: RemoteErrorKind::ServerRejected { code },
            message,
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::NetworkFailure,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Malformed,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> RemoteErrorKind {
        self.kind
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed(format!("unreadable response: {err}"))
        } else {
            Self::network(format!("network failure: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_server_message_gets_a_fallback() {
        let err = RemoteError::server_rejected(500, "  ");
        assert_eq!(err.kind(), RemoteErrorKind::ServerRejected { code: 500 });
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn server_message_is_preserved_for_display() {
        let err = RemoteError::server_rejected(403, "账号没有访问权限");
        assert_eq!(err.to_string(), "账号没有访问权限");
    }
}
