//! The uniform `{ code, data, message }` response envelope.

use serde::Deserialize;

use crate::error::RemoteError;

/// Success code used by the backend regardless of transport status.
pub const ENVELOPE_OK: u16 = 200;

/// Wire envelope every endpoint replies with.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub code: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Interpret the envelope: `code == 200` with a payload is success,
    /// everything else is an explicit error value.
    ///
    /// # Errors
    ///
    /// Returns `ServerRejected` for non-success codes (carrying the server's
    /// message when it sent one) and `Malformed` when a success envelope has
    /// no payload.
    pub fn into_result(self) -> Result<T, RemoteError> {
        if self.code != ENVELOPE_OK {
            return Err(RemoteError::server_rejected(
                self.code,
                self.message.unwrap_or_default(),
            ));
        }
        self.data
            .ok_or_else(|| RemoteError::malformed("success envelope without a data payload"))
    }

    /// Interpret an envelope whose payload does not matter (mutations,
    /// acknowledgements). Only the code decides.
    ///
    /// # Errors
    ///
    /// Returns `ServerRejected` for non-success codes.
    pub fn into_ack(self) -> Result<(), RemoteError> {
        if self.code != ENVELOPE_OK {
            return Err(RemoteError::server_rejected(
                self.code,
                self.message.unwrap_or_default(),
            ));
        }
        Ok(())
    }
}
