//! Records received through the message pipe.
//!
//! A record is a UTF-8 JSON object:
//! `{"time_elapse": 2, "message_type": "error", "content": "disk full"}`.
//! Several records may arrive in one read; they are decoded in order.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// The only kind that switches the ticker band into error mode.
pub const ERROR_KIND: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Seconds the message stays on screen.
    pub time_elapse: f64,
    pub message_type: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Message {
    pub fn new(duration: Duration, kind: &str, content: &str) -> Self {
        Self {
            time_elapse: duration.as_secs_f64(),
            message_type: kind.to_string(),
            content: content.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.message_type == ERROR_KIND
    }

    /// How long the message stays on screen.
    /// Negative or non-finite values collapse to zero.
    pub fn display_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_elapse).unwrap_or(Duration::ZERO)
    }

    /// Encodes the record as sent over the pipe.
    ///
    /// # Errors
    /// See [`serde_json::to_vec`].
    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Decodes every record contained in one read.
///
/// Decoding stops at the first malformed record, which is reported as the last item.
pub fn decode(bytes: &[u8]) -> Vec<Result<Message, MessageError>> {
    let mut result = Vec::new();
    for item in serde_json::Deserializer::from_slice(bytes).into_iter::<Message>() {
        match item {
            Ok(message) => result.push(Ok(message)),
            Err(err) => {
                result.push(Err(MessageError::from(err)));
                break;
            }
        }
    }
    result
}
