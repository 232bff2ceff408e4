//! DTOs for decoding record store error bodies.

use serde::Deserialize;

/// Error body returned by the store on non-success statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl ErrorBodyDto {
    /// Non-blank message, trimmed.
    pub(super) fn into_message(self) -> Option<String> {
        self.message
            .map(|message| message.trim().to_owned())
            .filter(|message| !message.is_empty())
    }
}
