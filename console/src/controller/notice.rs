//! Single-slot status message shown above a screen.

use std::fmt;

/// The last success or error message. The two are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The last action succeeded.
    Success(String),
    /// The last action failed.
    Error(String),
}

impl Notice {
    /// Message text.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message.as_str(),
        }
    }

    /// Whether this notice reports a failure.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
