//! Opaque record identifiers issued by the record store.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Validation errors returned by [`RecordId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdValidationError {
    /// The identifier was blank once trimmed of whitespace.
    #[error("record id must not be empty")]
    Empty,
}

/// Identifier of a stored record.
///
/// The store may emit identifiers as JSON numbers or strings. Identifiers
/// that are canonical unsigned integers are written back as numbers so a
/// reference typed into a selector (`"7"`) and one decoded from the store
/// (`7`) serialise identically.
///
/// ## Invariants
/// - the raw value is non-empty and carries no surrounding whitespace.
///
/// # Examples
/// ```
/// use fleet_console::domain::RecordId;
///
/// let id = RecordId::new("7").expect("valid id");
/// assert_eq!(serde_json::to_string(&id).expect("serialise"), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Validate and construct a [`RecordId`].
    pub fn new(raw: impl Into<String>) -> Result<Self, RecordIdValidationError> {
        let text = raw.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RecordIdValidationError::Empty);
        }
        if trimmed.len() == text.len() {
            Ok(Self(text))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Borrow the identifier as text, as used in URLs and selectors.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn as_number(&self) -> Option<u64> {
        self.0
            .parse::<u64>()
            .ok()
            .filter(|number| number.to_string() == self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(number) => serializer.serialize_u64(number),
            None => serializer.serialize_str(self.as_str()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordIdDto {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RecordIdDto::deserialize(deserializer)? {
            RecordIdDto::Number(number) => Ok(Self::from(number)),
            RecordIdDto::Text(text) => Self::new(text).map_err(serde::de::Error::custom),
        }
    }
}
