//! Form schemas and drafts.
//!
//! A [`FormSchema`] is the per-entity configuration value that drives the
//! generic controller: which fields exist, which input name edits them, what
//! a fresh draft contains, which fields are required, and how text typed into
//! the form is coerced before the draft is decoded into a typed record.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::{Map, Number, Value, json};

use super::lenient::split_list;
use super::{Entity, EntityKind, RecordId, TimeOfDay};

/// How a field's draft value is edited and coerced on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text or a fixed choice, sent as typed.
    Text,
    /// Non-negative whole number; text input is parsed before submission.
    Integer,
    /// Whole number greater than zero, such as a seat count.
    Count,
    /// Non-negative decimal number; text input is parsed before submission.
    Decimal,
    /// Comma-separated text submitted as a list of trimmed entries.
    List,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// Time of day in `HH:MM` or `HH:MM:SS` form.
    Time,
    /// Relation edited through a selector; stored as `{ "id": value }`.
    Reference,
    /// Write-only value never copied from a loaded record.
    Secret,
}

impl FieldKind {
    const fn expectation(self) -> &'static str {
        match self {
            Self::Integer => "whole number",
            Self::Count => "positive whole number",
            Self::Decimal => "non-negative number",
            Self::Date => "date (YYYY-MM-DD)",
            Self::Time => "time (HH:MM)",
            Self::Text | Self::List | Self::Reference | Self::Secret => "value",
        }
    }
}

/// When a field must be filled in before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Required for both create and edit.
    Always,
    /// Required only while creating a record.
    OnCreate,
    /// Never required; blank values are omitted from the submission.
    Optional,
}

/// One form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire key in the record and draft.
    pub key: &'static str,
    /// Input name accepted by `update_field`; differs from `key` for relations.
    pub input: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Editing and coercion behaviour.
    pub kind: FieldKind,
    /// Presence requirement.
    pub requirement: Requirement,
    /// Initial text for a fresh draft.
    pub default: &'static str,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            input: key,
            label,
            kind,
            requirement: Requirement::Always,
            default: "",
        }
    }

    /// Required free-text field.
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    /// Required whole-number field.
    pub const fn integer(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Integer)
    }

    /// Required whole-number field that must be above zero.
    pub const fn count(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Count)
    }

    /// Required decimal field.
    pub const fn decimal(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Decimal)
    }

    /// Comma-separated list field.
    pub const fn list(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::List)
    }

    /// Required date field.
    pub const fn date(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    /// Required time-of-day field.
    pub const fn time(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Time)
    }

    /// Required relation picked by identifier through `input`.
    pub const fn reference(key: &'static str, input: &'static str, label: &'static str) -> Self {
        let mut field = Self::new(key, label, FieldKind::Reference);
        field.input = input;
        field
    }

    /// Write-only field required on create.
    pub const fn secret(key: &'static str, label: &'static str) -> Self {
        let mut field = Self::new(key, label, FieldKind::Secret);
        field.requirement = Requirement::OnCreate;
        field
    }

    /// Mark the field optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.requirement = Requirement::Optional;
        self
    }

    /// Set the initial draft text.
    #[must_use]
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = value;
        self
    }

    /// Whether the field must be filled in for the given form mode.
    pub const fn is_required(&self, creating: bool) -> bool {
        match self.requirement {
            Requirement::Always => true,
            Requirement::OnCreate => creating,
            Requirement::Optional => false,
        }
    }

    fn initial_value(&self) -> Value {
        match self.kind {
            FieldKind::Reference => json!({ "id": self.default }),
            _ => Value::String(self.default.to_owned()),
        }
    }

    fn invalid(&self) -> FormError {
        FormError::InvalidField {
            label: self.label,
            expected: self.kind.expectation(),
        }
    }

    fn coerce(&self, value: &Value) -> Result<Option<Value>, FormError> {
        if is_blank(value) {
            return Ok(None);
        }
        let coerced = match (self.kind, value) {
            (FieldKind::Integer, Value::String(raw)) => raw
                .trim()
                .parse::<u64>()
                .map(Value::from)
                .map_err(|_| self.invalid())?,
            (FieldKind::Count, Value::String(raw)) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|count| *count > 0)
                .map(Value::from)
                .ok_or_else(|| self.invalid())?,
            (FieldKind::Decimal, Value::String(raw)) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| *number >= 0.0)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| self.invalid())?,
            (FieldKind::List, Value::String(raw)) => {
                Value::Array(split_list(raw).into_iter().map(Value::String).collect())
            }
            (FieldKind::Date, Value::String(raw)) => {
                let trimmed = raw.trim();
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| self.invalid())?;
                Value::String(trimmed.to_owned())
            }
            (FieldKind::Time, Value::String(raw)) => {
                raw.parse::<TimeOfDay>().map_err(|_| self.invalid())?;
                Value::String(raw.trim().to_owned())
            }
            (FieldKind::Reference, Value::String(raw)) => json!({ "id": raw.trim() }),
            (_, other) => other.clone(),
        };
        Ok(Some(coerced))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.get("id").is_none_or(is_blank),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Errors raised while editing or submitting a draft locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// One or more required fields are blank.
    #[error("Please fill in required fields: {}", .labels.join(", "))]
    MissingFields {
        /// Labels of the blank required fields, in form order.
        labels: Vec<&'static str>,
    },
    /// A field's text could not be coerced to its kind.
    #[error("{label} must be a valid {expected}")]
    InvalidField {
        /// Label of the offending field.
        label: &'static str,
        /// Description of the expected value.
        expected: &'static str,
    },
    /// The input name is not part of the entity's form.
    #[error("unknown form field: {name}")]
    UnknownField {
        /// Input name that was supplied.
        name: String,
    },
    /// The record carries no identifier, so it cannot be edited.
    #[error("{entity} record has no identifier and cannot be edited")]
    MissingId {
        /// Record type being edited.
        entity: EntityKind,
    },
    /// The coerced draft does not form a valid record.
    #[error("form could not be submitted: {message}")]
    Malformed {
        /// Decoder detail.
        message: String,
    },
}

/// Static form description for one entity type.
#[derive(Debug)]
pub struct FormSchema {
    fields: &'static [FieldSpec],
}

impl FormSchema {
    /// Build a schema from its ordered fields.
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Fields in form order.
    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Look up a field by input name, falling back to its wire key.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields
            .iter()
            .find(|field| field.input == name)
            .or_else(|| self.fields.iter().find(|field| field.key == name))
    }

    /// A fresh draft holding the type defaults.
    pub fn default_draft(&self) -> Draft {
        let fields = self
            .fields
            .iter()
            .map(|field| (field.key.to_owned(), field.initial_value()))
            .collect();
        Draft {
            fields,
            ..Draft::default()
        }
    }

    /// Copy a loaded record into a draft, blanking write-only fields.
    ///
    /// Fields the user never edits are submitted exactly as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Malformed`] when the record does not serialise to
    /// a JSON object.
    pub fn draft_from<E: Entity>(&self, record: &E) -> Result<Draft, FormError> {
        let value = serde_json::to_value(record).map_err(|error| FormError::Malformed {
            message: error.to_string(),
        })?;
        let Value::Object(mut fields) = value else {
            return Err(FormError::Malformed {
                message: format!("{} did not serialise to an object", E::KIND),
            });
        };
        for field in self.fields.iter().filter(|f| f.kind == FieldKind::Secret) {
            fields.insert(field.key.to_owned(), Value::String(String::new()));
        }
        Ok(Draft {
            fields,
            loaded: true,
            edited: BTreeSet::new(),
        })
    }

    /// Merge one input into the draft.
    ///
    /// Relation inputs (`busId`, `routeId`, `scheduleId`) are stored as a
    /// nested `{ "id": value }` object under the relation's wire key.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] when `name` is not part of the form.
    pub fn apply_input(&self, draft: &mut Draft, name: &str, value: &str) -> Result<(), FormError> {
        let field = self.field(name).ok_or_else(|| FormError::UnknownField {
            name: name.to_owned(),
        })?;
        let stored = match field.kind {
            FieldKind::Reference => json!({ "id": value }),
            _ => Value::String(value.to_owned()),
        };
        draft.fields.insert(field.key.to_owned(), stored);
        draft.edited.insert(field.key);
        Ok(())
    }

    /// Labels of required fields that are blank in `draft`.
    pub fn missing_fields(&self, draft: &Draft, creating: bool) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.is_required(creating))
            .filter(|field| draft.get(field.key).is_none_or(is_blank))
            .map(|field| field.label)
            .collect()
    }

    /// Validate and coerce the draft into the JSON object sent to the store.
    ///
    /// Blank optional fields are omitted. On a draft copied from a loaded
    /// record, fields the user has not edited are passed through verbatim;
    /// together with `id` this makes an unmodified record round-trip
    /// unchanged through an edit.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingFields`] before any coercion when required
    /// fields are blank, then [`FormError::InvalidField`] for the first value
    /// that cannot be coerced.
    pub fn payload(
        &self,
        draft: &Draft,
        creating: bool,
        id: Option<&RecordId>,
    ) -> Result<Map<String, Value>, FormError> {
        let labels = self.missing_fields(draft, creating);
        if !labels.is_empty() {
            return Err(FormError::MissingFields { labels });
        }

        let mut payload = Map::new();
        if let Some(id) = id {
            let wire_id = serde_json::to_value(id).map_err(|error| FormError::Malformed {
                message: error.to_string(),
            })?;
            payload.insert("id".to_owned(), wire_id);
        }
        for field in self.fields {
            let Some(value) = draft.get(field.key) else {
                continue;
            };
            if draft.keeps_loaded(field) {
                payload.insert(field.key.to_owned(), value.clone());
            } else if let Some(coerced) = field.coerce(value)? {
                payload.insert(field.key.to_owned(), coerced);
            }
        }
        Ok(payload)
    }

    /// Validate, coerce, and decode the draft into a typed record.
    ///
    /// # Errors
    ///
    /// Propagates [`FormSchema::payload`] errors and reports decode failures
    /// (unknown choice values, out-of-range numbers) as
    /// [`FormError::Malformed`].
    pub fn decode<E: Entity>(
        &self,
        draft: &Draft,
        creating: bool,
        id: Option<&RecordId>,
    ) -> Result<E, FormError> {
        let payload = self.payload(draft, creating, id)?;
        serde_json::from_value(Value::Object(payload)).map_err(|error| FormError::Malformed {
            message: error.to_string(),
        })
    }
}

/// The locally held, user-editable copy of a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    fields: Map<String, Value>,
    loaded: bool,
    edited: BTreeSet<&'static str>,
}

impl Draft {
    /// Whether the user changed the field since the draft was opened.
    pub fn is_edited(&self, key: &str) -> bool {
        self.edited.contains(key)
    }

    fn keeps_loaded(&self, field: &FieldSpec) -> bool {
        self.loaded && field.kind != FieldKind::Secret && !self.is_edited(field.key)
    }

    /// Raw draft value under a wire key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Draft value rendered as the text a form input would show.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map_or_else(String::new, value_text)
    }

    /// All draft values keyed by wire key.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map.get("id").map_or_else(String::new, value_text),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
    }
}
