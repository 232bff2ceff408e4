//! Console user accounts.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::lenient;
use super::wire_enum::define_wire_enum;
use super::{Entity, EntityKind, FieldSpec, FormSchema, RecordId};

define_wire_enum! {
    /// Access level of a user.
    pub enum Role {
        User => "USER",
        Admin => "ADMIN",
    }
}

define_wire_enum! {
    /// Account status of a user.
    pub enum UserStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
}

static USER_FORM: FormSchema = FormSchema::new(&[
    FieldSpec::text("username", "Username"),
    FieldSpec::text("email", "Email"),
    FieldSpec::secret("password", "Password"),
    FieldSpec::text("role", "Role").default_value("USER"),
    FieldSpec::text("firstName", "First Name"),
    FieldSpec::text("lastName", "Last Name"),
    FieldSpec::text("phoneNumber", "Phone Number").optional(),
    FieldSpec::text("status", "Status").default_value("Active"),
]);

/// Write-only password text.
///
/// The buffer is scrubbed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wrap a plaintext password.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the plaintext.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A console user account.
///
/// ## Invariants
/// - `password` is only ever set from form input; it is blanked whenever a
///   stored user is copied into an edit draft and omitted from the request
///   body when blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// New password, when one is being set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<Password>,
    /// Access level.
    pub role: Role,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone number.
    #[serde(
        default,
        deserialize_with = "lenient::blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number: Option<String>,
    /// Account status.
    pub status: UserStatus,
}

impl User {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn with_id(self, id: RecordId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    fn form() -> &'static FormSchema {
        &USER_FORM
    }
}
