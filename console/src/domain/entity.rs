//! Entity configuration shared by every record type the console manages.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{FormSchema, RecordId};

/// The five record types managed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Fleet vehicles.
    Bus,
    /// Routes between terminals.
    Route,
    /// Recurring bus-on-route departures.
    Schedule,
    /// Dated runs of a schedule.
    Timetable,
    /// Console user accounts.
    User,
}

impl EntityKind {
    /// Every kind in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Bus,
        Self::Route,
        Self::Schedule,
        Self::Timetable,
        Self::User,
    ];

    /// Capitalised singular name, e.g. `Bus`.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bus => "Bus",
            Self::Route => "Route",
            Self::Schedule => "Schedule",
            Self::Timetable => "Timetable",
            Self::User => "User",
        }
    }

    /// Lower-case singular name, e.g. `bus`.
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Route => "route",
            Self::Schedule => "schedule",
            Self::Timetable => "timetable",
            Self::User => "user",
        }
    }

    /// Lower-case plural name, e.g. `buses`. Also the store collection path.
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Bus => "buses",
            Self::Route => "routes",
            Self::Schedule => "schedules",
            Self::Timetable => "timetables",
            Self::User => "users",
        }
    }

    /// Message shown when the list cannot be fetched.
    pub fn fetch_failed(self) -> String {
        format!("Failed to fetch {}", self.plural())
    }

    /// Message shown when a create or update fails without a server message.
    pub fn save_failed(self) -> String {
        format!("Failed to save {}", self.singular())
    }

    /// Message shown when a delete fails.
    pub fn delete_failed(self) -> String {
        format!("Failed to delete {}", self.singular())
    }

    /// Success message after a create.
    pub fn created(self) -> String {
        format!("{} created successfully!", self.title())
    }

    /// Success message after an update.
    pub fn updated(self) -> String {
        format!("{} updated successfully!", self.title())
    }

    /// Success message after a delete.
    pub fn deleted(self) -> String {
        format!("{} deleted successfully!", self.title())
    }

    /// Prompt shown while a delete awaits confirmation.
    pub fn confirm_delete_prompt(self) -> String {
        format!("Are you sure you want to delete this {}?", self.singular())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// A record type the console can list, edit, and delete.
///
/// Implementations pair the wire representation (serde) with a static
/// [`FormSchema`] describing how drafts are edited and submitted.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Which record type this is.
    const KIND: EntityKind;

    /// Store-assigned identifier; absent before the record is created.
    fn id(&self) -> Option<&RecordId>;

    /// Return the record with its identifier replaced.
    #[must_use]
    fn with_id(self, id: RecordId) -> Self;

    /// Form fields, defaults, and requirements for this record type.
    fn form() -> &'static FormSchema;
}

/// A many-to-one relation as exchanged with the store.
///
/// The store embeds the full related record when listing; drafts carry only
/// the `{ "id": ... }` reference picked from a selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    /// Full related record embedded by the store.
    Embedded(Box<T>),
    /// Bare reference by identifier.
    Reference {
        /// Identifier of the related record.
        id: RecordId,
    },
}

impl<T: Entity> Related<T> {
    /// Reference a record by identifier.
    pub const fn reference(id: RecordId) -> Self {
        Self::Reference { id }
    }

    /// Identifier of the related record, when known.
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Self::Embedded(record) => record.id(),
            Self::Reference { id } => Some(id),
        }
    }

    /// The embedded record, when the store provided one.
    pub fn embedded(&self) -> Option<&T> {
        match self {
            Self::Embedded(record) => Some(record),
            Self::Reference { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EntityKind::Bus, "Failed to fetch buses", "Bus created successfully!")]
    #[case(EntityKind::Timetable, "Failed to fetch timetables", "Timetable created successfully!")]
    fn messages_follow_entity_names(
        #[case] kind: EntityKind,
        #[case] fetch_failed: &str,
        #[case] created: &str,
    ) {
        assert_eq!(kind.fetch_failed(), fetch_failed);
        assert_eq!(kind.created(), created);
    }

    #[test]
    fn mutation_messages_use_singular_names() {
        assert_eq!(EntityKind::Route.save_failed(), "Failed to save route");
        assert_eq!(EntityKind::User.delete_failed(), "Failed to delete user");
        assert_eq!(EntityKind::Schedule.updated(), "Schedule updated successfully!");
        assert_eq!(
            EntityKind::Bus.confirm_delete_prompt(),
            "Are you sure you want to delete this bus?"
        );
    }
}
