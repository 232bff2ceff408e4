//! Bus fleet records.

use serde::{Deserialize, Serialize};

use super::lenient;
use super::wire_enum::define_wire_enum;
use super::{Entity, EntityKind, FieldSpec, FormSchema, RecordId};

define_wire_enum! {
    /// Cabin category of a bus.
    pub enum BusType {
        Ac => "AC",
        NonAc => "Non-AC",
        Sleeper => "Sleeper",
        SemiSleeper => "Semi-Sleeper",
    }
}

define_wire_enum! {
    /// Operational status of a bus.
    pub enum BusStatus {
        Active => "Active",
        Inactive => "Inactive",
        UnderMaintenance => "Under Maintenance",
    }
}

static BUS_FORM: FormSchema = FormSchema::new(&[
    FieldSpec::text("busNumber", "Bus Number"),
    FieldSpec::text("busType", "Bus Type").default_value("AC"),
    FieldSpec::count("totalSeats", "Total Seats"),
    FieldSpec::text("registrationNumber", "Registration Number"),
    FieldSpec::text("status", "Status").default_value("Active"),
]);

/// A bus in the fleet.
///
/// ## Invariants
/// - `total_seats` is positive and `bus_number` is unique; both are enforced
///   by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    /// Store-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Fleet number, e.g. `BUS-101`.
    pub bus_number: String,
    /// Cabin category.
    pub bus_type: BusType,
    /// Seat capacity.
    #[serde(deserialize_with = "lenient::number_or_text")]
    pub total_seats: u32,
    /// Vehicle registration plate.
    pub registration_number: String,
    /// Operational status.
    pub status: BusStatus,
}

impl Bus {
    /// Whether the bus counts as active on the dashboard.
    pub fn is_active(&self) -> bool {
        self.status == BusStatus::Active
    }
}

impl Entity for Bus {
    const KIND: EntityKind = EntityKind::Bus;

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
        &BUS_FORM
    }
}
