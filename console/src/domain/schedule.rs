//! Schedules pairing a bus with a route.

use serde::{Deserialize, Serialize};

use super::wire_enum::define_wire_enum;
use super::{Bus, Entity, EntityKind, FieldSpec, FormSchema, RecordId, Related, Route, TimeOfDay};

define_wire_enum! {
    /// Days on which a schedule runs.
    pub enum Frequency {
        Daily => "Daily",
        Weekdays => "Weekdays",
        Weekends => "Weekends",
    }
}

define_wire_enum! {
    /// Operational status of a schedule.
    pub enum ScheduleStatus {
        Active => "Active",
        Cancelled => "Cancelled",
        Delayed => "Delayed",
    }
}

static SCHEDULE_FORM: FormSchema = FormSchema::new(&[
    FieldSpec::reference("bus", "busId", "Bus"),
    FieldSpec::reference("route", "routeId", "Route"),
    FieldSpec::time("departureTime", "Departure Time"),
    FieldSpec::time("arrivalTime", "Arrival Time"),
    FieldSpec::text("frequency", "Frequency").default_value("Daily"),
    FieldSpec::text("status", "Status").default_value("Active"),
]);

/// A recurring departure of one bus on one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Store-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Assigned bus.
    pub bus: Related<Bus>,
    /// Assigned route.
    pub route: Related<Route>,
    /// Departure time of day.
    pub departure_time: TimeOfDay,
    /// Arrival time of day.
    pub arrival_time: TimeOfDay,
    /// Days of operation.
    pub frequency: Frequency,
    /// Operational status.
    pub status: ScheduleStatus,
}

impl Schedule {
    /// Fleet number of the embedded bus, when the store embedded it.
    pub fn bus_number(&self) -> Option<&str> {
        self.bus.embedded().map(|bus| bus.bus_number.as_str())
    }

    /// Route number of the embedded route, when the store embedded it.
    pub fn route_number(&self) -> Option<&str> {
        self.route.embedded().map(|route| route.route_number.as_str())
    }
}

impl Entity for Schedule {
    const KIND: EntityKind = EntityKind::Schedule;

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
        &SCHEDULE_FORM
    }
}
