//! Dated timetable entries observed against a schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::wire_enum::define_wire_enum;
use super::{Entity, EntityKind, FieldSpec, FormSchema, RecordId, Related, Schedule, TimeOfDay};

define_wire_enum! {
    /// Punctuality of a timetable entry.
    pub enum TimetableStatus {
        OnTime => "On Time",
        Delayed => "Delayed",
        Cancelled => "Cancelled",
    }
}

static TIMETABLE_FORM: FormSchema = FormSchema::new(&[
    FieldSpec::reference("schedule", "scheduleId", "Schedule"),
    FieldSpec::date("date", "Date"),
    FieldSpec::time("scheduledDeparture", "Scheduled Departure"),
    FieldSpec::time("scheduledArrival", "Scheduled Arrival"),
    FieldSpec::time("actualDeparture", "Actual Departure").optional(),
    FieldSpec::time("actualArrival", "Actual Arrival").optional(),
    FieldSpec::text("status", "Status").default_value("On Time"),
    FieldSpec::text("remarks", "Remarks").optional(),
]);

/// One day's run of a schedule.
///
/// Scheduled times are always present; actual times stay empty until the run
/// is observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    /// Store-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Schedule this entry belongs to.
    pub schedule: Related<Schedule>,
    /// Service date.
    pub date: NaiveDate,
    /// Planned departure.
    pub scheduled_departure: TimeOfDay,
    /// Planned arrival.
    pub scheduled_arrival: TimeOfDay,
    /// Observed departure.
    #[serde(
        default,
        deserialize_with = "lenient::blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_departure: Option<TimeOfDay>,
    /// Observed arrival.
    #[serde(
        default,
        deserialize_with = "lenient::blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_arrival: Option<TimeOfDay>,
    /// Punctuality.
    pub status: TimetableStatus,
    /// Free-text operator remarks.
    #[serde(
        default,
        deserialize_with = "lenient::blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub remarks: Option<String>,
}

impl Timetable {
    /// Embedded schedule, when the store embedded it.
    pub fn schedule_details(&self) -> Option<&Schedule> {
        self.schedule.embedded()
    }
}

impl Entity for Timetable {
    const KIND: EntityKind = EntityKind::Timetable;

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
        &TIMETABLE_FORM
    }
}
