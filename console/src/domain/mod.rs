//! Domain primitives for the transport console.
//!
//! Purpose: define the record types exchanged with the record store, the
//! per-entity form configuration that drives the generic controller, and the
//! port through which every list and mutation flows.
//!
//! Public surface:
//! - Bus, Route, Schedule, Timetable, User: typed records and their vocabularies.
//! - Entity / EntityKind: configuration shared by all record types.
//! - FormSchema / FieldSpec / Draft / FormError: form editing and submission.
//! - ports::RecordService: the record store boundary.

mod bus;
mod entity;
mod form;
mod lenient;
pub mod ports;
mod record_id;
mod route;
mod schedule;
mod time_of_day;
mod timetable;
mod user;
mod wire_enum;

pub use self::bus::{Bus, BusStatus, BusType};
pub use self::entity::{Entity, EntityKind, Related};
pub use self::form::{Draft, FieldKind, FieldSpec, FormError, FormSchema, Requirement};
pub use self::record_id::{RecordId, RecordIdValidationError};
pub use self::route::{Route, RouteStatus};
pub use self::schedule::{Frequency, Schedule, ScheduleStatus};
pub use self::time_of_day::{ParseTimeOfDayError, TimeOfDay};
pub use self::timetable::{Timetable, TimetableStatus};
pub use self::user::{Password, Role, User, UserStatus};
