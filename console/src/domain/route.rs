//! Route records.

use serde::{Deserialize, Serialize};

use super::lenient;
use super::wire_enum::define_wire_enum;
use super::{Entity, EntityKind, FieldSpec, FormSchema, RecordId};

define_wire_enum! {
    /// Operational status of a route.
    pub enum RouteStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
}

static ROUTE_FORM: FormSchema = FormSchema::new(&[
    FieldSpec::text("routeNumber", "Route Number"),
    FieldSpec::text("source", "Source"),
    FieldSpec::text("destination", "Destination"),
    FieldSpec::decimal("distance", "Distance (km)"),
    FieldSpec::integer("estimatedDuration", "Estimated Duration (minutes)"),
    FieldSpec::list("stops", "Stops (comma-separated)").optional(),
    FieldSpec::text("status", "Status").default_value("Active"),
]);

/// A route between two terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Store-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Route number, e.g. `R-12`.
    pub route_number: String,
    /// Origin terminal.
    pub source: String,
    /// Destination terminal.
    pub destination: String,
    /// Length in kilometres.
    #[serde(deserialize_with = "lenient::number_or_text")]
    pub distance: f64,
    /// Expected travel time in minutes.
    #[serde(deserialize_with = "lenient::number_or_text")]
    pub estimated_duration: u32,
    /// Intermediate stops in travel order.
    #[serde(
        default,
        deserialize_with = "lenient::list_or_text",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub stops: Vec<String>,
    /// Operational status.
    pub status: RouteStatus,
}

impl Route {
    /// Whether the route counts as active on the dashboard.
    pub fn is_active(&self) -> bool {
        self.status == RouteStatus::Active
    }
}

impl Entity for Route {
    const KIND: EntityKind = EntityKind::Route;

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
        &ROUTE_FORM
    }
}
