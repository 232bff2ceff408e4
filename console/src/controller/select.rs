//! Selector options for relation inputs.

use crate::domain::{Bus, Entity, Route, Schedule};

/// One entry in a relation selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Identifier submitted when the option is picked.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

/// Records that can be offered in a relation selector.
pub trait Selectable: Entity {
    /// Label shown for this record.
    fn option_label(&self) -> String;
}

impl Selectable for Bus {
    fn option_label(&self) -> String {
        format!("{} - {}", self.bus_number, self.bus_type)
    }
}

impl Selectable for Route {
    fn option_label(&self) -> String {
        format!(
            "{} - {} to {}",
            self.route_number, self.source, self.destination
        )
    }
}

impl Selectable for Schedule {
    fn option_label(&self) -> String {
        format!(
            "{} - {} ({})",
            self.bus_number().unwrap_or("-"),
            self.route_number().unwrap_or("-"),
            self.departure_time
        )
    }
}

/// Options for every record that has an identifier, in store order.
pub fn select_options<E: Selectable>(records: &[E]) -> Vec<SelectOption> {
    records
        .iter()
        .filter_map(|record| {
            let id = record.id()?;
            Some(SelectOption {
                value: id.to_string(),
                label: record.option_label(),
            })
        })
        .collect()
}
