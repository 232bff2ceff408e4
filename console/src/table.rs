//! Plain-text rendering of record lists and dashboard counts.

use std::fmt::Write as _;

use crate::dashboard::DashboardStats;
use crate::domain::{Bus, Entity, Route, Schedule, Timetable, User};

const BLANK: &str = "-";

/// Records that render as one table row.
pub trait Tabular: Entity {
    /// Column headings, excluding the leading identifier column.
    const COLUMNS: &'static [&'static str];

    /// Cell text for each of [`Tabular::COLUMNS`], in order.
    fn cells(&self) -> Vec<String>;
}

fn or_blank(value: Option<impl ToString>) -> String {
    value.map_or_else(|| BLANK.to_owned(), |v| v.to_string())
}

impl Tabular for Bus {
    const COLUMNS: &'static [&'static str] =
        &["Bus Number", "Type", "Seats", "Registration", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.bus_number.clone(),
            self.bus_type.to_string(),
            self.total_seats.to_string(),
            self.registration_number.clone(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Route {
    const COLUMNS: &'static [&'static str] = &[
        "Route Number",
        "Source",
        "Destination",
        "Distance (km)",
        "Duration (min)",
        "Status",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.route_number.clone(),
            self.source.clone(),
            self.destination.clone(),
            self.distance.to_string(),
            self.estimated_duration.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Schedule {
    const COLUMNS: &'static [&'static str] =
        &["Bus", "Route", "Departure", "Arrival", "Frequency", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            or_blank(self.bus_number()),
            or_blank(self.route_number()),
            self.departure_time.to_string(),
            self.arrival_time.to_string(),
            self.frequency.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Timetable {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "Bus",
        "Route",
        "Scheduled Dep",
        "Actual Dep",
        "Status",
    ];

    fn cells(&self) -> Vec<String> {
        let schedule = self.schedule_details();
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            or_blank(schedule.and_then(Schedule::bus_number)),
            or_blank(schedule.and_then(Schedule::route_number)),
            self.scheduled_departure.to_string(),
            or_blank(self.actual_departure),
            self.status.to_string(),
        ]
    }
}

impl Tabular for User {
    const COLUMNS: &'static [&'static str] =
        &["Username", "Name", "Email", "Role", "Phone", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.full_name(),
            self.email.clone(),
            self.role.to_string(),
            or_blank(self.phone_number.as_deref().filter(|phone| !phone.is_empty())),
            self.status.to_string(),
        ]
    }
}

/// Render `items` as an aligned text table headed by an `ID` column.
///
/// A loading list renders `Loading <plural>...` and an empty one
/// `No <plural> found`.
pub fn render_table<E: Tabular>(items: &[E], loading: bool) -> String {
    let plural = E::KIND.plural();
    if loading {
        return format!("Loading {plural}...");
    }
    if items.is_empty() {
        return format!("No {plural} found");
    }

    let header = std::iter::once("ID".to_owned())
        .chain(E::COLUMNS.iter().map(|column| (*column).to_owned()))
        .collect::<Vec<_>>();
    let rows = items
        .iter()
        .map(|item| {
            std::iter::once(or_blank(item.id()))
                .chain(item.cells().into_iter().map(|cell| {
                    if cell.trim().is_empty() {
                        BLANK.to_owned()
                    } else {
                        cell
                    }
                }))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut widths = header.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }
    out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{cell:<width$}");
    }
    line.trim_end().to_owned()
}

/// Render the dashboard counts, or a loading line.
pub fn render_dashboard(stats: Option<&DashboardStats>, loading: bool) -> String {
    let mut out = String::from("Admin Dashboard\n");
    match stats {
        _ if loading => out.push_str("Loading statistics...\n"),
        None => out.push_str("No statistics available\n"),
        Some(stats) => {
            let _ = writeln!(
                out,
                "Total Buses      {:>5}  Active: {}",
                stats.total_buses, stats.active_buses
            );
            let _ = writeln!(
                out,
                "Total Routes     {:>5}  Active: {}",
                stats.total_routes, stats.active_routes
            );
            let _ = writeln!(out, "Total Schedules  {:>5}", stats.total_schedules);
            let _ = writeln!(out, "Total Users      {:>5}", stats.total_users);
        }
    }
    out
}
