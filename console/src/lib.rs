//! Administrative console for a bus transport operator.
//!
//! Screens list, create, edit, and delete buses, routes, schedules,
//! timetables, and users held by a remote record store, plus a dashboard of
//! fleet-wide counts. The console keeps no authoritative state: every change
//! is passed through to the store and followed by a fresh list.

pub mod config;
pub mod controller;
pub mod dashboard;
pub mod domain;
pub mod outbound;
pub mod shell;
pub mod table;

pub use config::ConsoleSettings;
pub use shell::{RecordServices, Screen, Section, Shell};
