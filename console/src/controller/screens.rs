//! Screens whose forms pick related records.
//!
//! Schedules reference a bus and a route; timetables reference a schedule.
//! These screens load their own records and the selector options in one
//! round, and report a failure of any of the fetches as a single notice.

use std::sync::Arc;

use tracing::warn;

use super::{Controller, ControllerError, Notice, SelectOption, select_options};
use crate::domain::ports::{ServiceError, SharedService};
use crate::domain::{Bus, Route, Schedule, Timetable};

const FETCH_FAILED: &str = "Failed to fetch data";

/// Schedule list and form with bus and route selectors.
pub struct ScheduleScreen {
    schedules: Controller<Schedule>,
    buses: SharedService<Bus>,
    routes: SharedService<Route>,
    bus_options: Vec<SelectOption>,
    route_options: Vec<SelectOption>,
}

impl ScheduleScreen {
    /// Create an unloaded screen over the three collections.
    pub fn new(
        schedules: SharedService<Schedule>,
        buses: SharedService<Bus>,
        routes: SharedService<Route>,
    ) -> Self {
        Self {
            schedules: Controller::new(schedules),
            buses,
            routes,
            bus_options: Vec::new(),
            route_options: Vec::new(),
        }
    }

    /// Schedule list and form state.
    pub const fn controller(&self) -> &Controller<Schedule> {
        &self.schedules
    }

    /// Schedule controller, for form input and delete requests.
    pub const fn controller_mut(&mut self) -> &mut Controller<Schedule> {
        &mut self.schedules
    }

    /// Bus selector entries.
    pub fn bus_options(&self) -> &[SelectOption] {
        &self.bus_options
    }

    /// Route selector entries.
    pub fn route_options(&self) -> &[SelectOption] {
        &self.route_options
    }

    /// Fetch schedules, buses, and routes concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first store error; the notice reads "Failed to fetch data".
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        let ticket = self.schedules.begin_load();
        let schedules = Arc::clone(self.schedules.service());
        let buses = Arc::clone(&self.buses);
        let routes = Arc::clone(&self.routes);

        match tokio::try_join!(schedules.list(), buses.list(), routes.list()) {
            Ok((schedules, buses, routes)) => {
                if self.schedules.finish_load(ticket, Ok(schedules)) {
                    self.bus_options = select_options(&buses);
                    self.route_options = select_options(&routes);
                }
                Ok(())
            }
            Err(error) => {
                if self.schedules.finish_load(ticket, Err(error.clone())) {
                    self.schedules
                        .set_notice(Notice::Error(FETCH_FAILED.to_owned()));
                }
                Err(error)
            }
        }
    }

    /// Submit the schedule form, then refresh the selectors.
    ///
    /// # Errors
    ///
    /// See [`Controller::submit`].
    pub async fn submit(&mut self) -> Result<Schedule, ControllerError> {
        let saved = self.schedules.submit().await?;
        self.refresh_options().await;
        Ok(saved)
    }

    /// Confirm the pending delete, then refresh the selectors.
    ///
    /// # Errors
    ///
    /// See [`Controller::confirm_delete`].
    pub async fn confirm_delete(&mut self) -> Result<(), ControllerError> {
        self.schedules.confirm_delete().await?;
        self.refresh_options().await;
        Ok(())
    }

    async fn refresh_options(&mut self) {
        let buses = Arc::clone(&self.buses);
        let routes = Arc::clone(&self.routes);
        match tokio::try_join!(buses.list(), routes.list()) {
            Ok((buses, routes)) => {
                self.bus_options = select_options(&buses);
                self.route_options = select_options(&routes);
            }
            Err(error) => warn!(%error, "schedule selector refresh failed"),
        }
    }
}

/// Timetable list and form with a schedule selector.
pub struct TimetableScreen {
    timetables: Controller<Timetable>,
    schedules: SharedService<Schedule>,
    schedule_options: Vec<SelectOption>,
}

impl TimetableScreen {
    /// Create an unloaded screen over timetables and schedules.
    pub fn new(timetables: SharedService<Timetable>, schedules: SharedService<Schedule>) -> Self {
        Self {
            timetables: Controller::new(timetables),
            schedules,
            schedule_options: Vec::new(),
        }
    }

    /// Timetable list and form state.
    pub const fn controller(&self) -> &Controller<Timetable> {
        &self.timetables
    }

    /// Timetable controller, for form input and delete requests.
    pub const fn controller_mut(&mut self) -> &mut Controller<Timetable> {
        &mut self.timetables
    }

    /// Schedule selector entries.
    pub fn schedule_options(&self) -> &[SelectOption] {
        &self.schedule_options
    }

    /// Fetch timetables and schedules concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first store error; the notice reads "Failed to fetch data".
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        let ticket = self.timetables.begin_load();
        let timetables = Arc::clone(self.timetables.service());
        let schedules = Arc::clone(&self.schedules);

        match tokio::try_join!(timetables.list(), schedules.list()) {
            Ok((timetables, schedules)) => {
                if self.timetables.finish_load(ticket, Ok(timetables)) {
                    self.schedule_options = select_options(&schedules);
                }
                Ok(())
            }
            Err(error) => {
                if self.timetables.finish_load(ticket, Err(error.clone())) {
                    self.timetables
                        .set_notice(Notice::Error(FETCH_FAILED.to_owned()));
                }
                Err(error)
            }
        }
    }

    /// Submit the timetable form.
    ///
    /// # Errors
    ///
    /// See [`Controller::submit`].
    pub async fn submit(&mut self) -> Result<Timetable, ControllerError> {
        self.timetables.submit().await
    }

    /// Confirm the pending delete.
    ///
    /// # Errors
    ///
    /// See [`Controller::confirm_delete`].
    pub async fn confirm_delete(&mut self) -> Result<(), ControllerError> {
        self.timetables.confirm_delete().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{InMemoryRecordService, ServiceOperation};
    use crate::domain::{BusStatus, BusType, RecordId, RouteStatus};

    fn bus() -> Bus {
        Bus {
            id: Some(RecordId::from(1)),
            bus_number: "BUS-101".to_owned(),
            bus_type: BusType::Sleeper,
            total_seats: 30,
            registration_number: "KA-01-S-0001".to_owned(),
            status: BusStatus::Active,
        }
    }

    fn route() -> Route {
        Route {
            id: Some(RecordId::from(5)),
            route_number: "R-7".to_owned(),
            source: "Mysuru".to_owned(),
            destination: "Bengaluru".to_owned(),
            distance: 145.0,
            estimated_duration: 180,
            stops: vec!["Mandya".to_owned()],
            status: RouteStatus::Active,
        }
    }

    #[tokio::test]
    async fn schedule_screen_loads_selector_options() {
        let routes = Arc::new(InMemoryRecordService::with_records(vec![route()]));
        let mut screen = ScheduleScreen::new(
            Arc::new(InMemoryRecordService::<Schedule>::default()),
            Arc::new(InMemoryRecordService::with_records(vec![bus()])),
            routes,
        );

        screen.load().await.expect("all lists load");

        assert_eq!(
            screen.bus_options(),
            [SelectOption {
                value: "1".to_owned(),
                label: "BUS-101 - Sleeper".to_owned(),
            }]
        );
        assert_eq!(
            screen.route_options()[0].label,
            "R-7 - Mysuru to Bengaluru"
        );
        assert!(!screen.controller().is_loading());
    }

    #[tokio::test]
    async fn any_failed_fetch_reports_one_notice() {
        let routes = Arc::new(InMemoryRecordService::with_records(vec![route()]));
        routes.fail_next(ServiceOperation::List, ServiceError::status(502_u16));
        let mut screen = ScheduleScreen::new(
            Arc::new(InMemoryRecordService::<Schedule>::default()),
            Arc::new(InMemoryRecordService::with_records(vec![bus()])),
            routes,
        );

        screen.load().await.expect_err("route list fails");

        assert_eq!(
            screen.controller().notice(),
            Some(&Notice::Error("Failed to fetch data".to_owned()))
        );
        assert!(screen.bus_options().is_empty());
        assert!(!screen.controller().is_loading());
    }

    #[tokio::test]
    async fn created_schedule_refreshes_the_list() {
        let mut screen = ScheduleScreen::new(
            Arc::new(InMemoryRecordService::<Schedule>::default()),
            Arc::new(InMemoryRecordService::with_records(vec![bus()])),
            Arc::new(InMemoryRecordService::with_records(vec![route()])),
        );
        screen.load().await.expect("all lists load");

        let form = screen.controller_mut();
        form.begin_create();
        for (name, value) in [
            ("busId", "1"),
            ("routeId", "5"),
            ("departureTime", "06:00"),
            ("arrivalTime", "09:00"),
            ("frequency", "Weekends"),
        ] {
            form.update_field(name, value).expect("known field");
        }
        screen.submit().await.expect("create succeeds");

        assert_eq!(screen.controller().items().len(), 1);
        assert_eq!(screen.route_options().len(), 1);
    }

    #[tokio::test]
    async fn timetable_screen_offers_schedules() {
        let schedule = Schedule {
            id: Some(RecordId::from(9)),
            bus: crate::domain::Related::Embedded(Box::new(bus())),
            route: crate::domain::Related::Embedded(Box::new(route())),
            departure_time: "07:15".parse().expect("valid time"),
            arrival_time: "10:15".parse().expect("valid time"),
            frequency: crate::domain::Frequency::Daily,
            status: crate::domain::ScheduleStatus::Active,
        };
        let mut screen = TimetableScreen::new(
            Arc::new(InMemoryRecordService::<Timetable>::default()),
            Arc::new(InMemoryRecordService::with_records(vec![schedule])),
        );

        screen.load().await.expect("both lists load");

        assert_eq!(
            screen.schedule_options(),
            [SelectOption {
                value: "9".to_owned(),
                label: "BUS-101 - R-7 (07:15)".to_owned(),
            }]
        );
    }
}
