//! Fleet-wide record counts for the admin dashboard.
//!
//! Every refresh fetches the bus, route, schedule, and user collections
//! concurrently and recomputes the counts from scratch. A failure of any one
//! fetch fails the whole refresh; no partial counts are published.

use std::sync::Arc;

use tracing::error;

use crate::domain::ports::{ServiceError, SharedService};
use crate::domain::{Bus, Route, Schedule, User};

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// Buses in the store.
    pub total_buses: usize,
    /// Buses whose status is `Active`.
    pub active_buses: usize,
    /// Routes in the store.
    pub total_routes: usize,
    /// Routes whose status is `Active`.
    pub active_routes: usize,
    /// Schedules in the store.
    pub total_schedules: usize,
    /// User accounts in the store.
    pub total_users: usize,
}

impl DashboardStats {
    /// Compute counts from freshly listed collections.
    pub fn from_records(
        buses: &[Bus],
        routes: &[Route],
        schedules: &[Schedule],
        users: &[User],
    ) -> Self {
        Self {
            total_buses: buses.len(),
            active_buses: buses.iter().filter(|bus| bus.is_active()).count(),
            total_routes: routes.len(),
            active_routes: routes.iter().filter(|route| route.is_active()).count(),
            total_schedules: schedules.len(),
            total_users: users.len(),
        }
    }
}

/// Dashboard aggregator state.
pub struct Dashboard {
    buses: SharedService<Bus>,
    routes: SharedService<Route>,
    schedules: SharedService<Schedule>,
    users: SharedService<User>,
    stats: Option<DashboardStats>,
    loading: bool,
    last_error: Option<ServiceError>,
}

impl Dashboard {
    /// Create a dashboard that has not fetched anything yet.
    pub fn new(
        buses: SharedService<Bus>,
        routes: SharedService<Route>,
        schedules: SharedService<Schedule>,
        users: SharedService<User>,
    ) -> Self {
        Self {
            buses,
            routes,
            schedules,
            users,
            stats: None,
            loading: false,
            last_error: None,
        }
    }

    /// Counts from the last successful refresh.
    pub const fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    /// Whether a refresh is in flight.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error from the last refresh, cleared by a successful one.
    pub const fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    /// Fetch all four collections and recompute the counts.
    ///
    /// # Errors
    ///
    /// Returns the first store error. The previously published counts are
    /// left untouched.
    pub async fn refresh(&mut self) -> Result<DashboardStats, ServiceError> {
        self.loading = true;
        let buses = Arc::clone(&self.buses);
        let routes = Arc::clone(&self.routes);
        let schedules = Arc::clone(&self.schedules);
        let users = Arc::clone(&self.users);

        let result = tokio::try_join!(buses.list(), routes.list(), schedules.list(), users.list());
        self.loading = false;

        match result {
            Ok((buses, routes, schedules, users)) => {
                let stats = DashboardStats::from_records(&buses, &routes, &schedules, &users);
                self.stats = Some(stats);
                self.last_error = None;
                Ok(stats)
            }
            Err(err) => {
                error!(error = %err, "dashboard statistics fetch failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}
