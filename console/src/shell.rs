//! Navigation between the console's sections.
//!
//! The shell maps seven section paths to screens. Navigating mounts a fresh
//! screen, which loads immediately, and drops the previous one along with
//! its state. Screens share nothing but the record services.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::controller::{
    Controller, ControllerError, Notice, ScheduleScreen, TimetableScreen,
};
use crate::dashboard::Dashboard;
use crate::domain::ports::{ServiceError, SharedService};
use crate::domain::{Bus, RecordId, Route, Schedule, Timetable, User};
use crate::outbound::http::RecordStoreClient;
use crate::table::{render_dashboard, render_table};

/// Header title shown above every screen.
pub const APP_TITLE: &str = "Bus Transport Management System";

/// A navigable section of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Landing page listing the modules.
    Home,
    /// Bus fleet records.
    Buses,
    /// Route records.
    Routes,
    /// Schedules pairing a bus with a route.
    Schedules,
    /// Dated timetable entries.
    Timetables,
    /// Fleet-wide dashboard.
    Admin,
    /// Console user accounts.
    Users,
}

impl Section {
    /// Every section in header order.
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::Buses,
        Self::Routes,
        Self::Schedules,
        Self::Timetables,
        Self::Admin,
        Self::Users,
    ];

    /// Path segment, e.g. `/buses`.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Buses => "/buses",
            Self::Routes => "/routes",
            Self::Schedules => "/schedules",
            Self::Timetables => "/timetables",
            Self::Admin => "/admin",
            Self::Users => "/users",
        }
    }

    /// Header link text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Buses => "Buses",
            Self::Routes => "Routes",
            Self::Schedules => "Schedules",
            Self::Timetables => "Timetables",
            Self::Admin => "Admin",
            Self::Users => "Users",
        }
    }

    /// Screen heading.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Welcome to Bus Transport System",
            Self::Buses => "Bus Management",
            Self::Routes => "Route Management",
            Self::Schedules => "Schedule Management",
            Self::Timetables => "Timetable Management",
            Self::Admin => "Admin Module",
            Self::Users => "User Module",
        }
    }

    /// One-line summary used by the home listing.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Home => "Overview of the console's modules",
            Self::Buses => "Manage bus fleet, types, and availability",
            Self::Routes => "Define and manage bus routes with stops",
            Self::Schedules => "Create and manage bus schedules",
            Self::Timetables => "View and manage daily timetables",
            Self::Admin => "Dashboard and system settings",
            Self::Users => "Manage users and view bus details",
        }
    }

    /// Resolve a path such as `/routes`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalised = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Self::ALL.into_iter().find(|section| section.path() == normalised)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Section {
    type Err = ShellError;

    /// Accepts a path (`/buses`) or a bare name (`buses`, `home`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(section) = Self::from_path(trimmed) {
            return Ok(section);
        }
        Self::ALL
            .into_iter()
            .find(|section| section.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ShellError::UnknownSection(value.to_owned()))
    }
}

/// Failures reported by shell operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    /// The text names no section.
    #[error("unknown section: {0}")]
    UnknownSection(String),
    /// The mounted screen has no list or form.
    #[error("the {section} section has no editable records")]
    NotEditable {
        /// Section that refused the operation.
        section: Section,
    },
    /// The identifier is not in the loaded list.
    #[error("no record with id {id} in {section}")]
    RecordNotFound {
        /// Section that was searched.
        section: Section,
        /// Identifier that was requested.
        id: RecordId,
    },
    /// The screen's controller refused or failed the operation.
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// One record service per collection.
#[derive(Clone)]
pub struct RecordServices {
    /// Bus collection.
    pub buses: SharedService<Bus>,
    /// Route collection.
    pub routes: SharedService<Route>,
    /// Schedule collection.
    pub schedules: SharedService<Schedule>,
    /// Timetable collection.
    pub timetables: SharedService<Timetable>,
    /// User collection.
    pub users: SharedService<User>,
}

impl RecordServices {
    /// HTTP-backed services sharing one store connection.
    pub fn http(client: &RecordStoreClient) -> Self {
        Self {
            buses: Arc::new(client.service::<Bus>()),
            routes: Arc::new(client.service::<Route>()),
            schedules: Arc::new(client.service::<Schedule>()),
            timetables: Arc::new(client.service::<Timetable>()),
            users: Arc::new(client.service::<User>()),
        }
    }
}

/// The mounted screen and its state.
pub enum Screen {
    /// Static module listing.
    Home,
    /// Bus list and form.
    Buses(Controller<Bus>),
    /// Route list and form.
    Routes(Controller<Route>),
    /// Schedule list and form with selectors.
    Schedules(ScheduleScreen),
    /// Timetable list and form with a selector.
    Timetables(TimetableScreen),
    /// Dashboard counts.
    Admin(Dashboard),
    /// User list and form.
    Users(Controller<User>),
}

macro_rules! with_controller_mut {
    ($screen:expr, $section:expr, |$controller:ident| $body:expr) => {
        match $screen {
            Screen::Buses($controller) => $body,
            Screen::Routes($controller) => $body,
            Screen::Users($controller) => $body,
            Screen::Schedules(screen) => {
                let $controller = screen.controller_mut();
                $body
            }
            Screen::Timetables(screen) => {
                let $controller = screen.controller_mut();
                $body
            }
            Screen::Home | Screen::Admin(_) => {
                return Err(ShellError::NotEditable { section: $section })
            }
        }
    };
}

macro_rules! with_controller {
    ($screen:expr, |$controller:ident| $body:expr, $otherwise:expr) => {
        match $screen {
            Screen::Buses($controller) => $body,
            Screen::Routes($controller) => $body,
            Screen::Users($controller) => $body,
            Screen::Schedules(screen) => {
                let $controller = screen.controller();
                $body
            }
            Screen::Timetables(screen) => {
                let $controller = screen.controller();
                $body
            }
            Screen::Home | Screen::Admin(_) => $otherwise,
        }
    };
}

impl Screen {
    /// Build the screen for `section` without loading it.
    pub fn mount(section: Section, services: &RecordServices) -> Self {
        match section {
            Section::Home => Self::Home,
            Section::Buses => Self::Buses(Controller::new(Arc::clone(&services.buses))),
            Section::Routes => Self::Routes(Controller::new(Arc::clone(&services.routes))),
            Section::Schedules => Self::Schedules(ScheduleScreen::new(
                Arc::clone(&services.schedules),
                Arc::clone(&services.buses),
                Arc::clone(&services.routes),
            )),
            Section::Timetables => Self::Timetables(TimetableScreen::new(
                Arc::clone(&services.timetables),
                Arc::clone(&services.schedules),
            )),
            Section::Admin => Self::Admin(Dashboard::new(
                Arc::clone(&services.buses),
                Arc::clone(&services.routes),
                Arc::clone(&services.schedules),
                Arc::clone(&services.users),
            )),
            Section::Users => Self::Users(Controller::new(Arc::clone(&services.users))),
        }
    }

    /// Section this screen belongs to.
    pub const fn section(&self) -> Section {
        match self {
            Self::Home => Section::Home,
            Self::Buses(_) => Section::Buses,
            Self::Routes(_) => Section::Routes,
            Self::Schedules(_) => Section::Schedules,
            Self::Timetables(_) => Section::Timetables,
            Self::Admin(_) => Section::Admin,
            Self::Users(_) => Section::Users,
        }
    }

    /// Run the screen's mount-time fetch.
    ///
    /// # Errors
    ///
    /// Returns the store error; the screen stays usable and shows its notice.
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        match self {
            Self::Home => Ok(()),
            Self::Buses(controller) => controller.load().await,
            Self::Routes(controller) => controller.load().await,
            Self::Users(controller) => controller.load().await,
            Self::Schedules(screen) => screen.load().await,
            Self::Timetables(screen) => screen.load().await,
            Self::Admin(dashboard) => dashboard.refresh().await.map(|_| ()),
        }
    }

    /// Last success or error message of a record screen.
    pub fn notice(&self) -> Option<&Notice> {
        with_controller!(self, |controller| controller.notice(), None)
    }

    /// Prompt shown while a delete awaits confirmation.
    pub fn confirmation_prompt(&self) -> Option<String> {
        with_controller!(self, |controller| controller.confirmation_prompt(), None)
    }

    /// Open the form for a new record.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::NotEditable`] on the home and admin screens.
    pub fn begin_create(&mut self) -> Result<(), ShellError> {
        let section = self.section();
        with_controller_mut!(self, section, |controller| controller.begin_create());
        Ok(())
    }

    /// Open the form on the loaded record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::RecordNotFound`] when `id` is not in the loaded
    /// list.
    pub fn begin_edit(&mut self, id: &RecordId) -> Result<(), ShellError> {
        let section = self.section();
        let not_found = || ShellError::RecordNotFound {
            section,
            id: id.clone(),
        };
        with_controller_mut!(self, section, |controller| {
            let item = controller.find(id).cloned().ok_or_else(not_found)?;
            controller
                .begin_edit(&item)
                .map_err(ControllerError::from)?;
        });
        Ok(())
    }

    /// Merge one input into the open form.
    ///
    /// # Errors
    ///
    /// Returns the form error for unknown input names.
    pub fn update_field(&mut self, name: &str, value: &str) -> Result<(), ShellError> {
        let section = self.section();
        with_controller_mut!(self, section, |controller| controller
            .update_field(name, value)
            .map_err(ControllerError::from)?);
        Ok(())
    }

    /// Submit the open form.
    ///
    /// # Errors
    ///
    /// Returns the validation or store failure.
    pub async fn submit(&mut self) -> Result<(), ShellError> {
        let section = self.section();
        match self {
            Self::Buses(controller) => controller.submit().await.map(|_| ())?,
            Self::Routes(controller) => controller.submit().await.map(|_| ())?,
            Self::Users(controller) => controller.submit().await.map(|_| ())?,
            Self::Schedules(screen) => screen.submit().await.map(|_| ())?,
            Self::Timetables(screen) => screen.submit().await.map(|_| ())?,
            Self::Home | Self::Admin(_) => {
                return Err(ShellError::NotEditable { section });
            }
        }
        Ok(())
    }

    /// Ask for confirmation before deleting `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::NotEditable`] on the home and admin screens.
    pub fn request_delete(&mut self, id: RecordId) -> Result<(), ShellError> {
        let section = self.section();
        with_controller_mut!(self, section, |controller| controller
            .request_delete(id));
        Ok(())
    }

    /// Abandon the pending delete.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::NotEditable`] on the home and admin screens.
    pub fn cancel_delete(&mut self) -> Result<Option<RecordId>, ShellError> {
        let section = self.section();
        Ok(with_controller_mut!(self, section, |controller| controller
            .cancel_delete()))
    }

    /// Delete the pending record.
    ///
    /// # Errors
    ///
    /// Returns the store failure, or [`ControllerError::NothingToConfirm`].
    pub async fn confirm_delete(&mut self) -> Result<(), ShellError> {
        let section = self.section();
        match self {
            Self::Buses(controller) => controller.confirm_delete().await?,
            Self::Routes(controller) => controller.confirm_delete().await?,
            Self::Users(controller) => controller.confirm_delete().await?,
            Self::Schedules(screen) => screen.confirm_delete().await?,
            Self::Timetables(screen) => screen.confirm_delete().await?,
            Self::Home | Self::Admin(_) => {
                return Err(ShellError::NotEditable { section });
            }
        }
        Ok(())
    }

    /// Render the screen body as plain text.
    pub fn render(&self) -> String {
        let section = self.section();
        let body = match self {
            Self::Home => Section::ALL
                .into_iter()
                .filter(|other| *other != Section::Home)
                .map(|other| format!("{:<22}{}", other.title(), other.description()))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Buses(controller) => render_table(controller.items(), controller.is_loading()),
            Self::Routes(controller) => render_table(controller.items(), controller.is_loading()),
            Self::Users(controller) => render_table(controller.items(), controller.is_loading()),
            Self::Schedules(screen) => {
                let controller = screen.controller();
                render_table(controller.items(), controller.is_loading())
            }
            Self::Timetables(screen) => {
                let controller = screen.controller();
                render_table(controller.items(), controller.is_loading())
            }
            Self::Admin(dashboard) => render_dashboard(dashboard.stats(), dashboard.is_loading()),
        };
        let mut out = format!("{}\n\n", section.title());
        if let Some(notice) = self.notice() {
            out.push_str(notice.message());
            out.push_str("\n\n");
        }
        out.push_str(body.trim_end());
        out.push('\n');
        out
    }
}

/// Header plus the currently mounted screen.
pub struct Shell {
    services: RecordServices,
    screen: Screen,
}

impl Shell {
    /// Start on the home screen.
    pub fn new(services: RecordServices) -> Self {
        Self {
            services,
            screen: Screen::Home,
        }
    }

    /// Section of the mounted screen.
    pub const fn current(&self) -> Section {
        self.screen.section()
    }

    /// The mounted screen.
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The mounted screen, for user actions.
    pub const fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Mount `section`, dropping the previous screen, and load it.
    ///
    /// # Errors
    ///
    /// Returns the mount-time fetch failure. The new screen stays mounted.
    pub async fn navigate(&mut self, section: Section) -> Result<(), ServiceError> {
        self.screen = Screen::mount(section, &self.services);
        self.screen.load().await
    }

    /// Title line and section links, marking the current one.
    pub fn header(&self) -> String {
        let current = self.current();
        let links = Section::ALL
            .into_iter()
            .map(|section| {
                if section == current {
                    format!("[{}]", section.label())
                } else {
                    section.label().to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{APP_TITLE}\n{links}")
    }

    /// Header followed by the mounted screen.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.header(), self.screen.render())
    }
}
