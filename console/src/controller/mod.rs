//! List+form controllers.
//!
//! One generic [`Controller`] owns a record type's screen state: the last
//! loaded list, a draft, the form mode, a pending delete awaiting
//! confirmation, and a single-slot notice. All mutations pass straight through
//! to a [`RecordService`] and are followed by a full reload.

mod notice;
mod screens;
mod select;

use std::sync::Arc;

use tracing::{debug, warn};

pub use self::notice::Notice;
pub use self::screens::{ScheduleScreen, TimetableScreen};
pub use self::select::{SelectOption, Selectable, select_options};

use crate::domain::ports::{RecordService, ServiceError};
use crate::domain::{Draft, Entity, EntityKind, FormError, RecordId};

/// Whether the form is closed, creating, or editing a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// No form is open.
    #[default]
    Idle,
    /// The form is open for a new record.
    Creating,
    /// The form is open for the record with this identifier.
    Editing(RecordId),
}

impl Mode {
    /// Whether the form is open.
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Sequence number of an issued list request.
///
/// Only the response to the most recently issued request is applied; older
/// responses are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Failures reported by controller operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// The draft failed local validation; no store call was made.
    #[error(transparent)]
    Form(#[from] FormError),
    /// The store call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// `submit` was called with no form open.
    #[error("no form is open")]
    FormClosed,
    /// `confirm_delete` was called with no delete pending.
    #[error("no delete is awaiting confirmation")]
    NothingToConfirm,
}

/// Screen state and operations for one record type.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use fleet_console::controller::Controller;
/// use fleet_console::domain::Bus;
/// use fleet_console::domain::ports::InMemoryRecordService;
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let service = Arc::new(InMemoryRecordService::<Bus>::default());
/// let mut buses = Controller::new(service);
/// buses.load().await.expect("list loads");
/// assert!(buses.items().is_empty());
/// # });
/// ```
pub struct Controller<E: Entity, S: ?Sized = dyn RecordService<E>> {
    service: Arc<S>,
    items: Vec<E>,
    draft: Draft,
    mode: Mode,
    pending_delete: Option<RecordId>,
    loading: bool,
    notice: Option<Notice>,
    issued_loads: u64,
}

impl<E, S> Controller<E, S>
where
    E: Entity,
    S: RecordService<E> + ?Sized,
{
    /// Create an idle controller with an empty list and a default draft.
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            items: Vec::new(),
            draft: E::form().default_draft(),
            mode: Mode::Idle,
            pending_delete: None,
            loading: false,
            notice: None,
            issued_loads: 0,
        }
    }

    /// Records from the last applied list response, in store order.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Find a loaded record by identifier.
    pub fn find(&self, id: &RecordId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// The record being created or edited.
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Current form mode.
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Whether a list request is outstanding.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last success or error message.
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Identifier awaiting delete confirmation.
    pub const fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    /// Prompt to show while a delete awaits confirmation.
    pub fn confirmation_prompt(&self) -> Option<String> {
        self.pending_delete
            .as_ref()
            .map(|_| E::KIND.confirm_delete_prompt())
    }

    pub(crate) const fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Replace the notice; used by composite screens for their own fetches.
    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Mark a list request as issued and return its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued_loads += 1;
        self.loading = true;
        LoadTicket(self.issued_loads)
    }

    /// Apply a list response.
    ///
    /// Returns `false` and changes nothing when `ticket` is older than the
    /// latest issued request. A failure leaves the previous items in place.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<E>, ServiceError>) -> bool {
        if ticket.0 != self.issued_loads {
            debug!(
                entity = E::KIND.plural(),
                ticket = ticket.0,
                latest = self.issued_loads,
                "discarding stale list response"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                if self.notice.as_ref().is_some_and(Notice::is_error) {
                    self.notice = None;
                }
            }
            Err(error) => {
                warn!(entity = E::KIND.plural(), %error, "record list failed");
                self.notice = Some(Notice::Error(E::KIND.fetch_failed()));
            }
        }
        true
    }

    /// Fetch the full list and replace `items`.
    ///
    /// # Errors
    ///
    /// Returns the store error after recording the fetch-failed notice.
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        let ticket = self.begin_load();
        match self.service.list().await {
            Ok(items) => {
                self.finish_load(ticket, Ok(items));
                Ok(())
            }
            Err(error) => {
                self.finish_load(ticket, Err(error.clone()));
                Err(error)
            }
        }
    }

    /// Open the form for a new record with type defaults.
    pub fn begin_create(&mut self) {
        self.notice = None;
        self.draft = E::form().default_draft();
        self.mode = Mode::Creating;
    }

    /// Open the form on a copy of `item`; write-only fields start blank.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingId`] when `item` has no identifier.
    pub fn begin_edit(&mut self, item: &E) -> Result<(), FormError> {
        let id = item
            .id()
            .cloned()
            .ok_or(FormError::MissingId { entity: E::KIND })?;
        self.draft = E::form().draft_from(item)?;
        self.notice = None;
        self.mode = Mode::Editing(id);
        Ok(())
    }

    /// Merge one form input into the draft.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] for names outside the form.
    pub fn update_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        E::form().apply_input(&mut self.draft, name, value)
    }

    /// Close the form and restore the default draft.
    pub fn reset_form(&mut self) {
        self.mode = Mode::Idle;
        self.draft = E::form().default_draft();
    }

    /// Validate the draft and create or update the record.
    ///
    /// On success the form is reset and the list reloaded. On failure the
    /// draft and mode are kept so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Form`] without calling the store when
    /// validation fails, or [`ControllerError::Service`] when the store call
    /// fails.
    pub async fn submit(&mut self) -> Result<E, ControllerError> {
        self.notice = None;
        let (creating, id) = match &self.mode {
            Mode::Idle => return Err(ControllerError::FormClosed),
            Mode::Creating => (true, None),
            Mode::Editing(id) => (false, Some(id.clone())),
        };

        let record: E = match E::form().decode(&self.draft, creating, id.as_ref()) {
            Ok(record) => record,
            Err(error) => {
                self.notice = Some(Notice::Error(error.to_string()));
                return Err(error.into());
            }
        };

        let result = match &id {
            Some(id) => self.service.update(id, &record).await,
            None => self.service.create(&record).await,
        };
        match result {
            Ok(saved) => {
                let message = if creating {
                    E::KIND.created()
                } else {
                    E::KIND.updated()
                };
                self.notice = Some(Notice::Success(message));
                self.reset_form();
                if let Err(error) = self.load().await {
                    debug!(%error, "list refresh after save failed");
                }
                Ok(saved)
            }
            Err(error) => {
                warn!(entity = E::KIND.singular(), %error, "record save failed");
                let message = save_failure_message(&error, E::KIND);
                self.notice = Some(Notice::Error(message));
                Err(error.into())
            }
        }
    }

    /// Ask for confirmation before deleting `id`. Makes no store call.
    pub fn request_delete(&mut self, id: RecordId) {
        self.notice = None;
        self.pending_delete = Some(id);
    }

    /// Abandon the pending delete without calling the store.
    pub fn cancel_delete(&mut self) -> Option<RecordId> {
        self.pending_delete.take()
    }

    /// Delete the pending record, then reload on success.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::NothingToConfirm`] when no delete is
    /// pending, or [`ControllerError::Service`] when the store call fails.
    pub async fn confirm_delete(&mut self) -> Result<(), ControllerError> {
        let id = self
            .pending_delete
            .take()
            .ok_or(ControllerError::NothingToConfirm)?;
        match self.service.delete(&id).await {
            Ok(()) => {
                self.notice = Some(Notice::Success(E::KIND.deleted()));
                if let Err(error) = self.load().await {
                    debug!(%error, "list refresh after delete failed");
                }
                Ok(())
            }
            Err(error) => {
                warn!(entity = E::KIND.singular(), id = %id, %error, "record delete failed");
                self.notice = Some(Notice::Error(E::KIND.delete_failed()));
                Err(error.into())
            }
        }
    }
}

/// Store message, else the transport failure, else the generic text.
fn save_failure_message(error: &ServiceError, kind: EntityKind) -> String {
    if let Some(message) = error.server_message() {
        message.to_owned()
    } else if error.is_transport() {
        error.to_string()
    } else {
        kind.save_failed()
    }
}
