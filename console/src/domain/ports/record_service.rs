//! Driven port for listing and mutating one record type in the store.
//!
//! The console holds no authoritative state: every list, create, update, and
//! delete is a pass-through to an implementation of this port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Entity, RecordId};

define_port_error! {
    /// Errors raised by record store calls.
    pub enum ServiceError {
        /// The store refused the request and explained why.
        Rejected {
            /// HTTP status code.
            status: u16,
            /// Message from the response body.
            message: String,
        } => "{message}",
        /// The store refused the request without a usable message.
        Status {
            /// HTTP status code.
            status: u16,
        } => "record store responded with status {status}",
        /// The store could not be reached.
        Transport {
            /// Client error detail.
            message: String,
        } => "record store unreachable: {message}",
        /// The store did not answer in time.
        Timeout {
            /// Client error detail.
            message: String,
        } => "record store timed out: {message}",
        /// The store answered with a body that could not be decoded.
        Decode {
            /// Decoder detail.
            message: String,
        } => "record store response could not be decoded: {message}",
        /// The configured store address cannot carry record paths.
        InvalidEndpoint {
            /// Offending address.
            message: String,
        } => "record store endpoint is invalid: {message}",
    }
}

impl ServiceError {
    /// Human-readable message supplied by the store, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the request never got an answer from the store.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// Record store operations for one entity type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordService<E: Entity>: Send + Sync {
    /// Fetch the full collection in store order.
    async fn list(&self) -> Result<Vec<E>, ServiceError>;

    /// Create a record; the store assigns its identifier.
    async fn create(&self, record: &E) -> Result<E, ServiceError>;

    /// Replace the record identified by `id`.
    async fn update(&self, id: &RecordId, record: &E) -> Result<E, ServiceError>;

    /// Remove the record identified by `id`.
    async fn delete(&self, id: &RecordId) -> Result<(), ServiceError>;
}

/// Shared, type-erased record service.
pub type SharedService<E> = Arc<dyn RecordService<E>>;

/// Operation names used to script failures on [`InMemoryRecordService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOperation {
    /// [`RecordService::list`].
    List,
    /// [`RecordService::create`].
    Create,
    /// [`RecordService::update`].
    Update,
    /// [`RecordService::delete`].
    Delete,
}

/// A call observed by [`InMemoryRecordService`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall<E> {
    /// The collection was listed.
    List,
    /// A record was submitted for creation.
    Create(E),
    /// A record was submitted to replace the one with this identifier.
    Update(RecordId, E),
    /// The record with this identifier was deleted.
    Delete(RecordId),
}

struct InMemoryState<E> {
    records: Vec<E>,
    next_id: u64,
    calls: Vec<ServiceCall<E>>,
    failures: HashMap<ServiceOperation, ServiceError>,
}

/// Deterministic in-process record store.
///
/// Assigns sequential numeric identifiers, records every call, and can be
/// told to fail the next call of a given operation.
pub struct InMemoryRecordService<E> {
    state: Mutex<InMemoryState<E>>,
}

impl<E: Entity> Default for InMemoryRecordService<E> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl<E: Entity> InMemoryRecordService<E> {
    /// Seed the store; records without identifiers are assigned one.
    pub fn with_records(records: Vec<E>) -> Self {
        let mut next_id = records
            .iter()
            .filter_map(|record| record.id()?.as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        let seeded = records
            .into_iter()
            .map(|record| {
                if record.id().is_some() {
                    record
                } else {
                    let id = RecordId::from(next_id);
                    next_id += 1;
                    record.with_id(id)
                }
            })
            .collect::<Vec<_>>();
        Self {
            state: Mutex::new(InMemoryState {
                records: seeded,
                next_id,
                calls: Vec::new(),
                failures: HashMap::new(),
            }),
        }
    }

    /// Fail the next call of `operation` with `error`.
    pub fn fail_next(&self, operation: ServiceOperation, error: ServiceError) {
        self.lock().failures.insert(operation, error);
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<E> {
        self.lock().records.clone()
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<ServiceCall<E>> {
        self.lock().calls.clone()
    }

    /// Forget observed calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> InMemoryState<E> {
    fn take_failure(&mut self, operation: ServiceOperation) -> Result<(), ServiceError> {
        self.failures.remove(&operation).map_or(Ok(()), Err)
    }
}

fn not_found(id: &RecordId) -> ServiceError {
    ServiceError::rejected(404_u16, format!("record {id} not found"))
}

#[async_trait]
impl<E: Entity> RecordService<E> for InMemoryRecordService<E> {
    async fn list(&self) -> Result<Vec<E>, ServiceError> {
        let mut state = self.lock();
        state.calls.push(ServiceCall::List);
        state.take_failure(ServiceOperation::List)?;
        Ok(state.records.clone())
    }

    async fn create(&self, record: &E) -> Result<E, ServiceError> {
        let mut state = self.lock();
        state.calls.push(ServiceCall::Create(record.clone()));
        state.take_failure(ServiceOperation::Create)?;
        let id = RecordId::from(state.next_id);
        state.next_id += 1;
        let stored = record.clone().with_id(id);
        state.records.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &RecordId, record: &E) -> Result<E, ServiceError> {
        let mut state = self.lock();
        state
            .calls
            .push(ServiceCall::Update(id.clone(), record.clone()));
        state.take_failure(ServiceOperation::Update)?;
        let stored = record.clone().with_id(id.clone());
        let slot = state
            .records
            .iter_mut()
            .find(|existing| existing.id() == Some(id))
            .ok_or_else(|| not_found(id))?;
        *slot = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
        let mut state = self.lock();
        state.calls.push(ServiceCall::Delete(id.clone()));
        state.take_failure(ServiceOperation::Delete)?;
        let before = state.records.len();
        state.records.retain(|existing| existing.id() != Some(id));
        if state.records.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bus, BusStatus, BusType};

    fn bus(number: &str) -> Bus {
        Bus {
            id: None,
            bus_number: number.to_owned(),
            bus_type: BusType::Sleeper,
            total_seats: 36,
            registration_number: format!("KA-01-{number}"),
            status: BusStatus::Active,
        }
    }

    #[tokio::test]
    async fn seeded_records_receive_sequential_ids() {
        let service = InMemoryRecordService::with_records(vec![bus("A"), bus("B")]);
        let created = service.create(&bus("C")).await.expect("create succeeds");

        let ids = service
            .records()
            .iter()
            .filter_map(|record| record.id().map(ToString::to_string))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(created.id, Some(RecordId::from(3)));
    }

    #[tokio::test]
    async fn scripted_failures_apply_once() {
        let service = InMemoryRecordService::with_records(vec![bus("A")]);
        service.fail_next(ServiceOperation::List, ServiceError::status(503_u16));

        let first = service.list().await;
        let second = service.list().await;

        assert_eq!(first, Err(ServiceError::status(503_u16)));
        assert_eq!(second.map(|records| records.len()), Ok(1));
        assert_eq!(service.calls(), vec![ServiceCall::List, ServiceCall::List]);
    }

    #[tokio::test]
    async fn deleting_an_unknown_record_is_rejected() {
        let service = InMemoryRecordService::<Bus>::default();
        let error = service
            .delete(&RecordId::from(9))
            .await
            .expect_err("nothing to delete");
        assert_eq!(error.server_message(), Some("record 9 not found"));
    }

    #[test]
    fn only_rejections_carry_server_messages() {
        assert_eq!(
            ServiceError::rejected(409_u16, "duplicate bus number").server_message(),
            Some("duplicate bus number")
        );
        assert_eq!(ServiceError::transport("refused").server_message(), None);
    }
}
