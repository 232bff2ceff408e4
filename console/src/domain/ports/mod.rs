//! Domain ports: the boundary between console controllers and the record
//! store.

mod macros;
pub(crate) use macros::define_port_error;

mod record_service;

#[cfg(test)]
pub use record_service::MockRecordService;
pub use record_service::{
    InMemoryRecordService, RecordService, ServiceCall, ServiceError, ServiceOperation,
    SharedService,
};
