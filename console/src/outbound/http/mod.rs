//! Record store HTTP adapter.
//!
//! This module provides a reqwest implementation of the `RecordService` port
//! for each record collection exposed by the store.

mod dto;
mod http_service;

pub use http_service::{HttpRecordService, RecordStoreClient};
