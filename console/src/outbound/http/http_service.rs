//! Reqwest-backed record service adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON encoding and decoding of records.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::ErrorBodyDto;
use crate::domain::ports::{RecordService, ServiceError};
use crate::domain::{Entity, RecordId};

/// Connection to the record store shared by every collection.
#[derive(Debug, Clone)]
pub struct RecordStoreClient {
    client: Client,
    base: Url,
}

impl RecordStoreClient {
    /// Build a client rooted at `base` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidEndpoint`] when `base` cannot carry
    /// path segments, or [`ServiceError::Transport`] when the reqwest client
    /// cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ServiceError> {
        if base.cannot_be_a_base() {
            return Err(ServiceError::invalid_endpoint(format!(
                "{base} cannot be used as a base URL"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ServiceError::transport(error.to_string()))?;
        Ok(Self { client, base })
    }

    /// Root URL of the store.
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Record service for `E`'s collection.
    pub fn service<E: Entity>(&self) -> HttpRecordService<E> {
        HttpRecordService {
            client: self.client.clone(),
            base: self.base.clone(),
            _entity: PhantomData,
        }
    }
}

/// Record service for one collection, e.g. `<base>/buses`.
#[derive(Debug, Clone)]
pub struct HttpRecordService<E> {
    client: Client,
    base: Url,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpRecordService<E> {
    fn request(&self, method: Method, id: Option<&RecordId>) -> Result<RequestBuilder, ServiceError> {
        let url = collection_url(&self.base, E::KIND.plural(), id)?;
        debug!(method = %method, url = %url, "record store request");
        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json"))
    }
}

async fn execute(request: RequestBuilder) -> Result<Vec<u8>, ServiceError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    debug!(status = status.as_u16(), bytes = body.len(), "record store response");
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

#[async_trait]
impl<E: Entity> RecordService<E> for HttpRecordService<E> {
    async fn list(&self) -> Result<Vec<E>, ServiceError> {
        let body = execute(self.request(Method::GET, None)?).await?;
        decode_body(&body)
    }

    async fn create(&self, record: &E) -> Result<E, ServiceError> {
        let request = self.request(Method::POST, None)?.json(record);
        let body = execute(request).await?;
        decode_body(&body)
    }

    async fn update(&self, id: &RecordId, record: &E) -> Result<E, ServiceError> {
        let request = self.request(Method::PUT, Some(id))?.json(record);
        let body = execute(request).await?;
        decode_body(&body)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
        execute(self.request(Method::DELETE, Some(id))?).await?;
        Ok(())
    }
}

fn collection_url(base: &Url, collection: &str, id: Option<&RecordId>) -> Result<Url, ServiceError> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            ServiceError::invalid_endpoint(format!("{base} cannot be used as a base URL"))
        })?;
        segments.pop_if_empty().push(collection);
        if let Some(id) = id {
            segments.push(id.as_str());
        }
    }
    Ok(url)
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body)
        .map_err(|error| ServiceError::decode(format!("invalid record JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::timeout(error.to_string())
    } else {
        ServiceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ServiceError {
    serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_message)
        .map_or_else(
            || ServiceError::status(status.as_u16()),
            |message| ServiceError::rejected(status.as_u16(), message),
        )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network record store helpers.

    use super::*;
    use crate::domain::{Bus, Route, Timetable};
    use rstest::rstest;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid URL")
    }

    #[rstest]
    #[case::no_trailing_slash("http://localhost:8080/api", None, "http://localhost:8080/api/buses")]
    #[case::trailing_slash("http://localhost:8080/api/", None, "http://localhost:8080/api/buses")]
    #[case::with_id(
        "http://localhost:8080/api",
        Some("42"),
        "http://localhost:8080/api/buses/42"
    )]
    #[case::escaped_id(
        "http://localhost:8080/api",
        Some("a/b"),
        "http://localhost:8080/api/buses/a%2Fb"
    )]
    fn builds_collection_urls(
        #[case] base: &str,
        #[case] id: Option<&str>,
        #[case] expected: &str,
    ) {
        let id = id.map(|raw| RecordId::new(raw).expect("non-empty id"));
        let built = collection_url(&url(base), "buses", id.as_ref()).expect("URL builds");
        assert_eq!(built.as_str(), expected);
    }

    #[rstest]
    #[case::message(
        StatusCode::CONFLICT,
        br#"{"message":"Bus number already exists"}"#.as_slice(),
        ServiceError::rejected(409_u16, "Bus number already exists")
    )]
    #[case::blank_message(
        StatusCode::BAD_REQUEST,
        br#"{"message":"  "}"#.as_slice(),
        ServiceError::status(400_u16)
    )]
    #[case::not_json(
        StatusCode::INTERNAL_SERVER_ERROR,
        b"<html>oops</html>".as_slice(),
        ServiceError::status(500_u16)
    )]
    #[case::empty(StatusCode::NOT_FOUND, b"".as_slice(), ServiceError::status(404_u16))]
    fn maps_error_statuses(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: ServiceError,
    ) {
        assert_eq!(map_status_error(status, body), expected);
    }

    #[test]
    fn decodes_listed_records() {
        let body = br#"[
            {"id": 1, "busNumber": "BUS-1", "busType": "Non-AC", "totalSeats": 52,
             "registrationNumber": "KA-01-1", "status": "Active"}
        ]"#;
        let buses: Vec<Bus> = decode_body(body).expect("JSON should decode");
        assert_eq!(buses.len(), 1);
        assert_eq!(buses[0].id, Some(RecordId::from(1)));
    }

    #[test]
    fn decodes_routes_with_text_or_missing_stops() {
        let body = br#"[
            {"id": 1, "routeNumber": "R-1", "source": "A", "destination": "B",
             "distance": 12.5, "estimatedDuration": 40, "stops": ["C", "D"], "status": "Active"},
            {"id": 2, "routeNumber": "R-2", "source": "A", "destination": "B",
             "distance": "8", "estimatedDuration": "25", "stops": "C, D", "status": "Active"},
            {"id": 3, "routeNumber": "R-3", "source": "A", "destination": "B",
             "distance": 3, "estimatedDuration": 10, "stops": null, "status": "Inactive"}
        ]"#;
        let routes: Vec<Route> = decode_body(body).expect("JSON should decode");
        let stops = routes
            .iter()
            .map(|route| route.stops.join("|"))
            .collect::<Vec<_>>();
        assert_eq!(stops, vec!["C|D", "C|D", ""]);
        assert_eq!(
            routes.iter().map(|route| route.estimated_duration).collect::<Vec<_>>(),
            vec![40, 25, 10]
        );
    }

    #[test]
    fn decodes_timetables_with_blank_optional_fields() {
        let body = br#"[
            {"id": 5, "schedule": {"id": 2}, "date": "2024-03-01",
             "scheduledDeparture": "08:00", "scheduledArrival": "10:30",
             "actualDeparture": "", "actualArrival": "", "status": "On Time", "remarks": ""}
        ]"#;
        let timetables: Vec<Timetable> = decode_body(body).expect("JSON should decode");
        let [timetable] = timetables.as_slice() else {
            panic!("expected one timetable, got {timetables:?}");
        };
        assert_eq!(timetable.actual_departure, None);
        assert_eq!(timetable.actual_arrival, None);
        assert_eq!(timetable.remarks, None);
    }

    #[test]
    fn undecodable_bodies_map_to_decode_errors() {
        let error = decode_body::<Vec<Bus>>(b"{\"unexpected\":true}").expect_err("must fail");
        assert!(
            matches!(error, ServiceError::Decode { .. }),
            "shape mismatches should map to Decode errors",
        );
    }

    #[test]
    fn rejects_bases_without_paths() {
        let error = RecordStoreClient::new(url("mailto:ops@example.com"), Duration::from_secs(1))
            .expect_err("mailto cannot carry paths");
        assert!(matches!(error, ServiceError::InvalidEndpoint { .. }));
    }
}
