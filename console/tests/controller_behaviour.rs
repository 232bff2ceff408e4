//! Behavioural tests for record screens backed by the in-memory store.

use std::sync::Arc;

use fleet_console::controller::{Controller, ControllerError, Mode, Notice};
use fleet_console::domain::ports::{
    InMemoryRecordService, ServiceCall, ServiceError, ServiceOperation,
};
use fleet_console::domain::{Entity, FormError, RecordId, Related};
use fleet_console::domain::{Route, RouteStatus, Timetable, TimetableStatus, User};
use rstest::{fixture, rstest};
use serde_json::json;

fn route(number: &str, status: RouteStatus) -> Route {
    Route {
        id: None,
        route_number: number.to_owned(),
        source: "Majestic".to_owned(),
        destination: "Electronic City".to_owned(),
        distance: 21.4,
        estimated_duration: 55,
        stops: vec!["Silk Board".to_owned()],
        status,
    }
}

#[fixture]
fn routes() -> Arc<InMemoryRecordService<Route>> {
    Arc::new(InMemoryRecordService::with_records(vec![
        route("R-1", RouteStatus::Active),
        route("R-2", RouteStatus::Inactive),
    ]))
}

#[rstest]
#[tokio::test]
async fn route_lifecycle_create_edit_delete(routes: Arc<InMemoryRecordService<Route>>) {
    let mut screen = Controller::<Route, _>::new(Arc::clone(&routes));
    screen.load().await.expect("list loads");
    assert_eq!(screen.items().len(), 2);

    screen.begin_create();
    for (name, value) in [
        ("routeNumber", "R-3"),
        ("source", "Hebbal"),
        ("destination", "Airport"),
        ("distance", "29.5"),
        ("estimatedDuration", "45"),
        ("stops", "Yelahanka, Bagalur Cross"),
    ] {
        screen.update_field(name, value).expect("known field");
    }
    let created = screen.submit().await.expect("create succeeds");
    assert_eq!(created.id, Some(RecordId::from(3)));
    assert_eq!(created.stops, vec!["Yelahanka", "Bagalur Cross"]);
    assert_eq!(screen.items().len(), 3);

    let stored = screen
        .find(&RecordId::from(3))
        .cloned()
        .expect("created route is listed");
    screen.begin_edit(&stored).expect("record has id");
    screen
        .update_field("status", "Inactive")
        .expect("known field");
    let updated = screen.submit().await.expect("update succeeds");
    assert_eq!(updated.status, RouteStatus::Inactive);
    assert_eq!(updated.route_number, "R-3");

    screen.request_delete(RecordId::from(1));
    screen.confirm_delete().await.expect("delete succeeds");
    let remaining = screen
        .items()
        .iter()
        .map(|item| item.route_number.as_str())
        .collect::<Vec<_>>();
    assert_eq!(remaining, vec!["R-2", "R-3"]);
    assert_eq!(
        screen.notice(),
        Some(&Notice::Success("Route deleted successfully!".to_owned()))
    );
}

#[rstest]
#[tokio::test]
async fn invalid_number_is_reported_without_a_call(routes: Arc<InMemoryRecordService<Route>>) {
    let mut screen = Controller::<Route, _>::new(Arc::clone(&routes));
    screen.begin_create();
    for (name, value) in [
        ("routeNumber", "R-9"),
        ("source", "A"),
        ("destination", "B"),
        ("distance", "far"),
        ("estimatedDuration", "10"),
    ] {
        screen.update_field(name, value).expect("known field");
    }

    let error = screen.submit().await.expect_err("distance is invalid");

    assert_eq!(
        error,
        ControllerError::Form(FormError::InvalidField {
            label: "Distance (km)",
            expected: "non-negative number",
        })
    );
    assert_eq!(
        screen.notice().map(Notice::message),
        Some("Distance (km) must be a valid non-negative number")
    );
    assert!(routes.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_update_keeps_the_form_open(routes: Arc<InMemoryRecordService<Route>>) {
    let mut screen = Controller::<Route, _>::new(Arc::clone(&routes));
    screen.load().await.expect("list loads");
    let first = screen.items()[0].clone();
    routes.fail_next(
        ServiceOperation::Update,
        ServiceError::rejected(409_u16, "Route number already exists"),
    );

    screen.begin_edit(&first).expect("record has id");
    screen.submit().await.expect_err("update rejected");

    assert_eq!(screen.mode(), &Mode::Editing(RecordId::from(1)));
    assert_eq!(
        screen.notice(),
        Some(&Notice::Error("Route number already exists".to_owned()))
    );

    screen.submit().await.expect("retry succeeds");
    assert_eq!(screen.mode(), &Mode::Idle);
}

#[rstest]
#[tokio::test]
async fn declined_delete_leaves_the_store_untouched(routes: Arc<InMemoryRecordService<Route>>) {
    let mut screen = Controller::<Route, _>::new(Arc::clone(&routes));
    screen.load().await.expect("list loads");
    routes.clear_calls();

    screen.request_delete(RecordId::from(2));
    screen.cancel_delete();

    assert!(routes.calls().is_empty());
    assert_eq!(screen.items().len(), 2);
}

#[tokio::test]
async fn timetable_optional_fields_are_omitted_when_blank() {
    let timetables = Arc::new(InMemoryRecordService::<Timetable>::default());
    let mut screen = Controller::<Timetable, _>::new(Arc::clone(&timetables));

    screen.begin_create();
    for (name, value) in [
        ("scheduleId", "4"),
        ("date", "2024-03-01"),
        ("scheduledDeparture", "08:00"),
        ("scheduledArrival", "10:30:00"),
        ("actualDeparture", ""),
        ("remarks", "  "),
    ] {
        screen.update_field(name, value).expect("known field");
    }
    let created = screen.submit().await.expect("create succeeds");

    assert_eq!(created.schedule, Related::reference(RecordId::from(4)));
    assert_eq!(created.actual_departure, None);
    assert_eq!(created.remarks, None);
    assert_eq!(created.status, TimetableStatus::OnTime);
    assert!(matches!(
        timetables.calls().first(),
        Some(ServiceCall::Create(_))
    ));
}

async fn unmodified_edit_sends_the_loaded_record<E: Entity>(stored: E) {
    let store = Arc::new(InMemoryRecordService::with_records(vec![stored]));
    let mut screen = Controller::<E, _>::new(Arc::clone(&store));
    screen.load().await.expect("list loads");
    let loaded = screen.items().first().cloned().expect("record is listed");
    let id = loaded.id().cloned().expect("stored record has an id");
    store.clear_calls();

    screen.begin_edit(&loaded).expect("record has id");
    let saved = screen.submit().await.expect("update succeeds");

    assert_eq!(saved, loaded);
    assert_eq!(
        store.calls().first(),
        Some(&ServiceCall::Update(id, loaded))
    );
}

fn from_wire<E: Entity>(value: serde_json::Value) -> E {
    serde_json::from_value(value).expect("record written by the web form decodes")
}

#[tokio::test]
async fn route_with_text_stops_round_trips_through_edit() {
    let route: Route = from_wire(json!({
        "id": 4, "routeNumber": "R-4", "source": "Hebbal", "destination": "Airport",
        "distance": "29.5", "estimatedDuration": "45",
        "stops": "Yelahanka, Bagalur Cross", "status": "Active"
    }));
    assert_eq!(route.stops, vec!["Yelahanka", "Bagalur Cross"]);

    unmodified_edit_sends_the_loaded_record(route).await;
}

#[tokio::test]
async fn timetable_with_blank_optionals_round_trips_through_edit() {
    let timetable: Timetable = from_wire(json!({
        "id": 8, "schedule": {"id": 3}, "date": "2024-03-01",
        "scheduledDeparture": "08:00:00", "scheduledArrival": "10:30:15",
        "actualDeparture": "", "actualArrival": "", "status": "On Time", "remarks": ""
    }));
    assert_eq!(timetable.actual_departure, None);
    assert_eq!(timetable.remarks, None);

    unmodified_edit_sends_the_loaded_record(timetable).await;
}

#[tokio::test]
async fn user_with_blank_phone_round_trips_through_edit() {
    let user: User = from_wire(json!({
        "id": 2, "username": "ops", "email": "ops@example.com", "role": "USER",
        "firstName": "Ravi", "lastName": "Kumar", "phoneNumber": "", "status": "Active"
    }));
    assert_eq!(user.phone_number, None);

    unmodified_edit_sends_the_loaded_record(user).await;
}

#[tokio::test]
async fn one_loosely_written_route_does_not_fail_the_list() {
    let routes = Arc::new(InMemoryRecordService::with_records(vec![
        route("R-1", RouteStatus::Active),
        from_wire::<Route>(json!({
            "id": 2, "routeNumber": "R-2", "source": "A", "destination": "B",
            "distance": 3, "estimatedDuration": 10, "stops": null, "status": "Inactive"
        })),
    ]));
    let mut screen = Controller::<Route, _>::new(Arc::clone(&routes));

    screen.load().await.expect("list loads");

    assert_eq!(screen.items().len(), 2);
    assert!(screen.notice().is_none());
}
