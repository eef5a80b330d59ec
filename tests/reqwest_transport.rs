// End-to-end checks of the adapter over real HTTP against a mock server

use chrono::{FixedOffset, TimeZone};
use goboo_adapter::{
    Adapter, AdapterOptions, Booking, BookingApi, BookingError, BookingOutcome, Slot,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter_for(server: &MockServer) -> Adapter {
    Adapter::new(AdapterOptions::with_host(server.address().to_string()))
}

fn slot_entry(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "room": 42,
        "startDateTime": "2014-03-10T14:00:00+01:00",
        "duration": 60,
        "playTime": 45,
        "capacity": 8,
        "attendance": 2,
        "players": [],
        "locked": false
    })
}

fn slot(id: i64, resource_id: i64) -> Slot {
    Slot::builder()
        .id(id)
        .resource_id(resource_id)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_list_slots_sends_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/rest/room/42/slots"))
        .and(query_param("from", "2014-03-10T14:05:00+01:00"))
        .and(query_param("until", "2014-03-10T20:00:00+01:00"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"slots": [slot_entry(7), slot_entry(8)]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let offset = FixedOffset::east_opt(3600).unwrap();
    let from = offset.with_ymd_and_hms(2014, 3, 10, 14, 5, 0).unwrap();
    let until = offset.with_ymd_and_hms(2014, 3, 10, 20, 0, 0).unwrap();

    let slots = adapter_for(&server)
        .list_slots(42, Some(from), Some(until))
        .await;

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].id(), 8);
    assert_eq!(slots[0].capacity(), 8);
}

#[tokio::test]
async fn test_get_slot_missing_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/rest/room/42/slot/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(adapter_for(&server).get_slot(42, 7).await.is_none());
}

#[tokio::test]
async fn test_get_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/rest/room/42/slot/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slot_entry(7)))
        .mount(&server)
        .await;

    let slot = adapter_for(&server).get_slot(42, 7).await.unwrap();
    assert_eq!(slot.id(), 7);
    assert_eq!(slot.resource_id(), 42);
    assert_eq!(slot.play_time(), Some(45));
}

#[tokio::test]
async fn test_book_slot_posts_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/rest/room/42/book"))
        .and(header("content-type", "application/json"))
        .and(header(
            "user-agent",
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        ))
        .and(body_json(json!({
            "name": "Alice",
            "players": [],
            "preferredModes": [],
            "slots": [7, 8]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 99})))
        .expect(1)
        .mount(&server)
        .await;

    let booking = Booking::builder()
        .name("Alice")
        .slot(slot(7, 42))
        .slot(slot(8, 42))
        .build();

    match adapter_for(&server).book_slot(&booking).await {
        Ok(BookingOutcome::Booked(receipt)) => assert_eq!(receipt.json, json!({"id": 99})),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_book_slot_reports_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/rest/room/42/book"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"error": {"message": "Slot is locked"}})),
        )
        .mount(&server)
        .await;

    let booking = Booking::builder().slot(slot(7, 42)).build();
    let err = adapter_for(&server).book_slot(&booking).await.unwrap_err();

    assert!(matches!(err, BookingError::Rejected { .. }));
    assert_eq!(err.server_message(), Some("Slot is locked"));
    assert_eq!(err.response().map(|response| response.status), Some(422));
}

#[tokio::test]
async fn test_mixed_resources_send_nothing() {
    let server = MockServer::start().await;
    let booking = Booking::builder()
        .slot(slot(7, 42))
        .slot(slot(8, 43))
        .build();

    let err = adapter_for(&server).book_slot(&booking).await.unwrap_err();

    assert!(matches!(err, BookingError::MixedResources(_)));
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}
