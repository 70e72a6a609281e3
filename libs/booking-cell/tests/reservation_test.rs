use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::models::{BookingError, BookingStatus, CreateBookingRequest};
use booking_cell::services::reservation::BookingService;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn service(mock_server: &MockServer) -> BookingService {
    BookingService::new(&TestConfig::with_url(&mock_server.uri()).to_app_config())
}

fn a_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
}

fn reserve_request(doctor_id: Uuid, start_time: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        doctor_id,
        patient_id: Uuid::new_v4(),
        date: a_date(),
        start_time: start_time.to_string(),
    }
}

async fn mount_claim(mock_server: &MockServer, doctor_id: Uuid, rows: serde_json::Value) {
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointment_slots"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("is_booked", "eq.false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(mock_server)
        .await;
}

async fn mount_booking_insert(mock_server: &MockServer, doctor_id: Uuid, start_time: &str) {
    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::booking_row(doctor_id, a_date(), start_time, "confirmed")
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn reserve_claims_slot_then_records_booking() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    mount_claim(
        &mock_server,
        doctor_id,
        json!([MockSupabaseResponses::slot_row(doctor_id, a_date(), "10:40", "11:30", true)]),
    )
    .await;
    mount_booking_insert(&mock_server, doctor_id, "10:40").await;

    let booking = service(&mock_server)
        .reserve(reserve_request(doctor_id, "10:40"))
        .await
        .unwrap();

    assert_eq!(booking.start_time, "10:40");
    assert_eq!(booking.status, BookingStatus::Confirmed);

    // The claim must be conditional on the open flag and the insert must
    // carry confirmed status.
    let requests = mock_server.received_requests().await.unwrap();
    let claim = requests
        .iter()
        .find(|r| r.method.as_str() == "PATCH")
        .expect("reserve should claim the slot row");
    assert!(claim.url.query().unwrap().contains("is_booked=eq.false"));
    let insert = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("reserve should insert the booking");
    let body: serde_json::Value = serde_json::from_slice(&insert.body).unwrap();
    assert_eq!(body["status"], "confirmed");
}

#[tokio::test]
async fn unpadded_time_claims_the_padded_row() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointment_slots"))
        .and(query_param("start_time", "eq.09:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::slot_row(doctor_id, a_date(), "09:00", "09:50", true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_booking_insert(&mock_server, doctor_id, "09:00").await;

    let booking = service(&mock_server)
        .reserve(reserve_request(doctor_id, "9:00"))
        .await
        .unwrap();

    assert_eq!(booking.start_time, "09:00");
}

#[tokio::test]
async fn empty_claim_is_a_conflict() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    mount_claim(&mock_server, doctor_id, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service(&mock_server)
        .reserve(reserve_request(doctor_id, "10:40"))
        .await;

    assert_matches!(result, Err(BookingError::SlotTaken));
}

#[tokio::test]
async fn concurrent_claims_produce_one_winner() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    // The storage CAS hands the row to exactly one claimant; model that as
    // a single successful response followed by empty ones.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::slot_row(doctor_id, a_date(), "10:40", "11:30", true)
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    mount_booking_insert(&mock_server, doctor_id, "10:40").await;

    let service = service(&mock_server);
    let (first, second) = futures::join!(
        service.reserve(reserve_request(doctor_id, "10:40")),
        service.reserve(reserve_request(doctor_id, "10:40")),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(BookingError::SlotTaken)))
            .count(),
        1
    );
}

#[tokio::test]
async fn failed_booking_insert_releases_the_claimed_slot() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    mount_claim(
        &mock_server,
        doctor_id,
        json!([MockSupabaseResponses::slot_row(doctor_id, a_date(), "10:40", "11:30", true)]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("insert failed"))
        .mount(&mock_server)
        .await;

    // The release write flips the flag back without the open-flag filter
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointment_slots"))
        .and(body_partial_json(json!({ "is_booked": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::slot_row(doctor_id, a_date(), "10:40", "11:30", false)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = service(&mock_server)
        .reserve(reserve_request(doctor_id, "10:40"))
        .await;

    assert_matches!(result, Err(BookingError::Database(_)));
}

#[tokio::test]
async fn cancel_marks_booking_and_releases_slot() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{}", booking_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row(doctor_id, a_date(), "10:40", "cancelled")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointment_slots"))
        .and(query_param("start_time", "eq.10:40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::slot_row(doctor_id, a_date(), "10:40", "11:30", false)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let booking = service(&mock_server).cancel(booking_id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn recancel_does_not_release_a_reclaimed_slot() {
    let mock_server = MockServer::start().await;
    let booking_id = Uuid::new_v4();

    // The booking was cancelled earlier and its slot has since been claimed
    // by a new booking. The status-filtered update matches nothing, so the
    // second cancel must not flip the slot back to open.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{}", booking_id)))
        .and(query_param("status", "not.in.(cancelled,rejected)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service(&mock_server).cancel(booking_id).await;
    assert_matches!(result, Err(BookingError::NotFound(id)) if id == booking_id);
}

#[tokio::test]
async fn cancel_of_unknown_booking_is_not_found() {
    let mock_server = MockServer::start().await;
    let booking_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = service(&mock_server).cancel(booking_id).await;
    assert_matches!(result, Err(BookingError::NotFound(id)) if id == booking_id);
}

#[tokio::test]
async fn malformed_time_never_reaches_storage() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    let result = service(&mock_server)
        .reserve(reserve_request(doctor_id, "25:99"))
        .await;

    assert_matches!(result, Err(BookingError::InvalidTime(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn active_bookings_lists_only_occupying_statuses() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("status", "not.in.(cancelled,rejected)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row(doctor_id, a_date(), "09:00", "confirmed"),
            MockSupabaseResponses::booking_row(doctor_id, a_date(), "10:40", "pending"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bookings = service(&mock_server)
        .active_bookings(doctor_id, a_date())
        .await
        .unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].status, BookingStatus::Confirmed);
    assert_eq!(bookings[1].status, BookingStatus::Pending);
}
