//! Slot reservation and cancellation. The claim on the slot row is a single
//! conditional write so two racing requests can never both win.

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use scheduling_cell::services::clock;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Booking, BookingError, CreateBookingRequest};

pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Reserve a slot and record the booking.
    ///
    /// The claim is a conditional update filtered on `is_booked = false`; the
    /// storage layer applies it atomically and returns the rows it actually
    /// flipped. An empty result means the slot was never generated, was
    /// already taken, or a concurrent claim got there first — all surfaced
    /// as the same conflict.
    pub async fn reserve(&self, request: CreateBookingRequest) -> Result<Booking, BookingError> {
        let minutes = clock::minutes_from_clock(&request.start_time)
            .map_err(|_| BookingError::InvalidTime(request.start_time.clone()))?;
        // Normalize so "9:00" claims the stored "09:00" row
        let start_time = clock::clock_from_minutes(minutes);

        debug!(
            "Reserving slot {} on {} for doctor {}",
            start_time, request.date, request.doctor_id
        );

        let claimed: Vec<Value> = self
            .supabase
            .service_request_with_headers(
                Method::PATCH,
                &format!(
                    "/rest/v1/appointment_slots?doctor_id=eq.{}&slot_date=eq.{}&start_time=eq.{}&is_booked=eq.false",
                    request.doctor_id, request.date, start_time
                ),
                Some(json!({ "is_booked": true })),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        if claimed.is_empty() {
            debug!(
                "Claim lost for doctor {} on {} at {}",
                request.doctor_id, request.date, start_time
            );
            return Err(BookingError::SlotTaken);
        }

        match self.insert_booking(&request, &start_time).await {
            Ok(booking) => {
                info!(
                    "Booking {} confirmed for doctor {} on {} at {}",
                    booking.id, request.doctor_id, request.date, start_time
                );
                Ok(booking)
            }
            Err(err) => {
                // Give the claimed slot back so it is not stranded
                self.release_slot(request.doctor_id, request.date, &start_time)
                    .await;
                Err(err)
            }
        }
    }

    /// Cancel a booking and release its slot back into availability.
    ///
    /// The update is filtered to bookings that still occupy a slot, so
    /// cancelling twice is `NotFound` the second time and the release never
    /// fires for a booking that already gave its slot up — the slot may
    /// since have been claimed by someone else.
    pub async fn cancel(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let updated: Vec<Booking> = self
            .supabase
            .service_request_with_headers(
                Method::PATCH,
                &format!(
                    "/rest/v1/bookings?id=eq.{}&status=not.in.(cancelled,rejected)",
                    booking_id
                ),
                Some(json!({ "status": "cancelled" })),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let Some(booking) = updated.into_iter().next() else {
            return Err(BookingError::NotFound(booking_id));
        };

        self.release_slot(booking.doctor_id, booking.booking_date, &booking.start_time)
            .await;

        info!("Booking {} cancelled", booking.id);
        Ok(booking)
    }

    /// Bookings for a (doctor, date) that still occupy a slot.
    pub async fn active_bookings(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        self.supabase
            .service_request(
                Method::GET,
                &format!(
                    "/rest/v1/bookings?doctor_id=eq.{}&booking_date=eq.{}&status=not.in.(cancelled,rejected)&order=start_time.asc",
                    doctor_id, date
                ),
                None,
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))
    }

    async fn insert_booking(
        &self,
        request: &CreateBookingRequest,
        start_time: &str,
    ) -> Result<Booking, BookingError> {
        let inserted: Vec<Booking> = self
            .supabase
            .service_request_with_headers(
                Method::POST,
                "/rest/v1/bookings",
                Some(json!({
                    "doctor_id": request.doctor_id,
                    "patient_id": request.patient_id,
                    "booking_date": request.date,
                    "start_time": start_time,
                    "status": "confirmed"
                })),
                Some(representation_headers()),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        inserted
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::Database("Booking insert returned no row".to_string()))
    }

    /// Best-effort: clears the `is_booked` projection; the bookings table
    /// stays authoritative, so a failure here can only hide a slot, never
    /// double-offer one.
    async fn release_slot(&self, doctor_id: Uuid, date: NaiveDate, start_time: &str) {
        let released: Result<Vec<Value>, _> = self
            .supabase
            .service_request_with_headers(
                Method::PATCH,
                &format!(
                    "/rest/v1/appointment_slots?doctor_id=eq.{}&slot_date=eq.{}&start_time=eq.{}",
                    doctor_id, date, start_time
                ),
                Some(json!({ "is_booked": false })),
                Some(representation_headers()),
            )
            .await;

        if let Err(e) = released {
            warn!(
                "Failed to release slot {} on {} for doctor {}: {}",
                start_time, date, doctor_id, e
            );
        }
    }
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}
