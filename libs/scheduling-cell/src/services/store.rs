//! Persisted slot cache for a (doctor, date): idempotent population plus
//! purge-and-regenerate recovery for corrupt rows.

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AppointmentSlot, SchedulingError, SlotWindow};

pub struct SlotStore {
    supabase: SupabaseClient,
}

impl SlotStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Fetch the cached slot rows for a (doctor, date).
    ///
    /// A row without a start time is unrecoverable; partial repair could
    /// leave duplicate or gapped slot sets, so on detection every row for
    /// the (doctor, date) is purged and the result is reported as empty,
    /// forcing regeneration.
    pub async fn lookup(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, SchedulingError> {
        let rows: Vec<AppointmentSlot> = self
            .supabase
            .service_request(
                Method::GET,
                &format!(
                    "/rest/v1/appointment_slots?doctor_id=eq.{}&slot_date=eq.{}&order=start_time.asc",
                    doctor_id, date
                ),
                None,
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        if rows.iter().any(|row| row.start_time.is_none()) {
            warn!(
                "Corrupt slot rows for doctor {} on {}, purging all {} rows for regeneration",
                doctor_id,
                date,
                rows.len()
            );
            self.purge(doctor_id, date).await?;
            return Ok(Vec::new());
        }

        Ok(rows)
    }

    /// Delete every slot row for a (doctor, date). Safe to retry.
    pub async fn purge(&self, doctor_id: Uuid, date: NaiveDate) -> Result<(), SchedulingError> {
        let deleted: Vec<Value> = self
            .supabase
            .service_request_with_headers(
                Method::DELETE,
                &format!(
                    "/rest/v1/appointment_slots?doctor_id=eq.{}&slot_date=eq.{}",
                    doctor_id, date
                ),
                None,
                Some(representation_headers()),
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        debug!(
            "Purged {} slot rows for doctor {} on {}",
            deleted.len(),
            doctor_id,
            date
        );
        Ok(())
    }

    /// Insert one row per generated window with `is_booked = false`.
    ///
    /// Callers only reach this after an empty lookup, but two first-requests
    /// can race here; the insert is duplicate-tolerant against the
    /// (doctor_id, slot_date, start_time) key and the stored rows are
    /// re-read afterwards, so both racers observe the same final set.
    pub async fn populate(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        windows: &[SlotWindow],
    ) -> Result<Vec<AppointmentSlot>, SchedulingError> {
        if windows.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Value> = windows
            .iter()
            .map(|window| {
                json!({
                    "doctor_id": doctor_id,
                    "slot_date": date,
                    "start_time": window.start_time,
                    "end_time": window.end_time,
                    "is_booked": false
                })
            })
            .collect();

        let mut headers = HeaderMap::new();
        headers.insert(
            "Prefer",
            HeaderValue::from_static("return=representation,resolution=ignore-duplicates"),
        );

        let inserted: Vec<Value> = self
            .supabase
            .service_request_with_headers(
                Method::POST,
                "/rest/v1/appointment_slots?on_conflict=doctor_id,slot_date,start_time",
                Some(Value::Array(rows)),
                Some(headers),
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        debug!(
            "Populated {} of {} slots for doctor {} on {}",
            inserted.len(),
            windows.len(),
            doctor_id,
            date
        );

        self.lookup(doctor_id, date).await
    }
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}
