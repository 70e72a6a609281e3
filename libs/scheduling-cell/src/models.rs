use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

/// Recurring working hours for one weekday (Sunday = 0 .. Saturday = 6).
/// One row per (doctor_id, day_of_week); edited by the doctor's schedule
/// management flow, read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub break_enabled: bool,
    pub break_start_time: Option<String>,
    #[serde(default)]
    pub break_duration_minutes: i32,
}

/// Single-date override. When present it fully replaces the weekly schedule
/// for that date; `is_unavailable` cancels the day outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleException {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub exception_date: NaiveDate,
    pub is_unavailable: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub break_enabled: bool,
    pub break_start_time: Option<String>,
    #[serde(default)]
    pub break_duration_minutes: i32,
    pub reason: Option<String>,
}

/// Persisted slot cache row. Regenerable from the schedule at any time;
/// `is_booked` is the only fact that survives regeneration. `start_time`
/// is optional only to tolerate rows left behind by legacy writers — such
/// rows are treated as corrupt and purged, never repaired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_booked: bool,
}

/// A bookable time window, "HH:MM" to "HH:MM".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    pub start_time: String,
    pub end_time: String,
}

/// Read-only view of a booking row, used for the availability cross-check.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveBookingRow {
    pub start_time: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct AvailableSlotsResponse {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub available_slots: Vec<SlotWindow>,
    pub total_slots: usize,
}

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            // Malformed times here come from stored schedule rows, not from
            // request input, so they surface as a server-side failure.
            SchedulingError::InvalidTime(msg) => {
                AppError::Internal(format!("Malformed stored time: {}", msg))
            }
            SchedulingError::Database(msg) => AppError::Database(msg),
        }
    }
}
