use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    pub total: usize,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Slot is no longer available")]
    SlotTaken,

    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidTime(msg) => {
                AppError::BadRequest(format!("Invalid time format: {}", msg))
            }
            BookingError::SlotTaken => {
                AppError::Conflict("Slot is no longer available".to_string())
            }
            BookingError::NotFound(id) => AppError::NotFound(format!("Booking {} not found", id)),
            BookingError::Database(msg) => AppError::Database(msg),
        }
    }
}
