use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{Booking, BookingListResponse, CreateBookingRequest};
use crate::services::reservation::BookingService;

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let service = BookingService::new(&state);
    let booking = service.reserve(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let service = BookingService::new(&state);
    let booking = service.cancel(booking_id).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn list_active_bookings(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<BookingListResponse>, AppError> {
    let service = BookingService::new(&state);
    let bookings = service.active_bookings(query.doctor_id, query.date).await?;
    Ok(Json(BookingListResponse {
        total: bookings.len(),
        bookings,
    }))
}
