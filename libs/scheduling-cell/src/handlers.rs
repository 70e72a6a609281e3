use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::AvailableSlotsResponse;
use crate::services::availability::AvailabilityService;

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: NaiveDate,
    /// Reference clock for the past-slot filter; defaults to the system
    /// clock. Exposed mainly for deterministic tests.
    pub now: Option<NaiveDateTime>,
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let service = AvailabilityService::new(&state);
    let now = query.now.unwrap_or_else(|| Local::now().naive_local());

    let available_slots = service
        .get_available_slots(doctor_id, query.date, now)
        .await?;

    Ok(Json(AvailableSlotsResponse {
        doctor_id,
        date: query.date,
        total_slots: available_slots.len(),
        available_slots,
    }))
}
