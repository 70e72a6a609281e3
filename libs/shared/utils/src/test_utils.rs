use std::sync::Arc;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn weekly_schedule_row(
        doctor_id: Uuid,
        day_of_week: i32,
        start_time: &str,
        end_time: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "day_of_week": day_of_week,
            "start_time": start_time,
            "end_time": end_time,
            "break_enabled": false,
            "break_start_time": null,
            "break_duration_minutes": 0
        })
    }

    pub fn weekly_schedule_row_with_break(
        doctor_id: Uuid,
        day_of_week: i32,
        start_time: &str,
        end_time: &str,
        break_start_time: &str,
        break_duration_minutes: i32,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "day_of_week": day_of_week,
            "start_time": start_time,
            "end_time": end_time,
            "break_enabled": true,
            "break_start_time": break_start_time,
            "break_duration_minutes": break_duration_minutes
        })
    }

    pub fn unavailable_exception_row(doctor_id: Uuid, date: NaiveDate) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "exception_date": date,
            "is_unavailable": true,
            "start_time": null,
            "end_time": null,
            "break_enabled": false,
            "break_start_time": null,
            "break_duration_minutes": 0,
            "reason": "out of office"
        })
    }

    pub fn override_exception_row(
        doctor_id: Uuid,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "exception_date": date,
            "is_unavailable": false,
            "start_time": start_time,
            "end_time": end_time,
            "break_enabled": false,
            "break_start_time": null,
            "break_duration_minutes": 0,
            "reason": null
        })
    }

    pub fn slot_row(
        doctor_id: Uuid,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        is_booked: bool,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "slot_date": date,
            "start_time": start_time,
            "end_time": end_time,
            "is_booked": is_booked
        })
    }

    /// Slot row with a null start time, as left behind by legacy writers.
    pub fn corrupt_slot_row(doctor_id: Uuid, date: NaiveDate) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "slot_date": date,
            "start_time": null,
            "end_time": null,
            "is_booked": false
        })
    }

    pub fn booking_row(
        doctor_id: Uuid,
        date: NaiveDate,
        start_time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "patient_id": Uuid::new_v4(),
            "booking_date": date,
            "start_time": start_time,
            "status": status,
            "created_at": "2025-01-01T00:00:00Z"
        })
    }
}
