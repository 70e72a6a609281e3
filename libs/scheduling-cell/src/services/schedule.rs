//! Decides which source of truth applies for a (doctor, date) and delegates
//! slot generation to it: exception first, weekly schedule second, empty
//! otherwise.

use chrono::{Datelike, NaiveDate};
use reqwest::Method;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ScheduleException, SchedulingError, SlotWindow, WeeklySchedule};
use crate::services::slots::{self, CONSULTATION_MINUTES};

pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_weekly_schedule(
        &self,
        doctor_id: Uuid,
        day_of_week: i32,
    ) -> Result<Option<WeeklySchedule>, SchedulingError> {
        let rows: Vec<WeeklySchedule> = self
            .supabase
            .service_request(
                Method::GET,
                &format!(
                    "/rest/v1/weekly_schedules?doctor_id=eq.{}&day_of_week=eq.{}",
                    doctor_id, day_of_week
                ),
                None,
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    pub async fn get_exception(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<ScheduleException>, SchedulingError> {
        let rows: Vec<ScheduleException> = self
            .supabase
            .service_request(
                Method::GET,
                &format!(
                    "/rest/v1/schedule_exceptions?doctor_id=eq.{}&exception_date=eq.{}",
                    doctor_id, date
                ),
                None,
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    /// Resolve the raw slot windows for a (doctor, date), not yet filtered
    /// for bookings or time of day.
    ///
    /// An exception always supersedes the weekly schedule: an unavailable
    /// exception empties the day, an override generates from its own window
    /// and never falls back to the weekly row. An unknown doctor is not an
    /// error, it degenerates to "no schedule configured".
    pub async fn resolve(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<SlotWindow>, SchedulingError> {
        if let Some(exception) = self.get_exception(doctor_id, date).await? {
            if exception.is_unavailable {
                debug!("Doctor {} is unavailable on {} (exception)", doctor_id, date);
                return Ok(Vec::new());
            }

            return match (&exception.start_time, &exception.end_time) {
                (Some(start), Some(end)) => slots::generate_windows(
                    start,
                    end,
                    exception.break_enabled,
                    exception.break_start_time.as_deref(),
                    exception.break_duration_minutes,
                    CONSULTATION_MINUTES,
                ),
                _ => {
                    warn!(
                        "Override for doctor {} on {} has no working window, treating as unavailable",
                        doctor_id, date
                    );
                    Ok(Vec::new())
                }
            };
        }

        // Sunday = 0 .. Saturday = 6
        let day_of_week = date.weekday().num_days_from_sunday() as i32;

        match self.get_weekly_schedule(doctor_id, day_of_week).await? {
            Some(schedule) => slots::generate_windows(
                &schedule.start_time,
                &schedule.end_time,
                schedule.break_enabled,
                schedule.break_start_time.as_deref(),
                schedule.break_duration_minutes,
                CONSULTATION_MINUTES,
            ),
            None => {
                debug!(
                    "No weekly schedule for doctor {} on day {} ({})",
                    doctor_id, day_of_week, date
                );
                Ok(Vec::new())
            }
        }
    }
}
