//! Availability façade: cache lookup, lazy population, and the booked /
//! past-time filters that produce the final bookable list.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use reqwest::Method;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ActiveBookingRow, SchedulingError, SlotWindow};
use crate::services::clock;
use crate::services::schedule::ScheduleService;
use crate::services::store::SlotStore;

pub struct AvailabilityService {
    schedule: ScheduleService,
    store: SlotStore,
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            schedule: ScheduleService::new(config),
            store: SlotStore::new(config),
            supabase: SupabaseClient::new(config),
        }
    }

    /// The bookable slots for a (doctor, date), ordered by start time.
    ///
    /// Populates the slot cache on first request, then drops slots that are
    /// flagged booked, slots claimed by an active booking (the bookings
    /// table is authoritative when the cached flag has drifted, so both
    /// exclusions apply), and, when `date` is `now`'s calendar date, slots
    /// whose start minute has already passed — the current boundary minute
    /// included.
    pub async fn get_available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<SlotWindow>, SchedulingError> {
        let mut rows = self.store.lookup(doctor_id, date).await?;

        if rows.is_empty() {
            let windows = self.schedule.resolve(doctor_id, date).await?;
            rows = self.store.populate(doctor_id, date, &windows).await?;
        }

        let booked_minutes = self.active_booking_minutes(doctor_id, date).await?;

        let today = date == now.date();
        let now_minute = now.time().hour() as i32 * 60 + now.time().minute() as i32;

        let mut open: Vec<(i32, SlotWindow)> = Vec::new();
        for row in rows {
            if row.is_booked {
                continue;
            }

            let (Some(start), Some(end)) = (&row.start_time, &row.end_time) else {
                warn!("Skipping incomplete slot row {} for doctor {}", row.id, doctor_id);
                continue;
            };

            let start_minute = clock::minutes_from_clock(start)?;
            if booked_minutes.contains(&start_minute) {
                debug!(
                    "Slot {} on {} for doctor {} excluded by active booking",
                    start, date, doctor_id
                );
                continue;
            }
            if today && start_minute <= now_minute {
                continue;
            }

            open.push((
                start_minute,
                SlotWindow {
                    start_time: start.clone(),
                    end_time: end.clone(),
                },
            ));
        }

        // Numeric minute order, not lexicographic
        open.sort_by_key(|(minute, _)| *minute);

        debug!(
            "{} bookable slots for doctor {} on {}",
            open.len(),
            doctor_id,
            date
        );
        Ok(open.into_iter().map(|(_, window)| window).collect())
    }

    /// Start minutes occupied by bookings that are neither cancelled nor
    /// rejected.
    async fn active_booking_minutes(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<HashSet<i32>, SchedulingError> {
        let rows: Vec<ActiveBookingRow> = self
            .supabase
            .service_request(
                Method::GET,
                &format!(
                    "/rest/v1/bookings?doctor_id=eq.{}&booking_date=eq.{}&status=not.in.(cancelled,rejected)&select=start_time,status",
                    doctor_id, date
                ),
                None,
            )
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        let mut minutes = HashSet::new();
        for row in rows {
            match clock::minutes_from_clock(&row.start_time) {
                Ok(minute) => {
                    minutes.insert(minute);
                }
                Err(_) => warn!(
                    "Skipping booking with malformed start time {:?} for doctor {} on {}",
                    row.start_time, doctor_id, date
                ),
            }
        }
        Ok(minutes)
    }
}
