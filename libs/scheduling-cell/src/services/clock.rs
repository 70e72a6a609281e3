//! Minute-of-day arithmetic for "HH:MM" clock strings.

use crate::models::SchedulingError;

pub const MINUTES_PER_DAY: i32 = 1440;

/// Parse "H:MM" or "HH:MM" (24-hour) into a minute-of-day offset.
///
/// The only numeric bound is the total range check: the result must land
/// in 0..1440. Anything that is not `\d{1,2}:\d{2}` is rejected.
pub fn minutes_from_clock(clock: &str) -> Result<i32, SchedulingError> {
    let invalid = || SchedulingError::InvalidTime(clock.to_string());

    let (hours, minutes) = clock.split_once(':').ok_or_else(invalid)?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    if !hours.chars().all(|c| c.is_ascii_digit())
        || !minutes.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;

    let total = hours * 60 + minutes;
    if total >= MINUTES_PER_DAY {
        return Err(invalid());
    }

    Ok(total)
}

/// Render a minute offset as a zero-padded "HH:MM" string.
///
/// The offset is taken modulo 1440 and never goes negative. Wraparound is a
/// hard boundary for callers, not a feature: schedules that rely on it are
/// out of contract.
pub fn clock_from_minutes(minutes: i32) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
