//! Pure slot generation: working window + optional break -> ordered windows.

use crate::models::{SchedulingError, SlotWindow};
use crate::services::clock;

/// System-wide consultation length. Fixed, not configurable per request or
/// per doctor.
pub const CONSULTATION_MINUTES: i32 = 50;

/// Walk a cursor from `start_time` and emit fixed-length windows until the
/// next window would overrun `end_time`.
///
/// When the cursor lands inside the break window the cursor jumps to the end
/// of the break and no slot is emitted for the skipped region. A slot that
/// starts before the break and ends inside it is still emitted; only cursor
/// positions inside `[break_start, break_start + break_duration)` are
/// consumed.
///
/// An inverted or zero-length working window produces an empty sequence, not
/// an error.
pub fn generate_windows(
    start_time: &str,
    end_time: &str,
    break_enabled: bool,
    break_start_time: Option<&str>,
    break_duration_minutes: i32,
    slot_minutes: i32,
) -> Result<Vec<SlotWindow>, SchedulingError> {
    let start = clock::minutes_from_clock(start_time)?;
    let end = clock::minutes_from_clock(end_time)?;

    let break_window = match (break_enabled, break_start_time) {
        (true, Some(break_start)) if break_duration_minutes > 0 => {
            let break_start = clock::minutes_from_clock(break_start)?;
            Some((break_start, break_start + break_duration_minutes))
        }
        _ => None,
    };

    let mut windows = Vec::new();
    let mut cur = start;

    while cur + slot_minutes <= end {
        if let Some((break_start, break_end)) = break_window {
            if cur >= break_start && cur < break_end {
                cur = break_end;
                continue;
            }
        }

        windows.push(SlotWindow {
            start_time: clock::clock_from_minutes(cur),
            end_time: clock::clock_from_minutes(cur + slot_minutes),
        });
        cur += slot_minutes;
    }

    Ok(windows)
}
