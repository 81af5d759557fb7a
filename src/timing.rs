//! Timeline windows for scenes.

use crate::types::SEGMENT_DURATION_SECS;

/// Format seconds as `MM:SS`. Minutes are padded to at least two digits and
/// keep growing past 99 (`100:00`); there is no hour rollover.
pub fn format_timestamp(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Time range of the scene at 0-based `index` when each scene lasts `duration_secs`
pub fn time_range_for(index: usize, duration_secs: u32) -> String {
    let start = index as u64 * u64::from(duration_secs);
    let end = start + u64::from(duration_secs);
    format!("{} - {}", format_timestamp(start), format_timestamp(end))
}

/// Time range using the standard 8-second scene length
pub fn default_time_range(index: usize) -> String {
    time_range_for(index, SEGMENT_DURATION_SECS)
}
