use chrono::NaiveTime;
use serde::Serialize;

/// First bookable hour of the day.
pub const OPENING_HOUR: u32 = 6;
/// Last bookable hour of the day, inclusive as a selectable mark.
pub const CLOSING_HOUR: u32 = 22;

/// One bookable one-hour unit, identified by its starting hour. Derived,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub hour: u32,
    pub label: String,
}

impl Slot {
    pub fn new(hour: u32) -> Self {
        Slot {
            hour,
            label: format_hour_label(hour),
        }
    }
}

/// 12-hour clock label for a slot mark, zero-padded: 6 -> "06 AM",
/// 22 -> "10 PM".
pub fn format_hour_label(hour: u32) -> String {
    NaiveTime::from_hms_opt(hour, 0, 0)
        .map(|t| t.format("%I %p").to_string())
        .unwrap_or_default()
}
