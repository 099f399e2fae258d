use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::models::slot::{CLOSING_HOUR, OPENING_HOUR};
use crate::models::{Booking, Slot};

/// How one (court, hour) cell renders on the availability grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Booked,
    Selected,
}

/// The fixed grid of bookable hours. Pure and deterministic: the operating
/// window (06:00-22:00, one-hour steps) is a fixed business rule, so the UI
/// and the conflict detector always agree on the same slot set.
pub fn generate_slots() -> Vec<Slot> {
    (OPENING_HOUR..=CLOSING_HOUR).map(Slot::new).collect()
}

/// The `[start, end)` interval of the slot starting at `hour` on `date`.
fn slot_interval(date: NaiveDate, hour: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0)?);
    Some((start, start + Duration::hours(1)))
}

/// Whether any booking for `court_id` overlaps the slot starting at `hour`
/// on `date`.
///
/// `bookings` must already be scoped to the venue and date on display; the
/// detector never filters by venue or date itself. The check is a half-open
/// interval overlap, so a booking whose start is not exactly on the hour is
/// still caught, and a booking ending exactly when the slot begins is not.
/// An empty list means no conflict.
pub fn is_slot_booked(court_id: &str, hour: u32, bookings: &[Booking], date: NaiveDate) -> bool {
    let Some((slot_start, slot_end)) = slot_interval(date, hour) else {
        return false;
    };

    bookings
        .iter()
        .any(|booking| booking.court_id == court_id && booking.overlaps(slot_start, slot_end))
}

/// UI-local selection: at most one (court, hour) pair at a time. Changing the
/// hour clears the court; re-clicking the selected court deselects it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    court_id: Option<String>,
    hour: Option<u32>,
}

impl Selection {
    /// Move the hour mark. Any prior court selection is dropped so a stale
    /// (court, hour) pair can never be submitted.
    pub fn set_hour(&mut self, hour: u32) {
        self.hour = Some(hour);
        self.court_id = None;
    }

    /// Toggle a court at the currently selected hour.
    pub fn toggle_court(&mut self, court_id: &str) {
        if self.court_id.as_deref() == Some(court_id) {
            self.court_id = None;
        } else {
            self.court_id = Some(court_id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.court_id = None;
        self.hour = None;
    }

    pub fn court_id(&self) -> Option<&str> {
        self.court_id.as_deref()
    }

    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    /// The pair to submit, present only when both halves are chosen.
    pub fn pair(&self) -> Option<(&str, u32)> {
        match (self.court_id.as_deref(), self.hour) {
            (Some(court_id), Some(hour)) => Some((court_id, hour)),
            _ => None,
        }
    }
}

/// Classify a grid cell. Booked wins over selected: a cell can only be
/// selected while it is free.
pub fn slot_status(
    court_id: &str,
    hour: u32,
    bookings: &[Booking],
    date: NaiveDate,
    selection: &Selection,
) -> SlotStatus {
    if is_slot_booked(court_id, hour, bookings, date) {
        SlotStatus::Booked
    } else if selection.pair() == Some((court_id, hour)) {
        SlotStatus::Selected
    } else {
        SlotStatus::Available
    }
}
