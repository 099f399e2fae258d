use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A confirmed one-hour reservation as served by the booking API.
///
/// `court_name` and `booked_by` are denormalized display fields the server
/// attaches for presentation; they are never written back.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub court_id: String,
    pub venue_id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub court_name: Option<String>,
    #[serde(default)]
    pub booked_by: Option<String>,
}

/// Where a booking sits relative to "now" on the owner dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Active,
    Upcoming,
    Expired,
}

impl Booking {
    /// Half-open interval overlap against `[slot_start, slot_end)`. Adjacent
    /// intervals (one ending exactly when the other begins) do not overlap.
    pub fn overlaps(&self, slot_start: DateTime<Utc>, slot_end: DateTime<Utc>) -> bool {
        slot_start < self.end_time && slot_end > self.start_time
    }

    /// Classify against the given instant: active while `now` is inside
    /// `[start, end)`, upcoming before the start, expired from the end onward.
    pub fn status_at(&self, now: DateTime<Utc>) -> BookingStatus {
        if now >= self.start_time && now < self.end_time {
            BookingStatus::Active
        } else if now < self.start_time {
            BookingStatus::Upcoming
        } else {
            BookingStatus::Expired
        }
    }

    /// Booking date for card display, e.g. "Sep 03, 2026".
    pub fn formatted_date(&self) -> String {
        self.start_time.format("%b %d, %Y").to_string()
    }

    /// Time range for card display, e.g. "02:00 PM - 03:00 PM".
    pub fn formatted_time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%I:%M %p"),
            self.end_time.format("%I:%M %p")
        )
    }
}

/// Bookings split into owner-dashboard tabs, in the order they arrived.
#[derive(Debug, Default, Clone)]
pub struct BookingPartition {
    pub active: Vec<Booking>,
    pub upcoming: Vec<Booking>,
    pub expired: Vec<Booking>,
}

pub fn partition_bookings(bookings: &[Booking], now: DateTime<Utc>) -> BookingPartition {
    let mut partition = BookingPartition::default();
    for booking in bookings {
        match booking.status_at(now) {
            BookingStatus::Active => partition.active.push(booking.clone()),
            BookingStatus::Upcoming => partition.upcoming.push(booking.clone()),
            BookingStatus::Expired => partition.expired.push(booking.clone()),
        }
    }
    partition
}
