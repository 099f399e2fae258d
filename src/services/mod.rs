pub mod api;
pub mod availability;
pub mod booking;
pub mod dashboard;
