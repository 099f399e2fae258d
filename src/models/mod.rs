pub mod booking;
pub mod court;
pub mod slot;
pub mod user;
pub mod venue;

pub use booking::{Booking, BookingStatus};
pub use court::Court;
pub use slot::Slot;
pub use user::{Role, User};
pub use venue::Venue;
