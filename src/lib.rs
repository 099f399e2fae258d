//! Availability and booking engine for badminton court reservations.
//!
//! Sits between a UI and a remote booking REST API and owns the three parts
//! of the application with real invariants:
//!
//! - the fixed grid of bookable hourly slots (06:00-22:00),
//! - conflict detection over the fetched booking list, with half-open
//!   interval-overlap semantics so adjacent bookings never collide and
//!   off-hour starts are never missed,
//! - validated booking submission with read-through invalidation: after a
//!   successful write the booking list is re-read from the server rather
//!   than patched locally.
//!
//! Venue, court, and booking records are owned by the remote service; this
//! crate only ever holds refreshable copies of them. Auth is an injected
//! [`session::Session`] obtained from the external auth collaborator.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{EngineError, EngineResult};
pub use services::api::BookingApiService;
pub use services::dashboard::{Dashboard, DashboardState, LoadPhase};
pub use session::Session;
