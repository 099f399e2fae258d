use std::env;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtbook::services::availability::{generate_slots, SlotStatus};
use courtbook::{BookingApiService, Config, Dashboard};

/// Headless smoke client: lists venues and courts, prints today's
/// availability grid, and optionally submits one booking.
///
/// Env vars: `API_BASE_URL`, optional `COURTBOOK_EMAIL`/`COURTBOOK_PASSWORD`
/// to log in, optional `BOOK_COURT_ID`/`BOOK_HOUR` to book a slot.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtbook=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(base_url = %config.api.base_url, "Starting Courtbook client");

    let api = BookingApiService::new(&config)?;

    let session = match (env::var("COURTBOOK_EMAIL"), env::var("COURTBOOK_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            let session = api.login(&email, &password).await?;
            tracing::info!(user = %session.user.name, role = session.role.as_str(), "Logged in");
            Some(session)
        }
        _ => None,
    };

    let today = Utc::now().date_naive();
    let mut dashboard = Dashboard::new(api, session, today);

    dashboard.load_venues().await;
    if let Some(notice) = dashboard.state.take_notice() {
        anyhow::bail!(notice);
    }

    let Some(venue) = dashboard.state.venues.first().cloned() else {
        tracing::warn!("No venues available");
        return Ok(());
    };
    println!("Venue: {} ({})", venue.name, venue.address);

    dashboard.refresh().await;
    if let Some(notice) = dashboard.state.take_notice() {
        anyhow::bail!(notice);
    }

    let slots = generate_slots();
    for court in dashboard.state.courts.clone() {
        let row: String = slots
            .iter()
            .map(|slot| match dashboard.state.slot_status(&court.id, slot.hour) {
                SlotStatus::Booked => 'x',
                SlotStatus::Selected => 'o',
                SlotStatus::Available => '.',
            })
            .collect();
        println!("{:<20} {}", court.name, row);
    }

    if let (Ok(court_id), Ok(hour)) = (env::var("BOOK_COURT_ID"), env::var("BOOK_HOUR")) {
        let hour: u32 = hour.parse()?;
        dashboard.state.select_hour(hour);
        dashboard.state.toggle_court(&court_id);

        match dashboard.submit_selection().await {
            Ok(()) => tracing::info!(court_id = %court_id, hour, "Booking confirmed"),
            Err(error) => tracing::error!(%error, "Booking failed"),
        }
        if let Some(notice) = dashboard.state.take_notice() {
            println!("{}", notice);
        }
    }

    Ok(())
}
