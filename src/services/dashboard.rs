use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::booking::{partition_bookings, BookingPartition};
use crate::models::venue::filter_managed_venues;
use crate::models::{Booking, Court, Venue};
use crate::services::api::{
    AddAdminRequest, BookingApiService, CreateCourtRequest, CreateVenueRequest,
};
use crate::services::availability::{self, Selection, SlotStatus};
use crate::services::booking::submit_booking;
use crate::session::Session;

/// Load lifecycle of the venue/date view. Every dashboard flavour drives
/// this one contract; there are no parallel per-screen copies of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Ticket identifying one issued fetch. A completion is only applied while
/// its ticket is still the latest issued; anything older is discarded, which
/// removes the last-write-wins race between overlapping fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

/// All UI-local mutable state, single-writer. Venue, court, and booking
/// copies are read-through caches of the remote service, invalidated on every
/// venue/date change and after every successful submission.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub venues: Vec<Venue>,
    pub courts: Vec<Court>,
    pub bookings: Vec<Booking>,
    pub selected_venue_id: Option<String>,
    pub date: NaiveDate,
    pub selection: Selection,
    pub phase: LoadPhase,
    /// Text for the message dialog, set by fetch failures and submissions.
    pub notice: Option<String>,
    issued_seq: u64,
}

impl DashboardState {
    pub fn new(date: NaiveDate) -> Self {
        let mut selection = Selection::default();
        // The hour slider starts at the opening hour.
        selection.set_hour(crate::models::slot::OPENING_HOUR);

        DashboardState {
            venues: Vec::new(),
            courts: Vec::new(),
            bookings: Vec::new(),
            selected_venue_id: None,
            date,
            selection,
            phase: LoadPhase::Idle,
            notice: None,
            issued_seq: 0,
        }
    }

    /// Issue a new fetch ticket, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.phase = LoadPhase::Loading;
        FetchTicket {
            seq: self.issued_seq,
        }
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.seq == self.issued_seq
    }

    /// Apply a venue-list completion. Returns false when the ticket is stale
    /// and the result was discarded. The first venue becomes selected when
    /// nothing is selected yet.
    pub fn apply_venues(
        &mut self,
        ticket: FetchTicket,
        result: EngineResult<Vec<Venue>>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(seq = ticket.seq, "Discarding stale venue fetch");
            return false;
        }

        match result {
            Ok(venues) => {
                if self.selected_venue_id.is_none() {
                    self.selected_venue_id = venues.first().map(|venue| venue.id.clone());
                }
                self.venues = venues;
                self.phase = LoadPhase::Loaded;
            }
            Err(error) => {
                self.phase = LoadPhase::Failed(error.to_string());
                self.notice =
                    Some("Failed to load venues. Please check the server.".to_string());
            }
        }
        true
    }

    /// Apply a courts+bookings completion for the active venue/date.
    pub fn apply_view(
        &mut self,
        ticket: FetchTicket,
        result: EngineResult<(Vec<Court>, Vec<Booking>)>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(seq = ticket.seq, "Discarding stale bookings fetch");
            return false;
        }

        match result {
            Ok((courts, bookings)) => {
                self.courts = courts;
                self.bookings = bookings;
                self.phase = LoadPhase::Loaded;
            }
            Err(error) => {
                self.phase = LoadPhase::Failed(error.to_string());
                self.notice = Some(
                    "Failed to load data. Please check the server or your authentication."
                        .to_string(),
                );
            }
        }
        true
    }

    /// Switch venue. The cached courts and bookings belong to the old venue
    /// and are dropped immediately; the caller refetches.
    pub fn change_venue(&mut self, venue_id: &str) {
        if self.selected_venue_id.as_deref() == Some(venue_id) {
            return;
        }
        self.selected_venue_id = Some(venue_id.to_string());
        self.courts.clear();
        self.bookings.clear();
        self.selection.set_hour(crate::models::slot::OPENING_HOUR);
    }

    /// Switch date. Cached bookings are stale and dropped; the caller
    /// refetches.
    pub fn change_date(&mut self, date: NaiveDate) {
        if self.date == date {
            return;
        }
        self.date = date;
        self.bookings.clear();
        // Hour keeps its position, but any picked court no longer refers to
        // a verified-free cell.
        if let Some(hour) = self.selection.hour() {
            self.selection.set_hour(hour);
        }
    }

    pub fn select_hour(&mut self, hour: u32) {
        self.selection.set_hour(hour);
    }

    /// Toggle a court at the selected hour. Booked cells are not selectable;
    /// the click is ignored.
    pub fn toggle_court(&mut self, court_id: &str) {
        if let Some(hour) = self.selection.hour() {
            if availability::is_slot_booked(court_id, hour, &self.bookings, self.date) {
                tracing::debug!(court_id, hour, "Ignoring click on booked slot");
                return;
            }
        }
        self.selection.toggle_court(court_id);
    }

    pub fn slot_status(&self, court_id: &str, hour: u32) -> SlotStatus {
        availability::slot_status(court_id, hour, &self.bookings, self.date, &self.selection)
    }

    /// Owner-dashboard tabs: bookings split by their position relative to
    /// `now`.
    pub fn booking_partition(&self, now: chrono::DateTime<chrono::Utc>) -> BookingPartition {
        partition_bookings(&self.bookings, now)
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

/// The engine facade a UI composition drives. Owns the state, the API client,
/// and the injected session; every network completion funnels back through
/// the ticketed `apply_*` transitions above.
#[derive(Debug)]
pub struct Dashboard {
    pub state: DashboardState,
    api: BookingApiService,
    session: Option<Session>,
}

impl Dashboard {
    pub fn new(api: BookingApiService, session: Option<Session>, date: NaiveDate) -> Self {
        Dashboard {
            state: DashboardState::new(date),
            api,
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.bearer_token())
    }

    /// A 401 from any call invalidates the injected session.
    fn note_auth_failure(&mut self, error: &EngineError) {
        if error.is_auth_failure() {
            tracing::warn!("Authentication failure from booking API; clearing session");
            self.session = None;
        }
    }

    /// Load every venue (user dashboard).
    pub async fn load_venues(&mut self) {
        let ticket = self.state.begin_fetch();
        let result = self.api.list_venues().await;
        if let Err(error) = &result {
            self.note_auth_failure(error);
        }
        self.state.apply_venues(ticket, result);
    }

    /// Load only the venues the signed-in owner or admin manages.
    pub async fn load_managed_venues(&mut self) {
        let Some(session) = self.session.clone() else {
            self.state.phase = LoadPhase::Failed("Authentication required".to_string());
            self.state.notice = Some(EngineError::Unauthorized.user_message());
            return;
        };

        let ticket = self.state.begin_fetch();
        let result = self.api.list_venues().await.map(|venues| {
            filter_managed_venues(&venues, &session.user.id, session.role)
        });
        if let Err(error) = &result {
            self.note_auth_failure(error);
        }
        self.state.apply_venues(ticket, result);
    }

    async fn fetch_view(
        &self,
        venue_id: &str,
        date: NaiveDate,
        token: Option<&str>,
    ) -> EngineResult<(Vec<Court>, Vec<Booking>)> {
        let courts = self.api.list_courts(venue_id).await?;
        let bookings = self.api.list_bookings(venue_id, date, token).await?;
        Ok((courts, bookings))
    }

    /// Re-read courts and bookings for the active venue/date. No-op without
    /// a selected venue.
    pub async fn refresh(&mut self) {
        let Some(venue_id) = self.state.selected_venue_id.clone() else {
            return;
        };

        let ticket = self.state.begin_fetch();
        let date = self.state.date;
        let token = self.token().map(|t| t.to_string());

        let result = self.fetch_view(&venue_id, date, token.as_deref()).await;

        if let Err(error) = &result {
            self.note_auth_failure(error);
        }
        self.state.apply_view(ticket, result);
    }

    pub async fn set_venue(&mut self, venue_id: &str) {
        self.state.change_venue(venue_id);
        self.refresh().await;
    }

    pub async fn set_date(&mut self, date: NaiveDate) {
        self.state.change_date(date);
        self.refresh().await;
    }

    /// Submit the current selection. On success the booking list is re-read
    /// from the server and the court selection is cleared; on rejection the
    /// selection stays so the user can pick a different slot.
    pub async fn submit_selection(&mut self) -> EngineResult<()> {
        let Some(session) = self.session.clone() else {
            return Err(EngineError::Unauthorized);
        };

        let venue_id = self.state.selected_venue_id.clone();
        let court_id = self.state.selection.court_id().map(|c| c.to_string());
        let hour = self.state.selection.hour();

        let result = submit_booking(
            &self.api,
            venue_id.as_deref(),
            court_id.as_deref(),
            Some(self.state.date),
            hour,
            &session,
        )
        .await;

        match result {
            Ok(()) => {
                self.state.notice = Some("Booking successful!".to_string());
                if let Some(court_id) = court_id {
                    // Drop the court half of the selection; the hour mark
                    // stays where the user left it.
                    self.state.selection.toggle_court(&court_id);
                }
                self.refresh().await;
                Ok(())
            }
            Err(error) => {
                self.note_auth_failure(&error);
                self.state.notice = Some(error.user_message());
                Err(error)
            }
        }
    }

    // ========================================================================
    // Owner Management Actions
    // ========================================================================

    /// Create a venue owned by the signed-in user, then re-read the venue
    /// list.
    pub async fn create_venue(&mut self, name: &str, address: &str) -> EngineResult<()> {
        let Some(session) = self.session.clone() else {
            return Err(EngineError::Unauthorized);
        };
        if name.is_empty() || address.is_empty() {
            return Err(EngineError::Validation(
                "Venue name and address are required.".to_string(),
            ));
        }

        let request = CreateVenueRequest {
            name: name.to_string(),
            address: address.to_string(),
            owner_ids: vec![session.user.id.clone()],
        };
        let result = self.api.create_venue(&request, session.bearer_token()).await;

        match result {
            Ok(()) => {
                self.state.notice = Some("Venue added successfully!".to_string());
                self.load_managed_venues().await;
                Ok(())
            }
            Err(error) => {
                self.note_auth_failure(&error);
                self.state.notice = Some(error.user_message());
                Err(error)
            }
        }
    }

    /// Create a court under the active venue, then re-read courts and
    /// bookings.
    pub async fn create_court(&mut self, name: &str, description: &str) -> EngineResult<()> {
        let Some(session) = self.session.clone() else {
            return Err(EngineError::Unauthorized);
        };
        let Some(venue_id) = self.state.selected_venue_id.clone() else {
            return Err(EngineError::Validation("Select a venue first.".to_string()));
        };
        if name.is_empty() {
            return Err(EngineError::Validation(
                "Court name is required.".to_string(),
            ));
        }

        let request = CreateCourtRequest {
            name: name.to_string(),
            description: description.to_string(),
        };
        let result = self
            .api
            .create_court(&venue_id, &request, session.bearer_token())
            .await;

        match result {
            Ok(()) => {
                self.state.notice = Some("Court added successfully!".to_string());
                self.refresh().await;
                Ok(())
            }
            Err(error) => {
                self.note_auth_failure(&error);
                self.state.notice = Some(error.user_message());
                Err(error)
            }
        }
    }

    /// Attach an admin user to the active venue.
    pub async fn add_admin(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> EngineResult<()> {
        let Some(session) = self.session.clone() else {
            return Err(EngineError::Unauthorized);
        };
        let Some(venue_id) = self.state.selected_venue_id.clone() else {
            return Err(EngineError::Validation("Select a venue first.".to_string()));
        };
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(EngineError::Validation(
                "Admin name, email, and password are required.".to_string(),
            ));
        }

        let request = AddAdminRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self
            .api
            .add_admin(&venue_id, &request, session.bearer_token())
            .await;

        match result {
            Ok(()) => {
                self.state.notice = Some("Admin added successfully!".to_string());
                Ok(())
            }
            Err(error) => {
                self.note_auth_failure(&error);
                self.state.notice = Some(error.user_message());
                Err(error)
            }
        }
    }
}
