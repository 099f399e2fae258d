use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::services::api::{BookingApiService, CreateBookingRequest};
use crate::session::Session;

/// A fully validated booking submission, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub venue_id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub hour: u32,
}

impl BookingDraft {
    /// Validate the raw selection state. Every field must be present and the
    /// hour must fall inside the operating window; failures are reported
    /// locally, before any network traffic.
    pub fn from_selection(
        venue_id: Option<&str>,
        court_id: Option<&str>,
        date: Option<NaiveDate>,
        hour: Option<u32>,
    ) -> EngineResult<Self> {
        let (Some(venue_id), Some(court_id), Some(date), Some(hour)) =
            (venue_id, court_id, date, hour)
        else {
            return Err(EngineError::Validation(
                "Please select a venue, court, date, and time.".to_string(),
            ));
        };

        if venue_id.is_empty() || court_id.is_empty() {
            return Err(EngineError::Validation(
                "Please select a venue, court, date, and time.".to_string(),
            ));
        }

        if !(crate::models::slot::OPENING_HOUR..=crate::models::slot::CLOSING_HOUR)
            .contains(&hour)
        {
            return Err(EngineError::Validation(format!(
                "Hour {} is outside the booking window.",
                hour
            )));
        }

        Ok(BookingDraft {
            venue_id: venue_id.to_string(),
            court_id: court_id.to_string(),
            date,
            hour,
        })
    }

    /// Hour as the API's `HH:mm` start time, zero-padded: 6 -> "06:00".
    pub fn wire_start_time(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    pub fn into_request(self) -> CreateBookingRequest {
        let start_time = self.wire_start_time();
        CreateBookingRequest {
            venue_id: self.venue_id,
            court_id: self.court_id,
            date: self.date.format("%Y-%m-%d").to_string(),
            start_time,
        }
    }
}

/// Validate and submit a booking. Exactly one network write on the valid
/// path, none on a validation failure. On success the caller must re-fetch
/// the booking list and clear the selection; the server response is never
/// spliced into local state.
pub async fn submit_booking(
    api: &BookingApiService,
    venue_id: Option<&str>,
    court_id: Option<&str>,
    date: Option<NaiveDate>,
    hour: Option<u32>,
    session: &Session,
) -> EngineResult<()> {
    let draft = BookingDraft::from_selection(venue_id, court_id, date, hour)?;
    let request = draft.into_request();

    api.create_booking(&request, session.bearer_token()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};

    fn session() -> Session {
        Session::new(
            "tok-1".to_string(),
            User {
                id: "u1".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            },
            Role::User,
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 3).unwrap()
    }

    #[test]
    fn draft_requires_every_field() {
        let err = BookingDraft::from_selection(Some("v1"), None, Some(date()), Some(14))
            .unwrap_err();
        match err {
            EngineError::Validation(message) => {
                assert_eq!(message, "Please select a venue, court, date, and time.")
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn draft_rejects_out_of_window_hour() {
        let err = BookingDraft::from_selection(Some("v1"), Some("c1"), Some(date()), Some(23))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn wire_start_time_is_zero_padded() {
        let draft =
            BookingDraft::from_selection(Some("v1"), Some("c1"), Some(date()), Some(6)).unwrap();
        assert_eq!(draft.wire_start_time(), "06:00");

        let draft =
            BookingDraft::from_selection(Some("v1"), Some("c1"), Some(date()), Some(22)).unwrap();
        assert_eq!(draft.wire_start_time(), "22:00");
    }

    #[tokio::test]
    async fn validation_failure_makes_no_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bookings")
            .expect(0)
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let err = submit_booking(&api, Some("v1"), None, Some(date()), Some(14), &session())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn valid_submission_issues_one_write() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bookings")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "venueId": "v1",
                "courtId": "c1",
                "date": "2026-09-03",
                "startTime": "14:00"
            })))
            .with_status(201)
            .with_body(r#"{"message": "Booking created"}"#)
            .expect(1)
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        submit_booking(&api, Some("v1"), Some("c1"), Some(date()), Some(14), &session())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn forced_conflict_surfaces_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bookings")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Court 1 is already booked at 14:00."}"#)
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let err = submit_booking(&api, Some("v1"), Some("c1"), Some(date()), Some(14), &session())
            .await
            .unwrap_err();

        match err {
            EngineError::Rejected(message) => {
                assert_eq!(message, "Court 1 is already booked at 14:00.")
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }
}
