use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, Court, Venue};
use crate::session::Session;

/// HTTP client for the remote booking REST API. All engine reads and the
/// single booking write go through here; the server stays the sole source of
/// truth for venue, court, and booking records.
#[derive(Debug, Clone)]
pub struct BookingApiService {
    client: Client,
    base_url: String,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub venue_id: String,
    pub court_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Zero-padded local start time, `HH:mm`.
    pub start_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    pub name: String,
    pub address: String,
    pub owner_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCourtRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct AddAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: crate::models::User,
    pub role: crate::models::Role,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl BookingApiService {
    pub fn new(config: &Config) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a service against an explicit base URL. Used by tests and by
    /// callers that resolve configuration themselves.
    pub fn with_base_url(base_url: impl Into<String>) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Read Methods
    // ========================================================================

    /// List all venues. Public endpoint, no token.
    pub async fn list_venues(&self) -> EngineResult<Vec<Venue>> {
        let response = self
            .client
            .get(format!("{}/venues", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        response
            .json::<Vec<Venue>>()
            .await
            .map_err(|e| EngineError::UnexpectedResponse(format!("venues list: {}", e)))
    }

    /// List courts under a venue. Public endpoint, no token.
    pub async fn list_courts(&self, venue_id: &str) -> EngineResult<Vec<Court>> {
        let response = self
            .client
            .get(format!(
                "{}/venues/{}/courts",
                self.base_url,
                urlencoding::encode(venue_id)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        response
            .json::<Vec<Court>>()
            .await
            .map_err(|e| EngineError::UnexpectedResponse(format!("courts list: {}", e)))
    }

    /// List bookings scoped to one venue and one calendar date. This scoping
    /// is what the conflict detector relies on downstream; it never filters
    /// by venue or date itself.
    pub async fn list_bookings(
        &self,
        venue_id: &str,
        date: NaiveDate,
        token: Option<&str>,
    ) -> EngineResult<Vec<Booking>> {
        let mut request = self.client.get(format!(
            "{}/bookings?venueId={}&date={}",
            self.base_url,
            urlencoding::encode(venue_id),
            date.format("%Y-%m-%d")
        ));

        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        response
            .json::<Vec<Booking>>()
            .await
            .map_err(|e| EngineError::UnexpectedResponse(format!("bookings list: {}", e)))
    }

    // ========================================================================
    // Write Methods
    // ========================================================================

    /// Create a booking. The response body is deliberately not merged into
    /// local state; callers re-fetch the booking list instead.
    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
        token: &str,
    ) -> EngineResult<()> {
        tracing::debug!(
            venue_id = %request.venue_id,
            court_id = %request.court_id,
            date = %request.date,
            start_time = %request.start_time,
            "Submitting booking"
        );

        let response = self
            .client
            .post(format!("{}/bookings", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        Ok(())
    }

    /// Create a venue (owner only).
    pub async fn create_venue(
        &self,
        request: &CreateVenueRequest,
        token: &str,
    ) -> EngineResult<()> {
        let response = self
            .client
            .post(format!("{}/venues", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        Ok(())
    }

    /// Create a court under a venue (owner or admin).
    pub async fn create_court(
        &self,
        venue_id: &str,
        request: &CreateCourtRequest,
        token: &str,
    ) -> EngineResult<()> {
        let response = self
            .client
            .post(format!(
                "{}/venues/{}/courts",
                self.base_url,
                urlencoding::encode(venue_id)
            ))
            .header("Authorization", format!("Bearer {}", token))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        Ok(())
    }

    /// Attach an admin user to a venue (owner only).
    pub async fn add_admin(
        &self,
        venue_id: &str,
        request: &AddAdminRequest,
        token: &str,
    ) -> EngineResult<()> {
        let response = self
            .client
            .post(format!(
                "{}/venues/{}/add-admin",
                self.base_url,
                urlencoding::encode(venue_id)
            ))
            .header("Authorization", format!("Bearer {}", token))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        Ok(())
    }

    // ========================================================================
    // Auth Collaborator Methods
    // ========================================================================

    /// Exchange credentials for a session with the external auth service.
    pub async fn login(&self, email: &str, password: &str) -> EngineResult<Session> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| EngineError::UnexpectedResponse(format!("login response: {}", e)))?;

        Ok(Session::new(login.token, login.user, login.role))
    }

    pub async fn register_user(&self, request: &RegisterRequest) -> EngineResult<()> {
        self.register("user", request).await
    }

    pub async fn register_owner(&self, request: &RegisterRequest) -> EngineResult<()> {
        self.register("owner", request).await
    }

    async fn register(&self, kind: &str, request: &RegisterRequest) -> EngineResult<()> {
        let response = self
            .client
            .post(format!("{}/auth/register/{}", self.base_url, kind))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> EngineResult<Option<String>> {
        let response = self
            .client
            .post(format!("{}/auth/forgot-password", self.base_url))
            .json(&ForgotPasswordRequest {
                email: email.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        let body: MessageResponse = response.json().await.unwrap_or(MessageResponse {
            message: None,
        });
        Ok(body.message)
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> EngineResult<()> {
        let response = self
            .client
            .post(format!("{}/auth/reset-password", self.base_url))
            .json(&ResetPasswordRequest {
                token: token.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::from_response(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn list_bookings_sends_scope_and_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bookings")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("venueId".into(), "v1".into()),
                mockito::Matcher::UrlEncoded("date".into(), "2026-09-03".into()),
            ]))
            .match_header("Authorization", "Bearer tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "_id": "b1",
                    "courtId": "c1",
                    "venueId": "v1",
                    "date": "2026-09-03",
                    "startTime": "2026-09-03T09:00:00Z",
                    "endTime": "2026-09-03T10:00:00Z"
                }]"#,
            )
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 9, 3).unwrap();
        let bookings = api.list_bookings("v1", date, Some("tok-1")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].court_id, "c1");
    }

    #[tokio::test]
    async fn create_booking_posts_wire_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bookings")
            .match_header("Authorization", "Bearer tok-1")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "venueId": "v1",
                "courtId": "c1",
                "date": "2026-09-03",
                "startTime": "06:00"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Booking created"}"#)
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let request = CreateBookingRequest {
            venue_id: "v1".to_string(),
            court_id: "c1".to_string(),
            date: "2026-09-03".to_string(),
            start_time: "06:00".to_string(),
        };

        api.create_booking(&request, "tok-1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejection_message_is_surfaced_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bookings")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "This slot is already booked."}"#)
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let request = CreateBookingRequest {
            venue_id: "v1".to_string(),
            court_id: "c1".to_string(),
            date: "2026-09-03".to_string(),
            start_time: "14:00".to_string(),
        };

        let err = api.create_booking(&request, "tok-1").await.unwrap_err();
        match err {
            EngineError::Rejected(message) => {
                assert_eq!(message, "This slot is already booked.")
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bookings")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "token expired"}"#)
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 9, 3).unwrap();
        let err = api.list_bookings("v1", date, None).await.unwrap_err();

        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn non_json_error_body_degrades_to_generic_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/venues")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let err = api.list_venues().await.unwrap_err();

        match err {
            EngineError::UnexpectedResponse(_) => {}
            other => panic!("expected UnexpectedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn login_yields_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "token": "tok-9",
                    "user": {"id": "u1", "name": "Alice", "email": "alice@example.com"},
                    "role": "owner"
                }"#,
            )
            .create_async()
            .await;

        let api = BookingApiService::with_base_url(server.url()).unwrap();
        let session = api.login("alice@example.com", "hunter2").await.unwrap();

        assert_eq!(session.token, "tok-9");
        assert_eq!(session.user.id, "u1");
        assert_eq!(session.role, crate::models::Role::Owner);
    }
}
