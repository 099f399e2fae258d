use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Authentication required. Please log in again.")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    /// Server-side rejection (conflict or validation) with the message the
    /// API returned. Surfaced verbatim to the user.
    #[error("{0}")]
    Rejected(String),

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from booking API: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error body shape the booking API uses for non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

impl EngineError {
    /// Map a non-success HTTP response into the engine taxonomy.
    ///
    /// 401 is always an authentication failure. Other statuses carry a JSON
    /// `{ "message": ... }` body which is surfaced verbatim; anything that
    /// does not parse degrades to a generic message carrying the status.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return EngineError::Unauthorized;
        }

        match response.json::<ApiErrorBody>().await {
            Ok(ApiErrorBody {
                message: Some(message),
            }) => EngineError::Rejected(message),
            _ => EngineError::UnexpectedResponse(format!("API error: {}", status)),
        }
    }

    /// The message shown to the user for this failure. Rejections keep the
    /// server's wording; transport problems get a stable generic message.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Transport(_) | EngineError::UnexpectedResponse(_) => {
                "Failed to reach the booking service. Please check the server.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, EngineError::Unauthorized)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
