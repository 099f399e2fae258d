use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

/// Authenticated context the engine consumes but does not own. Created from
/// a login response, cleared on logout or on a 401 from any API call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub role: Role,
}

impl Session {
    pub fn new(token: String, user: User, role: Role) -> Self {
        Session { token, user, role }
    }

    pub fn bearer_token(&self) -> &str {
        &self.token
    }
}

/// Bearer token for a request, if any. Unauthenticated reads (venue and court
/// listings) pass `None`.
pub fn token_of(session: Option<&Session>) -> Option<&str> {
    session.map(|s| s.token.as_str())
}
