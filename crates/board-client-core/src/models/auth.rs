use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    // Some backends answer with "accessToken" or "jwt"
    #[serde(alias = "accessToken", alias = "jwt")]
    pub token: String,
}

/// Registration takes the same fields as login
pub type RegisterRequest = LoginRequest;

/// Response of the identity probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    #[serde(alias = "name", alias = "sub")]
    pub username: String,
}

impl Identity {
    /// Parse the probe body. Servers answer with either a JSON object or the
    /// bare username as text.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            username: body.trim().trim_matches('"').to_string(),
        })
    }
}
