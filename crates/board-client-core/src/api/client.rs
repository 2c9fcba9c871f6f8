//! API client for communicating with the board REST API.
//!
//! All calls share one pipeline: build the request, attach the session's
//! bearer token (unless the call is part of the login flow), send it, let the
//! session guard look at the outcome, then check the status and decode.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{ResponseOutcome, SessionController, VerifyOutcome};
use crate::models::{
    Comment, CommentDraft, Identity, LoginRequest, LoginResponse, Page, Post, PostDraft,
    RegisterRequest,
};

use super::{ApiError, Endpoints};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Also bounds how long the startup session check can stay pending.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Whether a call carries the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Session,
    /// Login and registration never send a token
    Anonymous,
}

/// API client for the board service.
/// Clone is cheap - the reqwest client and the session are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: Endpoints,
    session: Arc<SessionController>,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str, session: Arc<SessionController>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoints: Endpoints::new(base_url),
            session,
        })
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Run the boot-time session check
    pub async fn verify_on_start(&self) -> VerifyOutcome {
        self.session.verify_on_start(self).await
    }

    // ===== Pipeline =====

    /// Send one request through the session guard.
    /// The guard sees every outcome first; errors still reach the caller.
    async fn execute(&self, builder: RequestBuilder, auth: Auth) -> Result<Response> {
        let builder = match auth {
            Auth::Session => builder.headers(self.session.authenticator().auth_headers()),
            Auth::Anonymous => builder,
        };
        let request = builder.build().context("Failed to build request")?;
        let url = request.url().to_string();
        let had_authorization = request.headers().contains_key(header::AUTHORIZATION);
        let method = request.method().clone();

        debug!(%method, url = %url, authenticated = had_authorization, "Sending request");
        let result = self.client.execute(request).await;

        let status = match &result {
            Ok(response) => Some(response.status()),
            Err(e) => e.status(),
        };
        self.session
            .guard()
            .inspect(&ResponseOutcome::new(url.as_str(), status, had_authorization));

        result
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send {} request to {}", method, url))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Send with the rate-limit backoff, returning the successful response
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        auth: Auth,
    ) -> Result<Response> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let mut builder = self.client.request(method.clone(), url);
            if let Some(body) = body {
                builder = builder.json(body);
            }
            let response = self.execute(builder, auth).await?;

            if response.status() != reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Self::check_response(response).await;
            }

            retries += 1;
            if retries > MAX_RATE_LIMIT_RETRIES {
                return Err(ApiError::RateLimited.into());
            }
            warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            backoff_ms *= 2; // Exponential backoff
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(Method::GET, url, None, Auth::Session).await?;
        Self::decode(response, url).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let body = Self::to_body(body)?;
        let response = self.send(Method::POST, url, Some(&body), Auth::Session).await?;
        Self::decode(response, url).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let body = Self::to_body(body)?;
        let response = self.send(Method::PUT, url, Some(&body), Auth::Session).await?;
        Self::decode(response, url).await
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.send(Method::DELETE, url, None, Auth::Session).await?;
        Ok(())
    }

    fn to_body<B: Serialize>(body: &B) -> Result<Value> {
        serde_json::to_value(body).context("Failed to serialize request body")
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Auth =====

    /// Log in and start a session with the returned token
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = self.endpoints.login();
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = Self::to_body(&body)?;
        let response = self
            .send(Method::POST, &url, Some(&body), Auth::Anonymous)
            .await
            .context("Login failed")?;
        let login: LoginResponse = Self::decode(response, &url).await?;

        self.session.on_login_success(&login.token);
        debug!(username = username, "Logged in");
        Ok(())
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let url = self.endpoints.register();
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = Self::to_body(&body)?;
        self.send(Method::POST, &url, Some(&body), Auth::Anonymous)
            .await
            .context("Registration failed")?;
        Ok(())
    }

    /// Identity probe: who the server thinks the current token belongs to
    pub async fn me(&self) -> Result<Identity> {
        let url = self.endpoints.me();
        let response = self.send(Method::GET, &url, None, Auth::Session).await?;
        let text = response
            .text()
            .await
            .context("Failed to read identity response")?;
        Ok(Identity::from_body(&text))
    }

    // ===== Board =====

    /// Fetch one page of posts (zero-based)
    pub async fn list_posts(&self, page: u32) -> Result<Page<Post>> {
        self.get(&self.endpoints.board_list(page)).await
    }

    pub async fn get_post(&self, id: i64) -> Result<Post> {
        self.get(&self.endpoints.post(id)).await
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post> {
        self.post(&self.endpoints.board(), draft).await
    }

    pub async fn update_post(&self, id: i64, draft: &PostDraft) -> Result<Post> {
        self.put(&self.endpoints.post(id), draft).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<()> {
        self.delete(&self.endpoints.post(id)).await
    }

    // ===== Comments =====

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.get(&self.endpoints.post_comments(post_id)).await
    }

    pub async fn create_comment(&self, post_id: i64, draft: &CommentDraft) -> Result<Comment> {
        self.post(&self.endpoints.post_comments(post_id), draft).await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
        self.delete(&self.endpoints.comment(comment_id)).await
    }
}
