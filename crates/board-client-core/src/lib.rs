//! Core library for the board client.
//!
//! Provides the API client for the board service (auth, posts, comments)
//! and the client-side session handling around it: token storage, request
//! authentication, global logout on rejected tokens, and the boot-time
//! session check.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, Endpoints};
pub use auth::{
    FileStorage, LoginSurface, MemoryStorage, RecordingSurface, SessionController, TabStorage,
    VerifyOutcome,
};
pub use config::Config;
