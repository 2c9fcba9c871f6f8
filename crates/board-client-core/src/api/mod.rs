//! REST API client module for the board service.
//!
//! This module provides the `ApiClient` for registering, logging in, and
//! reading and writing posts and comments.
//!
//! Requests carry a JWT bearer token from the session store, and every
//! response is checked by the session guard before the caller sees it.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use endpoints::Endpoints;
pub use error::ApiError;
