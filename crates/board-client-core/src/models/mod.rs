//! Data models for the board API.
//!
//! - `LoginRequest`, `LoginResponse`, `RegisterRequest`, `Identity`: auth payloads
//! - `Post`, `PostDraft`, `Page`: board posts and paging
//! - `Comment`, `CommentDraft`: comments on a post

pub mod auth;
pub mod board;
pub mod comment;

pub use auth::{Identity, LoginRequest, LoginResponse, RegisterRequest};
pub use board::{Page, Post, PostDraft};
pub use comment::{Comment, CommentDraft};
