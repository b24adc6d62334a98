//! # hrm-auth
//!
//! Client-side session management for the HRM API.
//!
//! This crate provides:
//! - Login, logout and refresh against the `/api/auth` endpoints
//! - Unverified decoding of access token claims and expiry checks
//! - The user identity and realm roles carried by the access token
//! - Persistent token storage
//! - Background renewal of the access token while a session is active
//!
//! ## Modules
//!
//! - [`config`] - Session configuration
//! - [`endpoint`] - HTTP client for the auth endpoints
//! - [`error`] - Error types
//! - [`identity`] - User identity, roles and role-gated areas
//! - [`session`] - The [`SessionManager`] context object
//! - [`storage`] - Token pair persistence
//! - [`token`] - Token types and claim decoding

pub mod config;
pub mod endpoint;
pub mod error;
pub mod identity;
pub mod session;
pub mod storage;
pub mod token;

pub use config::SessionConfig;
pub use error::{AuthError, ErrorCategory};
pub use identity::{Area, Role, UserIdentity};
pub use session::{AuthenticatedSession, SessionManager, SessionState};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{TokenClaims, TokenPair, TokenResponse, decode_claims, is_token_expired};
