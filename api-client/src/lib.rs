//! Typed HTTP façade over the Emar back-office REST API.
//!
//! Single point of network access: owns the CSRF token lifecycle, the
//! request/response envelope, the global loading indicator, and one
//! thin method per backend resource. No business logic lives here.
pub mod client;
pub mod csrf;
pub mod documents;
pub mod loading;
pub mod models;
pub mod resources;

pub use client::ApiClient;
pub use csrf::CsrfTokenStore;
pub use loading::{LoadingGuard, LoadingTracker};
