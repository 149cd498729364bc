//! client-core: Shared infrastructure for the Emar back-office client crates.
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod messages;
pub mod notify;
pub mod observability;
pub mod retry;

pub use async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
