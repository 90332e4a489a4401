//! Observable store around the pure form engine.
//!
//! - [`FormStore`] — serializes transition requests against one form and
//!   publishes every new state over `tokio::sync::broadcast`.
//! - [`FormChange`] — the published envelope (revision, event, state).
//! - [`StoreConfig`] — environment-driven store settings.
//! - [`init_tracing`] — `tracing-subscriber` setup for hosts of the store.

pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::{FormChange, FormStore};
pub use telemetry::init_tracing;
