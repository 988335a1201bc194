//! Valegate - order, delivery-token and license lifecycle engine.
//!
//! The engine converts an externally-verified payment event into a
//! short-lived delivery token, and a delivery token into a durable,
//! device-limited license key. Everything is persisted through a flat
//! key-value store with per-key expiry; there are no transactions and no
//! secondary indexes, so every multi-step transition is written to be
//! idempotent and re-triggerable instead.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod kv;
pub mod middleware;
pub mod models;
pub mod store;
pub mod util;

pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::router;
pub use kv::Kv;
pub use store::AppState;
