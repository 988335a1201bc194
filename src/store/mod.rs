//! Entity repositories over the flat key-value store, one module per
//! namespace, plus the lifecycle transitions that span them.
//!
//! Each repository serializes whole records as JSON under its own
//! namespace; relationships are denormalized copies, never references.
//! A future move to a transactional store only has to touch this layer.

pub mod licenses;
pub mod lifecycle;
pub mod orders;
pub mod tokens;

use crate::config::Config;
use crate::kv::Kv;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub kv: Kv,
    pub base_url: String,
    pub admin_secret: Option<String>,
    pub webhook_secret: Option<String>,
    pub license_key_prefix: String,
}

impl AppState {
    pub fn new(kv: Kv, config: &Config) -> Self {
        Self {
            kv,
            base_url: config.base_url.clone(),
            admin_secret: config.admin_secret.clone(),
            webhook_secret: config.webhook_secret.clone(),
            license_key_prefix: config.license_key_prefix.clone(),
        }
    }
}
