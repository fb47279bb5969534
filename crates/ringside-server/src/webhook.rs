//! Webhook-triggered cache invalidation.
//!
//! The PSA fires a webhook when a customer record changes; the handler
//! purges every cache row holding that customer so the next lookup refetches
//! fresh data. Unknown event types are acknowledged as no-ops so a PSA-side
//! event catalog change never breaks webhook delivery.

use std::sync::Arc;

use ringside_cache::CustomerCache;
use ringside_core::CoreError;
use serde::{Deserialize, Serialize};

/// Incoming webhook payload.
///
/// Fields default to empty so a malformed body reaches validation (and a
/// clean 400) instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub customer_id: String,
}

/// Outcome of a processed webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationReport {
    pub event_type: String,
    pub invalidated: usize,
}

/// Processes PSA webhook deliveries against the cache.
pub struct InvalidationHandler {
    cache: Arc<CustomerCache>,
    shared_secret: String,
}

impl InvalidationHandler {
    pub fn new(cache: Arc<CustomerCache>, shared_secret: String) -> Self {
        Self {
            cache,
            shared_secret,
        }
    }

    /// Handle one webhook delivery.
    ///
    /// The presented credential is checked before the cache is touched at
    /// all; then the payload is validated; then only `customer.updated`
    /// actually invalidates — every other well-formed event type is a
    /// successful no-op. Zero matched rows is a success, not an error.
    pub fn handle(
        &self,
        event: &WebhookEvent,
        presented_secret: Option<&str>,
    ) -> Result<InvalidationReport, CoreError> {
        if presented_secret != Some(self.shared_secret.as_str()) {
            tracing::warn!(event_type = %event.event_type, "webhook credential mismatch");
            return Err(CoreError::unauthorized("invalid webhook credential"));
        }

        if event.event_type.trim().is_empty() {
            return Err(CoreError::validation("event_type is required"));
        }
        if event.customer_id.trim().is_empty() {
            return Err(CoreError::validation("customer_id is required"));
        }

        let invalidated = match event.event_type.as_str() {
            "customer.updated" => self.invalidate_customer(&event.customer_id),
            other => {
                tracing::debug!(event_type = %other, "unhandled webhook event");
                0
            }
        };

        Ok(InvalidationReport {
            event_type: event.event_type.clone(),
            invalidated,
        })
    }

    fn invalidate_customer(&self, customer_id: &str) -> usize {
        let keys = self.cache.find_by_customer_id(customer_id);
        for key in &keys {
            self.cache.delete_by_key(key);
        }
        if keys.is_empty() {
            tracing::info!(customer_id = %customer_id, "no cache entries to invalidate");
        } else {
            tracing::info!(
                customer_id = %customer_id,
                count = keys.len(),
                "invalidated cache entries"
            );
        }
        keys.len()
    }
}
