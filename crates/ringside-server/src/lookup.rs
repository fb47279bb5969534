//! The customer lookup read path.

use std::sync::Arc;

use ringside_cache::CustomerCache;
use ringside_core::{CoreError, LookupOutcome, normalize};
use ringside_psa::CustomerSearch;

/// Coordinates normalization, cache and the PSA client into the read path.
///
/// There is no single-flight deduplication: two concurrent lookups for the
/// same number that both miss the cache will each call the PSA and each
/// write the cache. The writes are idempotent overwrites of the same key,
/// so this is wasteful but not incorrect, and it is accepted as such.
pub struct LookupService {
    cache: Arc<CustomerCache>,
    api: Arc<dyn CustomerSearch>,
    cache_ttl_seconds: i64,
}

impl LookupService {
    pub fn new(
        cache: Arc<CustomerCache>,
        api: Arc<dyn CustomerSearch>,
        cache_ttl_seconds: i64,
    ) -> Self {
        Self {
            cache,
            api,
            cache_ttl_seconds,
        }
    }

    /// Answer "who is this customer" for a raw phone string.
    ///
    /// A present cache entry — positive or negative — is returned without
    /// touching the PSA. On a miss the PSA is consulted and the answer
    /// (including "not found") is written back. System failures propagate
    /// and are never cached as negative results.
    pub async fn lookup(&self, raw_phone: &str) -> Result<LookupOutcome, CoreError> {
        if raw_phone.trim().is_empty() {
            return Err(CoreError::validation("No phone number provided"));
        }

        let key = normalize(raw_phone);
        tracing::debug!(key = %key, "looking up caller");

        if let Some(entry) = self.cache.get(&key) {
            return Ok(match entry.customer_data {
                Some(customer) => LookupOutcome::Found(customer),
                None => LookupOutcome::NotFound,
            });
        }

        match self.api.search_customer_by_phone(&key).await? {
            Some(customer) => {
                self.cache
                    .put_positive(&key, &customer, self.cache_ttl_seconds);
                tracing::info!(key = %key, customer_id = %customer.id, "caller identified");
                Ok(LookupOutcome::Found(customer))
            }
            None => {
                self.cache.put_negative(&key);
                tracing::info!(key = %key, "caller not found in PSA");
                Ok(LookupOutcome::NotFound)
            }
        }
    }
}
