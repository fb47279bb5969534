use std::collections::HashSet;

use dashmap::DashMap;
use ringside_core::Customer;
use time::OffsetDateTime;

use crate::entry::CacheEntry;

/// In-process customer cache keyed by normalized phone number.
///
/// Alongside the main table a secondary index (customer id → set of keys)
/// is maintained on every positive write, so webhook invalidation resolves
/// in O(1) instead of a full-table scan. The scan remains as a fallback for
/// rows the index does not know about.
///
/// Each `get`/`put`/`delete` is atomic per key; there is no cross-key
/// transaction, so a lookup's read-then-write is not atomic as a unit. An
/// invalidation racing a concurrent lookup can therefore be overwritten
/// with stale data immediately afterwards; that window is bounded by the
/// entry TTL and accepted.
pub struct CustomerCache {
    table: DashMap<String, CacheEntry>,
    by_customer: DashMap<String, HashSet<String>>,
}

impl CustomerCache {
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
            by_customer: DashMap::new(),
        }
    }

    /// Get the entry for `key`, if one is logically present.
    ///
    /// Expired rows are invisible here but stay in the table until
    /// overwritten or deleted (lazy expiry). A storage failure would
    /// degrade to a miss; it never propagates to the caller.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let result = self
            .table
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value().clone());

        if result.is_some() {
            tracing::debug!(key = %key, "cache hit");
        } else {
            tracing::debug!(key = %key, "cache miss");
        }

        result
    }

    /// Overwrite `key` with a positive entry expiring `ttl_seconds` from now.
    ///
    /// A failed write is logged and dropped; losing a cache write degrades
    /// performance, not correctness.
    pub fn put_positive(&self, key: &str, customer: &Customer, ttl_seconds: i64) {
        let entry = CacheEntry::positive(customer.clone(), ttl_seconds);
        self.unindex(key);
        self.by_customer
            .entry(customer.id.clone())
            .or_default()
            .insert(key.to_string());
        self.table.insert(key.to_string(), entry);
        tracing::debug!(key = %key, customer_id = %customer.id, ttl_seconds, "cached customer");
    }

    /// Overwrite `key` with a negative entry (fixed 300 s lifetime).
    pub fn put_negative(&self, key: &str) {
        self.unindex(key);
        self.table.insert(key.to_string(), CacheEntry::negative());
        tracing::debug!(key = %key, "cached negative result");
    }

    /// Delete the row for `key`. Idempotent: an absent key is not an error.
    pub fn delete_by_key(&self, key: &str) {
        if self.table.remove(key).is_some() {
            tracing::debug!(key = %key, "cache entry deleted");
        }
        self.unindex(key);
    }

    /// Keys whose cached payload belongs to `customer_id`.
    ///
    /// Served from the secondary index when possible; otherwise falls back
    /// to a full-table scan on the embedded customer id. The scan is O(table
    /// size) and acceptable only while the table stays small — a scaling
    /// limit, not something to optimize away silently.
    pub fn find_by_customer_id(&self, customer_id: &str) -> Vec<String> {
        if let Some(keys) = self.by_customer.get(customer_id) {
            let matched: Vec<String> = keys
                .iter()
                .filter(|key| self.payload_matches(key.as_str(), customer_id))
                .cloned()
                .collect();
            if !matched.is_empty() {
                return matched;
            }
        }

        // Fallback scan for rows the index does not cover.
        self.table
            .iter()
            .filter(|row| {
                row.value()
                    .customer_data
                    .as_ref()
                    .is_some_and(|c| c.id == customer_id)
            })
            .map(|row| row.key().clone())
            .collect()
    }

    /// Number of physical rows, live or expired. For diagnostics and tests.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn payload_matches(&self, key: &str, customer_id: &str) -> bool {
        self.table.get(key).is_some_and(|entry| {
            entry
                .customer_data
                .as_ref()
                .is_some_and(|c| c.id == customer_id)
        })
    }

    /// Drop `key` from whichever index set currently holds it.
    fn unindex(&self, key: &str) {
        let previous_owner = self.table.get(key).and_then(|entry| {
            entry.customer_data.as_ref().map(|c| c.id.clone())
        });
        if let Some(customer_id) = previous_owner {
            if let Some(mut keys) = self.by_customer.get_mut(&customer_id) {
                keys.remove(key);
                let now_empty = keys.is_empty();
                drop(keys);
                if now_empty {
                    self.by_customer
                        .remove_if(&customer_id, |_, keys| keys.is_empty());
                }
            }
        }
    }
}

impl Default for CustomerCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringside_core::{CustomerPriority, CustomerStatus};

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            company: None,
            status: CustomerStatus::Active,
            priority: CustomerPriority::Normal,
        }
    }

    #[test]
    fn test_put_positive_then_get_returns_payload() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 3600);

        let entry = cache.get("+14155552671").expect("entry should be live");
        assert_eq!(entry.customer_data.unwrap().id, "42");
    }

    #[test]
    fn test_expired_entry_is_invisible_but_not_swept() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 0);

        assert!(cache.get("+14155552671").is_none());
        // Lazy expiry: the physical row remains until overwritten or deleted.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_negative_entry_is_a_fast_path_answer() {
        let cache = CustomerCache::new();
        cache.put_negative("+14155552671");

        let entry = cache.get("+14155552671").expect("negative entry is live");
        assert!(entry.is_negative());
    }

    #[test]
    fn test_negative_ttl_independent_of_positive_ttl() {
        let cache = CustomerCache::new();
        cache.put_negative("+14155552671");

        let entry = cache.get("+14155552671").unwrap();
        assert_eq!(
            entry.expires_at - entry.last_updated.unix_timestamp(),
            crate::NEGATIVE_TTL_SECS
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 3600);

        cache.delete_by_key("+14155552671");
        assert!(cache.get("+14155552671").is_none());
        // Absent key is not an error.
        cache.delete_by_key("+14155552671");
        cache.delete_by_key("never-existed");
    }

    #[test]
    fn test_find_by_customer_id_returns_all_matching_keys() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 3600);
        cache.put_positive("+61412345678", &customer("42", "Jane"), 3600);
        cache.put_positive("+15105550000", &customer("7", "Bob"), 3600);
        cache.put_negative("+12125550000");

        let mut keys = cache.find_by_customer_id("42");
        keys.sort();
        assert_eq!(keys, vec!["+14155552671", "+61412345678"]);
    }

    #[test]
    fn test_find_by_customer_id_zero_matches() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 3600);
        assert!(cache.find_by_customer_id("nope").is_empty());
    }

    #[test]
    fn test_overwrite_moves_index_membership() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 3600);
        // The number was reassigned to a different customer.
        cache.put_positive("+14155552671", &customer("7", "Bob"), 3600);

        assert!(cache.find_by_customer_id("42").is_empty());
        assert_eq!(cache.find_by_customer_id("7"), vec!["+14155552671"]);
    }

    #[test]
    fn test_negative_overwrite_clears_index_membership() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 3600);
        cache.put_negative("+14155552671");

        assert!(cache.find_by_customer_id("42").is_empty());
    }

    #[test]
    fn test_delete_cleans_index() {
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 3600);
        cache.delete_by_key("+14155552671");

        assert!(cache.find_by_customer_id("42").is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_scan_fallback_finds_expired_rows() {
        // Invalidation may legitimately target rows that are already
        // logically expired; the scan matches on the embedded id alone.
        let cache = CustomerCache::new();
        cache.put_positive("+14155552671", &customer("42", "Jane"), 0);

        assert!(cache.get("+14155552671").is_none());
        assert_eq!(cache.find_by_customer_id("42"), vec!["+14155552671"]);
    }
}
