use ringside_core::Customer;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifetime of a negative ("confirmed not found") entry, in seconds.
///
/// Fixed and independent of the configured positive TTL: it bounds how long
/// a false "not found" can mask a customer created after the miss.
pub const NEGATIVE_TTL_SECS: i64 = 300;

/// A cached lookup result.
///
/// `customer_data = None` records a confirmed "not found" (negative entry).
/// The entry is logically present only while `now < expires_at`; the wire
/// field names follow the persisted cache record schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Cached customer, or `None` for a negative entry.
    pub customer_data: Option<Customer>,
    /// Logical expiry, epoch seconds.
    #[serde(rename = "ttl")]
    pub expires_at: i64,
    /// When the entry was written.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl CacheEntry {
    /// Create a positive entry expiring `ttl_seconds` from now.
    pub fn positive(customer: Customer, ttl_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            customer_data: Some(customer),
            expires_at: now.unix_timestamp() + ttl_seconds,
            last_updated: now,
        }
    }

    /// Create a negative entry with the fixed [`NEGATIVE_TTL_SECS`] lifetime.
    pub fn negative() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            customer_data: None,
            expires_at: now.unix_timestamp() + NEGATIVE_TTL_SECS,
            last_updated: now,
        }
    }

    /// Whether the entry is logically present at `now` (epoch seconds).
    pub fn is_live(&self, now: i64) -> bool {
        now < self.expires_at
    }

    /// Whether this entry records a confirmed "not found".
    pub fn is_negative(&self) -> bool {
        self.customer_data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringside_core::{CustomerPriority, CustomerStatus};

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: "Jane".to_string(),
            email: None,
            company: None,
            status: CustomerStatus::Active,
            priority: CustomerPriority::Normal,
        }
    }

    #[test]
    fn test_positive_entry_live_until_expiry() {
        let entry = CacheEntry::positive(customer("42"), 3600);
        let written = entry.last_updated.unix_timestamp();

        assert!(entry.is_live(written));
        assert!(entry.is_live(written + 3599));
        // Expiry boundary is exclusive: now == expires_at is already expired.
        assert!(!entry.is_live(written + 3600));
        assert!(!entry.is_live(written + 7200));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = CacheEntry::positive(customer("42"), 0);
        assert!(!entry.is_live(entry.last_updated.unix_timestamp()));
    }

    #[test]
    fn test_negative_entry_has_fixed_ttl() {
        let entry = CacheEntry::negative();
        assert!(entry.is_negative());
        assert_eq!(
            entry.expires_at - entry.last_updated.unix_timestamp(),
            NEGATIVE_TTL_SECS
        );
    }

    #[test]
    fn test_persisted_record_field_names() {
        let entry = CacheEntry::positive(customer("42"), 60);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("customerData").is_some());
        assert!(json.get("ttl").is_some());
        assert!(json.get("lastUpdated").is_some());

        let negative = serde_json::to_value(CacheEntry::negative()).unwrap();
        assert!(negative["customerData"].is_null());
    }
}
