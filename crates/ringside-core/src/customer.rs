//! Customer domain types.
//!
//! The PSA system owns the customer record; Ringside holds a copy with
//! bounded staleness. Field names follow the PSA wire form.

use serde::{Deserialize, Serialize};

/// Account standing of a customer in the PSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
}

/// Support priority assigned to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerPriority {
    High,
    #[default]
    Normal,
    Low,
}

/// A customer record as returned by the PSA customer search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    pub priority: CustomerPriority,
}

/// Result of a customer lookup.
///
/// `NotFound` is a legitimate negative outcome, not a failure; system
/// failures travel as [`crate::CoreError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(Customer),
    NotFound,
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn customer(&self) -> Option<&Customer> {
        match self {
            Self::Found(c) => Some(c),
            Self::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer {
            id: "42".to_string(),
            name: "Jane Doe".to_string(),
            email: Some("jane@example.com".to_string()),
            company: Some("Acme Pty Ltd".to_string()),
            status: CustomerStatus::Active,
            priority: CustomerPriority::High,
        }
    }

    #[test]
    fn test_customer_serde_round_trip() {
        let customer = sample();
        let json = serde_json::to_string(&customer).unwrap();
        let back: Customer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, customer);
    }

    #[test]
    fn test_customer_deserializes_with_missing_optional_fields() {
        let customer: Customer = serde_json::from_str(r#"{"id":"7","name":"Bob"}"#).unwrap();
        assert_eq!(customer.id, "7");
        assert_eq!(customer.email, None);
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.priority, CustomerPriority::Normal);
    }

    #[test]
    fn test_status_wire_form_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&CustomerStatus::Inactive).unwrap(),
            r#""inactive""#
        );
        assert_eq!(
            serde_json::to_string(&CustomerPriority::High).unwrap(),
            r#""high""#
        );
    }

    #[test]
    fn test_lookup_outcome_accessors() {
        let found = LookupOutcome::Found(sample());
        assert!(found.is_found());
        assert_eq!(found.customer().unwrap().id, "42");

        let missing = LookupOutcome::NotFound;
        assert!(!missing.is_found());
        assert!(missing.customer().is_none());
    }
}
