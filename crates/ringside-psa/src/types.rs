//! Wire types for the PSA API.

use ringside_core::Customer;
use serde::{Deserialize, Serialize};

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Response from the customer search endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CustomersResponse {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// Input for creating a call-log ticket.
///
/// Produced by the call-logging collaborator at the end of a call; only the
/// phone number is mandatory, everything else falls back to the PSA's call
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub phone_number: String,
    pub customer_id: Option<String>,
    pub agent_id: Option<String>,
    pub transcript: Option<String>,
    pub category_id: Option<i64>,
    pub type_id: Option<i64>,
    pub status_id: Option<i64>,
    /// Call start, RFC 3339, as reported by the telephony platform.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Default ticket category for call logs.
const DEFAULT_CATEGORY_ID: i64 = 1;
/// Ticket type id for phone calls.
const DEFAULT_TYPE_ID: i64 = 26;
/// Ticket status id for "closed".
const DEFAULT_STATUS_ID: i64 = 29;

/// Body POSTed to the tickets endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct TicketRequest {
    pub summary: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub category_id: i64,
    pub type_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub status_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dateoccurred: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dateclosed: Option<String>,
}

impl From<&CallLog> for TicketRequest {
    fn from(call: &CallLog) -> Self {
        Self {
            summary: format!("Call from {}", call.phone_number),
            details: call
                .transcript
                .clone()
                .unwrap_or_else(|| "No transcript available".to_string()),
            customer_id: call.customer_id.clone(),
            category_id: call.category_id.unwrap_or(DEFAULT_CATEGORY_ID),
            type_id: call.type_id.unwrap_or(DEFAULT_TYPE_ID),
            agent_id: call.agent_id.clone(),
            status_id: call.status_id.unwrap_or(DEFAULT_STATUS_ID),
            dateoccurred: call.start_time.clone(),
            dateclosed: call.end_time.clone(),
        }
    }
}

/// A ticket as returned by the PSA.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub id: i64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status_id: Option<i64>,
}
