//! # ringside-psa
//!
//! Client for the PSA (ticketing) API. Owns the OAuth client-credentials
//! token lifecycle and the retry policy; exposes the two operations the
//! rest of the system needs: customer search by phone and call-log
//! (ticket) creation.

mod client;
mod error;
mod token;
mod types;

use async_trait::async_trait;
use ringside_core::Customer;

pub use client::{PsaClient, PsaClientOptions};
pub use error::PsaError;
pub use token::{TokenState, TokenStatus};
pub use types::{CallLog, Ticket};

/// Customer search seam.
///
/// The lookup orchestrator depends on this trait rather than on
/// [`PsaClient`] directly, so tests can substitute a spy client.
#[async_trait]
pub trait CustomerSearch: Send + Sync {
    /// Search the PSA for a customer by (normalized) phone number.
    ///
    /// Returns the first match, or `None` for a legitimate "not found".
    async fn search_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, PsaError>;
}
