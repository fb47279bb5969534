//! OAuth token state.
//!
//! The token has a dual-trigger lifecycle: proactive replacement when the
//! expiry safety margin is reached, and reactive replacement when the PSA
//! answers 401. Both triggers funnel through one explicit state type so
//! there is no ad hoc flag to get into an unbounded re-auth loop.

/// A token is treated as expired this long before its real expiry.
pub const EXPIRY_SAFETY_MARGIN_MS: i64 = 60_000;

/// Process-wide OAuth token owned by the PSA client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// No token has been issued yet (cold process, or dropped after a 401).
    NoToken,
    /// An issued bearer token with its real expiry (epoch milliseconds).
    Bearer { value: String, expires_at_ms: i64 },
}

/// Observed status of a [`TokenState`] at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Missing,
    Valid,
    Expired,
}

impl TokenState {
    /// Build from a token endpoint response (`expires_in` is seconds).
    pub fn from_response(access_token: String, expires_in_secs: i64, now_ms: i64) -> Self {
        Self::Bearer {
            value: access_token,
            expires_at_ms: now_ms + expires_in_secs * 1000,
        }
    }

    /// Status at `now_ms`, applying the safety margin.
    pub fn status(&self, now_ms: i64) -> TokenStatus {
        match self {
            Self::NoToken => TokenStatus::Missing,
            Self::Bearer { expires_at_ms, .. } => {
                if now_ms >= expires_at_ms - EXPIRY_SAFETY_MARGIN_MS {
                    TokenStatus::Expired
                } else {
                    TokenStatus::Valid
                }
            }
        }
    }

    /// The bearer value, if a token is held (valid or not).
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Self::NoToken => None,
            Self::Bearer { value, .. } => Some(value),
        }
    }
}
