//! # ringside-secrets
//!
//! Fetches and short-term caches the credential bundle needed to call the
//! PSA API. The backing store is abstracted behind [`SecretsSource`]; the
//! default source reads environment variables.
//!
//! Successful fetches are cached process-wide for a fixed 5-minute window,
//! independent of the OAuth token lifecycle. The cached bundle lives in an
//! `ArcSwap`: readers are lock-free, and two callers racing a cold or
//! expired cache may both fetch, last writer wins. That duplication is
//! tolerated rather than serialized.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

/// How long a fetched bundle stays fresh.
const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// The credential bundle needed to reach the PSA API.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBundle {
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl std::fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBundle")
            .field("api_base_url", &self.api_base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Errors from credential-bundle resolution.
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Secrets fetch failed: {0}")]
    FetchFailed(String),

    #[error("Missing secret: {0}")]
    Missing(String),
}

impl SecretsError {
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed(message.into())
    }

    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing(name.into())
    }
}

/// A backing store that can produce the credential bundle.
///
/// Implementations must be thread-safe; the provider may call `fetch`
/// concurrently from racing requests.
#[async_trait]
pub trait SecretsSource: Send + Sync {
    async fn fetch(&self) -> Result<SecretBundle, SecretsError>;
}

/// Source reading the bundle from `RINGSIDE_PSA_*` environment variables.
pub struct EnvSecrets;

impl EnvSecrets {
    fn var(name: &str) -> Result<String, SecretsError> {
        match std::env::var(name) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(SecretsError::missing(name)),
        }
    }
}

#[async_trait]
impl SecretsSource for EnvSecrets {
    async fn fetch(&self) -> Result<SecretBundle, SecretsError> {
        Ok(SecretBundle {
            api_base_url: Self::var("RINGSIDE_PSA_BASE_URL")?,
            client_id: Self::var("RINGSIDE_PSA_CLIENT_ID")?,
            client_secret: Self::var("RINGSIDE_PSA_CLIENT_SECRET")?,
            tenant_id: Self::var("RINGSIDE_PSA_TENANT_ID")?,
        })
    }
}

struct CachedBundle {
    bundle: SecretBundle,
    fetched_at: OffsetDateTime,
}

/// Caching facade over a [`SecretsSource`].
pub struct SecretsProvider {
    source: Arc<dyn SecretsSource>,
    cached: ArcSwapOption<CachedBundle>,
    window: Duration,
}

impl SecretsProvider {
    pub fn new(source: Arc<dyn SecretsSource>) -> Self {
        Self {
            source,
            cached: ArcSwapOption::empty(),
            window: FRESHNESS_WINDOW,
        }
    }

    /// Override the freshness window. Test seam only.
    #[doc(hidden)]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Resolve the credential bundle.
    ///
    /// Returns the cached bundle while it is inside the freshness window;
    /// otherwise fetches from the source and replaces the cache. A fetch
    /// failure fails the call — a stale bundle is not served past the
    /// window.
    pub async fn get_secrets(&self) -> Result<SecretBundle, SecretsError> {
        let now = OffsetDateTime::now_utc();
        if let Some(cached) = self.cached.load_full() {
            let age = now - cached.fetched_at;
            if age.whole_milliseconds() < self.window.as_millis() as i128 {
                return Ok(cached.bundle.clone());
            }
        }

        let bundle = self.source.fetch().await.map_err(|e| {
            tracing::warn!(error = %e, "credential bundle fetch failed");
            e
        })?;
        self.cached.store(Some(Arc::new(CachedBundle {
            bundle: bundle.clone(),
            fetched_at: now,
        })));
        tracing::debug!("credential bundle refreshed");
        Ok(bundle)
    }
}
