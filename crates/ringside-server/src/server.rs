use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use ringside_cache::CustomerCache;
use ringside_psa::{CustomerSearch, PsaClient};
use ringside_secrets::{EnvSecrets, SecretsProvider};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers;
use crate::lookup::LookupService;
use crate::webhook::InvalidationHandler;

/// Shared application state behind the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CustomerCache>,
    pub lookup: Arc<LookupService>,
    pub invalidation: Arc<InvalidationHandler>,
}

impl AppState {
    /// Wire up the services around an API client.
    ///
    /// The client comes in through the [`CustomerSearch`] seam so tests can
    /// substitute a spy or a client pointed at a mock server.
    pub fn new(config: &AppConfig, api: Arc<dyn CustomerSearch>) -> Self {
        let cache = Arc::new(CustomerCache::new());
        let lookup = Arc::new(LookupService::new(
            Arc::clone(&cache),
            api,
            config.cache.ttl_seconds,
        ));
        let invalidation = Arc::new(InvalidationHandler::new(
            Arc::clone(&cache),
            config.webhook.shared_secret.clone(),
        ));
        Self {
            cache,
            lookup,
            invalidation,
        }
    }
}

/// Build the axum application.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/lookup", post(handlers::lookup))
        .route("/webhooks/psa", post(handlers::psa_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until ctrl-c.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let secrets = Arc::new(SecretsProvider::new(Arc::new(EnvSecrets)));
    let api = Arc::new(PsaClient::new(secrets, config.psa.client_options()));
    let state = AppState::new(&config, api);
    let app = build_app(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Ringside listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
