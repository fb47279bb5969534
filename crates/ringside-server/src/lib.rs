//! # ringside-server
//!
//! The HTTP surface and orchestration layer: the lookup endpoint that
//! answers "who is calling", the PSA webhook endpoint that invalidates
//! stale cache entries, and the wiring (config, tracing, state) around
//! them.

pub mod config;
pub mod handlers;
pub mod lookup;
pub mod observability;
pub mod server;
pub mod webhook;

pub use config::{AppConfig, CacheConfig, LoggingConfig, PsaSettings, ServerConfig, WebhookConfig};
pub use lookup::LookupService;
pub use observability::{init_tracing, init_tracing_with_level};
pub use server::{AppState, build_app, run};
pub use webhook::{InvalidationHandler, InvalidationReport, WebhookEvent};
