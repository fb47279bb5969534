use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use reqwest::StatusCode;
use ringside_core::Customer;
use ringside_secrets::{SecretBundle, SecretsProvider};
use time::OffsetDateTime;

use crate::error::PsaError;
use crate::token::{TokenState, TokenStatus};
use crate::types::{CustomersResponse, TicketRequest, TokenResponse};
use crate::{CallLog, CustomerSearch, Ticket};

/// Tuning knobs for [`PsaClient`].
#[derive(Debug, Clone)]
pub struct PsaClientOptions {
    /// Total attempts per call, transient failures included.
    pub max_retries: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// First backoff delay; doubles per retry.
    pub backoff_base: Duration,
}

impl Default for PsaClientOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout: Duration::from_millis(5000),
            backoff_base: Duration::from_millis(100),
        }
    }
}

/// Client for the PSA API.
///
/// Holds the process-wide OAuth token in an `ArcSwap`: concurrent requests
/// that observe an expired token may each authenticate, and the later
/// success simply overwrites the earlier one. That handful of redundant
/// token calls is tolerated rather than serialized.
pub struct PsaClient {
    http: reqwest::Client,
    secrets: Arc<SecretsProvider>,
    token: ArcSwap<TokenState>,
    max_retries: u32,
    backoff_base: Duration,
}

impl PsaClient {
    pub fn new(secrets: Arc<SecretsProvider>, options: PsaClientOptions) -> Self {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            secrets,
            token: ArcSwap::from_pointee(TokenState::NoToken),
            max_retries: options.max_retries.max(1),
            backoff_base: options.backoff_base,
        }
    }

    /// Create a call-log ticket in the PSA.
    ///
    /// Same auth and retry behavior as the search; not on the lookup hot
    /// path (the call-logging collaborator invokes it after a call ends).
    pub async fn create_call_log(&self, call: &CallLog) -> Result<Ticket, PsaError> {
        let body = serde_json::to_value(TicketRequest::from(call))
            .map_err(|e| PsaError::invalid_response(format!("ticket body: {e}")))?;

        let resp = self
            .execute(|http, bundle, _token| {
                http.post(format!("{}/Tickets", api_base(bundle))).json(&body)
            })
            .await?;

        let status = resp.status().as_u16();
        resp.json::<Ticket>()
            .await
            .map_err(|e| PsaError::invalid_response(format!("ticket response (HTTP {status}): {e}")))
    }

    /// POST the client-credentials grant and store the fresh token.
    async fn authenticate(&self, bundle: &SecretBundle) -> Result<String, PsaError> {
        let resp = self
            .http
            .post(format!("{}/auth/token", api_base(bundle)))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", bundle.client_id.as_str()),
                ("client_secret", bundle.client_secret.as_str()),
                ("scope", "all"),
            ])
            .send()
            .await
            .map_err(classify_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "token endpoint rejected authentication");
            return Err(PsaError::authentication(format!(
                "token endpoint returned HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let token_resp: TokenResponse = resp
            .json()
            .await
            .map_err(|e| PsaError::invalid_response(format!("token response: {e}")))?;

        let state = TokenState::from_response(
            token_resp.access_token.clone(),
            token_resp.expires_in,
            now_ms(),
        );
        self.token.store(Arc::new(state));
        tracing::debug!(expires_in = token_resp.expires_in, "authenticated with PSA");
        Ok(token_resp.access_token)
    }

    /// A bearer token usable right now, authenticating if needed.
    async fn current_token(&self, bundle: &SecretBundle) -> Result<String, PsaError> {
        let state = self.token.load();
        match state.status(now_ms()) {
            TokenStatus::Valid => Ok(state
                .bearer()
                .map(str::to_string)
                .unwrap_or_default()),
            TokenStatus::Missing | TokenStatus::Expired => self.authenticate(bundle).await,
        }
    }

    /// Send a request with the auth and retry policy applied.
    ///
    /// Transient failures (transport errors, HTTP 429) retry with
    /// exponential backoff up to `max_retries` total attempts. A 401 marks
    /// the token expired and replays the request exactly once after
    /// re-authenticating; a second 401 propagates. Any other non-success
    /// status fails immediately.
    async fn execute<F>(&self, build: F) -> Result<reqwest::Response, PsaError>
    where
        F: Fn(&reqwest::Client, &SecretBundle, &str) -> reqwest::RequestBuilder,
    {
        let bundle = self.secrets.get_secrets().await?;
        let mut attempt: u32 = 1;
        let mut reauthed = false;

        loop {
            let token = self.current_token(&bundle).await?;
            let request = build(&self.http, &bundle, &token)
                .bearer_auth(&token)
                .header("X-Tenant", bundle.tenant_id.as_str());

            match request.send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status == StatusCode::UNAUTHORIZED {
                        if reauthed {
                            return Err(PsaError::authentication(
                                "PSA rejected credentials after re-authentication",
                            ));
                        }
                        // Reactive refresh: drop the token, re-auth, replay
                        // once. Does not consume the backoff budget.
                        tracing::debug!("401 from PSA, re-authenticating");
                        reauthed = true;
                        self.token.store(Arc::new(TokenState::NoToken));
                        continue;
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if attempt >= self.max_retries {
                            return Err(PsaError::api(
                                429,
                                format!("rate limited after {attempt} attempts"),
                            ));
                        }
                        tracing::warn!(attempt, "PSA rate limited request, backing off");
                        self.backoff(attempt).await;
                        attempt += 1;
                        continue;
                    }

                    if !status.is_success() {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(PsaError::api(status.as_u16(), body));
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(classify_transport(e));
                    }
                    tracing::warn!(attempt, error = %e, "PSA request failed, backing off");
                    self.backoff(attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn backoff(&self, attempt: u32) {
        let delay = self.backoff_base * 2u32.saturating_pow(attempt - 1);
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl CustomerSearch for PsaClient {
    async fn search_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, PsaError> {
        let resp = self
            .execute(|http, bundle, _token| {
                http.get(format!("{}/Customers", api_base(bundle))).query(&[
                    ("search", phone),
                    ("searchtype", "phone"),
                    ("count", "1"),
                ])
            })
            .await?;

        let body: CustomersResponse = resp
            .json()
            .await
            .map_err(|e| PsaError::invalid_response(format!("customer search response: {e}")))?;

        Ok(body.customers.into_iter().next())
    }
}

fn api_base(bundle: &SecretBundle) -> &str {
    bundle.api_base_url.trim_end_matches('/')
}

fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

fn classify_transport(e: reqwest::Error) -> PsaError {
    if e.is_timeout() {
        PsaError::timeout(e.to_string())
    } else {
        PsaError::network(e.to_string())
    }
}
