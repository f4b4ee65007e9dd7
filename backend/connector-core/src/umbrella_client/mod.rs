//! Authenticated client for the Umbrella admin API.
//!
//! # Token lifecycle
//! - No token at construction
//! - Acquired on first use via `POST /auth/v2/token` with basic auth
//! - Replaced wholesale when a 403 triggers a forced refresh
//! - Held in memory only, never logged
//!
//! # Retries
//! Every request, the token call included, goes through `RetryPolicy`: 429
//! waits and retries, 403 refreshes the token then waits and retries. A 403
//! on the token call itself is final. Anything else is returned raw for the
//! facade to classify.

pub mod retry;

use crate::error::{ClientError, ConnectorError, RawFailure};
use crate::umbrella_client::retry::{RetryDecision, RetryPolicy};
use crate::{CONNECTOR_USER_AGENT, ConnectorConfig};

use common::{HttpStatusCode, RedactedSecret};
use models::TokenResponse;

use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::sleep as TokioSleep;
use url::Url;

const APPLICATION_JSON: &str = "application/json";
const TOKEN_PATH: &[&str] = &["auth", "v2", "token"];
const USERS_PATH: &[&str] = &["admin", "v2", "users"];
const ROLES_PATH: &[&str] = &["admin", "v2", "roles"];
const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";

/// Credentials attached to an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// API key and secret, only for the token call.
    Basic,
    Bearer,
}

enum Sent {
    Done(Response),
    /// The wait is already over; the caller refreshes and sends again.
    RefreshToken,
}

/// Retry budget shared by every send of one logical call, refreshes included.
struct Attempts {
    backoff: Constant,
    retries: u32,
}

impl Attempts {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            backoff: policy.backoff(),
            retries: 0,
        }
    }
}

pub struct UmbrellaClient {
    base_url: Url,
    api_key: RedactedSecret,
    key_secret: RedactedSecret,
    page_size: u32,
    http: Client,
    token: Mutex<Option<RedactedSecret>>,
    retry_policy: RetryPolicy,
}

impl UmbrellaClient {
    #[track_caller]
    pub fn new(config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(CONNECTOR_USER_AGENT)
            .build()
            .map_err(|e| ConnectorError::generic("Failed to build HTTP client").with_source(e))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            key_secret: config.key_secret.clone(),
            page_size: config.page_size,
            http,
            token: Mutex::new(None),
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Make sure a bearer token is held.
    ///
    /// Without `force` this is a no-op once a token exists. With `force` the
    /// held token is replaced unconditionally.
    pub async fn ensure_token(&self, force: bool) -> Result<(), ClientError> {
        let mut token = self.token.lock().await;
        if token.is_some() && !force {
            return Ok(());
        }

        if force {
            info!("Forcing access token refresh");
        } else {
            debug!("No access token held, requesting one");
        }

        let fresh = self.fetch_token().await?;
        *token = Some(fresh);
        Ok(())
    }

    /// The token call runs under the same retry policy as every other call,
    /// except that a 403 gives up: the caller already holds the token lock,
    /// and a refresh from here would only ask again with the same credentials.
    async fn fetch_token(&self) -> Result<RedactedSecret, ClientError> {
        let url = self.endpoint(TOKEN_PATH, &[])?;
        let mut attempts = Attempts::new(&self.retry_policy);
        let Sent::Done(response) = self
            .send_with_retry(&Method::POST, &url, None, Auth::Basic, &mut attempts)
            .await?
        else {
            return Err(ConnectorError::generic("Token endpoint asked for a token refresh").into());
        };

        let body = read_body(response).await?;
        let token: TokenResponse = if body.is_null() {
            TokenResponse::default()
        } else {
            serde_json::from_value(body).map_err(|e| {
                ConnectorError::invalid_response("Unreadable response for token generation.")
                    .with_source(e)
            })?
        };

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!("Received access token ({} chars)", access_token.len());
                Ok(RedactedSecret::new(access_token))
            }
            _ => Err(ConnectorError::invalid_response("Found empty response for token generation.").into()),
        }
    }

    async fn authorize(&self, request: RequestBuilder, auth: Auth) -> RequestBuilder {
        match auth {
            Auth::Basic => request.basic_auth(self.api_key.expose(), Some(self.key_secret.expose())),
            // Read the token held right now, so a retry after a refresh goes
            // out with the new one.
            Auth::Bearer => match self.token.lock().await.as_ref() {
                Some(token) => request.bearer_auth(token.expose()),
                None => request,
            },
        }
    }

    /// Send one API call under the retry policy and return its JSON body
    /// (`Value::Null` for an empty body).
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        self.ensure_token(false).await?;
        let mut attempts = Attempts::new(&self.retry_policy);

        loop {
            match self
                .send_with_retry(&method, &url, body, Auth::Bearer, &mut attempts)
                .await?
            {
                Sent::Done(response) => return read_body(response).await,
                Sent::RefreshToken => self.ensure_token(true).await?,
            }
        }
    }

    /// Send until success, until the policy gives up, or until a 403 asks for
    /// a new token. Never refreshes by itself: `ensure_token` reaches this
    /// through `fetch_token`.
    async fn send_with_retry(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&Value>,
        auth: Auth,
        attempts: &mut Attempts,
    ) -> Result<Sent, ClientError> {
        loop {
            debug!("Executing endpoint: {method} : {url}");

            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = self
                .authorize(request, auth)
                .await
                .send()
                .await
                .map_err(RawFailure::from)?;

            let status = HttpStatusCode::from(response.status());
            if status.is_success() {
                return Ok(Sent::Done(response));
            }

            let decision = match self.retry_policy.decide(status, attempts.retries) {
                RetryDecision::Retry { refresh_token: true } if auth == Auth::Basic => {
                    RetryDecision::GiveUp
                }
                decision => decision,
            };

            match decision {
                RetryDecision::GiveUp => {
                    debug!("Giving up on {method} {url} with status {status}");
                    return Err(RawFailure::from_response(response).await.into());
                }
                RetryDecision::Retry { refresh_token } => {
                    attempts.retries += 1;
                    let delay = attempts
                        .backoff
                        .next_backoff()
                        .unwrap_or(self.retry_policy.delay());
                    warn!(
                        "{method} {url} returned {status}, retry {}/{} in {}",
                        attempts.retries,
                        self.retry_policy.max_retries(),
                        format_delay(delay)
                    );

                    TokioSleep(delay).await;
                    if refresh_token {
                        return Ok(Sent::RefreshToken);
                    }
                }
            }
        }
    }

    pub async fn test_connection(&self) -> Result<(), ClientError> {
        self.ensure_token(false).await
    }

    pub async fn read_account(&self, identity: &str) -> Result<Value, ClientError> {
        self.ensure_token(false).await?;
        let url = self.endpoint(&user_path(identity), &[])?;
        self.request(Method::GET, url, None).await
    }

    /// One page of users. `limit` defaults to the configured page size.
    pub async fn list_users(&self, page: u32, limit: Option<u32>) -> Result<Value, ClientError> {
        self.ensure_token(false).await?;
        let limit = limit.unwrap_or(self.page_size);
        let url = self.endpoint(
            USERS_PATH,
            &[(PAGE_PARAM, page.to_string()), (LIMIT_PARAM, limit.to_string())],
        )?;
        self.request(Method::GET, url, None).await
    }

    pub async fn list_entitlements(&self) -> Result<Value, ClientError> {
        self.ensure_token(false).await?;
        let url = self.endpoint(ROLES_PATH, &[])?;
        self.request(Method::GET, url, None).await
    }

    pub async fn delete_user(&self, identity: &str) -> Result<Value, ClientError> {
        self.ensure_token(false).await?;
        let url = self.endpoint(&user_path(identity), &[])?;
        self.request(Method::DELETE, url, None).await
    }

    pub async fn add_user(&self, payload: &Value) -> Result<Value, ClientError> {
        self.ensure_token(false).await?;
        let url = self.endpoint(USERS_PATH, &[])?;
        self.request(Method::POST, url, Some(payload)).await
    }

    /// Base URL with `segments` as the path (each one percent-encoded) and
    /// `query` appended.
    #[track_caller]
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ConnectorError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConnectorError::invalid_configuration(format!(
                    "Base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .clear()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }
}

fn user_path(identity: &str) -> Vec<&str> {
    let mut path = USERS_PATH.to_vec();
    path.push(identity);
    path
}

/// Response body as JSON; empty bodies (e.g. DELETE) become `Value::Null`.
async fn read_body(response: Response) -> Result<Value, ClientError> {
    let text = response.text().await.map_err(RawFailure::from)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| {
        ConnectorError::invalid_response(format!("Response is not valid JSON: {e}"))
            .with_source(e)
            .into()
    })
}

fn format_delay(delay: Duration) -> String {
    format!("{}ms", delay.as_millis())
}
