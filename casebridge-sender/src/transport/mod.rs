//! Authenticated JSON client shared by the service clients
//!
//! Every request goes through [`with_backoff`]. A first 403 from a
//! token-authenticated service renews the token and resends once; a second
//! consecutive 403 is returned to the caller as an HTTP status error.

pub mod backoff;

pub use backoff::{with_backoff, BackoffPolicy};

use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("casebridge/", env!("CARGO_PKG_VERSION"));

/// Transport-level errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Redirect error: {0}")]
    Redirect(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request error: {0}")]
    Request(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

impl TransportError {
    /// Connection failures, timeouts and redirect loops are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Connection(_) | TransportError::Timeout(_) | TransportError::Redirect(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_redirect() {
            TransportError::Redirect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// How a service authenticates requests
#[derive(Debug, Clone)]
pub enum Authenticator {
    /// Exchange credentials for a token at `endpoint` and send it as
    /// `Authorization: <scheme> <token>`
    Token {
        endpoint: String,
        scheme: String,
        user: String,
        password: String,
    },
    /// Static headers sent with every request
    Headers(Vec<(String, String)>),
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Authenticator,
    token: RwLock<Option<String>>,
    backoff: BackoffPolicy,
}

impl RestClient {
    pub fn new(
        base_url: &str,
        auth: Authenticator,
        backoff: BackoffPolicy,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            auth,
            token: RwLock::new(None),
            backoff,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        self.request_json(Method::GET, endpoint, query, None).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_body(body)?;
        self.request_json(Method::POST, endpoint, &[], Some(&body)).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_body(body)?;
        self.request_json(Method::PATCH, endpoint, &[], Some(&body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<(), TransportError> {
        let _: Value = self.request_json(Method::DELETE, endpoint, &[], None).await?;
        Ok(())
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, TransportError> {
        let url = self.endpoint_url(endpoint)?;
        debug!(method = %method, url = %url, "Sending request");

        let value = with_backoff(&self.backoff, || {
            self.send_with_renewal(method.clone(), url.clone(), query, body)
        })
        .await?;

        serde_json::from_value(value).map_err(|e| TransportError::Parse(e.to_string()))
    }

    async fn send_with_renewal(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        match self.send_once(method.clone(), url.clone(), query, body).await {
            Err(TransportError::Status { status: 403, body: reason })
                if matches!(self.auth, Authenticator::Token { .. }) =>
            {
                warn!(url = %url, reason = %reason, "Access denied, renewing token");
                self.renew_token().await?;
                self.send_once(method, url, query, body).await
            }
            other => other,
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let mut request = self.http.request(method, url).query(query);

        match &self.auth {
            Authenticator::Token { scheme, .. } => {
                let token = self.current_token().await?;
                let value = format!("{} {}", scheme, token);
                request = request.header(reqwest::header::AUTHORIZATION, value);
            }
            Authenticator::Headers(headers) => {
                for (name, value) in headers {
                    request = request.header(name.as_str(), value.as_str());
                }
            }
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() || status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Parse(e.to_string()))
    }

    async fn current_token(&self) -> Result<String, TransportError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }
        self.renew_token().await
    }

    async fn renew_token(&self) -> Result<String, TransportError> {
        let Authenticator::Token {
            endpoint,
            user,
            password,
            ..
        } = &self.auth
        else {
            return Err(TransportError::Auth(
                "service does not use token authentication".to_string(),
            ));
        };

        let url = self.endpoint_url(endpoint)?;
        let response = self
            .http
            .post(url)
            .json(&TokenRequest {
                username: user,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Auth(format!(
                "token request rejected with HTTP {}",
                status.as_u16()
            )));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| TransportError::Auth(format!("malformed token response: {}", e)))?
            .token;

        info!(service = %self.base_url, "Obtained access token");
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| TransportError::Request(format!("invalid endpoint {}: {}", endpoint, e)))
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, TransportError> {
    let mut normalised = base_url.trim().to_string();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }
    Url::parse(&normalised)
        .map_err(|e| TransportError::Request(format!("invalid base URL {}: {}", base_url, e)))
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, TransportError> {
    serde_json::to_value(body).map_err(|e| TransportError::Request(e.to_string()))
}
