//! Synchronous access to the game client's local API.
//!
//! Every component takes an `Arc<dyn Gateway>` in its constructor; nothing in
//! the crate reaches for a global client. `HttpGateway` is the production
//! implementation: blocking reqwest over HTTPS to `127.0.0.1`, basic auth with
//! the `riot` user, and a per-request timeout so an unresponsive client shows
//! up as a transport error instead of a hang.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::credentials::Credentials;
use crate::error::{DraftError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const AUTH_USER: &str = "riot";

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GatewayResponse
// ---------------------------------------------------------------------------

/// Status, raw body, and the body parsed as JSON when it is JSON.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: u16,
    pub text: String,
    pub json: Option<Value>,
}

impl GatewayResponse {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        let json = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        Self { status, text, json }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn status_in(&self, accepted: &[u16]) -> bool {
        accepted.contains(&self.status)
    }

    /// Decode the body into `T`, reporting `path` on failure.
    pub fn decode<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        serde_json::from_str(&self.text).map_err(|e| DraftError::MalformedResponse {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Turn a response whose status is not in `accepted` into an error.
    pub fn expect_status(self, accepted: &[u16], what: &str) -> Result<Self> {
        if self.status_in(accepted) {
            Ok(self)
        } else {
            Err(DraftError::UnexpectedStatus {
                what: what.to_string(),
                status: self.status,
                body: self.text.chars().take(300).collect(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

pub trait Gateway: Send + Sync {
    /// Issue one request. `Err` means no response was obtained at all
    /// (connection refused, timeout); any HTTP status is an `Ok`.
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<GatewayResponse>;

    fn get(&self, path: &str) -> Result<GatewayResponse> {
        self.request(Method::Get, path, None)
    }
}

// ---------------------------------------------------------------------------
// HttpGateway
// ---------------------------------------------------------------------------

pub struct HttpGateway {
    client: reqwest::blocking::Client,
    base_url: String,
    password: Option<String>,
}

impl HttpGateway {
    /// Build a gateway for `base_url` (e.g. `https://127.0.0.1:54321`).
    ///
    /// The client serves a self-signed certificate, so certificate
    /// validation is disabled; only loopback addresses are ever targeted.
    pub fn new(
        base_url: impl Into<String>,
        password: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            password,
        })
    }

    pub fn from_credentials(creds: &Credentials, timeout: Duration) -> Result<Self> {
        Self::new(creds.base_url(), Some(creds.password.clone()), timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(method: Method, path: &str, e: reqwest::Error) -> DraftError {
        let reason = if e.is_timeout() {
            "timed out".to_string()
        } else if e.is_connect() {
            "connection refused (is the client running?)".to_string()
        } else {
            e.to_string()
        };
        DraftError::Transport {
            method: method.as_str(),
            path: path.to_string(),
            reason,
        }
    }
}

impl Gateway for HttpGateway {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<GatewayResponse> {
        let url = format!("{}{}", self.base_url, path);
        let http_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut req = self
            .client
            .request(http_method, &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(password) = &self.password {
            req = req.basic_auth(AUTH_USER, Some(password));
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .map_err(|e| Self::transport_error(method, path, e))?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .map_err(|e| Self::transport_error(method, path, e))?;

        tracing::debug!(method = %method, path, status, "client api request");
        Ok(GatewayResponse::new(status, text))
    }
}
