// Intent controller HTTP client
//
// Wraps `reqwest::Client` with URL construction, token injection, and
// response decoding. Endpoint groups (projects, templates, deployment,
// inventory, tasks) are inherent methods in sibling files so this module
// stays focused on transport mechanics.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, preview};
use crate::transport::{TransportConfig, join_url};

/// Header carrying the session token on every call after login.
const TOKEN_HEADER: &str = "X-Auth-Token";

/// Raw HTTP client for the network intent controller.
///
/// Holds the session token obtained by [`authenticate`](Self::authenticate)
/// and sends it on every subsequent request. All methods return decoded
/// payloads; non-2xx responses surface as [`Error::Api`] with the endpoint,
/// status, and a body preview.
pub struct IntentClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl IntentClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the controller root (e.g. `https://10.1.3.230`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: None,
        }
    }

    /// Attach an already-issued session token.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    // ── URL builder ──────────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str, tail: &[&str]) -> Result<Url, Error> {
        join_url(&self.base_url, path, tail)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorized(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let token = self.token.as_ref().ok_or(Error::NotAuthenticated)?;
        let mut value = reqwest::header::HeaderValue::from_str(token.expose_secret())
            .map_err(|e| Error::Authentication {
                message: format!("token is not a valid header value: {e}"),
            })?;
        value.set_sensitive(true);
        Ok(builder.header(TOKEN_HEADER, value))
    }

    /// Send a GET request with optional query parameters.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={query:?}");
        let resp = self.authorized(self.http.get(url).query(query))?.send().await?;
        Self::decode("GET", resp).await.map(|(_, body)| body)
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.authorized(self.http.post(url).json(body))?.send().await?;
        Self::decode("POST", resp).await.map(|(_, body)| body)
    }

    /// Send a PUT request with a JSON body, keeping the HTTP status.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        body: &(impl Serialize + Sync),
    ) -> Result<(u16, T), Error> {
        debug!("PUT {url} params={query:?}");
        let resp = self
            .authorized(self.http.put(url).query(query).json(body))?
            .send()
            .await?;
        Self::decode("PUT", resp).await
    }

    /// Send a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {url}");
        let resp = self.authorized(self.http.delete(url))?.send().await?;
        Self::decode("DELETE", resp).await.map(|(_, body)| body)
    }

    // ── Response handling ────────────────────────────────────────────

    /// Check the status and decode the JSON body. An empty 2xx body
    /// decodes as JSON `null`.
    async fn decode<T: DeserializeOwned>(
        method: &'static str,
        resp: reqwest::Response,
    ) -> Result<(u16, T), Error> {
        let status = resp.status();
        let endpoint = resp.url().to_string();

        if status == StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!(
                    "{method} {endpoint} rejected the session token (HTTP 401): {}",
                    preview(&body)
                ),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                method,
                endpoint,
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let body = resp.text().await?;
        trace!(%endpoint, body = %preview(&body), "response body");
        let text = if body.trim().is_empty() { "null" } else { &body };
        let parsed = serde_json::from_str(text).map_err(|e| {
            let message = format!("{e} (body preview: {:?})", preview(&body));
            Error::Deserialization {
                endpoint,
                message,
                body: body.clone(),
            }
        })?;
        Ok((status.as_u16(), parsed))
    }
}
