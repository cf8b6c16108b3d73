// Policy controller HTTP client
//
// Every request carries HTTP basic auth; there is no session. Lookups map
// 404 to `None` because ERS uses it for "no such name".

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, preview};
use crate::transport::{TransportConfig, join_url};

/// Raw HTTP client for the policy controller's ERS API.
pub struct PolicyClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
}

impl PolicyClient {
    /// Build from credentials and a transport config.
    ///
    /// Pins `Accept: application/json` as a default header; ERS answers
    /// XML otherwise.
    pub fn new(
        base_url: Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = transport.build_client_with_headers(headers)?;
        Ok(Self::with_client(http, base_url, username, password))
    }

    /// Wrap an existing `reqwest::Client`. Requests carry whatever default
    /// headers `http` was built with.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str, tail: &[&str]) -> Result<Url, Error> {
        join_url(&self.base_url, path, tail)
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// GET a resource; 404 yields `Ok(None)`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, Error> {
        debug!("GET {url}");
        let resp = self.with_auth(self.http.get(url)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check("GET", resp).await?;
        let endpoint = resp.url().to_string();
        let body = resp.text().await?;
        serde_json::from_str(&body).map(Some).map_err(|e| {
            let message = format!("{e} (body preview: {:?})", preview(&body));
            Error::Deserialization {
                endpoint,
                message,
                body: body.clone(),
            }
        })
    }

    /// POST a JSON body; returns the raw status (ERS answers 201 with no body).
    pub(crate) async fn post_status<B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<u16, Error> {
        debug!("POST {url}");
        let resp = self.with_auth(self.http.post(url).json(body)).send().await?;
        Ok(Self::check("POST", resp).await?.status().as_u16())
    }

    /// PUT a JSON body; returns the raw status.
    pub(crate) async fn put_status<B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<u16, Error> {
        debug!("PUT {url}");
        let resp = self.with_auth(self.http.put(url).json(body)).send().await?;
        Ok(Self::check("PUT", resp).await?.status().as_u16())
    }

    // ── Response handling ────────────────────────────────────────────

    async fn check(
        method: &'static str,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let endpoint = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: format!("{method} {endpoint} rejected the credentials (HTTP 401)"),
            });
        }
        Err(Error::Api {
            method,
            endpoint,
            status: status.as_u16(),
            body: preview(&body),
        })
    }
}
