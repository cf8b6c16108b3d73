// Intent controller authentication
//
// Basic-auth token exchange. The token is kept on the client and sent as
// `X-Auth-Token` on every later request.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::SYSTEM_V1;
use super::client::IntentClient;
use super::models::TokenResponse;
use crate::error::{Error, preview};

impl IntentClient {
    /// Obtain a session token with username/password.
    ///
    /// `POST /dna/system/api/v1/auth/token` with HTTP basic auth. Any
    /// non-2xx status, an unparseable body, or a body without `Token` is an
    /// [`Error::Authentication`]. On success the token is stored on the
    /// client and also returned.
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.url(SYSTEM_V1, &["auth", "token"])?;
        debug!("requesting token at {url}");

        let resp = self
            .http()
            .post(url)
            .basic_auth(username, Some(password.expose_secret()))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let body = resp.text().await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Authentication {
                message: format!("malformed token response: {e}"),
            })?;
        let token = parsed
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "token response has no `Token` field".into(),
            })?;

        debug!("token obtained");
        let token = SecretString::from(token);
        self.set_token(token.clone());
        Ok(token)
    }
}
