// ── Core error types ──
//
// One variant per provisioning stage, plus polling timeouts and
// configuration problems. Malformed controller responses are folded into
// the stage that issued the call via `CoreError::wrap`; HTTP and
// connection failures keep their own variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Stage errors ─────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Deployment error: {message}")]
    Deployment { message: String },

    #[error("Device sync error: {message}")]
    Sync { message: String },

    /// A named thing (device, endpoint group) does not exist.
    #[error("{kind} not found: {name}")]
    Lookup { kind: &'static str, name: String },

    // ── Polling ──────────────────────────────────────────────────────
    #[error("Timed out waiting for {operation} after {attempts} attempts")]
    Timeout { operation: String, attempts: u32 },

    // ── Transport & API ──────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("API error from {endpoint} (HTTP {status}): {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },

    // ── Input & configuration ────────────────────────────────────────
    #[error("Invalid provisioning descriptor: {message}")]
    Descriptor { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Fold an API error into a stage error.
    ///
    /// A response that failed to parse becomes `stage` with `context`
    /// prepended. Everything else goes through `From`.
    pub fn wrap(
        stage: fn(String) -> Self,
        context: &str,
    ) -> impl FnOnce(netprov_api::Error) -> Self + '_ {
        move |err| match err {
            netprov_api::Error::Deserialization { .. } => stage(format!("{context}: {err}")),
            other => Self::from(other),
        }
    }

    /// Constructors usable as `fn(String) -> CoreError`.
    pub fn project(message: String) -> Self {
        Self::Project { message }
    }

    pub fn template(message: String) -> Self {
        Self::Template { message }
    }

    pub fn deployment(message: String) -> Self {
        Self::Deployment { message }
    }

    pub fn sync(message: String) -> Self {
        Self::Sync { message }
    }

    pub fn auth(message: String) -> Self {
        Self::Auth { message }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netprov_api::Error> for CoreError {
    fn from(err: netprov_api::Error) -> Self {
        match err {
            netprov_api::Error::Authentication { message } => CoreError::Auth { message },
            netprov_api::Error::NotAuthenticated => CoreError::Auth {
                message: "no session token -- authenticate first".into(),
            },
            netprov_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        endpoint: url,
                        status: e.status().map_or(0, |s| s.as_u16()),
                        body: e.to_string(),
                    }
                }
            }
            netprov_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            netprov_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            netprov_api::Error::Api {
                method,
                endpoint,
                status,
                body,
            } => CoreError::Api {
                endpoint: format!("{method} {endpoint}"),
                status,
                body,
            },
            netprov_api::Error::Deserialization {
                endpoint, message, ..
            } => CoreError::UnexpectedResponse { endpoint, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_http_errors_distinct() {
        let api = netprov_api::Error::Api {
            method: "GET",
            endpoint: "https://dnac/x".into(),
            status: 500,
            body: "boom".into(),
        };
        let err = CoreError::wrap(CoreError::template, "listing templates")(api);
        assert!(matches!(err, CoreError::Api { status: 500, .. }));
    }

    #[test]
    fn wrap_relabels_malformed_responses() {
        let api = netprov_api::Error::Deserialization {
            endpoint: "https://dnac/task".into(),
            message: "missing field `taskId`".into(),
            body: "{}".into(),
        };
        let err = CoreError::wrap(CoreError::project, "creating project")(api);
        match err {
            CoreError::Project { message } => {
                assert!(message.starts_with("creating project: "));
                assert!(message.contains("taskId"));
            }
            other => panic!("expected Project error, got: {other:?}"),
        }
    }
}
