//! Token exchange and revocation transport.
//!
//! This module provides:
//! - the fixed token and revocation endpoints
//! - [`TokenData`] - the raw token endpoint response
//! - the form-encoded JWT-bearer POST and the revocation GET
//! - proxy-aware HTTP client construction
//!
//! No retries and no timeouts live here; a single attempt is made and every
//! failure is surfaced to the caller.

use reqwest::{Client, Proxy};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::secret::Secret;

/// Token exchange endpoint.
pub const TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";

/// Token revocation endpoint.
pub const REVOKE_URL: &str = "https://accounts.google.com/o/oauth2/revoke";

/// Grant type identifier for the JWT-bearer exchange.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Raw token endpoint response.
///
/// Every field is optional: the endpoint is free to omit any of them and the
/// response is passed through rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenData {
    /// The issued bearer token.
    pub access_token: Option<Secret>,

    /// Token lifetime in seconds. Absent means the token never expires.
    pub expires_in: Option<i64>,

    /// Token type, usually `Bearer`.
    pub token_type: Option<String>,

    /// Refresh token, if the endpoint issued one.
    pub refresh_token: Option<Secret>,

    /// OpenID Connect identity token, if requested.
    pub id_token: Option<Secret>,
}

/// Structured OAuth error body.
#[derive(Debug, Deserialize)]
struct OauthErrorBody {
    error: String,
    error_description: Option<String>,
}

impl OauthErrorBody {
    fn message(self) -> String {
        match self.error_description {
            Some(description) => format!("{}: {}", self.error, description),
            None => self.error,
        }
    }
}

#[derive(Serialize)]
struct ExchangeForm<'a> {
    grant_type: &'a str,
    assertion: &'a str,
}

/// Build the client for one outbound request.
///
/// The proxy is decided per request: an explicit override wins, otherwise
/// `HTTPS_PROXY` / `https_proxy` from the process environment. Without a
/// proxy the client is built with ambient proxy detection disabled, so the
/// explicit check here is the only proxy behavior in play.
pub(crate) fn request_client(proxy: Option<&str>) -> Result<Client, TokenError> {
    let proxy_url = proxy.map(str::to_owned).or_else(proxy_from_env);

    let builder = match proxy_url {
        Some(url) => Client::builder().proxy(Proxy::all(&url)?),
        None => Client::builder().no_proxy(),
    };

    Ok(builder.build()?)
}

fn proxy_from_env() -> Option<String> {
    std::env::var("HTTPS_PROXY")
        .or_else(|_| std::env::var("https_proxy"))
        .ok()
}

/// POST the signed assertion to the token endpoint.
///
/// A non-2xx response carrying a structured OAuth `error` body becomes a
/// [`TokenError::Protocol`]; any other failure propagates as the underlying
/// transport error.
pub(crate) async fn request_token(
    client: &Client,
    token_url: &str,
    assertion: &str,
) -> Result<TokenData, TokenError> {
    let form = ExchangeForm {
        grant_type: JWT_BEARER_GRANT_TYPE,
        assertion,
    };

    let response = client.post(token_url).form(&form).send().await?;

    let status_error = response.error_for_status_ref().err();
    if let Some(status_error) = status_error {
        let body = response.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<OauthErrorBody>(&body) {
            Ok(oauth) => TokenError::Protocol {
                message: oauth.message(),
            },
            Err(_) => TokenError::Transport(status_error),
        });
    }

    Ok(response.json::<TokenData>().await?)
}

/// GET the revocation endpoint with the current token.
pub(crate) async fn revoke_token(
    client: &Client,
    revoke_url: &str,
    token: &str,
) -> Result<(), TokenError> {
    client
        .get(revoke_url)
        .query(&[("token", token)])
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}
