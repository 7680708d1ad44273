//! Token lifecycle management.
//!
//! [`TokenManager`] orchestrates the full JWT-bearer acquisition cycle:
//! credential resolution, assertion signing, the exchange POST, expiry
//! tracking, and revocation-with-reset.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokenforge::{TokenConfig, TokenManager};
//!
//! async fn fetch() -> Result<(), tokenforge::TokenError> {
//!     let config = TokenConfig::new()
//!         .with_key_file("service-account.json")
//!         .with_scopes(["https://www.googleapis.com/auth/drive.readonly"]);
//!
//!     let mut manager = TokenManager::new(config);
//!     let token = manager.token().await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::assertion;
use crate::config::TokenConfig;
use crate::credentials;
use crate::error::TokenError;
use crate::exchange::{self, REVOKE_URL, TOKEN_URL, TokenData};
use crate::secret::Secret;
use crate::token::{Token, TokenSource, TokenState};

/// Manages one service account's bearer token.
///
/// The manager owns its state exclusively; every public operation takes
/// `&mut self` and suspends only at the credential file read and the
/// outbound network call. Nothing here de-duplicates concurrent refreshes:
/// callers sharing a manager across tasks must add their own mutual
/// exclusion.
pub struct TokenManager {
    original: TokenConfig,
    active: TokenConfig,
    state: TokenState,
    token_url: String,
    revoke_url: String,
}

impl TokenManager {
    /// Create a manager from construction-time configuration.
    pub fn new(config: TokenConfig) -> Self {
        Self {
            original: config.clone(),
            active: config,
            state: TokenState::Empty,
            token_url: TOKEN_URL.to_string(),
            revoke_url: REVOKE_URL.to_string(),
        }
    }

    /// Override the token endpoint.
    ///
    /// The override also becomes the `aud` claim of signed assertions. Meant
    /// for tests and private deployments; endpoint overrides survive the
    /// configuration reset performed by revocation.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the revocation endpoint.
    pub fn with_revoke_url(mut self, url: impl Into<String>) -> Self {
        self.revoke_url = url.into();
        self
    }

    /// True when no usable token is held.
    ///
    /// A freshly constructed manager reports expired. A token issued without
    /// a reported lifetime never expires.
    pub fn has_expired(&self) -> bool {
        self.state.has_expired(self.active.expiry_margin)
    }

    /// Absolute expiry instant of the current token, when one was reported.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.token().and_then(|token| token.expires_at)
    }

    /// Raw response of the last successful exchange.
    pub fn token_data(&self) -> Option<&TokenData> {
        self.state.data()
    }

    /// Replace the configuration wholesale and drop any cached token.
    ///
    /// Also used internally after a successful revocation to restore the
    /// construction-time parameters, including key material that was adopted
    /// from a key file.
    pub fn configure(&mut self, config: TokenConfig) {
        self.original = config.clone();
        self.active = config;
        self.state = TokenState::Empty;
    }

    /// Get a usable bearer token.
    ///
    /// While the cached token is valid this returns it without any I/O.
    /// Otherwise credentials are resolved if needed and a fresh exchange is
    /// performed.
    pub async fn token(&mut self) -> Result<Token, TokenError> {
        if !self.has_expired() {
            if let Some(token) = self.state.token() {
                tracing::debug!("using cached access token");
                return Ok(token.clone());
            }
        }

        self.refresh().await
    }

    /// Fetch a fresh token regardless of the cached state.
    pub async fn refresh(&mut self) -> Result<Token, TokenError> {
        let key = self.ensure_key().await?;
        self.exchange(&key).await
    }

    /// Revoke the current token and reset to the original configuration.
    ///
    /// Fails without a network call when no token is held. A failed
    /// revocation leaves the cached token and configuration untouched; only
    /// a successful one resets the manager.
    pub async fn revoke_token(&mut self) -> Result<(), TokenError> {
        let token = match self.state.token().and_then(|t| t.access_token.clone()) {
            Some(token) => token,
            None => return Err(TokenError::NoTokenToRevoke),
        };

        let client = exchange::request_client(self.active.proxy.as_deref())?;
        exchange::revoke_token(&client, &self.revoke_url, token.expose()).await?;

        tracing::info!("access token revoked, restoring original configuration");
        let original = self.original.clone();
        self.configure(original);
        Ok(())
    }

    /// Adopt key material into the active configuration, resolving the key
    /// file when no raw key is present.
    ///
    /// A JSON key file also supplies the issuer when the configuration lacks
    /// one; key files without an email require a configured issuer.
    async fn ensure_key(&mut self) -> Result<Secret, TokenError> {
        if let Some(key) = &self.active.key {
            return Ok(key.clone());
        }

        let path = match &self.active.key_file {
            Some(path) => path.clone(),
            None => return Err(TokenError::MissingKey),
        };

        tracing::debug!("resolving credentials from {}", path.display());
        let resolved = credentials::resolve(&path).await?;

        self.active.key = Some(resolved.private_key.clone());
        if self.active.issuer.is_none() {
            self.active.issuer = resolved.client_email;
        }
        if self.active.issuer.is_none() {
            return Err(TokenError::MissingIssuer);
        }

        Ok(resolved.private_key)
    }

    /// Sign an assertion and exchange it for a bearer token.
    ///
    /// A successful exchange replaces the token state wholesale; a failed
    /// one clears it, so a stale token never survives a failed refresh.
    async fn exchange(&mut self, key: &Secret) -> Result<Token, TokenError> {
        let issued_at = Utc::now().timestamp();
        let assertion = assertion::sign(&self.active, key, &self.token_url, issued_at)?;

        let client = exchange::request_client(self.active.proxy.as_deref())?;
        match exchange::request_token(&client, &self.token_url, &assertion).await {
            Ok(data) => {
                let token = Token {
                    access_token: data.access_token.clone(),
                    expires_at: data
                        .expires_in
                        .and_then(|secs| DateTime::from_timestamp(issued_at + secs, 0)),
                };

                tracing::info!("issued new access token");
                self.state = TokenState::Issued {
                    token: token.clone(),
                    data,
                };
                Ok(token)
            }
            Err(error) => {
                tracing::error!("token exchange failed: {}", error);
                self.state = TokenState::Failed;
                Err(error)
            }
        }
    }
}

#[async_trait]
impl TokenSource for TokenManager {
    async fn token(&mut self) -> Result<Token, TokenError> {
        TokenManager::token(self).await
    }
}
