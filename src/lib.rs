//! # Tokenforge
//!
//! Service account bearer tokens via the OAuth 2.0 JWT-bearer grant.
//!
//! This crate provides:
//! - [`TokenManager`] - token lifecycle: acquire, cache, refresh, revoke
//! - [`TokenConfig`] - construction-time configuration with builder methods
//! - [`Credentials`] and key-file resolution (JSON, PEM, PKCS#12)
//! - [`TokenSource`] - trait for consumers that only need bearer tokens
//!
//! A manager signs an RS256 assertion from the configured service account
//! identity, exchanges it at the token endpoint, and caches the resulting
//! bearer token until its reported expiry. Expired tokens are refreshed
//! transparently on the next request; revocation invalidates the token
//! remotely and resets the manager to its construction-time configuration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tokenforge::{TokenConfig, TokenManager};
//!
//! # async fn example() -> Result<(), tokenforge::TokenError> {
//! let config = TokenConfig::new()
//!     .with_key_file("service-account.json")
//!     .with_scopes(["https://www.googleapis.com/auth/drive.readonly"]);
//!
//! let mut manager = TokenManager::new(config);
//! let token = manager.token().await?;
//! if let Some(access) = &token.access_token {
//!     println!("Authorization: Bearer {}", access.expose());
//! }
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod config;
pub mod credentials;
pub mod error;
pub mod exchange;
pub mod manager;
pub mod secret;
pub mod token;

#[cfg(feature = "pkcs12")]
pub mod pkcs12;

// Re-export commonly used types at crate root
pub use config::TokenConfig;

pub use credentials::{
    CredentialError,
    Credentials,
    KeyFormat,
    resolve,
};

pub use assertion::{ASSERTION_LIFETIME_SECS, AssertionError};

pub use exchange::{JWT_BEARER_GRANT_TYPE, REVOKE_URL, TOKEN_URL, TokenData};

pub use manager::TokenManager;

pub use secret::Secret;

pub use token::{Token, TokenSource};

pub use error::TokenError;

#[cfg(feature = "pkcs12")]
pub use pkcs12::Pkcs12Decoder;
