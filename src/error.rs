//! Top-level error type for token lifecycle operations.

use thiserror::Error;

use crate::assertion::AssertionError;
use crate::credentials::CredentialError;

/// Error type covering the whole token lifecycle.
///
/// Configuration problems (`MissingKey`, `MissingIssuer`) are surfaced
/// before any I/O happens; nothing in this crate retries internally.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Neither raw key material nor a key file was configured.
    #[error("no key or key file configured")]
    MissingKey,

    /// No issuer was configured and the key file did not carry one.
    #[error("email is required")]
    MissingIssuer,

    /// Credential resolution failed.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// Assertion signing failed.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// The HTTP transport failed, or the endpoint answered with an
    /// unstructured error.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a structured OAuth error.
    #[error("{message}")]
    Protocol {
        /// `<error>[: <error_description>]` as reported by the endpoint.
        message: String,
    },

    /// Revocation was requested while no token is held.
    #[error("no token to revoke")]
    NoTokenToRevoke,
}
