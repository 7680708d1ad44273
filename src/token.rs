//! Issued tokens and token state.
//!
//! This module provides:
//! - [`Token`] - an issued bearer token with its expiry instant
//! - [`TokenState`] - the tagged lifecycle state of a manager
//! - [`TokenSource`] - trait for anything that produces bearer tokens
//!
//! The token value and its expiry move together as one tagged state, so "a
//! token the endpoint issued without an expiry" and "no token at all" stay
//! distinguishable.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::TokenError;
use crate::exchange::TokenData;
use crate::secret::Secret;

/// An issued bearer token.
#[derive(Debug, Clone)]
pub struct Token {
    /// The bearer token value. The endpoint may omit it; the omission is
    /// passed through rather than rejected.
    pub access_token: Option<Secret>,

    /// Absolute expiry instant. `None` means the endpoint reported no
    /// lifetime and the token is treated as never expiring.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// True when this token can no longer be used.
    ///
    /// A token without a value is unusable; a token without an expiry never
    /// expires. `margin` shifts the comparison instant forward so callers
    /// can refresh ahead of the reported expiry.
    pub fn has_expired(&self, margin: Duration) -> bool {
        match (&self.access_token, self.expires_at) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(_), Some(expires_at)) => Utc::now() + margin >= expires_at,
        }
    }
}

/// Lifecycle state of a [`TokenManager`](crate::manager::TokenManager).
#[derive(Debug)]
pub(crate) enum TokenState {
    /// No token is held.
    Empty,

    /// The last exchange failed; reports expired.
    Failed,

    /// The last exchange succeeded.
    Issued { token: Token, data: TokenData },
}

impl TokenState {
    pub(crate) fn has_expired(&self, margin: Duration) -> bool {
        match self {
            TokenState::Issued { token, .. } => token.has_expired(margin),
            TokenState::Empty | TokenState::Failed => true,
        }
    }

    pub(crate) fn token(&self) -> Option<&Token> {
        match self {
            TokenState::Issued { token, .. } => Some(token),
            TokenState::Empty | TokenState::Failed => None,
        }
    }

    pub(crate) fn data(&self) -> Option<&TokenData> {
        match self {
            TokenState::Issued { data, .. } => Some(data),
            TokenState::Empty | TokenState::Failed => None,
        }
    }
}

/// Trait for anything that can produce a bearer token on demand.
///
/// [`TokenManager`](crate::manager::TokenManager) implements this; consumers
/// that only need tokens can accept any source.
///
/// # Example
///
/// ```rust,ignore
/// use tokenforge::{Token, TokenError, TokenSource};
///
/// async fn authorize(source: &mut impl TokenSource) -> Result<Token, TokenError> {
///     source.token().await
/// }
/// ```
#[async_trait]
pub trait TokenSource: Send {
    /// Get a usable token, fetching or refreshing as needed.
    async fn token(&mut self) -> Result<Token, TokenError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: Option<&str>, expires_at: Option<DateTime<Utc>>) -> Token {
        Token {
            access_token: value.map(Secret::new),
            expires_at,
        }
    }

    #[test]
    fn test_token_without_value_is_expired() {
        assert!(token(None, Some(Utc::now() + Duration::hours(1))).has_expired(Duration::zero()));
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        assert!(!token(Some("t"), None).has_expired(Duration::zero()));
    }

    #[test]
    fn test_token_expiry_comparison() {
        let valid = token(Some("t"), Some(Utc::now() + Duration::hours(1)));
        assert!(!valid.has_expired(Duration::zero()));

        let expired = token(Some("t"), Some(Utc::now() - Duration::hours(1)));
        assert!(expired.has_expired(Duration::zero()));
    }

    #[test]
    fn test_margin_shifts_expiry() {
        let soon = token(Some("t"), Some(Utc::now() + Duration::minutes(3)));
        assert!(!soon.has_expired(Duration::zero()));
        assert!(soon.has_expired(Duration::minutes(5)));
    }

    #[test]
    fn test_state_accessors() {
        let state = TokenState::Issued {
            token: token(Some("t"), None),
            data: TokenData::default(),
        };
        assert!(state.token().is_some());
        assert!(state.data().is_some());

        assert!(TokenState::Empty.token().is_none());
        assert!(TokenState::Failed.data().is_none());
    }

    #[test]
    fn test_empty_and_failed_report_expired() {
        assert!(TokenState::Empty.has_expired(Duration::zero()));
        assert!(TokenState::Failed.has_expired(Duration::zero()));
    }
}
