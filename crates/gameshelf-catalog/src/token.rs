//! Bearer token cache

use std::time::{Duration, Instant};

/// Lifecycle of the catalog access token
///
/// Deadlines are monotonic and already include the refresh margin, so a
/// token is considered expired slightly before the provider rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenState {
    /// No token requested yet
    #[default]
    Unset,
    /// Token usable until `deadline`
    ValidUntil { token: String, deadline: Instant },
    /// A token was held but its deadline has passed
    Expired,
}

impl TokenState {
    /// Cached token, if it is still usable at `now`
    pub fn current(&mut self, now: Instant) -> Option<&str> {
        let expired = matches!(self, TokenState::ValidUntil { deadline, .. } if now >= *deadline);
        if expired {
            *self = TokenState::Expired;
        }

        match self {
            TokenState::ValidUntil { token, .. } => Some(token.as_str()),
            _ => None,
        }
    }

    /// Record a freshly issued token
    pub fn store(&mut self, token: String, lifetime: Duration, margin: Duration, now: Instant) {
        let deadline = now + lifetime.saturating_sub(margin);
        *self = TokenState::ValidUntil { token, deadline };
    }
}
