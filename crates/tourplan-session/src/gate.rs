//! Authentication precondition wrapped around every itinerary mutator.

use std::sync::Arc;

use thiserror::Error;

use crate::identity::{Identity, IdentityProvider, IdentityState};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in first to create an itinerary.";

/// Why the gate declined an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// Identity is still resolving; declined without telling the user.
    #[error("identity is still resolving")]
    Resolving,
    /// No one is logged in; the user was asked to log in.
    #[error("login required")]
    Anonymous,
}

/// Surfaces the blocking "please log in" notice to the user.
pub trait LoginPrompt: Send + Sync {
    fn login_required(&self, message: &str);
}

/// Checks the current identity before a mutation is allowed through.
///
/// The gate holds no state of its own; it reads the provider on every call.
#[derive(Clone)]
pub struct AuthGate {
    identity: Arc<dyn IdentityProvider>,
    prompt: Arc<dyn LoginPrompt>,
}

impl AuthGate {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, prompt: Arc<dyn LoginPrompt>) -> Self {
        Self { identity, prompt }
    }

    #[must_use]
    pub fn current(&self) -> IdentityState {
        self.identity.current()
    }

    /// Returns the identity a mutation should run as.
    ///
    /// # Errors
    ///
    /// - [`AccessDenied::Resolving`] while identity is resolving; no notice.
    /// - [`AccessDenied::Anonymous`] when nobody is logged in, after showing
    ///   exactly one login notice.
    pub fn check(&self) -> Result<Identity, AccessDenied> {
        match self.identity.current() {
            IdentityState::Identified(identity) => Ok(identity),
            IdentityState::Resolving => {
                tracing::debug!("itinerary change declined while identity resolves");
                Err(AccessDenied::Resolving)
            }
            IdentityState::Anonymous => {
                self.prompt.login_required(LOGIN_REQUIRED_MESSAGE);
                Err(AccessDenied::Anonymous)
            }
        }
    }
}
