//! Identity as seen by the itinerary: who is logged in, if anyone yet.

use tokio::sync::watch;

/// An authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: String,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Identity resolution as reported by the external identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentityState {
    /// Still resolving the session (startup).
    #[default]
    Resolving,
    Anonymous,
    Identified(Identity),
}

impl IdentityState {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            IdentityState::Identified(identity) => Some(identity),
            IdentityState::Resolving | IdentityState::Anonymous => None,
        }
    }

    /// Builds `Identified` for a non-blank id and `Anonymous` otherwise.
    #[must_use]
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        match user_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => IdentityState::Identified(Identity::new(id)),
            None => IdentityState::Anonymous,
        }
    }
}

/// Read access to the current identity state.
pub trait IdentityProvider: Send + Sync {
    fn current(&self) -> IdentityState;
}

/// Identity provider backed by a `tokio::sync::watch` channel.
///
/// The owner publishes transitions with [`WatchIdentity::set`]; the session
/// subscribes to reload on every change.
#[derive(Debug)]
pub struct WatchIdentity {
    tx: watch::Sender<IdentityState>,
}

impl WatchIdentity {
    #[must_use]
    pub fn new(initial: IdentityState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Publishes a new identity state. Setting the same state again is ignored.
    pub fn set(&self, state: IdentityState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.tx.subscribe()
    }
}

impl IdentityProvider for WatchIdentity {
    fn current(&self) -> IdentityState {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_user_id_treats_blank_as_anonymous() {
        assert_eq!(IdentityState::from_user_id(None), IdentityState::Anonymous);
        assert_eq!(
            IdentityState::from_user_id(Some("  ")),
            IdentityState::Anonymous
        );
        assert_eq!(
            IdentityState::from_user_id(Some("u1")),
            IdentityState::Identified(Identity::new("u1"))
        );
    }

    #[test]
    fn watch_identity_reports_latest_state() {
        let provider = WatchIdentity::new(IdentityState::Resolving);
        assert_eq!(provider.current(), IdentityState::Resolving);
        provider.set(IdentityState::Identified(Identity::new("u1")));
        assert_eq!(
            provider.current().identity().map(|i| i.id.as_str()),
            Some("u1")
        );
    }

    #[test]
    fn setting_same_state_does_not_notify() {
        let provider = WatchIdentity::new(IdentityState::Anonymous);
        let mut rx = provider.subscribe();
        rx.mark_unchanged();
        provider.set(IdentityState::Anonymous);
        assert!(!rx.has_changed().unwrap());
        provider.set(IdentityState::Identified(Identity::new("u1")));
        assert!(rx.has_changed().unwrap());
    }
}
