//! Per-identity itinerary session.
//!
//! Wraps the in-memory [`tourplan_core::ItineraryStore`] with an
//! authentication gate and a persistence bridge to an
//! [`tourplan_remote::ItineraryRemote`]. Construct one
//! [`ItinerarySession`] per running front end and pass it to whatever needs
//! it.

pub mod bridge;
pub mod gate;
pub mod identity;
pub mod session;

pub use bridge::{LoadOutcome, RemoteOp};
pub use gate::{AccessDenied, AuthGate, LoginPrompt, LOGIN_REQUIRED_MESSAGE};
pub use identity::{Identity, IdentityProvider, IdentityState, WatchIdentity};
pub use session::{ItinerarySession, DEFAULT_SAVED_FLASH};
