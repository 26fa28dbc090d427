//! Remote persistence for itineraries.
//!
//! [`ItineraryRemote`] is the seam the session layer talks to;
//! [`SafetyApiClient`] implements it over the safety API's HTTP routes.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::SafetyApiClient;
pub use error::RemoteError;
pub use types::{RemoteItinerary, SavePayload};

/// Read, save and clear operations on the remote itinerary record of one user.
#[async_trait]
pub trait ItineraryRemote: Send + Sync {
    /// Fetches the saved itinerary for `user_id`.
    ///
    /// Returns [`RemoteError::NotFound`] when the user has never saved one.
    async fn fetch(&self, user_id: &str) -> Result<RemoteItinerary, RemoteError>;

    /// Replaces the saved itinerary with `payload` in one request.
    async fn save(&self, payload: &SavePayload) -> Result<(), RemoteError>;

    /// Deletes the saved itinerary for `user_id`, if any.
    async fn clear(&self, user_id: &str) -> Result<(), RemoteError>;
}
