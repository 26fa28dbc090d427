//! Wire shapes for the safety API's itinerary routes.

use serde::{Deserialize, Deserializer, Serialize};
use tourplan_core::ItineraryItem;

/// Body returned by `GET /api/itinerary/{user_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItinerary {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<ItineraryItem>,
    #[serde(default)]
    pub trip_note: Option<String>,
}

/// Body sent to `POST /api/itinerary/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    pub user_id: String,
    pub items: Vec<ItineraryItem>,
    pub trip_note: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ItineraryItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ItineraryItem>>::deserialize(deserializer)?.unwrap_or_default())
}
