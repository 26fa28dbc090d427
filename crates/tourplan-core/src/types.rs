//! Itinerary data model.
//!
//! [`ItineraryItem`] is stored and exchanged as a camelCase JSON object whose
//! `id` is the composite key `"{type}:{entityId}"`. The `*Ref` types are the
//! minimal shapes entity providers hand to the store when adding a stop.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Day assigned to newly added items and to wire items with no usable day.
pub const DEFAULT_DAY: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    State,
    City,
    Place,
}

impl ItemType {
    /// Builds the composite key `"{type}:{entity_id}"`.
    #[must_use]
    pub fn composite_key(self, entity_id: &str) -> String {
        format!("{self}:{entity_id}")
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::State => write!(f, "state"),
            ItemType::City => write!(f, "city"),
            ItemType::Place => write!(f, "place"),
        }
    }
}

/// A single planned stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Display labels captured when the item was added. Allowed to go stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    #[serde(default = "default_day", deserialize_with = "deserialize_day")]
    pub day: u32,
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ItineraryItem {
    /// Creates a bare item of `item_type` for `entity_id` on the default day.
    #[must_use]
    pub fn new(item_type: ItemType, entity_id: &str) -> Self {
        let mut item = Self {
            id: item_type.composite_key(entity_id),
            item_type,
            state_id: None,
            city_id: None,
            place_id: None,
            name: None,
            city_name: None,
            state_name: None,
            day: DEFAULT_DAY,
            date: None,
            notes: None,
        };
        let primary = Some(entity_id.to_owned());
        match item_type {
            ItemType::State => item.state_id = primary,
            ItemType::City => item.city_id = primary,
            ItemType::Place => item.place_id = primary,
        }
        item
    }

    /// Id of the entity this item primarily refers to.
    #[must_use]
    pub fn primary_entity_id(&self) -> Option<&str> {
        match self.item_type {
            ItemType::State => self.state_id.as_deref(),
            ItemType::City => self.city_id.as_deref(),
            ItemType::Place => self.place_id.as_deref(),
        }
    }

    /// Best human-readable label: name, then city/state label, then the key.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.city_name.as_deref())
            .or(self.state_name.as_deref())
            .unwrap_or(&self.id)
    }
}

const fn default_day() -> u32 {
    DEFAULT_DAY
}

/// Accepts a missing, null, zero or negative day and maps it to [`DEFAULT_DAY`].
fn deserialize_day<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(match raw {
        Some(day) if day >= 1 => u32::try_from(day).unwrap_or(u32::MAX),
        _ => DEFAULT_DAY,
    })
}

/// Reads `yyyy-mm-dd` or a full RFC 3339 timestamp; blank strings mean no date.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|e| serde::de::Error::custom(format!("invalid date '{trimmed}': {e}")))
}

/// A state as supplied by the destination provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A city as supplied by the destination provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state_id: Option<String>,
    /// State display name, when the provider joined it in.
    #[serde(default)]
    pub state: Option<String>,
}

/// A place as supplied by the destination provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city_id: Option<String>,
    #[serde(default)]
    pub state_id: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub state_name: Option<String>,
}

/// Partial update merged into an existing item by `update_item`.
///
/// `date` and `notes` are doubly optional: `None` leaves the field alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub day: Option<u32>,
    pub date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

impl ItemPatch {
    #[must_use]
    pub fn day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(Some(date));
        self
    }

    #[must_use]
    pub fn clear_date(mut self) -> Self {
        self.date = Some(None);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(Some(notes.into()));
        self
    }

    #[must_use]
    pub fn clear_notes(mut self) -> Self {
        self.notes = Some(None);
        self
    }

    /// Returns `true` when applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.date.is_none() && self.notes.is_none()
    }

    /// Merges the patch into `item`. A day below 1 is ignored.
    pub fn apply(&self, item: &mut ItineraryItem) {
        if let Some(day) = self.day.filter(|d| *d >= DEFAULT_DAY) {
            item.day = day;
        }
        if let Some(date) = self.date {
            item.date = date;
        }
        if let Some(notes) = &self.notes {
            item.notes.clone_from(notes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_uses_lowercase_type_prefix() {
        assert_eq!(ItemType::State.composite_key("s1"), "state:s1");
        assert_eq!(ItemType::City.composite_key("c1"), "city:c1");
        assert_eq!(ItemType::Place.composite_key("p1"), "place:p1");
    }

    #[test]
    fn new_item_sets_primary_reference() {
        let item = ItineraryItem::new(ItemType::Place, "p9");
        assert_eq!(item.id, "place:p9");
        assert_eq!(item.primary_entity_id(), Some("p9"));
        assert!(item.state_id.is_none());
        assert_eq!(item.day, DEFAULT_DAY);
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_fields() {
        let mut item = ItineraryItem::new(ItemType::City, "c1");
        item.city_name = Some("Jaipur".to_owned());
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "city:c1",
                "type": "city",
                "cityId": "c1",
                "cityName": "Jaipur",
                "day": 1
            })
        );
    }

    #[test]
    fn deserializes_sparse_wire_item_with_default_day() {
        let item: ItineraryItem =
            serde_json::from_value(serde_json::json!({"id": "place:p1", "type": "place"}))
                .unwrap();
        assert_eq!(item.item_type, ItemType::Place);
        assert_eq!(item.day, DEFAULT_DAY);
        assert!(item.place_id.is_none());
    }

    #[test]
    fn deserializes_null_or_non_positive_day_as_default() {
        for raw in [serde_json::json!(null), serde_json::json!(0), serde_json::json!(-3)] {
            let item: ItineraryItem = serde_json::from_value(
                serde_json::json!({"id": "state:s1", "type": "state", "day": raw}),
            )
            .unwrap();
            assert_eq!(item.day, DEFAULT_DAY, "day {raw} should normalise to 1");
        }
    }

    #[test]
    fn blank_date_reads_as_none() {
        let item: ItineraryItem = serde_json::from_value(
            serde_json::json!({"id": "state:s1", "type": "state", "date": ""}),
        )
        .unwrap();
        assert!(item.date.is_none());
    }

    #[test]
    fn date_accepts_plain_and_timestamp_forms() {
        let plain: ItineraryItem = serde_json::from_value(
            serde_json::json!({"id": "city:c1", "type": "city", "date": "2025-03-14"}),
        )
        .unwrap();
        let stamped: ItineraryItem = serde_json::from_value(
            serde_json::json!({"id": "city:c1", "type": "city", "date": "2025-03-14T00:00:00Z"}),
        )
        .unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(plain.date, expected);
        assert_eq!(stamped.date, expected);
        assert_eq!(
            serde_json::to_value(&plain).unwrap()["date"],
            serde_json::json!("2025-03-14")
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<ItineraryItem, _> =
            serde_json::from_value(serde_json::json!({"id": "zone:z1", "type": "zone"}));
        assert!(result.is_err());
    }

    #[test]
    fn patch_ignores_day_zero_and_clears_optionals() {
        let mut item = ItineraryItem::new(ItemType::State, "s1");
        item.day = 3;
        item.notes = Some("bring sunscreen".to_owned());
        item.date = NaiveDate::from_ymd_opt(2025, 1, 1);

        ItemPatch::default()
            .day(0)
            .clear_date()
            .clear_notes()
            .apply(&mut item);

        assert_eq!(item.day, 3);
        assert!(item.date.is_none());
        assert!(item.notes.is_none());
    }

    #[test]
    fn label_falls_back_to_composite_key() {
        let item = ItineraryItem::new(ItemType::State, "s1");
        assert_eq!(item.label(), "state:s1");
    }
}
