//! In-memory itinerary store.
//!
//! Holds the ordered, deduplicated list of [`ItineraryItem`]s plus the free
//! text trip note. Every mutator is synchronous and never fails: invalid input
//! degrades to a no-op or an [`AddOutcome`] sentinel. The store knows nothing
//! about identity or persistence; those concerns wrap it from the outside.

use std::collections::BTreeMap;

use crate::types::{CityRef, ItemPatch, ItemType, ItineraryItem, PlaceRef, StateRef, DEFAULT_DAY};

/// Number of days a front end offers when picking an item's day.
///
/// The store itself never enforces an upper bound.
pub const MAX_DAYS: u32 = 10;

/// Result of an add operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An item with the same composite key is already present.
    Duplicate,
    /// The entity had no usable id.
    Invalid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItineraryStore {
    items: Vec<ItineraryItem>,
    trip_note: String,
}

impl ItineraryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ItineraryItem] {
        &self.items
    }

    #[must_use]
    pub fn trip_note(&self) -> &str {
        &self.trip_note
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }

    #[must_use]
    pub fn get(&self, item_id: &str) -> Option<&ItineraryItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn add_state(&mut self, state: &StateRef) -> AddOutcome {
        self.insert_with(ItemType::State, &state.id, |item| {
            item.name.clone_from(&state.name);
            item.state_name.clone_from(&state.name);
        })
    }

    pub fn add_city(&mut self, city: &CityRef) -> AddOutcome {
        self.insert_with(ItemType::City, &city.id, |item| {
            item.state_id.clone_from(&city.state_id);
            item.name.clone_from(&city.name);
            item.city_name.clone_from(&city.name);
            item.state_name.clone_from(&city.state);
        })
    }

    pub fn add_place(&mut self, place: &PlaceRef) -> AddOutcome {
        self.insert_with(ItemType::Place, &place.id, |item| {
            item.city_id.clone_from(&place.city_id);
            item.state_id.clone_from(&place.state_id);
            item.name.clone_from(&place.name);
            item.city_name.clone_from(&place.city_name);
            item.state_name.clone_from(&place.state_name);
        })
    }

    /// Removes the item with `item_id`. Returns `false` if it was not present.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() != before
    }

    /// Merges `patch` into the item with `item_id`. Returns `false` if absent.
    pub fn update_item(&mut self, item_id: &str, patch: &ItemPatch) -> bool {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                patch.apply(item);
                true
            }
            None => false,
        }
    }

    /// Empties the item list and resets the trip note.
    pub fn clear(&mut self) {
        self.items.clear();
        self.trip_note.clear();
    }

    pub fn set_trip_note(&mut self, text: impl Into<String>) {
        self.trip_note = text.into();
    }

    /// Discards all current state in favour of `items` and `trip_note`.
    ///
    /// Later duplicates of an id already seen are dropped so the uniqueness
    /// invariant holds even for hand-edited remote data.
    pub fn replace(&mut self, items: Vec<ItineraryItem>, trip_note: Option<String>) {
        let mut deduped: Vec<ItineraryItem> = Vec::with_capacity(items.len());
        for item in items {
            if !deduped.iter().any(|kept| kept.id == item.id) {
                deduped.push(item);
            }
        }
        self.items = deduped;
        self.trip_note = trip_note.unwrap_or_default();
    }

    /// Items ordered ascending by day; ties keep insertion order.
    #[must_use]
    pub fn save_order(&self) -> Vec<ItineraryItem> {
        let mut ordered = self.items.clone();
        // `sort_by_key` is stable.
        ordered.sort_by_key(|item| item.day);
        ordered
    }

    /// Groups items per day, treating any day below 1 as day 1.
    #[must_use]
    pub fn items_by_day(&self) -> BTreeMap<u32, Vec<&ItineraryItem>> {
        let mut groups: BTreeMap<u32, Vec<&ItineraryItem>> = BTreeMap::new();
        for item in &self.items {
            groups
                .entry(item.day.max(DEFAULT_DAY))
                .or_default()
                .push(item);
        }
        groups
    }

    fn insert_with<F>(&mut self, item_type: ItemType, entity_id: &str, fill: F) -> AddOutcome
    where
        F: FnOnce(&mut ItineraryItem),
    {
        if entity_id.trim().is_empty() {
            return AddOutcome::Invalid;
        }
        let key = item_type.composite_key(entity_id);
        if self.contains(&key) {
            return AddOutcome::Duplicate;
        }
        let mut item = ItineraryItem::new(item_type, entity_id);
        fill(&mut item);
        self.items.push(item);
        AddOutcome::Added
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
