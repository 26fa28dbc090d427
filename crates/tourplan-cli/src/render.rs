use std::collections::BTreeMap;
use std::fmt::Write as _;

use tourplan_core::{ItemType, ItineraryItem, DEFAULT_DAY};

/// Renders items grouped by day, followed by the trip note.
pub(crate) fn render_itinerary(
    user: Option<&str>,
    items: &[ItineraryItem],
    note: &str,
) -> String {
    let mut out = String::new();
    if items.is_empty() {
        out.push_str("Your itinerary is empty\n");
    } else {
        let mut by_day: BTreeMap<u32, Vec<&ItineraryItem>> = BTreeMap::new();
        for item in items {
            by_day
                .entry(item.day.max(DEFAULT_DAY))
                .or_default()
                .push(item);
        }
        let owner = user.map(|u| format!(" for {u}")).unwrap_or_default();
        let _ = writeln!(out, "Itinerary{owner} ({} items)", items.len());
        for (day, day_items) in by_day {
            let _ = writeln!(out, "Day {day}");
            for item in day_items {
                let _ = writeln!(out, "  - {}", render_item(item));
            }
        }
    }
    if !note.is_empty() {
        let _ = writeln!(out, "Note: {note}");
    }
    out
}

fn render_item(item: &ItineraryItem) -> String {
    let kind = match item.item_type {
        ItemType::State => "State",
        ItemType::City => "City",
        ItemType::Place => "Place",
    };
    let mut line = format!("{kind}: {}", item.label());
    let location: Vec<&str> = [item.city_name.as_deref(), item.state_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| *part != item.label())
        .collect();
    if !location.is_empty() {
        let _ = write!(line, " ({})", location.join(", "));
    }
    if let Some(date) = item.date {
        let _ = write!(line, " on {}", date.format("%Y-%m-%d"));
    }
    let _ = write!(line, " [{}]", item.id);
    if let Some(notes) = item.notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(line, " - {notes}");
    }
    line
}
