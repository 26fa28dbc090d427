//! Short confirmation messages shown after an add attempt.

use crate::store::AddOutcome;

pub const DEFAULT_ADDED_LABEL: &str = "Added to itinerary";
pub const DUPLICATE_LABEL: &str = "Already in itinerary";

/// Maps an add outcome to the toast text a front end should show.
///
/// `None` (the add was declined by the auth gate) and `Invalid` produce no
/// message at all.
#[must_use]
pub fn feedback_label<'a>(outcome: Option<AddOutcome>, added_label: &'a str) -> Option<&'a str> {
    match outcome? {
        AddOutcome::Added => Some(added_label),
        AddOutcome::Duplicate => Some(DUPLICATE_LABEL),
        AddOutcome::Invalid => None,
    }
}
