//! Runs one CLI command against the logged-in user's itinerary.
//!
//! Every run loads the remote itinerary first, applies the change through the
//! session (so the auth gate applies), then saves explicitly.

use std::sync::Arc;

use anyhow::{bail, Context};
use tourplan_core::{
    feedback_label, AddOutcome, AppConfig, CityRef, ItemPatch, PlaceRef, StateRef,
    DEFAULT_ADDED_LABEL,
};
use tourplan_remote::{ItineraryRemote, SafetyApiClient};
use tourplan_session::{
    AccessDenied, AuthGate, IdentityProvider, IdentityState, ItinerarySession, LoadOutcome,
    LoginPrompt, WatchIdentity,
};

use crate::render::render_itinerary;
use crate::{Commands, PlaceArgs, UpdateArgs};

/// Shows the login notice on stderr.
struct StderrPrompt;

impl LoginPrompt for StderrPrompt {
    fn login_required(&self, message: &str) {
        eprintln!("{message}");
    }
}

pub(crate) async fn run(
    config: &AppConfig,
    user: Option<&str>,
    command: Commands,
) -> anyhow::Result<()> {
    let client = SafetyApiClient::from_config(config).context("building safety API client")?;
    let identity = IdentityState::from_user_id(user);
    let gate = AuthGate::new(
        Arc::new(WatchIdentity::new(identity.clone())) as Arc<dyn IdentityProvider>,
        Arc::new(StderrPrompt) as Arc<dyn LoginPrompt>,
    );
    let session = ItinerarySession::with_saved_flash(
        gate,
        Arc::new(client) as Arc<dyn ItineraryRemote>,
        std::time::Duration::from_millis(config.saved_flash_ms),
    );

    let loaded = session.load_for(&identity).await;
    tracing::debug!(?loaded, "initial itinerary sync");
    let mutates = !matches!(command, Commands::Show);
    if mutates && identity.identity().is_some() && !loaded.is_synced() {
        // Saving now would overwrite the remote copy with a partial view.
        bail!("could not load the saved itinerary ({loaded:?}); nothing was changed");
    }

    match command {
        Commands::Show => {
            if loaded == LoadOutcome::Failed {
                eprintln!("warning: could not reach the itinerary service; showing nothing");
            }
            let user_label = identity.identity().map(|i| i.id.as_str());
            print!(
                "{}",
                render_itinerary(user_label, &session.items(), &session.trip_note())
            );
            return Ok(());
        }
        Commands::AddState { id, name } => {
            let outcome = session.add_state(&StateRef { id, name });
            report_add(outcome, "State added to itinerary")?;
        }
        Commands::AddCity {
            id,
            name,
            state_id,
            state,
        } => {
            let outcome = session.add_city(&CityRef {
                id,
                name,
                state_id,
                state,
            });
            report_add(outcome, "City added to itinerary")?;
        }
        Commands::AddPlace(args) => {
            let outcome = session.add_place(&place_ref(args));
            report_add(outcome, DEFAULT_ADDED_LABEL)?;
        }
        Commands::Remove { item_id } => {
            if !session.remove_item(&item_id).map_err(denied)? {
                println!("{item_id} is not in the itinerary");
                return Ok(());
            }
            println!("Removed {item_id}");
        }
        Commands::Update(args) => {
            let item_id = args.item_id.clone();
            let patch = item_patch(args);
            if patch.is_empty() {
                bail!("nothing to update; pass --day, --date or --notes");
            }
            if !session.update_item(&item_id, &patch).map_err(denied)? {
                println!("{item_id} is not in the itinerary");
                return Ok(());
            }
            println!("Updated {item_id}");
        }
        Commands::Note { text } => {
            session.set_trip_note(text).map_err(denied)?;
        }
        Commands::Clear => {
            session.clear().map_err(denied)?;
            session.settle().await;
            println!("Itinerary cleared");
            return Ok(());
        }
    }

    match session.save_itinerary().await.map_err(denied)? {
        Some(saved_at) => {
            println!("Itinerary saved at {}", saved_at.format("%H:%M:%S"));
            Ok(())
        }
        None => bail!("itinerary was not saved; try again"),
    }
}

fn report_add(outcome: Result<AddOutcome, AccessDenied>, added_label: &str) -> anyhow::Result<()> {
    let outcome = outcome.map_err(denied)?;
    if outcome == AddOutcome::Invalid {
        bail!("an id is required");
    }
    if let Some(label) = feedback_label(Some(outcome), added_label) {
        println!("{label}");
    }
    Ok(())
}

fn denied(reason: AccessDenied) -> anyhow::Error {
    anyhow::anyhow!("itinerary unavailable: {reason}")
}

fn place_ref(args: PlaceArgs) -> PlaceRef {
    PlaceRef {
        id: args.id,
        name: args.name,
        city_id: args.city_id,
        state_id: args.state_id,
        city_name: args.city_name,
        state_name: args.state_name,
    }
}

fn item_patch(args: UpdateArgs) -> ItemPatch {
    let mut patch = ItemPatch::default();
    if let Some(day) = args.day {
        patch = patch.day(day);
    }
    if let Some(date) = args.date {
        patch = patch.date(date);
    } else if args.clear_date {
        patch = patch.clear_date();
    }
    if let Some(notes) = args.notes {
        patch = patch.notes(notes);
    } else if args.clear_notes {
        patch = patch.clear_notes();
    }
    patch
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
