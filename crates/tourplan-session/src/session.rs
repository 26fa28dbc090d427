//! The itinerary surface a front end is allowed to call.
//!
//! [`ItinerarySession`] owns the store of the current identity. Mutators are
//! gated by [`AuthGate`] and run synchronously under a mutex that is never
//! held across an `.await`, so local edits made while a save is in flight
//! simply land in the next save.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tourplan_core::{
    AddOutcome, CityRef, ItemPatch, ItineraryItem, ItineraryStore, PlaceRef, StateRef,
};
use tourplan_remote::{ItineraryRemote, SavePayload};

use crate::bridge::{report_failure, LoadOutcome, RemoteOp};
use crate::gate::{AccessDenied, AuthGate};
use crate::identity::{Identity, IdentityState};

/// How long `last_saved_at` stays set after a successful save.
pub const DEFAULT_SAVED_FLASH: Duration = Duration::from_secs(2);

/// Itinerary of the active identity plus its persistence bridge.
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct ItinerarySession {
    inner: Arc<Inner>,
}

struct Inner {
    gate: AuthGate,
    remote: Arc<dyn ItineraryRemote>,
    saved_flash: Duration,
    state: Mutex<SessionState>,
    /// Detached remote clears; dropping a handle does not cancel its task.
    background: Mutex<Vec<JoinHandle<()>>>,
}

#[derive(Default)]
struct SessionState {
    store: ItineraryStore,
    saves_in_flight: usize,
    last_saved_at: Option<DateTime<Utc>>,
    /// Bumped on every successful save; a reset timer only fires for its own save.
    save_seq: u64,
    /// Bumped whenever a load starts or the identity signs out.
    load_seq: u64,
    /// User whose itinerary the store currently holds.
    owner: Option<String>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // No code path panics while holding the lock, so poisoning carries no
        // half-applied mutation.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps `saves_in_flight` accurate even if a save future is dropped.
struct SavingGuard<'a> {
    inner: &'a Inner,
}

impl<'a> SavingGuard<'a> {
    fn begin(inner: &'a Inner, state: &mut SessionState) -> Self {
        state.saves_in_flight += 1;
        Self { inner }
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        state.saves_in_flight = state.saves_in_flight.saturating_sub(1);
    }
}

impl ItinerarySession {
    #[must_use]
    pub fn new(gate: AuthGate, remote: Arc<dyn ItineraryRemote>) -> Self {
        Self::with_saved_flash(gate, remote, DEFAULT_SAVED_FLASH)
    }

    #[must_use]
    pub fn with_saved_flash(
        gate: AuthGate,
        remote: Arc<dyn ItineraryRemote>,
        saved_flash: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                gate,
                remote,
                saved_flash,
                state: Mutex::new(SessionState::default()),
                background: Mutex::new(Vec::new()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock()
    }

    #[must_use]
    pub fn identity(&self) -> IdentityState {
        self.inner.gate.current()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<ItineraryItem> {
        self.state().store.items().to_vec()
    }

    #[must_use]
    pub fn trip_note(&self) -> String {
        self.state().store.trip_note().to_owned()
    }

    #[must_use]
    pub fn items_by_day(&self) -> BTreeMap<u32, Vec<ItineraryItem>> {
        self.state()
            .store
            .items_by_day()
            .into_iter()
            .map(|(day, items)| (day, items.into_iter().cloned().collect()))
            .collect()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.state().saves_in_flight > 0
    }

    /// Time of the latest successful save, until its flash period ends.
    #[must_use]
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.state().last_saved_at
    }

    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub fn add_state(&self, state: &StateRef) -> Result<AddOutcome, AccessDenied> {
        self.guarded(|store| store.add_state(state))
    }

    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub fn add_city(&self, city: &CityRef) -> Result<AddOutcome, AccessDenied> {
        self.guarded(|store| store.add_city(city))
    }

    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub fn add_place(&self, place: &PlaceRef) -> Result<AddOutcome, AccessDenied> {
        self.guarded(|store| store.add_place(place))
    }

    /// Removes an item; `Ok(false)` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub fn remove_item(&self, item_id: &str) -> Result<bool, AccessDenied> {
        self.guarded(|store| store.remove_item(item_id))
    }

    /// Merges `patch` into an item; `Ok(false)` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub fn update_item(&self, item_id: &str, patch: &ItemPatch) -> Result<bool, AccessDenied> {
        self.guarded(|store| store.update_item(item_id, patch))
    }

    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub fn set_trip_note(&self, text: impl Into<String>) -> Result<(), AccessDenied> {
        self.guarded(|store| store.set_trip_note(text))
    }

    /// Clears the local itinerary, then asks the remote to clear its copy.
    ///
    /// The local clear is final. The remote request runs as a detached task
    /// whose failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub fn clear(&self) -> Result<(), AccessDenied> {
        let identity = self.inner.gate.check()?;
        {
            let mut state = self.state();
            state.store.clear();
            state.owner = Some(identity.id.clone());
        }
        self.propagate_clear(identity);
        Ok(())
    }

    /// Waits for every remote clear spawned so far to finish.
    ///
    /// Front ends that are about to exit call this so detached requests are
    /// not cut short; the outcome of each request is still only logged.
    pub async fn settle(&self) {
        let pending = std::mem::take(&mut *self.background());
        for task in pending {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "background itinerary task did not complete");
            }
        }
    }

    /// Saves the whole itinerary, items ordered by day, in one request.
    ///
    /// Returns the save time on success and `None` if the request failed
    /// (the failure is logged). Never retried.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when no identity is available.
    pub async fn save_itinerary(&self) -> Result<Option<DateTime<Utc>>, AccessDenied> {
        let identity = self.inner.gate.check()?;

        let (payload, _saving) = {
            let mut state = self.state();
            let guard = SavingGuard::begin(&self.inner, &mut state);
            let note = state.store.trip_note();
            let payload = SavePayload {
                user_id: identity.id.clone(),
                items: state.store.save_order(),
                trip_note: (!note.is_empty()).then(|| note.to_owned()),
            };
            (payload, guard)
        };

        match self.inner.remote.save(&payload).await {
            Ok(()) => {
                let saved_at = Utc::now();
                let seq = {
                    let mut state = self.state();
                    state.save_seq += 1;
                    state.last_saved_at = Some(saved_at);
                    state.save_seq
                };
                self.schedule_saved_reset(seq);
                tracing::info!(
                    user_id = %identity.id,
                    items = payload.items.len(),
                    "itinerary saved"
                );
                Ok(Some(saved_at))
            }
            Err(e) => {
                report_failure(RemoteOp::Save, &identity.id, &e);
                Ok(None)
            }
        }
    }

    /// Re-syncs with whatever identity the provider currently reports.
    pub async fn reload(&self) -> LoadOutcome {
        let identity = self.identity();
        self.load_for(&identity).await
    }

    /// Brings local state in line with `identity`.
    ///
    /// An identified user's remote itinerary replaces local state wholesale;
    /// a missing record resets to empty; any other failure leaves local state
    /// alone, unless it still holds a different user's itinerary, which is
    /// dropped. Signing out resets to empty. A response that arrives after a
    /// newer load or sign-out has started is dropped.
    pub async fn load_for(&self, identity: &IdentityState) -> LoadOutcome {
        let user_id = match identity {
            IdentityState::Resolving => return LoadOutcome::Pending,
            IdentityState::Anonymous => {
                let mut state = self.state();
                state.load_seq += 1;
                state.store.clear();
                state.owner = None;
                return LoadOutcome::SignedOut;
            }
            IdentityState::Identified(identity) => identity.id.as_str(),
        };

        let seq = {
            let mut state = self.state();
            state.load_seq += 1;
            state.load_seq
        };

        let result = self.inner.remote.fetch(user_id).await;

        let mut state = self.state();
        if state.load_seq != seq {
            tracing::debug!(user_id, "discarding superseded itinerary load");
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(remote) => {
                state.store.replace(remote.items, remote.trip_note);
                state.owner = Some(user_id.to_owned());
                let items = state.store.len();
                drop(state);
                tracing::info!(user_id, items, "itinerary loaded");
                LoadOutcome::Replaced { items }
            }
            Err(e) if e.is_not_found() => {
                state.store.clear();
                state.owner = Some(user_id.to_owned());
                drop(state);
                report_failure(RemoteOp::Load, user_id, &e);
                LoadOutcome::Empty
            }
            Err(e) => {
                // Another user's itinerary must never survive into this one.
                if state.owner.as_deref().is_some_and(|owner| owner != user_id) {
                    state.store.clear();
                    state.owner = Some(user_id.to_owned());
                }
                drop(state);
                report_failure(RemoteOp::Load, user_id, &e);
                LoadOutcome::Failed
            }
        }
    }

    /// Spawns a task that loads on every identity transition.
    ///
    /// A transition that arrives mid-load abandons that load and starts over
    /// for the new identity. The task ends once the sender is dropped.
    #[must_use]
    pub fn watch_identity(&self, mut rx: watch::Receiver<IdentityState>) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            loop {
                let identity = rx.borrow_and_update().clone();
                let restarted = {
                    let load = session.load_for(&identity);
                    tokio::pin!(load);
                    tokio::select! {
                        _ = &mut load => false,
                        changed = rx.changed() => {
                            if changed.is_err() {
                                load.await;
                                return;
                            }
                            true
                        }
                    }
                };
                if restarted {
                    tracing::debug!("identity changed mid-load; restarting itinerary load");
                    continue;
                }
                if rx.changed().await.is_err() {
                    return;
                }
            }
        })
    }

    fn guarded<T>(&self, op: impl FnOnce(&mut ItineraryStore) -> T) -> Result<T, AccessDenied> {
        let identity = self.inner.gate.check()?;
        let mut state = self.state();
        state.owner.get_or_insert(identity.id);
        Ok(op(&mut state.store))
    }

    fn propagate_clear(&self, identity: Identity) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(
                user_id = %identity.id,
                "no async runtime available; remote itinerary left as is"
            );
            return;
        };
        let remote = Arc::clone(&self.inner.remote);
        let task = handle.spawn(async move {
            if let Err(e) = remote.clear(&identity.id).await {
                report_failure(RemoteOp::Clear, &identity.id, &e);
            }
        });
        let mut background = self.background();
        background.retain(|pending| !pending.is_finished());
        background.push(task);
    }

    fn background(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_saved_reset(&self, seq: u64) {
        let Ok(handle) = Handle::try_current() else {
            return;
        };
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let flash = self.inner.saved_flash;
        handle.spawn(async move {
            tokio::time::sleep(flash).await;
            if let Some(inner) = inner.upgrade() {
                let mut state = inner.lock();
                if state.save_seq == seq {
                    state.last_saved_at = None;
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
