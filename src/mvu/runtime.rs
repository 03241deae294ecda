use mockable::Clock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::draft::{self, DraftEffect, DraftMsg, GameDraft};
use super::game::{update, Deps, Effect, Msg};
use crate::geo::{GeoError, Geolocator};
use crate::model::{Game, GameId, GameState, IdSource, Location, MetaData, NewGame, PermissionState};

/// Owns the single source of truth and swaps in a new snapshot per transition.
pub struct GameStore {
    state: Arc<GameState>,
    ids: Box<dyn IdSource>,
    clock: Arc<dyn Clock>,
    auto_advance: bool,
}

impl GameStore {
    pub fn new(ids: Box<dyn IdSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(GameState::default()),
            ids,
            clock,
            auto_advance: true,
        }
    }

    /// Whether finishing a hole moves the cursor on to the next one.
    #[must_use]
    pub fn auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub fn current_game(&self) -> Option<&Game> {
        self.state.current_game.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[Game] {
        &self.state.history
    }

    #[must_use]
    pub fn ids(&self) -> &dyn IdSource {
        self.ids.as_ref()
    }

    /// Applies one message and hands back its effects without following them.
    /// A message that changes nothing keeps the previous snapshot.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let deps = Deps {
            ids: self.ids.as_ref(),
            clock: self.clock.as_ref(),
        };
        let mut next = GameState::clone(&self.state);
        let effects = update(&mut next, msg, deps);
        if next != *self.state {
            self.state = Arc::new(next);
        }
        effects
    }

    /// Applies a message and drains its effects the way the view would.
    pub fn run(&mut self, msg: Msg) {
        let mut effects = self.dispatch(msg);
        while let Some(effect) = effects.pop() {
            match effect {
                Effect::Advance { to } if self.auto_advance => {
                    let next = self.dispatch(Msg::FocusHole(to));
                    effects.extend(next);
                }
                Effect::Advance { to } => debug!(hole = %to, "auto advance disabled"),
            }
        }
    }
}

struct PendingLocation {
    draft_id: GameId,
    task: JoinHandle<Result<Location, GeoError>>,
}

/// Holds the open new-game form and its outstanding location request, if any.
pub struct DraftSession {
    draft: Option<GameDraft>,
    meta: MetaData,
    geolocator: Arc<dyn Geolocator>,
    pending: Option<PendingLocation>,
}

impl DraftSession {
    pub fn new(geolocator: Arc<dyn Geolocator>, meta: MetaData) -> Self {
        Self {
            draft: None,
            meta,
            geolocator,
            pending: None,
        }
    }

    /// Starts a creation flow, discarding any form that was still open.
    pub fn open(&mut self, draft: GameDraft) {
        self.abort_pending();
        self.draft = Some(draft);
    }

    #[must_use]
    pub fn draft(&self) -> Option<&GameDraft> {
        self.draft.as_ref()
    }

    #[must_use]
    pub fn meta(&self) -> MetaData {
        self.meta
    }

    #[must_use]
    pub fn has_pending_location(&self) -> bool {
        self.pending.is_some()
    }

    /// A location request made outside a tokio runtime is dropped and the
    /// form stops waiting for it.
    pub fn send(&mut self, msg: DraftMsg, ids: &dyn IdSource) {
        let Some(current) = self.draft.take() else {
            debug!(?msg, "draft message ignored: no form open");
            return;
        };
        let (next, effects) = draft::update(current, msg, self.meta.permissions.geolocation, ids);
        let draft_id = next.id.clone();
        self.draft = Some(next);
        for effect in effects {
            self.run_effect(effect, draft_id.clone());
        }
    }

    fn run_effect(&mut self, effect: DraftEffect, draft_id: GameId) {
        match effect {
            DraftEffect::RequestLocation => {
                self.abort_pending();
                let Ok(handle) = tokio::runtime::Handle::try_current() else {
                    warn!(draft = %draft_id, "location request dropped: no async runtime");
                    if let Some(draft) = self.draft.as_mut() {
                        draft.location_pending = false;
                    }
                    return;
                };
                let geolocator = Arc::clone(&self.geolocator);
                let task = handle.spawn(async move { geolocator.current_position().await });
                debug!(draft = %draft_id, "location requested");
                self.pending = Some(PendingLocation { draft_id, task });
            }
            DraftEffect::PermissionDenied => {
                self.meta.permissions.geolocation = PermissionState::Denied;
            }
        }
    }

    /// Waits for the outstanding location request and applies it when the
    /// form that asked is still open. Returns whether a result was applied.
    pub async fn settle_location(&mut self, ids: &dyn IdSource) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let result = match pending.task.await {
            Ok(result) => result,
            Err(err) => {
                debug!(error = %err, "location task did not complete");
                return false;
            }
        };
        if self
            .draft
            .as_ref()
            .is_none_or(|d| d.id != pending.draft_id)
        {
            debug!(draft = %pending.draft_id, "location dropped: form closed");
            return false;
        }
        self.send(DraftMsg::LocationResolved(result), ids);
        true
    }

    /// Closes the form without creating a game.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.draft = None;
    }

    /// Closes the form and returns the game to create. A location that has
    /// not arrived yet is abandoned.
    pub fn submit(&mut self) -> Option<NewGame> {
        self.abort_pending();
        self.draft.take().map(GameDraft::submit)
    }

    fn abort_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}

impl Drop for DraftSession {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
