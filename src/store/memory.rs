//! In-memory game store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::{GameRecord, GameStore, Mutation, StoreError, check_version};
use crate::error::{EntityKind, GameError};
use crate::game::{Game, GameId};
use crate::roster::TeamId;

type Slot = Arc<Mutex<GameRecord>>;

#[derive(Debug, Default)]
struct Inner {
    games: BTreeMap<GameId, Slot>,
    next_id: i32,
}

/// Game store kept in process memory.
///
/// Each game sits behind its own mutex, so updates to one game never wait
/// on another. Clones share the same games.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    #[instrument(skip(self))]
    fn slot(&self, id: GameId) -> Result<Option<Slot>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::new("Game index lock poisoned"))?;
        Ok(inner.games.get(&id).cloned())
    }
}

fn lock(slot: &Slot) -> Result<std::sync::MutexGuard<'_, GameRecord>, StoreError> {
    slot.lock()
        .map_err(|_| StoreError::new("Game lock poisoned"))
}

impl GameStore for InMemoryStore {
    #[instrument(skip(self))]
    fn create(&self, visiting: TeamId, home: TeamId) -> Result<GameRecord, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::new("Game index lock poisoned"))?;
        inner.next_id += 1;
        let id = GameId::from(inner.next_id);
        let record = GameRecord::new(Game::new(id, visiting, home), 1);
        inner
            .games
            .insert(id, Arc::new(Mutex::new(record.clone())));
        info!(game_id = %id, "Game created");
        Ok(record)
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        match self.slot(id)? {
            Some(slot) => Ok(Some(lock(&slot)?.clone())),
            None => {
                debug!(game_id = %id, "Game not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<GameRecord>, StoreError> {
        let slots: Vec<Slot> = {
            let inner = self
                .inner
                .read()
                .map_err(|_| StoreError::new("Game index lock poisoned"))?;
            inner.games.values().cloned().collect()
        };
        let records = slots
            .iter()
            .map(|slot| lock(slot).map(|record| record.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = records.len(), "Games listed");
        Ok(records)
    }

    #[instrument(skip(self, mutate))]
    fn update(
        &self,
        id: GameId,
        expected_version: Option<i64>,
        mutate: &mut Mutation<'_>,
    ) -> Result<GameRecord, GameError> {
        let slot = self
            .slot(id)?
            .ok_or_else(|| GameError::not_found(EntityKind::Game, id.get()))?;
        let mut current = lock(&slot)?;
        check_version(id, expected_version, *current.version())?;

        let mut game = current.game().clone();
        if let Err(err) = mutate(&mut game) {
            warn!(game_id = %id, error = %err, "Update rejected");
            return Err(err);
        }

        *current = GameRecord::new(game, current.version() + 1);
        debug!(game_id = %id, version = current.version(), "Game saved");
        Ok(current.clone())
    }
}
