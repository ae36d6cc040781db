use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::ai::SearchEngine;
use crate::config::EngineConfig;
use crate::error::{ConfigError, SessionError};
use crate::game::{ActorId, Side};

use super::{GameMode, GameSession, SessionMap};

/// Live sessions keyed by the id of the actor who started them.
///
/// Sessions only live in memory; after a restart every lookup misses and the
/// front end should ask the player to start over.
pub struct SessionRegistry {
    sessions: Arc<SessionMap>,
    config: EngineConfig,
    rng: Mutex<StdRng>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    /// Registry seeded from OS entropy.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Registry whose starting sides and computer rolls are reproducible.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Fails if `config` would not pass [`EngineConfig::validate`].
    pub fn with_rng(config: EngineConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    fn build(config: EngineConfig, rng: StdRng) -> Self {
        SessionRegistry {
            sessions: Arc::new(SessionMap::new()),
            config,
            rng: Mutex::new(rng),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a game with a randomly chosen first side.
    pub async fn create_session(
        &self,
        initiator: ActorId,
        mode: GameMode,
    ) -> Result<Arc<GameSession>, SessionError> {
        let first = self.draw_first_side();
        self.create_session_starting(initiator, mode, first).await
    }

    /// Start a game where `first` moves first. If that is the computer, its
    /// opening move is played before this returns.
    pub async fn create_session_starting(
        &self,
        initiator: ActorId,
        mode: GameMode,
        first: Side,
    ) -> Result<Arc<GameSession>, SessionError> {
        let session = self.register(initiator, mode, first)?;
        info!(%initiator, session = session.id(), ?mode, %first, "game started");

        session.play_opening().await;
        Ok(session)
    }

    /// The live session started by `initiator`, if any.
    pub fn lookup(&self, initiator: ActorId) -> Option<Arc<GameSession>> {
        self.sessions
            .get(&initiator)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Like [`lookup`](Self::lookup), but a miss is an error for the caller
    /// to report.
    pub fn get(&self, initiator: ActorId) -> Result<Arc<GameSession>, SessionError> {
        self.lookup(initiator)
            .ok_or(SessionError::SessionNotFound(initiator))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn draw_first_side(&self) -> Side {
        if self.rng.lock().random_bool(0.5) {
            Side::A
        } else {
            Side::B
        }
    }

    /// Check-and-insert under the map's per-key entry lock.
    fn register(
        &self,
        initiator: ActorId,
        mode: GameMode,
        first: Side,
    ) -> Result<Arc<GameSession>, SessionError> {
        match self.sessions.entry(initiator) {
            Entry::Occupied(entry) => {
                warn!(%initiator, session = entry.get().id(), "game already in progress");
                Err(SessionError::SessionAlreadyExists(Arc::clone(entry.get())))
            }
            Entry::Vacant(entry) => {
                let session = Arc::new(self.build_session(initiator, mode, first));
                entry.insert(Arc::clone(&session));
                Ok(session)
            }
        }
    }

    fn build_session(&self, initiator: ActorId, mode: GameMode, first: Side) -> GameSession {
        let computer = match mode {
            GameMode::VsComputer(difficulty) => {
                Some(SearchEngine::from(self.config.difficulty.settings(difficulty)))
            }
            GameMode::VsHuman => None,
        };
        let rng = StdRng::from_rng(&mut *self.rng.lock());
        GameSession::new(
            self.next_id.fetch_add(1, Ordering::Relaxed),
            initiator,
            mode,
            computer,
            self.config.board.new_board(),
            first,
            rng,
            Arc::downgrade(&self.sessions),
        )
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::build(EngineConfig::default(), StdRng::from_os_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;

    #[tokio::test]
    async fn create_and_lookup() {
        let registry = SessionRegistry::with_seed(EngineConfig::default(), 1).unwrap();
        assert!(registry.is_empty());

        let session = registry
            .create_session(ActorId(10), GameMode::VsHuman)
            .await
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(ActorId(10)).unwrap().id(), session.id());
        assert!(registry.lookup(ActorId(11)).is_none());
        assert!(matches!(
            registry.get(ActorId(11)),
            Err(SessionError::SessionNotFound(ActorId(11)))
        ));
    }

    #[tokio::test]
    async fn second_create_returns_existing() {
        let registry = SessionRegistry::with_seed(EngineConfig::default(), 2).unwrap();
        let first = registry
            .create_session(ActorId(1), GameMode::VsHuman)
            .await
            .unwrap();

        let err = registry
            .create_session(ActorId(1), GameMode::VsComputer(Difficulty::Hard))
            .await
            .unwrap_err();
        let existing = err.existing_session().unwrap();
        assert_eq!(existing.id(), first.id());
        assert_eq!(existing.mode(), GameMode::VsHuman);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn session_ids_are_unique() {
        let registry = SessionRegistry::with_seed(EngineConfig::default(), 3).unwrap();
        let a = registry.create_session(ActorId(1), GameMode::VsHuman).await.unwrap();
        let b = registry.create_session(ActorId(2), GameMode::VsHuman).await.unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn boards_follow_config() {
        let mut config = EngineConfig::default();
        config.board.rows = 4;
        config.board.cols = 5;
        config.board.win_length = 3;
        let registry = SessionRegistry::with_seed(config, 4).unwrap();
        let session = registry
            .create_session_starting(ActorId(1), GameMode::VsHuman, Side::A)
            .await
            .unwrap();
        let view = session.view().await;
        assert_eq!(view.rows(), 4);
        assert_eq!(view.cols(), 5);
        assert_eq!(view.cursors, [2, 2]);
    }

    #[test]
    fn invalid_board_config_is_refused() {
        let mut config = EngineConfig::default();
        config.board.cols = 0;
        assert!(matches!(
            SessionRegistry::with_seed(config, 1),
            Err(ConfigError::Validation(_))
        ));

        let mut config = EngineConfig::default();
        config.board.rows = 0;
        assert!(SessionRegistry::with_seed(config, 1).is_err());

        let mut config = EngineConfig::default();
        config.difficulty.easy.failure_chance = 1.5;
        assert!(SessionRegistry::new(config).is_err());
    }

    #[test]
    fn default_registry_uses_default_config() {
        let registry = SessionRegistry::default();
        assert_eq!(registry.config(), &EngineConfig::default());
        assert!(registry.is_empty());
    }
}
