//! Session registry
//!
//! One controller per playback channel (voice channel, room, device).
//! Sessions share no mutable state, so commands on different sessions run
//! fully in parallel; the registry map itself is the only shared point.

use crate::controller::Controller;
use crate::renderer::Renderer;
use crate::types::PlayerConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Identifier of one playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// Registry of live playback sessions
///
/// Controllers are handed out as `Arc` so the command layer and renderer
/// callbacks can hold them across registry mutations; destroying a session
/// drops the registry's reference, and the controller dies with the last
/// holder.
pub struct SessionRegistry {
    config: PlayerConfig,
    sessions: Mutex<HashMap<SessionId, Arc<Controller>>>,
}

impl SessionRegistry {
    /// Create a registry; `config` is the template for new sessions
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<Controller>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get an existing session
    pub fn get(&self, id: SessionId) -> Option<Arc<Controller>> {
        self.lock().get(&id).cloned()
    }

    /// Get an existing session or create one with the given renderer
    ///
    /// The factory only runs when the session does not exist yet.
    pub fn get_or_create<F>(&self, id: SessionId, renderer: F) -> Arc<Controller>
    where
        F: FnOnce() -> Box<dyn Renderer>,
    {
        self.lock()
            .entry(id)
            .or_insert_with(|| {
                debug!(session = id.0, "creating playback session");
                Arc::new(Controller::new(self.config.clone(), renderer()))
            })
            .clone()
    }

    /// Destroy a session, returning its controller if it existed
    ///
    /// In-flight holders of the `Arc` keep working; the session is simply
    /// no longer reachable through the registry.
    pub fn destroy(&self, id: SessionId) -> Option<Arc<Controller>> {
        let removed = self.lock().remove(&id);
        if removed.is_some() {
            debug!(session = id.0, "destroyed playback session");
        }
        removed
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no sessions exist
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
