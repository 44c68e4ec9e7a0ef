use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::session::SessionContext;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Exclusive access to one session's context.
///
/// Requests for the same session queue on this guard, so a read-modify-write
/// such as upload or navigate never overwrites a concurrent one.
pub type SessionGuard = OwnedMutexGuard<SessionContext>;

struct Slot {
    ctx: Arc<Mutex<SessionContext>>,
    last_seen: Instant,
}

/// In-memory session contexts, one per browser session.
/// Nothing is persisted; a restart drops every session, and a session idle
/// for longer than the timeout is dropped as if it had been ended.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Slot>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn create(&self) -> SessionContext {
        let ctx = SessionContext::new(Uuid::new_v4());
        let slot = Slot {
            ctx: Arc::new(Mutex::new(ctx.clone())),
            last_seen: Instant::now(),
        };
        self.inner.write().await.insert(ctx.id, slot);
        info!("Session {} started", ctx.id);
        ctx
    }

    /// Locks the session for the caller and marks it as seen.
    /// Waits while another request holds the same session.
    pub async fn checkout(&self, id: Uuid) -> Option<SessionGuard> {
        let ctx = {
            let mut sessions = self.inner.write().await;
            let now = Instant::now();
            let slot = sessions.get_mut(&id)?;
            if now.duration_since(slot.last_seen) > self.idle_timeout {
                sessions.remove(&id);
                info!("Session {id} expired");
                return None;
            }
            slot.last_seen = now;
            Arc::clone(&slot.ctx)
        };
        Some(ctx.lock_owned().await)
    }

    /// A snapshot of the context.
    pub async fn load(&self, id: Uuid) -> Option<SessionContext> {
        let guard = self.checkout(id).await?;
        Some(guard.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.inner.write().await.remove(&id).is_some();
        if removed {
            info!("Session {id} ended");
        }
        removed
    }

    /// Drops every session idle for longer than the timeout. Returns how many.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| now.duration_since(slot.last_seen) <= self.idle_timeout);
        before - sessions.len()
    }

    /// Runs `evict_idle` forever on a fixed period. Spawn it once at startup.
    pub async fn sweep_idle(self) {
        let mut ticker = tokio::time::interval(SWEEP_PERIOD);
        loop {
            ticker.tick().await;
            let evicted = self.evict_idle().await;
            if evicted > 0 {
                info!("Evicted {evicted} idle session(s)");
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
