//! In-memory session store
//!
//! Sessions live in a map guarded by a `RwLock`; each session has its own
//! mutex so turns on different sessions never wait on each other beyond the
//! map access itself.

use super::traits::{SessionHandle, SessionLease, SessionStore};
use crate::config::SessionLimits;
use crate::state_machine::Session;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

struct Slot {
    session: SessionHandle,
    last_touched: Instant,
}

impl Slot {
    fn fresh() -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(Utc::now()))),
            last_touched: Instant::now(),
        }
    }

    /// A lease handed out by `checkout` is still alive, so a turn may be
    /// running or about to run against this session
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.session) > 1
    }
}

pub struct InMemorySessionStore {
    limits: SessionLimits,
    sessions: RwLock<HashMap<String, Slot>>,
}

impl InMemorySessionStore {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            limits,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn is_expired(&self, slot: &Slot, now: Instant) -> bool {
        self.limits
            .ttl
            .is_some_and(|ttl| now.duration_since(slot.last_touched) > ttl)
    }

    /// Drop expired sessions, then the least recently touched ones until
    /// there is room for one more
    fn make_room(&self, sessions: &mut HashMap<String, Slot>, now: Instant) {
        if self.limits.ttl.is_some() {
            let before = sessions.len();
            sessions.retain(|_, slot| !self.is_expired(slot, now));
            let purged = before - sessions.len();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired sessions");
            }
        }

        let Some(max) = self.limits.max_sessions else {
            return;
        };
        while sessions.len() >= max {
            let Some(oldest) = sessions
                .iter()
                .filter(|(_, slot)| !slot.in_use())
                .min_by_key(|(_, slot)| slot.last_touched)
                .map(|(id, _)| id.clone())
            else {
                tracing::warn!(
                    live = sessions.len(),
                    max,
                    "Every session has a turn in flight; store is over capacity"
                );
                break;
            };
            sessions.remove(&oldest);
            tracing::info!(session_id = %oldest, "Evicted least recently used session");
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn checkout(&self, session_id: Option<&str>) -> Result<SessionLease, String> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        if let Some(id) = session_id {
            match sessions.get_mut(id) {
                Some(slot) if !self.is_expired(slot, now) => {
                    slot.last_touched = now;
                    return Ok(SessionLease {
                        session_id: id.to_string(),
                        session: slot.session.clone(),
                        created: false,
                    });
                }
                Some(_) => {
                    sessions.remove(id);
                    tracing::debug!(session_id = %id, "Session expired");
                }
                None => tracing::debug!(session_id = %id, "Unknown session id"),
            }
        }

        self.make_room(&mut sessions, now);

        let id = Uuid::new_v4().to_string();
        let slot = Slot::fresh();
        let handle = slot.session.clone();
        sessions.insert(id.clone(), slot);
        tracing::info!(session_id = %id, live = sessions.len(), "Session created");

        Ok(SessionLease {
            session_id: id,
            session: handle,
            created: true,
        })
    }

    async fn snapshot(&self, session_id: &str) -> Option<Session> {
        let handle = {
            let sessions = self.sessions.read().await;
            let slot = sessions.get(session_id)?;
            if self.is_expired(slot, Instant::now()) {
                return None;
            }
            slot.session.clone()
        };
        let session = handle.lock().await;
        Some(session.clone())
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::Stage;
    use std::time::Duration;

    fn unbounded() -> InMemorySessionStore {
        InMemorySessionStore::new(SessionLimits {
            ttl: None,
            max_sessions: None,
        })
    }

    #[tokio::test]
    async fn test_checkout_mints_and_reuses() {
        let store = unbounded();
        let first = store.checkout(None).await.unwrap();
        assert!(first.created);
        assert!(Uuid::parse_str(&first.session_id).is_ok());
        assert_eq!(first.session.lock().await.stage, Stage::Idle);

        first.session.lock().await.stage = Stage::AwaitingAmount;

        let again = store.checkout(Some(&first.session_id)).await.unwrap();
        assert!(!again.created);
        assert_eq!(again.session_id, first.session_id);
        assert_eq!(again.session.lock().await.stage, Stage::AwaitingAmount);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_new_session() {
        let store = unbounded();
        let lease = store.checkout(Some("not-a-session")).await.unwrap();
        assert!(lease.created);
        assert_ne!(lease.session_id, "not-a-session");
        assert!(store.snapshot("not-a-session").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_replaced() {
        let store = InMemorySessionStore::new(SessionLimits {
            ttl: Some(Duration::from_millis(20)),
            max_sessions: None,
        });
        let lease = store.checkout(None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(store.snapshot(&lease.session_id).await.is_none());
        let next = store.checkout(Some(&lease.session_id)).await.unwrap();
        assert!(next.created);
        assert_ne!(next.session_id, lease.session_id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_touched() {
        let store = InMemorySessionStore::new(SessionLimits {
            ttl: None,
            max_sessions: Some(2),
        });
        let a = store.checkout(None).await.unwrap().session_id;
        tokio::time::sleep(Duration::from_millis(2)).await;
        let b = store.checkout(None).await.unwrap().session_id;
        tokio::time::sleep(Duration::from_millis(2)).await;
        // Touch `a` so `b` becomes the oldest
        store.checkout(Some(&a)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;

        let c = store.checkout(None).await.unwrap().session_id;
        assert_eq!(store.len().await, 2);
        assert!(store.snapshot(&a).await.is_some());
        assert!(store.snapshot(&b).await.is_none());
        assert!(store.snapshot(&c).await.is_some());
    }

    #[tokio::test]
    async fn test_capacity_never_evicts_session_with_turn_in_flight() {
        let store = InMemorySessionStore::new(SessionLimits {
            ttl: None,
            max_sessions: Some(1),
        });
        let busy = store.checkout(None).await.unwrap();
        let guard = busy.session.lock().await;

        let other = store.checkout(None).await.unwrap();
        assert_eq!(store.len().await, 2);
        drop(guard);
        assert!(store.snapshot(&busy.session_id).await.is_some());

        // Once both leases are gone the next checkout evicts down to capacity
        let busy_id = busy.session_id.clone();
        drop(busy);
        drop(other);
        let next = store.checkout(None).await.unwrap().session_id;
        assert_eq!(store.len().await, 1);
        assert!(store.snapshot(&busy_id).await.is_none());
        assert!(store.snapshot(&next).await.is_some());
    }

    #[tokio::test]
    async fn test_snapshot_reflects_session() {
        let store = unbounded();
        let lease = store.checkout(None).await.unwrap();
        lease.session.lock().await.draft.personal.amount = Some(750);
        let snapshot = store.snapshot(&lease.session_id).await.unwrap();
        assert_eq!(snapshot.draft.personal.amount, Some(750));
    }
}
