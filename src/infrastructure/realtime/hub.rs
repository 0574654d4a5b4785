use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::ports::realtime_port::{RealtimeEvent, RealtimePort};

struct Connection {
    id: u64,
    tx: mpsc::UnboundedSender<RealtimeEvent>,
}

/// A live socket's half of the hub. Events for the user arrive on `rx`.
pub struct Subscription {
    pub user_id: Uuid,
    pub conn_id: u64,
    pub rx: mpsc::UnboundedReceiver<RealtimeEvent>,
}

/// In-process registry of sockets per user. Fan-out is best effort: a closed
/// socket is dropped on the next send and never retried.
#[derive(Clone, Default)]
pub struct RealtimeHub {
    inner: Arc<RwLock<HashMap<Uuid, Vec<Connection>>>>,
    next_id: Arc<AtomicU64>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connect(&self, user_id: Uuid) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut guard = self.inner.write().await;
            let conns = guard.entry(user_id).or_default();
            conns.push(Connection { id: conn_id, tx });
            // Presence goes out under the same lock so watchers see
            // transitions in the order they happened.
            if conns.len() == 1 {
                broadcast_presence(&guard, user_id, true);
            }
        }
        tracing::debug!(user_id = %user_id, conn_id, "realtime_connected");
        Subscription {
            user_id,
            conn_id,
            rx,
        }
    }

    pub async fn disconnect(&self, user_id: Uuid, conn_id: u64) {
        {
            let mut guard = self.inner.write().await;
            let Some(conns) = guard.get_mut(&user_id) else {
                return;
            };
            conns.retain(|c| c.id != conn_id);
            if conns.is_empty() {
                guard.remove(&user_id);
                broadcast_presence(&guard, user_id, false);
            }
        }
        tracing::debug!(user_id = %user_id, conn_id, "realtime_disconnected");
    }
}

fn broadcast_presence(conns: &HashMap<Uuid, Vec<Connection>>, user_id: Uuid, online: bool) {
    let event = RealtimeEvent::Presence { user_id, online };
    for (other, conns) in conns {
        if *other == user_id {
            continue;
        }
        for c in conns {
            let _ = c.tx.send(event.clone());
        }
    }
}

#[async_trait]
impl RealtimePort for RealtimeHub {
    async fn send_to_user(&self, user_id: Uuid, event: RealtimeEvent) -> usize {
        let mut guard = self.inner.write().await;
        let Some(conns) = guard.get_mut(&user_id) else {
            return 0;
        };
        let mut delivered = 0;
        conns.retain(|c| match c.tx.send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });
        if conns.is_empty() {
            guard.remove(&user_id);
        }
        delivered
    }

    async fn is_online(&self, user_id: Uuid) -> bool {
        self.inner.read().await.contains_key(&user_id)
    }
}
