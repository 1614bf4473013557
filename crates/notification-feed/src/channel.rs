//! In-process live transport.
//!
//! Used when the host owns the push connection itself and hands decoded or
//! raw frames to the runtime.

use crate::api::{LiveSubscription, LiveTransport, SubscriptionHandle};
use crate::{FeedError, FeedResult, PushEvent};
use async_trait::async_trait;
use console_storage::Credential;
use console_types::{ApiResult, PrincipalId};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

type Senders = Arc<Mutex<Vec<(u64, PrincipalId, mpsc::UnboundedSender<PushEvent>)>>>;

/// Live transport fed by [`LocalTransport::publish`].
///
/// Every open subscription receives every published event.
#[derive(Clone, Default)]
pub struct LocalTransport {
    senders: Senders,
    next_id: Arc<Mutex<u64>>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to all open subscriptions.
    pub fn publish(&self, event: PushEvent) -> FeedResult<()> {
        let mut senders = self.senders.lock();
        senders.retain(|(_, _, tx)| !tx.is_closed());
        if senders.is_empty() {
            return Err(FeedError::NotSubscribed);
        }
        for (_, _, tx) in senders.iter() {
            let _ = tx.send(event.clone());
        }
        Ok(())
    }

    /// Decode a JSON push frame and deliver it.
    pub fn publish_json(&self, raw: &str) -> FeedResult<()> {
        let event: PushEvent = serde_json::from_str(raw)?;
        self.publish(event)
    }

    pub fn is_open(&self) -> bool {
        self.open_count() > 0
    }

    pub fn open_count(&self) -> usize {
        self.senders
            .lock()
            .iter()
            .filter(|(_, _, tx)| !tx.is_closed())
            .count()
    }

    /// Principals with an open subscription, oldest first.
    pub fn subscribers(&self) -> Vec<PrincipalId> {
        self.senders
            .lock()
            .iter()
            .filter(|(_, _, tx)| !tx.is_closed())
            .map(|(_, principal, _)| principal.clone())
            .collect()
    }
}

struct LocalHandle {
    id: u64,
    senders: Senders,
}

impl SubscriptionHandle for LocalHandle {
    fn close(&self) {
        self.senders.lock().retain(|(id, _, _)| *id != self.id);
    }
}

#[async_trait]
impl LiveTransport for LocalTransport {
    async fn open(
        &self,
        principal: &PrincipalId,
        _credential: Option<&Credential>,
    ) -> ApiResult<LiveSubscription> {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().push((id, principal.clone(), tx));
        debug!(principal_id = %principal, subscription = id, "Local subscription opened");

        Ok(LiveSubscription {
            events: rx,
            handle: Box::new(LocalHandle {
                id,
                senders: Arc::clone(&self.senders),
            }),
        })
    }
}
