//! Notification Aggregator.
//!
//! Owns the feed and the live-channel subscription. Feed mutations are
//! synchronous under one lock; network effects (snapshot fetch, read
//! acknowledgment, channel connect) run as tasks on the runtime handle and
//! never block a mutation.
//!
//! The feed epoch is bumped whenever the feed is reset for a new or ended
//! session. Snapshot results, connects and pump deliveries that started
//! under an older epoch are dropped.

use crate::api::{LiveTransport, NotificationApi, NotificationSink, ReadAck, SubscriptionHandle};
use crate::feed::{FeedView, NotificationFeed};
use crate::model::{Notification, PushEvent};
use chrono::Utc;
use console_session::SessionState;
use console_storage::Credential;
use console_types::PrincipalId;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Feed owner and live-channel lifecycle.
///
/// Cheap to clone; clones share the same feed.
#[derive(Clone)]
pub struct NotificationAggregator {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn NotificationApi>,
    transport: Arc<dyn LiveTransport>,
    sink: RwLock<Option<Arc<dyn NotificationSink>>>,
    core: Mutex<Core>,
    view_tx: watch::Sender<FeedView>,
    runtime: tokio::runtime::Handle,
}

struct Core {
    feed: NotificationFeed,
    epoch: u64,
    channel: Channel,
}

enum Channel {
    Idle,
    Connecting { principal: PrincipalId },
    Open(Live),
}

struct Live {
    principal: PrincipalId,
    handle: Box<dyn SubscriptionHandle>,
    cancel: CancellationToken,
}

impl Live {
    fn close(self) {
        self.cancel.cancel();
        self.handle.close();
        info!(principal_id = %self.principal, "Live channel closed");
    }
}

impl Channel {
    fn principal(&self) -> Option<&PrincipalId> {
        match self {
            Channel::Idle => None,
            Channel::Connecting { principal } => Some(principal),
            Channel::Open(live) => Some(&live.principal),
        }
    }
}

impl NotificationAggregator {
    pub fn new(
        api: Arc<dyn NotificationApi>,
        transport: Arc<dyn LiveTransport>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let (view_tx, _) = watch::channel(FeedView::default());
        Self {
            inner: Arc::new(Inner {
                api,
                transport,
                sink: RwLock::new(None),
                core: Mutex::new(Core {
                    feed: NotificationFeed::new(),
                    epoch: 0,
                    channel: Channel::Idle,
                }),
                view_tx,
                runtime,
            }),
        }
    }

    /// Forward newly pushed notifications to `sink`.
    pub fn set_sink(&self, sink: Arc<dyn NotificationSink>) {
        *self.inner.sink.write() = Some(sink);
    }

    pub fn clear_sink(&self) {
        *self.inner.sink.write() = None;
    }

    /// Replace the feed with the server snapshot.
    ///
    /// A failed fetch leaves the feed empty and is only logged.
    pub async fn load_snapshot(&self) {
        let epoch = self.inner.core.lock().epoch;
        self.load_snapshot_for(epoch).await;
    }

    /// Load the snapshot on behalf of the session that owns `epoch`. Nothing
    /// is applied once that session has been reset.
    async fn load_snapshot_for(&self, epoch: u64) {
        let push_seq = {
            let core = self.inner.core.lock();
            if core.epoch != epoch {
                return;
            }
            core.feed.push_seq()
        };

        let result = self.inner.api.fetch_snapshot().await;

        let mut core = self.inner.core.lock();
        if core.epoch != epoch {
            debug!(epoch, current = core.epoch, "Discarding snapshot from superseded session");
            return;
        }

        match result {
            Ok(items) => {
                let received_at = Utc::now();
                let len = core.feed.replace_with_snapshot(
                    items
                        .into_iter()
                        .map(|item| Notification::from_server(item, received_at)),
                    push_seq,
                );
                info!(notifications = len, unread = core.feed.unread_count(), "Snapshot loaded");
            }
            Err(e) => {
                warn!(error = %e, "Snapshot fetch failed, starting from an empty feed");
                core.feed.clear();
            }
        }
        self.inner.publish(&core);
    }

    /// Insert a pushed notification at the head unless its id is already
    /// present. Returns whether it was inserted.
    pub fn apply_push(&self, event: PushEvent) -> bool {
        self.inner.apply_push(event, None)
    }

    /// Mark one notification read locally, then acknowledge it in the
    /// background. A failed acknowledgment does not undo the local change.
    pub fn mark_read(&self, id: &str) -> bool {
        let changed = {
            let mut core = self.inner.core.lock();
            let changed = core.feed.mark_read(id);
            if changed {
                self.inner.publish(&core);
            }
            changed
        };
        if changed {
            self.inner.acknowledge(ReadAck::One(id.to_string()));
        }
        changed
    }

    /// Mark every notification read locally and acknowledge in the
    /// background. Returns how many entries changed.
    pub fn mark_all_read(&self) -> usize {
        let changed = {
            let mut core = self.inner.core.lock();
            let changed = core.feed.mark_all_read();
            if changed > 0 {
                self.inner.publish(&core);
            }
            changed
        };
        self.inner.acknowledge(ReadAck::All);
        changed
    }

    /// Dismiss a notification locally. No server call.
    pub fn remove(&self, id: &str) -> bool {
        let mut core = self.inner.core.lock();
        let removed = core.feed.remove(id);
        if removed {
            self.inner.publish(&core);
        }
        removed
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.core.lock().feed.to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.inner.core.lock().feed.unread_count()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedView> {
        self.inner.view_tx.subscribe()
    }

    /// Principal the live channel is open (or opening) for.
    pub fn live_principal(&self) -> Option<PrincipalId> {
        self.inner.core.lock().channel.principal().cloned()
    }

    pub fn is_live(&self) -> bool {
        matches!(self.inner.core.lock().channel, Channel::Open(_))
    }

    /// Follow a session state change. Returns without waiting on the network.
    ///
    /// - authenticated with a real principal: open the live channel for it
    ///   (no-op when already open or opening for the same principal), then
    ///   load the snapshot in the background
    /// - unauthenticated or verifying: close the channel and clear the feed
    /// - authenticated with the placeholder principal: nothing
    pub fn sync_session(&self, state: &SessionState, credential: Option<Credential>) {
        match state {
            SessionState::Unauthenticated | SessionState::Verifying => self.reset(),
            SessionState::Authenticated(principal) | SessionState::DegradedAuthenticated(principal) => {
                if principal.is_placeholder() {
                    debug!("No known principal, live channel not opened");
                    return;
                }
                let Some(epoch) = self.begin_connect(&principal.id) else {
                    return;
                };
                let aggregator = self.clone();
                let principal = principal.id.clone();
                self.inner.runtime.spawn(async move {
                    if aggregator.connect(principal, credential, epoch).await {
                        aggregator.load_snapshot_for(epoch).await;
                    }
                });
            }
        }
    }

    /// Close the channel and clear the feed.
    pub fn reset(&self) {
        let previous = {
            let mut core = self.inner.core.lock();
            core.epoch += 1;
            core.feed.clear();
            self.inner.publish(&core);
            std::mem::replace(&mut core.channel, Channel::Idle)
        };
        if let Channel::Open(live) = previous {
            live.close();
        }
    }

    /// Close the live subscription and stop the pump. The feed is kept.
    pub fn shutdown(&self) {
        let previous = {
            let mut core = self.inner.core.lock();
            core.epoch += 1;
            std::mem::replace(&mut core.channel, Channel::Idle)
        };
        if let Channel::Open(live) = previous {
            live.close();
        }
    }

    /// Start a new feed session for `principal`. Returns its epoch, or `None`
    /// when the channel is already open or opening for that principal.
    fn begin_connect(&self, principal: &PrincipalId) -> Option<u64> {
        let (epoch, previous) = {
            let mut core = self.inner.core.lock();
            if core.channel.principal() == Some(principal) {
                debug!(principal_id = %principal, "Live channel already active");
                return None;
            }
            core.epoch += 1;
            core.feed.clear();
            self.inner.publish(&core);
            let previous = std::mem::replace(
                &mut core.channel,
                Channel::Connecting {
                    principal: principal.clone(),
                },
            );
            (core.epoch, previous)
        };
        if let Channel::Open(live) = previous {
            live.close();
        }
        Some(epoch)
    }

    /// Connect the live channel started by `begin_connect`. Returns false when
    /// the session was superseded before the connect finished.
    async fn connect(&self, principal: PrincipalId, credential: Option<Credential>, epoch: u64) -> bool {
        let result = self.inner.transport.open(&principal, credential.as_ref()).await;

        let mut core = self.inner.core.lock();
        if core.epoch != epoch {
            drop(core);
            if let Ok(subscription) = result {
                debug!(principal_id = %principal, "Closing live channel opened for a superseded session");
                subscription.handle.close();
            }
            return false;
        }

        match result {
            Ok(subscription) => {
                let cancel = CancellationToken::new();
                self.inner.runtime.spawn(pump(
                    Arc::clone(&self.inner),
                    subscription.events,
                    cancel.clone(),
                    epoch,
                ));
                core.channel = Channel::Open(Live {
                    principal: principal.clone(),
                    handle: subscription.handle,
                    cancel,
                });
                info!(principal_id = %principal, "Live channel opened");
            }
            Err(e) => {
                warn!(principal_id = %principal, error = %e, "Live channel connect failed");
                core.channel = Channel::Idle;
            }
        }
        true
    }
}

impl Inner {
    fn publish(&self, core: &Core) {
        self.view_tx.send_replace(core.feed.view());
    }

    /// Insert unless duplicate. `epoch` restricts delivery to one session.
    fn apply_push(&self, event: PushEvent, epoch: Option<u64>) -> bool {
        let notification = Notification::from_push(event, Utc::now());
        {
            let mut core = self.core.lock();
            if epoch.is_some_and(|e| e != core.epoch) {
                debug!(id = %notification.id, "Dropping push from superseded session");
                return false;
            }
            if !core.feed.insert_pushed(notification.clone()) {
                debug!(id = %notification.id, "Duplicate push ignored");
                return false;
            }
            self.publish(&core);
        }

        debug!(id = %notification.id, kind = %notification.kind, "Push applied");
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink.notify(&notification);
        }
        true
    }

    fn acknowledge(&self, ack: ReadAck) {
        let api = Arc::clone(&self.api);
        self.runtime.spawn(async move {
            if let Err(e) = api.acknowledge_read(ack.clone()).await {
                warn!(?ack, error = %e, "Read acknowledgment failed, keeping local state");
            }
        });
    }
}

async fn pump(
    inner: Arc<Inner>,
    mut events: mpsc::UnboundedReceiver<PushEvent>,
    cancel: CancellationToken,
    epoch: u64,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => {
                    inner.apply_push(event, Some(epoch));
                }
                None => {
                    debug!("Live channel stream ended");
                    break;
                }
            },
        }
    }
}
