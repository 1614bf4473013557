//! Capabilities the aggregator consumes, and the sink it forwards to.

use crate::{Notification, PushEvent, ServerNotification};
use async_trait::async_trait;
use console_storage::Credential;
use console_types::{ApiResult, PrincipalId};
use std::fmt;
use tokio::sync::mpsc;

/// Which notifications a read acknowledgment covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadAck {
    One(String),
    All,
}

#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Current notifications of the signed-in principal.
    async fn fetch_snapshot(&self) -> ApiResult<Vec<ServerNotification>>;

    /// Record that notifications were read.
    async fn acknowledge_read(&self, ack: ReadAck) -> ApiResult<()>;
}

/// Closes a live subscription. Closing twice is harmless.
pub trait SubscriptionHandle: Send + Sync {
    fn close(&self);
}

/// An open live channel.
pub struct LiveSubscription {
    pub events: mpsc::UnboundedReceiver<PushEvent>,
    pub handle: Box<dyn SubscriptionHandle>,
}

impl fmt::Debug for LiveSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSubscription").finish_non_exhaustive()
    }
}

/// Push-delivery transport. Its wire protocol and reconnection are opaque.
#[async_trait]
pub trait LiveTransport: Send + Sync {
    async fn open(
        &self,
        principal: &PrincipalId,
        credential: Option<&Credential>,
    ) -> ApiResult<LiveSubscription>;
}

/// Receiver of newly inserted live notifications.
///
/// Called synchronously right after insertion; implementations must not
/// block and do their own work on a spawned task.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}
