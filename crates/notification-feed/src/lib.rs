//! Notification Aggregator for the loyalty console runtime.
//!
//! Holds the newest-first, deduplicated notification feed. The feed is
//! seeded from a server snapshot and kept current by a live push channel
//! whose lifecycle follows the session.
//!
//! This crate provides:
//! - `NotificationAggregator`: feed owner and live-channel lifecycle
//! - `NotificationApi` / `LiveTransport`: capabilities consumed from the backend
//! - `NotificationSink`: where newly pushed notifications are forwarded
//! - `LocalTransport`: in-process live transport fed by the host

mod aggregator;
mod api;
mod channel;
mod error;
mod feed;
mod model;

pub use aggregator::NotificationAggregator;
pub use api::{
    LiveSubscription, LiveTransport, NotificationApi, NotificationSink, ReadAck,
    SubscriptionHandle,
};
pub use channel::LocalTransport;
pub use error::{FeedError, FeedResult};
pub use feed::{FeedView, NotificationFeed};
pub use model::{Notification, PushEvent, ServerNotification};
