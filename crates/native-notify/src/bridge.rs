//! Native notification bridge.
//!
//! Permission attempts are bounded per signed-in session. Automatic attempts
//! share a budget of [`AUTOMATIC_PERMISSION_ATTEMPTS`]:
//! - one when the session becomes eligible
//! - one retry after the retry delay, if still undecided
//! - one from `show`, if still undecided and no other attempt is running
//!
//! The first user interaction after eligibility adds one more attempt.
//!
//! Only one request is in flight at a time; an attempt that would overlap is
//! dropped, and the trigger that issued it is spent. [`NotificationBridge::reset`]
//! restores the budget for the next session.

use crate::{
    DisplayEvent, DisplayOptions, DisplayedNotification, NotificationPlatform, PermissionMachine,
    PermissionState,
};
use console_config::timing::{AUTO_DISMISS_AFTER, PERMISSION_RETRY_DELAY};
use console_types::Navigator;
use notification_feed::{Notification, NotificationSink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Permission requests a session may issue without user interaction.
pub const AUTOMATIC_PERMISSION_ATTEMPTS: usize = 2;

/// User-originated interaction that may carry a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Pointer,
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Eligible,
    Retry,
    Display,
    Interaction,
}

impl Trigger {
    fn is_automatic(self) -> bool {
        self != Trigger::Interaction
    }
}

/// Displays feed notifications through the host platform.
#[derive(Clone)]
pub struct NotificationBridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    platform: Arc<dyn NotificationPlatform>,
    navigator: Arc<dyn Navigator>,
    machine: Mutex<PermissionMachine>,
    eligible: AtomicBool,
    interaction_armed: AtomicBool,
    request_in_flight: AtomicBool,
    display_requested: AtomicBool,
    automatic_attempts: AtomicUsize,
    retry_delay: Duration,
    dismiss_after: Duration,
    shutdown: CancellationToken,
    /// Child of `shutdown`, replaced on every `reset`.
    session: Mutex<CancellationToken>,
    runtime: tokio::runtime::Handle,
}

impl NotificationBridge {
    pub fn new(
        platform: Arc<dyn NotificationPlatform>,
        navigator: Arc<dyn Navigator>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self::with_timing(
            platform,
            navigator,
            runtime,
            PERMISSION_RETRY_DELAY,
            AUTO_DISMISS_AFTER,
        )
    }

    pub fn with_timing(
        platform: Arc<dyn NotificationPlatform>,
        navigator: Arc<dyn Navigator>,
        runtime: tokio::runtime::Handle,
        retry_delay: Duration,
        dismiss_after: Duration,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let bridge = Self {
            inner: Arc::new(BridgeInner {
                platform,
                navigator,
                machine: Mutex::new(PermissionMachine::new()),
                eligible: AtomicBool::new(false),
                interaction_armed: AtomicBool::new(false),
                request_in_flight: AtomicBool::new(false),
                display_requested: AtomicBool::new(false),
                automatic_attempts: AtomicUsize::new(0),
                retry_delay,
                dismiss_after,
                session: Mutex::new(shutdown.child_token()),
                shutdown,
                runtime,
            }),
        };
        bridge.permission();
        bridge
    }

    pub fn is_supported(&self) -> bool {
        self.inner.platform.is_supported()
    }

    /// Current permission. Unsupported platforms report `Default`.
    pub fn permission(&self) -> PermissionState {
        self.inner.sync_permission()
    }

    /// Start the acquisition strategy. Only the first call per session has an
    /// effect; [`reset`](Self::reset) re-enables it.
    pub fn on_eligible(&self) {
        if self.inner.shutdown.is_cancelled() || self.inner.eligible.swap(true, Ordering::AcqRel) {
            return;
        }
        if !self.is_supported() {
            debug!("Native notifications unsupported, no permission request");
            return;
        }
        let permission = self.permission();
        if permission.is_terminal() {
            debug!(?permission, "Notification permission already decided");
            return;
        }

        self.inner.interaction_armed.store(true, Ordering::Release);

        let inner = Arc::clone(&self.inner);
        let session = self.inner.session.lock().clone();
        self.inner.runtime.spawn(async move {
            if inner.request(Trigger::Eligible).await.is_terminal() {
                return;
            }
            tokio::select! {
                _ = session.cancelled() => return,
                _ = tokio::time::sleep(inner.retry_delay) => {}
            }
            inner.request(Trigger::Retry).await;
        });
    }

    /// Report a user interaction. The first one after `on_eligible` fires one
    /// more attempt if the permission is still undecided.
    pub fn user_interacted(&self, kind: InteractionKind) {
        if !self.inner.interaction_armed.swap(false, Ordering::AcqRel) {
            return;
        }
        if self.inner.shutdown.is_cancelled() || self.permission().is_terminal() {
            return;
        }
        debug!(?kind, "First interaction, requesting notification permission");
        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            inner.request(Trigger::Interaction).await;
        });
    }

    /// Display `notification`. Returns whether the platform accepted it.
    pub async fn show(&self, notification: &Notification) -> bool {
        if self.inner.shutdown.is_cancelled() || !self.is_supported() {
            return false;
        }

        let mut permission = self.permission();
        if permission == PermissionState::Default {
            if self.inner.request_in_flight.load(Ordering::Acquire) {
                debug!(id = %notification.id, "Permission request pending, notification not shown");
                return false;
            }
            if self.inner.display_requested.swap(true, Ordering::AcqRel) {
                return false;
            }
            permission = self.inner.request(Trigger::Display).await;
        }
        if permission != PermissionState::Granted {
            debug!(id = %notification.id, ?permission, "Notification not shown");
            return false;
        }

        let options = DisplayOptions::for_notification(notification);
        match self.inner.platform.display(options) {
            Ok(displayed) => {
                debug!(id = %notification.id, "Native notification displayed");
                self.inner.runtime.spawn(supervise(
                    Arc::clone(&self.inner),
                    self.inner.session.lock().clone(),
                    notification.id.clone(),
                    displayed,
                    click_route(notification),
                ));
                true
            }
            Err(e) => {
                warn!(id = %notification.id, error = %e, "Failed to display native notification");
                false
            }
        }
    }

    /// End the current session's strategy: cancel the pending retry, close
    /// displayed notifications and restore the attempt budget. The next
    /// `on_eligible` starts over.
    pub fn reset(&self) {
        let previous = {
            let mut session = self.inner.session.lock();
            std::mem::replace(&mut *session, self.inner.shutdown.child_token())
        };
        previous.cancel();
        self.inner.eligible.store(false, Ordering::Release);
        self.inner.interaction_armed.store(false, Ordering::Release);
        self.inner.display_requested.store(false, Ordering::Release);
        self.inner.automatic_attempts.store(0, Ordering::Release);
    }

    /// Stop the retry timer, close displayed notifications and disarm the
    /// interaction trigger.
    pub fn teardown(&self) {
        self.inner.shutdown.cancel();
        self.inner.interaction_armed.store(false, Ordering::Release);
    }
}

impl NotificationSink for NotificationBridge {
    fn notify(&self, notification: &Notification) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }
        let bridge = self.clone();
        let notification = notification.clone();
        self.inner.runtime.spawn(async move {
            bridge.show(&notification).await;
        });
    }
}

impl BridgeInner {
    /// Fold the platform-reported permission into the machine.
    fn sync_permission(&self) -> PermissionState {
        if !self.platform.is_supported() {
            return PermissionState::from(self.machine.lock().state());
        }
        self.observe(self.platform.permission())
    }

    fn observe(&self, reported: PermissionState) -> PermissionState {
        let mut machine = self.machine.lock();
        let current = PermissionState::from(machine.state());
        if reported == current || current.is_terminal() {
            return current;
        }
        match machine.consume(&reported.as_input()) {
            Ok(_) => info!(from = ?current, to = ?reported, "Notification permission changed"),
            Err(_) => debug!(from = ?current, to = ?reported, "Ignoring permission report"),
        }
        PermissionState::from(machine.state())
    }

    /// One permission attempt, coalesced with any attempt already running.
    async fn request(&self, trigger: Trigger) -> PermissionState {
        let current = self.sync_permission();
        if current.is_terminal() || !self.platform.is_supported() {
            return current;
        }
        if self.request_in_flight.swap(true, Ordering::AcqRel) {
            debug!(?trigger, "Permission request already in flight");
            return current;
        }
        if trigger.is_automatic() && !self.take_automatic_attempt() {
            self.request_in_flight.store(false, Ordering::Release);
            debug!(?trigger, "Automatic permission attempts used up");
            return current;
        }

        info!(?trigger, "Requesting notification permission");
        let result = self.platform.request_permission().await;
        self.request_in_flight.store(false, Ordering::Release);

        match result {
            Ok(answer) => self.observe(answer),
            Err(e) => {
                warn!(?trigger, error = %e, "Permission request failed");
                current
            }
        }
    }

    fn take_automatic_attempt(&self) -> bool {
        self.automatic_attempts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < AUTOMATIC_PERMISSION_ATTEMPTS).then_some(used + 1)
            })
            .is_ok()
    }

    async fn open_target(&self, route: Option<&str>) {
        self.navigator.focus_window();
        let Some(route) = route else {
            return;
        };
        if let Err(e) = self.navigator.navigate(route).await {
            warn!(error = %e, "In-app navigation failed, falling back to hard navigation");
            self.navigator.hard_navigate(route);
        }
    }
}

/// Route opened when a notification is clicked.
fn click_route(notification: &Notification) -> Option<String> {
    notification
        .campaign_reference()
        .map(|campaign| format!("/campaigns/{campaign}"))
        .or_else(|| notification.link_url().map(str::to_string))
}

/// Follow one displayed notification until it is closed, clicked or dismissed.
async fn supervise(
    inner: Arc<BridgeInner>,
    session: CancellationToken,
    id: String,
    displayed: DisplayedNotification,
    route: Option<String>,
) {
    let DisplayedNotification { mut events, handle } = displayed;
    let dismiss = tokio::time::sleep(inner.dismiss_after);
    tokio::pin!(dismiss);
    let mut events_open = true;

    loop {
        tokio::select! {
            _ = session.cancelled() => {
                handle.close();
                break;
            }
            _ = &mut dismiss => {
                debug!(id = %id, "Auto-dismissing native notification");
                handle.close();
                break;
            }
            event = events.recv(), if events_open => match event {
                Some(DisplayEvent::Shown) => {}
                Some(DisplayEvent::Clicked) => {
                    info!(id = %id, route = ?route, "Native notification clicked");
                    inner.open_target(route.as_deref()).await;
                    handle.close();
                    break;
                }
                Some(DisplayEvent::Closed) => break,
                Some(DisplayEvent::Error(message)) => {
                    warn!(id = %id, error = %message, "Native notification error");
                    break;
                }
                None => events_open = false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DisplayHandle, PlatformError, PlatformResult};
    use async_trait::async_trait;
    use console_types::NavigationError;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::{mpsc, Notify};

    struct FakePlatform {
        supported: bool,
        permission: Mutex<PermissionState>,
        answers: Mutex<VecDeque<PermissionState>>,
        requests: AtomicUsize,
        gate: Option<Arc<Notify>>,
        fail_display: bool,
        displayed: Mutex<Vec<DisplayOptions>>,
        senders: Mutex<Vec<mpsc::UnboundedSender<DisplayEvent>>>,
        closed: Mutex<Vec<Arc<AtomicBool>>>,
    }

    impl FakePlatform {
        fn new(permission: PermissionState) -> Self {
            Self {
                supported: true,
                permission: Mutex::new(permission),
                answers: Mutex::new(VecDeque::new()),
                requests: AtomicUsize::new(0),
                gate: None,
                fail_display: false,
                displayed: Mutex::new(Vec::new()),
                senders: Mutex::new(Vec::new()),
                closed: Mutex::new(Vec::new()),
            }
        }

        fn answering(answers: impl IntoIterator<Item = PermissionState>) -> Self {
            let platform = Self::new(PermissionState::Default);
            platform.answers.lock().extend(answers);
            platform
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }

        fn is_closed(&self, index: usize) -> bool {
            self.closed.lock()[index].load(Ordering::SeqCst)
        }
    }

    struct FlagHandle(Arc<AtomicBool>);

    impl DisplayHandle for FlagHandle {
        fn close(&self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl NotificationPlatform for FakePlatform {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn permission(&self) -> PermissionState {
            *self.permission.lock()
        }

        async fn request_permission(&self) -> PlatformResult<PermissionState> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let answer = self.answers.lock().pop_front().unwrap_or_default();
            *self.permission.lock() = answer;
            Ok(answer)
        }

        fn display(&self, options: DisplayOptions) -> PlatformResult<DisplayedNotification> {
            if self.fail_display {
                return Err(PlatformError::Display("blocked".into()));
            }
            self.displayed.lock().push(options);
            let (tx, rx) = mpsc::unbounded_channel();
            let _ = tx.send(DisplayEvent::Shown);
            let flag = Arc::new(AtomicBool::new(false));
            self.senders.lock().push(tx);
            self.closed.lock().push(flag.clone());
            Ok(DisplayedNotification {
                events: rx,
                handle: Box::new(FlagHandle(flag)),
            })
        }
    }

    #[derive(Default)]
    struct FakeNavigator {
        navigations: Mutex<Vec<String>>,
        focused: AtomicUsize,
    }

    #[async_trait]
    impl Navigator for FakeNavigator {
        async fn navigate(&self, route: &str) -> Result<(), NavigationError> {
            self.navigations.lock().push(route.to_string());
            Ok(())
        }

        fn hard_navigate(&self, _url: &str) {}

        fn focus_window(&self) {
            self.focused.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn bridge(platform: FakePlatform) -> (NotificationBridge, Arc<FakePlatform>, Arc<FakeNavigator>) {
        let platform = Arc::new(platform);
        let navigator = Arc::new(FakeNavigator::default());
        let bridge = NotificationBridge::new(
            platform.clone(),
            navigator.clone(),
            tokio::runtime::Handle::current(),
        );
        (bridge, platform, navigator)
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn campaign_notification() -> Notification {
        Notification::new("7", "campaign", "Approved").with_payload(json!({ "campaignId": 42 }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_permission_attempts_are_bounded() {
        let (bridge, platform, _) = bridge(FakePlatform::answering([]));

        bridge.on_eligible();
        settle().await;
        assert_eq!(platform.requests(), 1);

        bridge.on_eligible();
        settle().await;
        assert_eq!(platform.requests(), 1);

        tokio::time::advance(PERMISSION_RETRY_DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(platform.requests(), 2);

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(platform.requests(), 2);

        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;
        assert_eq!(platform.requests(), 3);

        bridge.user_interacted(InteractionKind::Key);
        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;
        assert_eq!(platform.requests(), 3);
        assert_eq!(bridge.permission(), PermissionState::Default);
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_request_counts_toward_automatic_attempts() {
        let (bridge, platform, _) = bridge(FakePlatform::answering([]));

        bridge.on_eligible();
        settle().await;
        assert_eq!(platform.requests(), 1);

        bridge.notify(&campaign_notification());
        settle().await;
        assert_eq!(platform.requests(), AUTOMATIC_PERMISSION_ATTEMPTS);

        tokio::time::advance(PERMISSION_RETRY_DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(platform.requests(), AUTOMATIC_PERMISSION_ATTEMPTS);
        assert!(platform.displayed.lock().is_empty());

        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;
        assert_eq!(platform.requests(), AUTOMATIC_PERMISSION_ATTEMPTS + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restarts_strategy_for_next_session() {
        let (bridge, platform, _) = bridge(FakePlatform::answering([]));

        bridge.on_eligible();
        settle().await;
        assert_eq!(platform.requests(), 1);

        bridge.reset();
        tokio::time::advance(PERMISSION_RETRY_DELAY * 2).await;
        settle().await;
        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;
        assert_eq!(platform.requests(), 1);

        bridge.on_eligible();
        settle().await;
        assert_eq!(platform.requests(), 2);

        bridge.user_interacted(InteractionKind::Key);
        settle().await;
        assert_eq!(platform.requests(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_closes_displayed() {
        let (bridge, platform, _) = bridge(FakePlatform::new(PermissionState::Granted));

        assert!(bridge.show(&campaign_notification()).await);
        settle().await;
        bridge.reset();
        settle().await;
        assert!(platform.is_closed(0));

        assert!(bridge.show(&campaign_notification()).await);
        settle().await;
        assert!(!platform.is_closed(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_granted_on_first_attempt_stops_strategy() {
        let (bridge, platform, _) = bridge(FakePlatform::answering([PermissionState::Granted]));

        bridge.on_eligible();
        settle().await;
        tokio::time::advance(PERMISSION_RETRY_DELAY * 2).await;
        settle().await;
        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;

        assert_eq!(platform.requests(), 1);
        assert_eq!(bridge.permission(), PermissionState::Granted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decided_permission_is_never_requested() {
        let (bridge, platform, _) = bridge(FakePlatform::new(PermissionState::Denied));

        bridge.on_eligible();
        bridge.user_interacted(InteractionKind::Key);
        tokio::time::advance(PERMISSION_RETRY_DELAY * 2).await;
        settle().await;
        assert!(!bridge.show(&campaign_notification()).await);

        assert_eq!(platform.requests(), 0);
        assert_eq!(bridge.permission(), PermissionState::Denied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_attempts_are_coalesced() {
        let gate = Arc::new(Notify::new());
        let mut platform = FakePlatform::answering([]);
        platform.gate = Some(gate.clone());
        let (bridge, platform, _) = bridge(platform);

        bridge.on_eligible();
        settle().await;
        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;
        assert!(!bridge.show(&campaign_notification()).await);
        assert_eq!(platform.requests(), 1);

        gate.notify_one();
        settle().await;
        tokio::time::advance(PERMISSION_RETRY_DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(platform.requests(), 2);

        gate.notify_one();
        settle().await;
        bridge.user_interacted(InteractionKind::Key);
        settle().await;
        assert_eq!(platform.requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_auto_dismisses() {
        let (bridge, platform, _) = bridge(FakePlatform::new(PermissionState::Granted));

        assert!(bridge.show(&campaign_notification()).await);
        assert_eq!(platform.displayed.lock()[0].tag, "notification-7");
        settle().await;
        assert!(!platform.is_closed(0));

        tokio::time::advance(AUTO_DISMISS_AFTER + Duration::from_millis(1)).await;
        settle().await;
        assert!(platform.is_closed(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_opens_campaign() {
        let (bridge, platform, navigator) = bridge(FakePlatform::new(PermissionState::Granted));

        assert!(bridge.show(&campaign_notification()).await);
        settle().await;
        platform.senders.lock()[0].send(DisplayEvent::Clicked).unwrap();
        settle().await;

        assert_eq!(navigator.focused.load(Ordering::SeqCst), 1);
        assert_eq!(*navigator.navigations.lock(), vec!["/campaigns/42".to_string()]);
        assert!(platform.is_closed(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_falls_back_to_url() {
        let (bridge, platform, navigator) = bridge(FakePlatform::new(PermissionState::Granted));
        let linked = Notification::new("8", "report", "Ready").with_payload(json!({ "url": "/reports/5" }));
        let plain = Notification::new("9", "info", "Hello");

        assert!(bridge.show(&linked).await);
        assert!(bridge.show(&plain).await);
        settle().await;
        for sender in platform.senders.lock().iter() {
            sender.send(DisplayEvent::Clicked).unwrap();
        }
        settle().await;

        assert_eq!(navigator.focused.load(Ordering::SeqCst), 2);
        assert_eq!(*navigator.navigations.lock(), vec!["/reports/5".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_requests_permission_once() {
        let (bridge, platform, _) = bridge(FakePlatform::answering([PermissionState::Default]));

        assert!(!bridge.show(&campaign_notification()).await);
        assert!(!bridge.show(&campaign_notification()).await);
        assert_eq!(platform.requests(), 1);
        assert!(platform.displayed.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_after_granting_prompt() {
        let (bridge, platform, _) = bridge(FakePlatform::answering([PermissionState::Granted]));

        assert!(bridge.show(&campaign_notification()).await);
        assert_eq!(platform.requests(), 1);
        assert_eq!(platform.displayed.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_display_failure_is_not_an_error() {
        let mut platform = FakePlatform::new(PermissionState::Granted);
        platform.fail_display = true;
        let (bridge, _, _) = bridge(platform);

        assert!(!bridge.show(&campaign_notification()).await);
    }

    #[tokio::test]
    async fn test_unsupported_platform() {
        let mut platform = FakePlatform::answering([PermissionState::Granted]);
        platform.supported = false;
        let (bridge, platform, _) = bridge(platform);

        bridge.on_eligible();
        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;
        assert!(!bridge.show(&campaign_notification()).await);
        assert_eq!(platform.requests(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_forwards_to_show() {
        let (bridge, platform, _) = bridge(FakePlatform::new(PermissionState::Granted));

        bridge.notify(&campaign_notification());
        settle().await;
        assert_eq!(platform.displayed.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_timers() {
        let (bridge, platform, _) = bridge(FakePlatform::answering([]));

        bridge.on_eligible();
        settle().await;
        assert_eq!(platform.requests(), 1);

        bridge.teardown();
        tokio::time::advance(PERMISSION_RETRY_DELAY * 2).await;
        settle().await;
        bridge.user_interacted(InteractionKind::Pointer);
        settle().await;
        assert_eq!(platform.requests(), 1);

        bridge.notify(&campaign_notification());
        settle().await;
        assert!(platform.displayed.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_closes_displayed() {
        let (bridge, platform, _) = bridge(FakePlatform::new(PermissionState::Granted));

        assert!(bridge.show(&campaign_notification()).await);
        settle().await;
        bridge.teardown();
        settle().await;
        assert!(platform.is_closed(0));
    }
}
