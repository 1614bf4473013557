//! Fixed delays used by the runtime components.

use std::time::Duration;

/// Quiet period after a guard-issued navigation completes before another
/// redirect may be issued.
pub const REDIRECT_COOLDOWN: Duration = Duration::from_secs(2);

/// Delay before the single automatic retry of a notification permission request.
pub const PERMISSION_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Lifetime of a displayed native notification.
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Timeout applied to every backend request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);
