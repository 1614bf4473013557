//! Native Notification Bridge for the loyalty console runtime.
//!
//! Turns feed insertions into operating-system notifications. Permission is
//! acquired with a bounded strategy: one attempt when the session becomes
//! eligible, one timed retry, and one attempt on the first user interaction.
//! A permission that reached `granted` or `denied` is never requested again.

mod bridge;
mod error;
mod permission_fsm;
mod platform;

pub use bridge::{InteractionKind, NotificationBridge, AUTOMATIC_PERMISSION_ATTEMPTS};
pub use error::{PlatformError, PlatformResult};
pub use permission_fsm::{
    PermissionMachine, PermissionMachineInput, PermissionMachineState, PermissionState,
};
pub use platform::{
    DisplayEvent, DisplayHandle, DisplayOptions, DisplayedNotification, NotificationPlatform,
};
