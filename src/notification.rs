//! Notification module for toastline
//!
//! Provides a shared toast channel that holds at most one transient message.
//! Any component holding a [`ToastChannel`] can publish a toast or observe
//! the current one; the channel clears itself after a fixed delay.

mod channel;
mod clear_timer;
mod notification_render;
mod notification_state;
mod observers;

pub use channel::{DEFAULT_CLEAR_DELAY, ToastChannel};
pub use notification_render::{render_json, render_line};
pub use notification_state::{Toast, ToastKind};
pub use observers::Subscription;
