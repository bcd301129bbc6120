//! toastline library - transient toast notifications
//!
//! A [`ToastChannel`] holds at most one toast, lets any number of observers
//! follow it and clears it automatically after a fixed delay.

pub mod config;
pub mod error;
pub mod notification;

// Re-export commonly used types for convenience
pub use config::{Config, OverlapPolicy, ToastConfig};
pub use error::ToastError;
pub use notification::{DEFAULT_CLEAR_DELAY, Subscription, Toast, ToastChannel, ToastKind};
