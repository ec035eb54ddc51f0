//! Terminal event model and the log broadcast hub.
//!
//! [`TerminalHub`] is the central fan-out point between job execution and
//! browser terminals: the runner publishes [`TerminalEvent`]s keyed by job
//! id, and each WebSocket connection that subscribed to that id receives
//! them in publish order. It is designed to be shared via `Arc<TerminalHub>`
//! across the application.

pub mod event;
pub mod hub;

pub use event::{EventKind, TerminalEvent};
pub use hub::{EventSender, SubscriberId, TerminalHub};
