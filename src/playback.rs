//! Playback-state synchronization.
//!
//! [`TransportController`] owns the single [`PlaybackSession`], the current
//! catalog and the mute memory. Every command computes the new
//! `(index, state)` pair once and publishes it as a [`Notification`]; views
//! project those notifications and never derive playback state themselves.

mod controller;
mod events;
mod mute;
mod selection;
mod session;

pub use controller::TransportController;
pub use events::{Notification, TransportState};
pub use session::PlaybackSession;
