//! Audio output layer.
//!
//! The playback core talks to an [`AudioOutput`]: either the `rodio`-backed
//! [`RodioOutput`], which owns the device on its own thread, or the
//! device-less [`NullOutput`].

mod null;
mod output;
mod player;
mod sink;
mod thread;
mod types;

pub use null::NullOutput;
#[cfg(test)]
pub use null::NullOutputHandle;
pub use output::AudioOutput;
pub use player::RodioOutput;
