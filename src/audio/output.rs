use std::time::Duration;

use super::types::OutputStatus;

/// A single physical audio output as seen by the playback session.
///
/// Implementations must not block: commands are fire-and-forget and the
/// session learns about their effect on the next [`poll`](AudioOutput::poll).
pub trait AudioOutput {
    /// Replace the current track with the one at `url`; output stays paused.
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    /// Jump to an absolute position in the current track.
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, level: f32);
    /// Current status of the most recently loaded track.
    fn poll(&mut self) -> OutputStatus;
    /// Release the device, fading out over `fade_out`.
    fn shutdown(&mut self, _fade_out: Duration) {}
}
