use crate::playback::{Notification, TransportState};

/// What the views show about playback.
///
/// Updated only by applying [`Notification`]s, so the screen can never
/// disagree with what the transport controller published.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflector {
    active_index: Option<usize>,
    state: TransportState,
    position: f64,
    duration: Option<f64>,
    volume: f32,
    ended: bool,
}

impl Reflector {
    pub fn new(volume: f32) -> Self {
        Self {
            active_index: None,
            state: TransportState::Idle,
            position: 0.0,
            duration: None,
            volume,
            ended: false,
        }
    }

    pub fn apply(&mut self, notification: &Notification) {
        match *notification {
            Notification::PositionChanged { current, total } => {
                self.position = current;
                self.duration = total;
            }
            Notification::PlaybackStateChanged { index, state } => {
                self.active_index = index;
                self.state = state;
                if state == TransportState::Playing {
                    self.ended = false;
                }
            }
            Notification::VolumeChanged(level) => self.volume = level,
            Notification::PlaybackEnded => self.ended = true,
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.volume <= 0.0
    }

    /// The last track played to its end and nothing was started since.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Played share of the track in `0.0..=1.0`; zero while the length is
    /// unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(total) if total > 0.0 => (self.position / total).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Marker for playlist row `index`. Only the active row carries one.
    pub fn marker(&self, index: usize) -> &'static str {
        if self.active_index != Some(index) {
            return "  ";
        }
        match self.state {
            TransportState::Playing => "▶ ",
            TransportState::Paused => "⏸ ",
            TransportState::Idle => "  ",
        }
    }
}
