/// Transport state as shown to the user.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing has been played yet, or the loaded track failed.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// State changes published by the transport controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// Playback position of the loaded track, in seconds.
    PositionChanged { current: f64, total: Option<f64> },
    /// Emitted after every transport operation. `index` is the catalog entry
    /// to highlight, `None` when unresolved.
    PlaybackStateChanged {
        index: Option<usize>,
        state: TransportState,
    },
    VolumeChanged(f32),
    PlaybackEnded,
}
