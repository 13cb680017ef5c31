use super::session::PlaybackSession;

/// Remembers the level to restore when unmuting.
#[derive(Debug, Default, Clone)]
pub struct MuteMemory {
    last_non_zero: Option<f32>,
}

impl MuteMemory {
    /// Mute when audible, otherwise restore the remembered level (full volume
    /// if none was ever recorded). Returns the new volume.
    pub fn toggle(&mut self, session: &mut PlaybackSession) -> f32 {
        let current = session.volume();
        if current > 0.0 {
            self.last_non_zero = Some(current);
            session.set_volume(0.0);
        } else {
            let restore = self.last_non_zero.filter(|v| *v > 0.0).unwrap_or(1.0);
            session.set_volume(restore);
        }
        session.volume()
    }
}
