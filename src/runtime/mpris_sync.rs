use crate::app::App;
use crate::mpris::MprisHandle;

/// Publish what the reflector shows to the MPRIS service.
pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let reflector = app.reflector();
    mpris.set_playback(reflector.state());
    mpris.set_track_metadata(
        reflector.active_index(),
        app.active_track(),
        app.current_album().map(|a| a.title.as_str()),
        reflector.duration(),
    );
    mpris.set_volume(reflector.volume());
}
