use std::path::Path;
use std::time::Duration;

/// Audio device driven by the player.
///
/// Natural completion is not part of the trait: it arrives as an event and is fed back
/// through [`super::PlaylistPlayer::on_track_ended`].
pub trait PlaybackEngine {
    fn load(&mut self, src: &Path);
    fn play(&mut self);
    fn pause(&mut self);
    fn elapsed(&self) -> Duration;
    fn set_elapsed(&mut self, pos: Duration);
}
