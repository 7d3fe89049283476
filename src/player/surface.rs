use crate::models::{Song, SongId};

/// Everything the player shows to the user goes through here.
pub trait RenderSurface {
    fn render_list(&mut self, songs: &[Song]);
    fn highlight_current(&mut self, id: Option<SongId>);
    /// Empty strings clear the display.
    fn show_now_playing(&mut self, title: &str, artist: &str);
    fn set_play_label(&mut self, label: &str);
    fn set_playing(&mut self, playing: bool);
    /// Only called once the playlist has become empty.
    fn offer_reset(&mut self);
}

/// Label for the play control: the current song, else the first one in the list.
pub fn play_label(current: Option<&Song>, songs: &[Song]) -> String {
    match current.or_else(|| songs.first()) {
        Some(song) if !song.title.is_empty() => format!("Play {}", song.title),
        _ => "Play".to_string(),
    }
}
