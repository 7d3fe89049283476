use crossbeam_channel::Sender;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::{ComponentCommand, PlayerControlsComponent, TracklistComponent, WidgetRef};
use crate::config::KeyConfig;
use crate::models::{Song, SongId};
use crate::player::RenderSurface;

/// The whole screen: song list on top, controls below.
pub struct Surface {
    pub tracklist: TracklistComponent,
    pub player_controls: PlayerControlsComponent,
}

impl Surface {
    pub fn new(key_config: KeyConfig, app_cmd_tx: Sender<ComponentCommand>, volume: f32) -> Self {
        let mut player_controls =
            PlayerControlsComponent::new(key_config.clone(), app_cmd_tx.clone());
        player_controls.volume = volume;

        Surface {
            tracklist: TracklistComponent::new(key_config, app_cmd_tx),
            player_controls,
        }
    }
}

impl RenderSurface for Surface {
    fn render_list(&mut self, songs: &[Song]) {
        self.tracklist.set_songs(songs);
    }

    fn highlight_current(&mut self, id: Option<SongId>) {
        self.tracklist.set_current(id);
    }

    fn show_now_playing(&mut self, title: &str, artist: &str) {
        if title.is_empty() {
            self.player_controls.progress = 0;
        }
        self.player_controls.title = title.to_string();
        self.player_controls.artist = artist.to_string();
    }

    fn set_play_label(&mut self, label: &str) {
        self.player_controls.play_label = label.to_string();
    }

    fn set_playing(&mut self, playing: bool) {
        self.player_controls.playing = playing;
    }

    fn offer_reset(&mut self) {
        self.tracklist.offer_reset();
    }
}

impl WidgetRef for Surface {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let [main_area, controls_area] = Layout::new(
            Direction::Vertical,
            [Constraint::Fill(1), Constraint::Length(5)],
        )
        .areas(area);

        self.tracklist.render_ref(main_area, buf);
        self.player_controls.render_ref(controls_area, buf);
    }
}
