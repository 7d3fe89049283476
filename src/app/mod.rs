use color_eyre::Result;
use crossbeam_channel::Receiver;
use log::debug;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::WidgetRef;

use crate::audio_thread::AudioEngine;
use crate::components::{Component, ComponentCommand, Surface};
use crate::config::Config;
use crate::event::{AudioMessage, EventState, Key};
use crate::models::Song;
use crate::player::PlaylistPlayer;

pub struct App {
    player: PlaylistPlayer<AudioEngine, Surface>,
    widget_cmd_rx: Receiver<ComponentCommand>,

    pub config: Config,
}

impl App {
    pub fn new(catalog: Vec<Song>, engine: AudioEngine, config: Config) -> Self {
        let (app_cmd_tx, app_cmd_rx) = crossbeam_channel::bounded(256);
        let surface = Surface::new(config.key_config.clone(), app_cmd_tx, config.volume);

        let player = PlaylistPlayer::new(catalog, engine, surface);
        debug!("playlist ready with {} songs", player.songs().len());

        App {
            player,
            widget_cmd_rx: app_cmd_rx,
            config,
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        self.player.surface().render_ref(area, buf);
    }

    pub fn event(&mut self, key: Key) -> Result<EventState> {
        let res = self.component_event(key);
        self.drain_commands();
        res
    }

    pub fn tick(&mut self) {
        if self.player.state().is_playing {
            self.player.engine().request_state();
        }
    }

    pub fn audio(&mut self, audio_message: AudioMessage) {
        match audio_message {
            AudioMessage::EndOfTrack { generation } => {
                if generation == self.player.engine().generation() {
                    self.player.on_track_ended();
                } else {
                    debug!("stale end of track (generation {generation})");
                }
            }
            AudioMessage::State(state) => {
                let has_current = self.player.state().current.is_some();
                let controls = &mut self.player.surface_mut().player_controls;
                controls.volume = state.volume;
                if has_current {
                    controls.progress = state.progress();
                }
            }
        }
    }

    fn component_event(&mut self, key: Key) -> Result<EventState> {
        let surface = self.player.surface_mut();
        if surface.tracklist.event(key)?.is_consumed() {
            return Ok(EventState::Consumed);
        }
        surface.player_controls.event(key)
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.widget_cmd_rx.try_recv() {
            match cmd {
                ComponentCommand::TracklistComponent(cmd) => {
                    use crate::components::tracklist::Command;
                    match cmd {
                        Command::Play { id } => self.player.play(id),
                        Command::Delete { id } => self.player.delete(id),
                        Command::ResetPlaylist => self.player.reset_playlist(),
                    }
                }
                ComponentCommand::PlayerControlsComponent(cmd) => {
                    use crate::components::player_controls::Command;
                    match cmd {
                        Command::Play => self.player.play_current(),
                        Command::Pause => self.player.pause(),
                        Command::Next => self.player.next(),
                        Command::Previous => self.player.previous(),
                        Command::Shuffle => self.player.shuffle(),
                        Command::Sort => {
                            self.player.sort();
                        }
                    }
                }
            }
        }
    }
}
