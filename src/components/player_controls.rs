use color_eyre::Result;
use crossbeam_channel::Sender;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Widget, WidgetRef};

use super::{Component, ComponentCommand};
use crate::config::KeyConfig;
use crate::event::{EventState, Key};

pub struct PlayerControlsComponent {
    pub title: String,
    pub artist: String,
    pub play_label: String,
    pub playing: bool,
    pub progress: u16,
    pub volume: f32,
    key_config: KeyConfig,
    app_cmd_tx: Sender<ComponentCommand>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Next,
    Previous,
    Shuffle,
    Sort,
}

impl PlayerControlsComponent {
    pub fn new(key_config: KeyConfig, app_cmd_tx: Sender<ComponentCommand>) -> Self {
        PlayerControlsComponent {
            title: String::new(),
            artist: String::new(),
            play_label: "Play".to_string(),
            playing: false,
            progress: 0,
            volume: 0.0,
            key_config,
            app_cmd_tx,
        }
    }

    fn now_playing(&self) -> String {
        match (self.title.is_empty(), self.artist.is_empty()) {
            (true, _) => String::new(),
            (false, true) => self.title.clone(),
            (false, false) => format!("{} - {}", self.title, self.artist),
        }
    }

    fn send_command(&self, cmd: Command) -> Result<()> {
        self.app_cmd_tx
            .send(ComponentCommand::PlayerControlsComponent(cmd))?;
        Ok(())
    }
}

impl WidgetRef for PlayerControlsComponent {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let area = {
            let border = Block::bordered();
            let a = border.inner(area);
            border.render(area, buf);
            a
        };

        let [name_area, progress_area, control_area] = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ],
        )
        .areas(area);

        let [_, progress_area, _] = Layout::new(
            Direction::Horizontal,
            [
                Constraint::Fill(1),
                Constraint::Fill(8),
                Constraint::Fill(1),
            ],
        )
        .areas(progress_area);

        Line::raw(self.now_playing())
            .centered()
            .render(name_area, buf);

        let done = (progress_area.width as u32 * self.progress.min(100) as u32 / 100) as u16;
        for i in 0..progress_area.width {
            if let Some(c) = buf.cell_mut((i + progress_area.x, progress_area.y)) {
                c.set_char(if i < done { '#' } else { '-' });
            }
        }

        let state = if self.playing { "▶" } else { "■" };
        Line::raw(format!(
            "{state} {}  |  vol {:.0}%",
            self.play_label,
            self.volume * 100.0
        ))
        .centered()
        .render(control_area, buf);
    }
}

impl Component for PlayerControlsComponent {
    fn event(&mut self, key: Key) -> Result<EventState> {
        let cmd = if key == self.key_config.play {
            Command::Play
        } else if key == self.key_config.pause {
            Command::Pause
        } else if key == self.key_config.skip_to_next {
            Command::Next
        } else if key == self.key_config.skip_to_prev {
            Command::Previous
        } else if key == self.key_config.shuffle {
            Command::Shuffle
        } else if key == self.key_config.sort {
            Command::Sort
        } else {
            return Ok(EventState::NotConsumed);
        };

        self.send_command(cmd)?;
        Ok(EventState::Consumed)
    }
}
