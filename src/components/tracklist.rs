use color_eyre::Result;
use crossbeam_channel::Sender;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use super::ComponentCommand;
use super::{Component, Widget, WidgetRef};
use crate::components::utils::VerticalScroll;
use crate::config::KeyConfig;
use crate::event::{EventState, Key};
use crate::models::{Song, SongId};

const RESET_LABEL: &str = "[ Reset Playlist ]";

pub struct TracklistComponent {
    songs: Vec<Song>,
    current: Option<SongId>,
    reset_offered: bool,
    scroll: VerticalScroll,
    key_config: KeyConfig,
    app_cmd_tx: Sender<ComponentCommand>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Play { id: SongId },
    Delete { id: SongId },
    ResetPlaylist,
}

impl TracklistComponent {
    pub fn new(key_config: KeyConfig, app_cmd_tx: Sender<ComponentCommand>) -> Self {
        Self {
            songs: Vec::new(),
            current: None,
            reset_offered: false,
            scroll: VerticalScroll::new(),
            key_config,
            app_cmd_tx,
        }
    }

    pub fn set_songs(&mut self, songs: &[Song]) {
        self.songs = songs.to_vec();
        self.scroll.clamp(self.songs.len());
        if !self.songs.is_empty() {
            self.reset_offered = false;
        }
    }

    pub fn set_current(&mut self, id: Option<SongId>) {
        self.current = id;
    }

    pub fn offer_reset(&mut self) {
        self.reset_offered = true;
    }

    pub fn reset_offered(&self) -> bool {
        self.reset_offered
    }

    fn next_row(&self) {
        self.scroll.move_down(self.songs.len());
    }

    fn prev_row(&self) {
        self.scroll.move_up();
    }

    fn selected(&self) -> Option<SongId> {
        self.songs.get(self.scroll.pos()).map(|s| s.id)
    }

    fn play_selected(&mut self) -> Result<()> {
        match self.selected() {
            Some(id) => self.send_command(Command::Play { id }),
            None => self.reset(),
        }
    }

    fn delete_selected(&mut self) -> Result<()> {
        if let Some(id) = self.selected() {
            self.send_command(Command::Delete { id })?;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        if self.reset_offered {
            self.send_command(Command::ResetPlaylist)?;
        }
        Ok(())
    }

    fn send_command(&self, cmd: Command) -> Result<()> {
        self.app_cmd_tx
            .send(ComponentCommand::TracklistComponent(cmd))?;
        Ok(())
    }

    fn row(&self, song: &Song, width: usize) -> Line<'static> {
        let is_current = self.current == Some(song.id);
        let marker = if is_current { '▶' } else { ' ' };
        let title_width = width.saturating_sub(2 + 7) * 3 / 5;
        let artist_width = width.saturating_sub(2 + 7 + title_width);

        let text = format!(
            "{marker} {:<title_width$.title_width$}{:<artist_width$.artist_width$}{:>7}",
            song.title, song.artist, song.duration
        );

        if is_current {
            Line::styled(
                text,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Line::raw(text)
        }
    }
}

impl WidgetRef for TracklistComponent {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let area = {
            let border = Block::bordered().title(format!(" Playlist ({}) ", self.songs.len()));
            let a = border.inner(area);
            border.render(area, buf);
            a
        };

        if self.songs.is_empty() {
            if self.reset_offered {
                Line::raw(RESET_LABEL)
                    .centered()
                    .style(Style::default().bg(Color::Blue))
                    .render(area, buf);
            }
            return;
        }

        self.scroll.update(area.height as usize, self.songs.len());

        let rows = self
            .songs
            .iter()
            .skip(self.scroll.y_offset.get())
            .take(area.height as usize)
            .map(|s| self.row(s, area.width as usize))
            .collect::<Vec<Line>>();

        Paragraph::new(rows).render(area, buf);

        let selection = self.scroll.pos().saturating_sub(self.scroll.y_offset.get());
        if selection < area.height as usize {
            for x in area.x..area.x + area.width {
                if let Some(c) = buf.cell_mut((x, selection as u16 + area.y)) {
                    c.set_bg(Color::Blue);
                }
            }
        }
    }
}

impl Component for TracklistComponent {
    fn event(&mut self, key: Key) -> Result<EventState> {
        if key == self.key_config.scroll_up {
            self.prev_row();
            Ok(EventState::Consumed)
        } else if key == self.key_config.scroll_down {
            self.next_row();
            Ok(EventState::Consumed)
        } else if key == self.key_config.play_selected {
            self.play_selected()?;
            Ok(EventState::Consumed)
        } else if key == self.key_config.delete_selected {
            self.delete_selected()?;
            Ok(EventState::Consumed)
        } else if key == self.key_config.reset_playlist && self.reset_offered {
            self.reset()?;
            Ok(EventState::Consumed)
        } else {
            Ok(EventState::NotConsumed)
        }
    }
}
