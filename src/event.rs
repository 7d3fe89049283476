use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, KeyCode, KeyModifiers};

use crate::audio_thread::SinkState;

#[derive(PartialEq, Debug)]
pub enum EventState {
    Consumed,
    NotConsumed,
}

impl EventState {
    pub fn is_consumed(&self) -> bool {
        *self == EventState::Consumed
    }
}

impl From<bool> for EventState {
    fn from(consumed: bool) -> Self {
        if consumed {
            EventState::Consumed
        } else {
            EventState::NotConsumed
        }
    }
}

#[derive(Clone, Debug)]
pub enum Event {
    Tick,
    Input(Key),
    Audio(AudioMessage),
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Key {
    Enter,
    Esc,
    Char(char),
    Unknown,
}

impl From<event::KeyEvent> for Key {
    fn from(value: event::KeyEvent) -> Self {
        let chorded = value
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match value.code {
            KeyCode::Enter => Self::Enter,
            KeyCode::Esc => Self::Esc,
            KeyCode::Char(c) if !chorded => Self::Char(c),
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug)]
pub enum AudioMessage {
    /// A source ran out. `generation` identifies the load that produced it.
    EndOfTrack { generation: u64 },
    State(SinkState),
}

/// Requests handled by the audio thread.
pub enum Command {
    Load { path: PathBuf, generation: u64 },
    Play,
    Pause,
    Seek(Duration),
    Elapsed(Sender<Duration>),
    SendState,
}
