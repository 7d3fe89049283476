pub mod player_controls;
mod surface;
pub mod tracklist;
mod utils;

pub use player_controls::PlayerControlsComponent;
pub use surface::Surface;
pub use tracklist::TracklistComponent;

pub use ratatui::widgets::Widget;
pub use ratatui::widgets::WidgetRef;

use color_eyre::Result;

use crate::event::{EventState, Key};

pub trait Component {
    fn event(&mut self, key: Key) -> Result<EventState>;
}

/// Requests from components to the app, drained after every key press.
pub enum ComponentCommand {
    TracklistComponent(tracklist::Command),
    PlayerControlsComponent(player_controls::Command),
}
