mod song;

pub use song::{Song, SongId};
