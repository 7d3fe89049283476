use thiserror::Error;

use crate::models::SongId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Reasons a player command turned into a no-op.
///
/// None of these escape the public command surface; they are logged and dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("no song with id {0} in the playlist")]
    UnknownSong(SongId),

    #[error("playlist is empty")]
    EmptyPlaylist,

    #[error("song {id} has no {direction:?} neighbour")]
    NoNeighbor { id: SongId, direction: Direction },

    #[error("no song is current")]
    NoCurrentSong,
}

pub type Result<T> = std::result::Result<T, PlayerError>;
