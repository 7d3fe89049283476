use rand::Rng;
use rand::seq::SliceRandom;

use super::error::{Direction, PlayerError, Result};
use crate::models::{Song, SongId};

/// Ordered working set of songs. Order defines next/previous.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    songs: Vec<Song>,
}

impl Playlist {
    pub fn new(songs: Vec<Song>) -> Self {
        Playlist { songs }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn first(&self) -> Result<&Song> {
        self.songs.first().ok_or(PlayerError::EmptyPlaylist)
    }

    pub fn position(&self, id: SongId) -> Result<usize> {
        self.songs
            .iter()
            .position(|s| s.id == id)
            .ok_or(PlayerError::UnknownSong(id))
    }

    pub fn get(&self, id: SongId) -> Result<&Song> {
        self.position(id).map(|i| &self.songs[i])
    }

    /// Song adjacent to `id` in the given direction.
    pub fn neighbor(&self, id: SongId, direction: Direction) -> Result<&Song> {
        let index = self.position(id)?;
        let target = match direction {
            Direction::Next => index.checked_add(1),
            Direction::Previous => index.checked_sub(1),
        };

        target
            .and_then(|i| self.songs.get(i))
            .ok_or(PlayerError::NoNeighbor { id, direction })
    }

    pub fn remove(&mut self, id: SongId) -> Result<Song> {
        let index = self.position(id)?;
        Ok(self.songs.remove(index))
    }

    /// Stable, ordinal, ascending by title.
    pub fn sort_by_title(&mut self) {
        self.songs.sort_by(|a, b| a.title.cmp(&b.title));
    }

    /// Uniform Fisher-Yates permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.songs.shuffle(rng);
    }

    pub fn replace(&mut self, songs: Vec<Song>) {
        self.songs = songs;
    }
}
