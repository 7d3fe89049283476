use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongId(pub u32);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// Display form, e.g. `3:31`.
    pub duration: String,
    pub src: PathBuf,
}

impl Song {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: impl Into<String>,
        src: impl Into<PathBuf>,
    ) -> Self {
        Song {
            id: SongId(id),
            title: title.into(),
            artist: artist.into(),
            duration: duration.into(),
            src: src.into(),
        }
    }
}
