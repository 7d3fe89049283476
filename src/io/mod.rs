use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::Result;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::read_from_path;
use lofty::tag::Accessor;
use log::warn;
use walkdir::WalkDir;

use crate::models::Song;

const UNKNOWN_ARTIST: &str = "Unknown artist";

/// Every file under `root` with one of `extensions`, sorted by path. Symlinked
/// directories are not followed; unreadable subdirectories are skipped.
pub fn get_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = vec![];

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                warn!("skipping {err}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let wanted = entry.path().extension().is_some_and(|ext| {
            extensions
                .iter()
                .any(|e| ext.eq_ignore_ascii_case(e.as_str()))
        });
        if wanted {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Builds the catalog. Ids follow the order of `paths`; unreadable files are skipped.
pub fn load_catalog<T>(paths: Vec<T>) -> Vec<Song>
where
    T: Into<PathBuf>,
{
    paths
        .into_iter()
        .filter_map(|p| {
            let path = p.into();
            match read_song(&path) {
                Ok(song) => Some(song),
                Err(err) => {
                    warn!("skipping {}: {err}", path.display());
                    None
                }
            }
        })
        .enumerate()
        .map(|(id, (title, artist, duration, src))| {
            Song::new(id as u32, title, artist, duration, src)
        })
        .collect()
}

fn read_song(path: &Path) -> Result<(String, String, String, PathBuf)> {
    let tagged = read_from_path(path)?;
    let duration = format_duration(tagged.properties().duration());
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());

    let title = tag
        .and_then(|t| t.title().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| file_stem(path));
    let artist = tag
        .and_then(|t| t.artist().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    Ok((title, artist, duration, path.to_path_buf()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `m:ss`, e.g. `3:31`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
