use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::event::Key;

#[derive(Parser, Debug)]
#[command(name = "tunelist", version, about = "Terminal playlist player")]
pub struct Args {
    /// Directory scanned for songs. Defaults to the platform audio directory.
    pub audio_dir: Option<PathBuf>,

    /// Output volume between 0.0 and 1.0.
    #[arg(long, default_value_t = 0.05, value_parser = parse_volume)]
    pub volume: f32,

    /// Log file. Defaults to `tunelist.log` in the platform cache directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// UI refresh interval in milliseconds.
    #[arg(long, default_value_t = 250)]
    pub tick_ms: u64,
}

fn parse_volume(s: &str) -> Result<f32, String> {
    let volume: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(format!("volume must be between 0.0 and 1.0, got {volume}"))
    }
}

impl Args {
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("tunelist.log")))
    }
}

pub struct Config {
    pub audio_dir: PathBuf,
    pub extensions: Vec<String>,
    pub volume: f32,
    pub tickrate: Duration,
    pub key_config: KeyConfig,
}

impl Config {
    pub fn new(audio_dir: PathBuf) -> Self {
        Config {
            audio_dir,
            extensions: ["mp3", "flac", "ogg", "wav"]
                .into_iter()
                .map(String::from)
                .collect(),
            volume: 0.05,
            tickrate: Duration::from_millis(250),
            key_config: KeyConfig::default(),
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let audio_dir = args
            .audio_dir
            .clone()
            .or_else(dirs::audio_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Config {
            volume: args.volume,
            tickrate: Duration::from_millis(args.tick_ms),
            ..Config::new(audio_dir)
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct KeyConfig {
    pub quit: Key,

    pub scroll_up: Key,
    pub scroll_down: Key,

    pub play_selected: Key,
    pub delete_selected: Key,
    pub reset_playlist: Key,

    pub play: Key,
    pub pause: Key,
    pub skip_to_next: Key,
    pub skip_to_prev: Key,
    pub shuffle: Key,
    pub sort: Key,
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            quit: Key::Esc,
            scroll_up: Key::Char('k'),
            scroll_down: Key::Char('j'),
            play_selected: Key::Enter,
            delete_selected: Key::Char('d'),
            reset_playlist: Key::Char('r'),
            play: Key::Char('p'),
            pause: Key::Char(' '),
            skip_to_next: Key::Char('l'),
            skip_to_prev: Key::Char('h'),
            shuffle: Key::Char('s'),
            sort: Key::Char('o'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_override_defaults() {
        let args =
            Args::try_parse_from(["tunelist", "/music", "--volume", "0.5", "--tick-ms", "100"])
                .unwrap();
        let config = Config::from(&args);

        assert_eq!(config.audio_dir, PathBuf::from("/music"));
        assert_eq!(config.volume, 0.5);
        assert_eq!(config.tickrate, Duration::from_millis(100));
        assert_eq!(config.key_config, KeyConfig::default());
    }

    #[test]
    fn volume_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["tunelist", "--volume", "1.5"]).is_err());
        assert!(Args::try_parse_from(["tunelist", "--volume", "loud"]).is_err());
    }

    #[test]
    fn explicit_log_file_wins() {
        let args = Args::try_parse_from(["tunelist", "--log-file", "/tmp/t.log"]).unwrap();

        assert_eq!(args.log_file(), Some(PathBuf::from("/tmp/t.log")));
    }

    #[test]
    fn default_bindings_do_not_collide() {
        let keys = KeyConfig::default();
        let bindings = [
            keys.quit,
            keys.scroll_up,
            keys.scroll_down,
            keys.play_selected,
            keys.delete_selected,
            keys.reset_playlist,
            keys.play,
            keys.pause,
            keys.skip_to_next,
            keys.skip_to_prev,
            keys.shuffle,
            keys.sort,
        ];

        for (i, a) in bindings.iter().enumerate() {
            for b in &bindings[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
