use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use color_eyre::Result;
use crossbeam_channel::Sender;
use crossterm::event;
use env_logger::{Env, Target};

use crate::event::{Event, Key};

pub fn spawn_event_emitter(event_tx: Sender<Event>, tickrate: Duration) -> Result<()> {
    _ = std::thread::spawn(move || -> Result<()> {
        loop {
            if event::poll(tickrate)? {
                if let event::Event::Key(key) = event::read()? {
                    if key.kind == event::KeyEventKind::Press {
                        event_tx.send(Event::Input(Key::from(key)))?;
                    }
                }
            }

            event_tx.send(Event::Tick)?;
        }
    });

    Ok(())
}

/// The terminal belongs to the UI, so log lines go to a file. `RUST_LOG` sets the filter.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = File::options().create(true).append(true).open(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    builder.try_init()?;
    Ok(())
}
