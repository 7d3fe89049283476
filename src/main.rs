use clap::Parser;
use log::info;

use crate::{
    app::App,
    audio_thread::{AudioEngine, AudioThread},
    config::{Args, Config},
    event::Event,
    io::{get_files, load_catalog},
    utils::{init_logging, spawn_event_emitter},
};

mod app;
mod audio_thread;
mod components;
mod config;
mod event;
mod io;
mod models;
mod player;
mod source;
mod utils;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file().as_deref())?;
    let config = Config::from(&args);

    let paths = get_files(&config.audio_dir, &config.extensions)?;
    let catalog = load_catalog(paths);
    info!(
        "loaded {} songs from {}",
        catalog.len(),
        config.audio_dir.display()
    );

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let (command_tx, command_rx) = crossbeam_channel::unbounded();

    AudioThread::new(command_rx, event_tx.clone(), config.volume).run()?;

    let mut terminal = ratatui::init();
    spawn_event_emitter(event_tx, config.tickrate)?;

    let mut app = App::new(catalog, AudioEngine::new(command_tx), config);

    let res = run(&mut terminal, &mut app, &event_rx);
    ratatui::restore();
    res
}

fn run(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    event_rx: &crossbeam_channel::Receiver<Event>,
) -> color_eyre::Result<()> {
    terminal.draw(|f| app.render(f.area(), f.buffer_mut()))?;
    loop {
        match event_rx.recv()? {
            Event::Input(key) => {
                if !app.event(key)?.is_consumed() && key == app.config.key_config.quit {
                    break;
                }
            }
            Event::Tick => {
                app.tick();
            }
            Event::Audio(audio) => {
                app.audio(audio);
            }
        }

        terminal.draw(|f| app.render(f.area(), f.buffer_mut()))?;
    }

    info!("bye");
    Ok(())
}
