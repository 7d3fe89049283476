use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use color_eyre::Result;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use rodio::{Decoder, Sink, Source};

use crate::event::{AudioMessage, Command, Event};
use crate::player::PlaybackEngine;
use crate::source::NotifySource;

pub struct AudioThread {
    command_rx: Receiver<Command>,
    event_tx: Sender<Event>,
    volume: f32,
    source_total_duration: Option<Duration>,
    pending_seek: Option<Duration>,
}

impl AudioThread {
    pub fn new(command_rx: Receiver<Command>, event_tx: Sender<Event>, volume: f32) -> AudioThread {
        AudioThread {
            command_rx,
            event_tx,
            volume,
            source_total_duration: None,
            pending_seek: None,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        _ = std::thread::spawn(move || {
            let stream = match rodio::OutputStreamBuilder::open_default_stream() {
                Ok(stream) => stream,
                Err(err) => {
                    _ = ready_tx.send(Err(err.to_string()));
                    return;
                }
            };
            let sink = Sink::connect_new(stream.mixer());
            sink.set_volume(self.volume);
            _ = ready_tx.send(Ok(()));
            info!("audio output opened");

            while let Ok(cmd) = self.command_rx.recv() {
                self.handle(&sink, cmd);
            }

            debug!("audio command channel closed");
        });

        match ready_rx.recv()? {
            Ok(()) => Ok(()),
            Err(err) => Err(color_eyre::eyre::eyre!("failed to open audio output: {err}")),
        }
    }

    fn handle(&mut self, sink: &Sink, cmd: Command) {
        match cmd {
            Command::Load { path, generation } => {
                sink.clear();
                self.source_total_duration = None;
                self.pending_seek = None;

                match open_source(&path) {
                    Ok(source) => {
                        let notify_source =
                            NotifySource::new(source, generation, self.event_tx.clone());
                        self.source_total_duration = notify_source.total_duration();
                        sink.append(notify_source);
                        debug!("loaded {} (generation {generation})", path.display());
                    }
                    Err(err) => self.load_failed(&path, generation, err),
                }
            }
            Command::Play => {
                sink.play();
                if let Some(pos) = self.pending_seek.take() {
                    if let Err(err) = sink.try_seek(pos) {
                        warn!("seek to {pos:?} failed: {err}");
                    }
                }
            }
            Command::Pause => sink.pause(),
            Command::Seek(pos) => {
                if sink.is_paused() {
                    self.pending_seek = Some(pos);
                } else if let Err(err) = sink.try_seek(pos) {
                    warn!("seek to {pos:?} failed: {err}");
                }
            }
            Command::Elapsed(reply_tx) => {
                _ = reply_tx.send(sink.get_pos());
            }
            Command::SendState => {
                let state = SinkState {
                    total_duration: self.source_total_duration,
                    pos: sink.get_pos(),
                    volume: sink.volume(),
                };

                _ = self.event_tx.send(Event::Audio(AudioMessage::State(state)));
            }
        }
    }

    /// Nothing will play, so the track is reported as ended right away.
    fn load_failed(&self, path: &Path, generation: u64, err: color_eyre::Report) {
        error!("cannot decode {}: {err}", path.display());
        _ = self
            .event_tx
            .send(Event::Audio(AudioMessage::EndOfTrack { generation }));
    }
}

fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

#[derive(Clone, Debug)]
pub struct SinkState {
    pub total_duration: Option<Duration>,
    pub pos: Duration,
    pub volume: f32,
}

impl SinkState {
    /// Percentage of the track played, 0 when the length is unknown.
    pub fn progress(&self) -> u16 {
        match self.total_duration {
            Some(total) if !total.is_zero() => {
                ((self.pos.as_secs_f32() / total.as_secs_f32() * 100.0).ceil() as u16).min(100)
            }
            _ => 0,
        }
    }
}

/// Main-thread handle on the audio thread.
pub struct AudioEngine {
    command_tx: Sender<Command>,
    generation: u64,
}

impl AudioEngine {
    pub fn new(command_tx: Sender<Command>) -> Self {
        AudioEngine {
            command_tx,
            generation: 0,
        }
    }

    /// Generation of the most recent load. Older end-of-track messages are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request_state(&self) {
        self.send(Command::SendState);
    }

    fn send(&self, cmd: Command) {
        if self.command_tx.send(cmd).is_err() {
            warn!("audio thread is gone, command dropped");
        }
    }
}

impl PlaybackEngine for AudioEngine {
    fn load(&mut self, src: &Path) {
        self.generation += 1;
        self.send(Command::Load {
            path: src.to_path_buf(),
            generation: self.generation,
        });
    }

    fn play(&mut self) {
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn elapsed(&self) -> Duration {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        self.send(Command::Elapsed(reply_tx));
        reply_rx.recv().unwrap_or(Duration::ZERO)
    }

    fn set_elapsed(&mut self, pos: Duration) {
        self.send(Command::Seek(pos));
    }
}
