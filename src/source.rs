use std::time::Duration;

use crossbeam_channel::Sender;
use rodio::Source;
use rodio::source::SeekError;

use crate::event::{AudioMessage, Event};

/// Wraps a source and reports its natural end exactly once.
pub struct NotifySource<T>
where
    T: Source,
{
    inner: T,
    generation: u64,
    app_event_tx: Sender<Event>,
    finished: bool,
}

impl<T> NotifySource<T>
where
    T: Source,
{
    pub fn new(source: T, generation: u64, app_event_tx: Sender<Event>) -> Self {
        NotifySource {
            inner: source,
            generation,
            app_event_tx,
            finished: false,
        }
    }
}

impl<T> Iterator for NotifySource<T>
where
    T: Source,
{
    type Item = T::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.inner.next();
        if n.is_none() && !self.finished {
            self.finished = true;
            _ = self.app_event_tx.send(Event::Audio(AudioMessage::EndOfTrack {
                generation: self.generation,
            }));
        }

        n
    }
}

impl<T> Source for NotifySource<T>
where
    T: Source,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> rodio::ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> rodio::SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.inner.try_seek(pos)
    }
}
