//! The playlist/player state machine.
//!
//! [`PlaylistPlayer`] owns the working playlist and the player state. Its methods are the
//! only way to change either; every one of them leaves the [`RenderSurface`] in sync.

mod engine;
mod error;
mod playlist;
mod surface;

use std::time::Duration;

use log::debug;
use rand::Rng;

pub use engine::PlaybackEngine;
pub use error::{Direction, PlayerError, Result};
pub use playlist::Playlist;
pub use surface::{RenderSurface, play_label};

use crate::models::{Song, SongId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub current: Option<SongId>,
    /// Resume point of `current`, recorded at the last pause.
    pub saved_offset: Duration,
    pub is_playing: bool,
}

impl PlayerState {
    fn clear(&mut self) {
        self.current = None;
        self.saved_offset = Duration::ZERO;
        self.is_playing = false;
    }
}

pub struct PlaylistPlayer<E, R> {
    catalog: Vec<Song>,
    playlist: Playlist,
    state: PlayerState,
    engine: E,
    surface: R,
}

impl<E, R> PlaylistPlayer<E, R>
where
    E: PlaybackEngine,
    R: RenderSurface,
{
    /// Seeds the playlist with a copy of `catalog`, sorted by title, and renders it.
    pub fn new(catalog: Vec<Song>, engine: E, surface: R) -> Self {
        let mut player = PlaylistPlayer {
            playlist: Playlist::new(catalog.clone()),
            catalog,
            state: PlayerState::default(),
            engine,
            surface,
        };

        player.playlist.sort_by_title();
        player.surface.render_list(player.playlist.songs());
        player.sync_surface();
        player
    }

    pub fn songs(&self) -> &[Song] {
        self.playlist.songs()
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn current_song(&self) -> Option<&Song> {
        match self.state.current {
            Some(id) => self.playlist.get(id).ok(),
            None => None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn play(&mut self, id: SongId) {
        if let Err(err) = self.try_play(id) {
            debug!("play({id}) ignored: {err}");
        }
    }

    /// Play button: the current song, else the first one.
    pub fn play_current(&mut self) {
        let target = match self.state.current {
            Some(id) => Ok(id),
            None => self.playlist.first().map(|s| s.id),
        };

        match target {
            Ok(id) => self.play(id),
            Err(err) => debug!("play ignored: {err}"),
        }
    }

    pub fn pause(&mut self) {
        if self.state.current.is_some() {
            self.state.saved_offset = self.engine.elapsed();
        }
        self.state.is_playing = false;
        self.engine.pause();

        debug!(
            "paused {:?} at {:?}",
            self.state.current, self.state.saved_offset
        );
        self.sync_surface();
    }

    pub fn next(&mut self) {
        let target = match self.state.current {
            None => self.playlist.first().map(|s| s.id),
            Some(id) => self.playlist.neighbor(id, Direction::Next).map(|s| s.id),
        };

        match target {
            Ok(id) => self.play(id),
            Err(err) => debug!("next ignored: {err}"),
        }
    }

    pub fn previous(&mut self) {
        let target = match self.state.current {
            None => Err(PlayerError::NoCurrentSong),
            Some(id) => self.playlist.neighbor(id, Direction::Previous).map(|s| s.id),
        };

        match target {
            Ok(id) => self.play(id),
            Err(err) => debug!("previous ignored: {err}"),
        }
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    pub fn shuffle_with<G: Rng + ?Sized>(&mut self, rng: &mut G) {
        self.playlist.shuffle(rng);
        self.state.clear();
        self.engine.pause();

        self.surface.render_list(self.playlist.songs());
        self.sync_surface();
    }

    /// Does not interrupt playback.
    pub fn sort(&mut self) -> &[Song] {
        self.playlist.sort_by_title();

        self.surface.render_list(self.playlist.songs());
        self.sync_surface();
        self.playlist.songs()
    }

    pub fn delete(&mut self, id: SongId) {
        if let Err(err) = self.playlist.position(id) {
            debug!("delete ignored: {err}");
            return;
        }

        if self.state.current == Some(id) {
            self.state.clear();
            self.engine.pause();
            self.surface.show_now_playing("", "");
        }

        if let Ok(removed) = self.playlist.remove(id) {
            debug!("deleted {id} ({})", removed.title);
        }

        self.surface.render_list(self.playlist.songs());
        self.sync_surface();

        if self.playlist.is_empty() {
            self.surface.offer_reset();
        }
    }

    /// Restores the full catalog in its original order, then sorts it for display.
    pub fn reset_playlist(&mut self) {
        self.playlist.replace(self.catalog.clone());
        self.playlist.sort_by_title();

        self.surface.render_list(self.playlist.songs());
        self.sync_surface();
    }

    pub fn on_track_ended(&mut self) {
        let Some(id) = self.state.current else {
            debug!("track end ignored: {}", PlayerError::NoCurrentSong);
            return;
        };

        let next = self.playlist.neighbor(id, Direction::Next).map(|s| s.id);
        match next {
            Ok(next) => self.play(next),
            Err(_) => {
                debug!("end of playlist reached after {id}");
                self.state.clear();
                self.engine.pause();
                self.sync_surface();
            }
        }
    }

    fn try_play(&mut self, id: SongId) -> Result<()> {
        let song = self.playlist.get(id)?;

        if self.state.current == Some(id) {
            if !self.state.is_playing {
                self.engine.load(&song.src);
                self.engine.set_elapsed(self.state.saved_offset);
                self.engine.play();
                self.state.is_playing = true;
                debug!("resumed {id} at {:?}", self.state.saved_offset);
            }
        } else {
            self.engine.load(&song.src);
            self.engine.set_elapsed(Duration::ZERO);
            self.engine.play();
            self.state.current = Some(id);
            self.state.saved_offset = Duration::ZERO;
            self.state.is_playing = true;
            debug!("started {id}");
        }

        self.sync_surface();
        Ok(())
    }

    fn sync_surface(&mut self) {
        let current = self.current_song();
        let (title, artist) = match current {
            Some(song) => (song.title.clone(), song.artist.clone()),
            None => (String::new(), String::new()),
        };
        let label = play_label(current, self.playlist.songs());

        self.surface.show_now_playing(&title, &artist);
        self.surface.highlight_current(self.state.current);
        self.surface.set_play_label(&label);
        self.surface.set_playing(self.state.is_playing);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum EngineCall {
        Load(PathBuf),
        Play,
        Pause,
        Seek(Duration),
    }

    #[derive(Default)]
    struct FakeEngine {
        calls: Vec<EngineCall>,
        elapsed: Duration,
    }

    impl FakeEngine {
        fn last_seek(&self) -> Option<Duration> {
            self.calls.iter().rev().find_map(|c| match c {
                EngineCall::Seek(pos) => Some(*pos),
                _ => None,
            })
        }
    }

    impl PlaybackEngine for FakeEngine {
        fn load(&mut self, src: &Path) {
            self.calls.push(EngineCall::Load(src.to_path_buf()));
        }

        fn play(&mut self) {
            self.calls.push(EngineCall::Play);
        }

        fn pause(&mut self) {
            self.calls.push(EngineCall::Pause);
        }

        fn elapsed(&self) -> Duration {
            self.elapsed
        }

        fn set_elapsed(&mut self, pos: Duration) {
            self.elapsed = pos;
            self.calls.push(EngineCall::Seek(pos));
        }
    }

    #[derive(Default)]
    struct FakeSurface {
        list: Vec<SongId>,
        highlighted: Option<SongId>,
        now_playing: (String, String),
        label: String,
        playing: bool,
        reset_offers: usize,
    }

    impl RenderSurface for FakeSurface {
        fn render_list(&mut self, songs: &[Song]) {
            self.list = songs.iter().map(|s| s.id).collect();
        }

        fn highlight_current(&mut self, id: Option<SongId>) {
            self.highlighted = id;
        }

        fn show_now_playing(&mut self, title: &str, artist: &str) {
            self.now_playing = (title.to_string(), artist.to_string());
        }

        fn set_play_label(&mut self, label: &str) {
            self.label = label.to_string();
        }

        fn set_playing(&mut self, playing: bool) {
            self.playing = playing;
        }

        fn offer_reset(&mut self) {
            self.reset_offers += 1;
        }
    }

    type TestPlayer = PlaylistPlayer<FakeEngine, FakeSurface>;

    fn song(id: u32, title: &str) -> Song {
        Song::new(id, title, format!("Artist {id}"), "3:00", format!("/music/{id}.mp3"))
    }

    fn catalog() -> Vec<Song> {
        vec![
            song(0, "I hate you"),
            song(1, "Frozen wings"),
            song(2, "Walls collapsing"),
            song(3, "Her name"),
        ]
    }

    fn player() -> TestPlayer {
        PlaylistPlayer::new(catalog(), FakeEngine::default(), FakeSurface::default())
    }

    fn order(player: &TestPlayer) -> Vec<u32> {
        player.songs().iter().map(|s| s.id.0).collect()
    }

    #[test]
    fn starts_sorted_and_rendered() {
        let player = player();

        assert_eq!(order(&player), vec![1, 3, 0, 2]);
        assert_eq!(player.surface().list, vec![SongId(1), SongId(3), SongId(0), SongId(2)]);
        assert_eq!(player.surface().label, "Play Frozen wings");
        assert_eq!(player.state(), &PlayerState::default());
    }

    #[test]
    fn play_starts_song_and_updates_surface() {
        let mut player = player();

        player.play(SongId(3));

        assert_eq!(player.state().current, Some(SongId(3)));
        assert!(player.state().is_playing);
        assert_eq!(
            player.engine().calls,
            vec![
                EngineCall::Load(PathBuf::from("/music/3.mp3")),
                EngineCall::Seek(Duration::ZERO),
                EngineCall::Play,
            ]
        );
        let surface = player.surface();
        assert_eq!(surface.highlighted, Some(SongId(3)));
        assert_eq!(surface.now_playing, ("Her name".into(), "Artist 3".into()));
        assert_eq!(surface.label, "Play Her name");
        assert!(surface.playing);
    }

    #[test]
    fn play_unknown_id_is_noop() {
        let mut player = player();

        player.play(SongId(42));

        assert_eq!(player.state(), &PlayerState::default());
        assert!(player.engine().calls.is_empty());
    }

    #[test]
    fn resume_same_song_restores_offset() {
        let mut player = player();

        player.play(SongId(0));
        player.engine.elapsed = Duration::from_secs(17);
        player.pause();
        player.play(SongId(0));

        assert_eq!(player.state().saved_offset, Duration::from_secs(17));
        assert_eq!(player.engine().last_seek(), Some(Duration::from_secs(17)));
        assert!(player.state().is_playing);
    }

    #[test]
    fn switching_song_resets_offset() {
        let mut player = player();

        player.play(SongId(0));
        player.engine.elapsed = Duration::from_secs(40);
        player.pause();
        player.play(SongId(2));

        assert_eq!(player.state().current, Some(SongId(2)));
        assert_eq!(player.state().saved_offset, Duration::ZERO);
        assert_eq!(player.engine().last_seek(), Some(Duration::ZERO));
    }

    #[test]
    fn play_same_song_while_playing_does_not_restart() {
        let mut player = player();

        player.play(SongId(0));
        let calls = player.engine().calls.len();
        player.play(SongId(0));

        assert_eq!(player.engine().calls.len(), calls);
        assert!(player.state().is_playing);
    }

    #[test]
    fn pause_records_offset_and_stops() {
        let mut player = player();

        player.play(SongId(1));
        player.engine.elapsed = Duration::from_millis(5_500);
        player.pause();

        assert_eq!(player.state().saved_offset, Duration::from_millis(5_500));
        assert!(!player.state().is_playing);
        assert_eq!(player.engine().calls.last(), Some(&EngineCall::Pause));
        assert!(!player.surface().playing);
        assert_eq!(player.surface().highlighted, Some(SongId(1)));
    }

    #[test]
    fn pause_without_current_song_is_safe() {
        let mut player = player();
        player.engine.elapsed = Duration::from_secs(3);

        player.pause();

        assert_eq!(player.state(), &PlayerState::default());
    }

    #[test]
    fn next_without_current_plays_first() {
        let mut player = player();

        player.next();

        assert_eq!(player.state().current, Some(SongId(1)));
    }

    #[test]
    fn next_and_previous_follow_list_order() {
        let mut player = player();

        player.play(SongId(3));
        player.next();
        assert_eq!(player.state().current, Some(SongId(0)));

        player.previous();
        player.previous();
        assert_eq!(player.state().current, Some(SongId(1)));
        assert_eq!(player.engine().last_seek(), Some(Duration::ZERO));
    }

    #[test]
    fn next_at_end_of_list_is_noop() {
        let mut player = player();

        player.play(SongId(2));
        let calls = player.engine().calls.len();
        player.next();

        assert_eq!(player.state().current, Some(SongId(2)));
        assert_eq!(player.engine().calls.len(), calls);
    }

    #[test]
    fn previous_at_start_of_list_is_noop() {
        let mut player = player();

        player.play(SongId(1));
        player.previous();

        assert_eq!(player.state().current, Some(SongId(1)));
    }

    #[test]
    fn previous_without_current_is_noop() {
        let mut player = player();

        player.previous();

        assert_eq!(player.state(), &PlayerState::default());
        assert!(player.engine().calls.is_empty());
    }

    #[test]
    fn commands_on_empty_playlist_are_noops() {
        let mut player = PlaylistPlayer::new(vec![], FakeEngine::default(), FakeSurface::default());

        player.next();
        player.previous();
        player.play_current();
        player.play(SongId(0));
        player.on_track_ended();

        assert_eq!(player.state(), &PlayerState::default());
        assert_eq!(player.surface().label, "Play");
        assert!(player.engine().calls.is_empty());
    }

    #[test]
    fn play_current_resumes_or_starts_first() {
        let mut player = player();

        player.play_current();
        assert_eq!(player.state().current, Some(SongId(1)));

        player.engine.elapsed = Duration::from_secs(9);
        player.pause();
        player.play_current();

        assert_eq!(player.state().current, Some(SongId(1)));
        assert_eq!(player.engine().last_seek(), Some(Duration::from_secs(9)));
    }

    #[test]
    fn shuffle_clears_player_state() {
        let mut player = player();
        let mut rng = StdRng::seed_from_u64(3);

        player.play(SongId(0));
        player.engine.elapsed = Duration::from_secs(12);
        player.pause();
        player.shuffle_with(&mut rng);

        assert_eq!(player.state(), &PlayerState::default());
        assert_eq!(player.engine().calls.last(), Some(&EngineCall::Pause));
        let surface = player.surface();
        assert_eq!(surface.highlighted, None);
        assert_eq!(surface.now_playing, (String::new(), String::new()));
        let rendered: Vec<u32> = surface.list.iter().map(|id| id.0).collect();
        assert_eq!(rendered, order(&player));
        let ids: HashSet<u32> = rendered.into_iter().collect();
        assert_eq!(ids, HashSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn sort_keeps_playback_running() {
        let mut player = player();
        let mut rng = StdRng::seed_from_u64(11);

        player.shuffle_with(&mut rng);
        player.play(SongId(2));
        let calls = player.engine().calls.len();
        let sorted: Vec<u32> = player.sort().iter().map(|s| s.id.0).collect();

        assert_eq!(sorted, vec![1, 3, 0, 2]);
        assert_eq!(player.state().current, Some(SongId(2)));
        assert!(player.state().is_playing);
        assert_eq!(player.engine().calls.len(), calls);
        assert_eq!(player.surface().highlighted, Some(SongId(2)));
    }

    #[test]
    fn delete_current_song_clears_state() {
        let mut player = player();

        player.play(SongId(0));
        player.engine.elapsed = Duration::from_secs(8);
        player.pause();
        player.delete(SongId(0));

        assert_eq!(player.state(), &PlayerState::default());
        assert_eq!(order(&player), vec![1, 3, 2]);
        let surface = player.surface();
        assert_eq!(surface.highlighted, None);
        assert_eq!(surface.now_playing, (String::new(), String::new()));
        assert_eq!(surface.label, "Play Frozen wings");
        assert_eq!(surface.reset_offers, 0);
    }

    #[test]
    fn delete_other_song_keeps_playing() {
        let mut player = player();

        player.play(SongId(0));
        player.delete(SongId(3));

        assert_eq!(player.state().current, Some(SongId(0)));
        assert!(player.state().is_playing);
        assert_eq!(player.surface().highlighted, Some(SongId(0)));
        assert_eq!(player.surface().list, vec![SongId(1), SongId(0), SongId(2)]);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut player = player();

        player.delete(SongId(2));
        player.delete(SongId(2));

        assert_eq!(order(&player), vec![1, 3, 0]);
    }

    #[test]
    fn emptying_the_playlist_offers_reset() {
        let mut player = player();

        for id in 0..4 {
            player.delete(SongId(id));
        }

        assert!(player.songs().is_empty());
        assert_eq!(player.surface().reset_offers, 1);
        assert_eq!(player.surface().label, "Play");

        player.reset_playlist();

        assert_eq!(order(&player), vec![1, 3, 0, 2]);
        assert_eq!(player.surface().list.len(), 4);
        assert_eq!(player.surface().label, "Play Frozen wings");
    }

    #[test]
    fn track_end_advances_to_successor() {
        let mut player = player();

        player.play(SongId(3));
        player.engine.elapsed = Duration::from_secs(200);
        player.on_track_ended();

        assert_eq!(player.state().current, Some(SongId(0)));
        assert_eq!(player.engine().last_seek(), Some(Duration::ZERO));
        assert!(player.state().is_playing);
    }

    #[test]
    fn track_end_on_last_song_clears_state() {
        let mut player = player();

        player.play(SongId(2));
        player.on_track_ended();

        assert_eq!(player.state(), &PlayerState::default());
        assert_eq!(player.engine().calls.last(), Some(&EngineCall::Pause));
        assert_eq!(player.surface().highlighted, None);
        assert_eq!(player.surface().label, "Play Frozen wings");
    }

    #[test]
    fn track_end_without_current_is_ignored() {
        let mut player = player();

        player.on_track_ended();

        assert!(player.engine().calls.is_empty());
    }

    #[test]
    fn offset_is_tied_to_the_song_that_was_paused() {
        let catalog = vec![song(0, "B"), song(1, "A")];
        let mut player =
            PlaylistPlayer::new(catalog, FakeEngine::default(), FakeSurface::default());

        let sorted: Vec<u32> = player.sort().iter().map(|s| s.id.0).collect();
        assert_eq!(sorted, vec![1, 0]);

        player.play(SongId(1));
        assert_eq!(player.state().current, Some(SongId(1)));
        assert_eq!(player.engine().last_seek(), Some(Duration::ZERO));

        player.engine.elapsed = Duration::from_secs(5);
        player.pause();
        assert_eq!(player.state().saved_offset, Duration::from_secs(5));

        player.play(SongId(0));
        assert_eq!(player.state().current, Some(SongId(0)));
        assert_eq!(player.engine().last_seek(), Some(Duration::ZERO));

        player.play(SongId(1));
        assert_eq!(player.state().current, Some(SongId(1)));
        assert_eq!(player.engine().last_seek(), Some(Duration::ZERO));
        assert_eq!(player.state().saved_offset, Duration::ZERO);

        let calls = player.engine().calls.len();
        player.play(SongId(1));
        assert_eq!(player.engine().calls.len(), calls);
        assert_eq!(player.state().saved_offset, Duration::ZERO);
    }

    fn arb_catalog() -> impl Strategy<Value = Vec<Song>> {
        prop::collection::vec("[A-Za-z ]{0,6}", 0..12).prop_map(|titles| {
            titles
                .into_iter()
                .enumerate()
                .map(|(i, title)| song(i as u32, &title))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn sort_is_idempotent(
            catalog in arb_catalog(),
            seed in any::<u64>(),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut player =
                PlaylistPlayer::new(catalog, FakeEngine::default(), FakeSurface::default());
            player.shuffle_with(&mut StdRng::seed_from_u64(seed));
            if !player.songs().is_empty() {
                let id = player.songs()[pick.index(player.songs().len())].id;
                player.play(id);
            }
            let current = player.state().current;

            let once = player.sort().to_vec();
            let twice = player.sort().to_vec();

            prop_assert_eq!(once, twice);
            prop_assert_eq!(player.state().current, current);
        }

        #[test]
        fn delete_removes_exactly_one(
            catalog in arb_catalog(),
            pick in any::<prop::sample::Index>(),
        ) {
            prop_assume!(!catalog.is_empty());
            let mut player =
                PlaylistPlayer::new(catalog, FakeEngine::default(), FakeSurface::default());
            let id = player.songs()[pick.index(player.songs().len())].id;
            player.play(id);
            let before = player.songs().len();

            player.delete(id);
            player.delete(id);

            prop_assert_eq!(player.songs().len(), before - 1);
            prop_assert!(player.songs().iter().all(|s| s.id != id));
            prop_assert_eq!(player.state().current, None);
        }

        #[test]
        fn reset_restores_catalog(catalog in arb_catalog()) {
            let expected: HashSet<SongId> = catalog.iter().map(|s| s.id).collect();
            let mut player =
                PlaylistPlayer::new(catalog, FakeEngine::default(), FakeSurface::default());

            while let Some(id) = player.songs().first().map(|s| s.id) {
                player.delete(id);
            }
            prop_assert!(player.songs().is_empty());

            player.reset_playlist();

            let restored: HashSet<SongId> = player.songs().iter().map(|s| s.id).collect();
            prop_assert_eq!(restored, expected);
        }

        #[test]
        fn any_song_resumes_where_it_was_paused(
            catalog in arb_catalog(),
            pick in any::<prop::sample::Index>(),
            offset_ms in 0u64..600_000,
        ) {
            prop_assume!(!catalog.is_empty());
            let offset = Duration::from_millis(offset_ms);
            let mut player =
                PlaylistPlayer::new(catalog, FakeEngine::default(), FakeSurface::default());
            let id = player.songs()[pick.index(player.songs().len())].id;

            player.play(id);
            player.engine.elapsed = offset;
            player.pause();
            prop_assert!(!player.state().is_playing);
            player.play(id);

            prop_assert_eq!(player.state().current, Some(id));
            prop_assert_eq!(player.state().saved_offset, offset);
            prop_assert_eq!(player.engine().last_seek(), Some(offset));
            prop_assert!(player.state().is_playing);
        }
    }
}
