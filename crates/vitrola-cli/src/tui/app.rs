//! Main TUI application
//!
//! The app owns all state and runs a single select! loop over terminal
//! events, a render interval and the timeline interval. Assets stream in
//! from a background loader; every missing piece degrades into a console
//! diagnostic instead of an exit.

use anyhow::Result;
use crossterm::event::{
    EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, MediaKeyCode, MouseButton, MouseEvent, MouseEventKind,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{enable_raw_mode, EnterAlternateScreen};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use vitrola_core::character::{Character, CharacterId};
use vitrola_core::config::VitrolaConfig;
use vitrola_core::placement::{find_placement, Placement, StageRect};
use vitrola_core::spawn::{SpawnController, SpawnDirective};
use vitrola_core::sprite::{FrameMap, SpriteSheet};
use vitrola_core::timeline::TimelineController;

use super::assets::{spawn_loader, AssetEvent, AssetPaths};
use super::audio::AudioPlayer;
use super::console::Console;
use super::layout::{ScreenLayout, STAGE_TOP_MARGIN};
use super::marquee::Marquee;
use super::song_list::SongListPopup;
use super::stage::render_stage;
use super::theme::Theme;
use super::widgets::{HintBar, TopBar};

/// Roughly 30 fps.
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Most rows the song list popup will take.
const POPUP_MAX_ROWS: usize = 12;

enum SpriteState {
    Loading,
    Ready { sheet: SpriteSheet, frames: FrameMap },
    Missing,
}

/// Application state
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    config: VitrolaConfig,
    sprite: SpriteState,
    characters: Vec<Character>,
    next_character_id: CharacterId,
    timeline: TimelineController,
    spawn: SpawnController,
    audio: AudioPlayer,
    marquee: Marquee,
    song_list: SongListPopup,
    console: Console,
    layout: ScreenLayout,
    asset_rx: UnboundedReceiver<AssetEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: VitrolaConfig, assets: AssetPaths) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        // Media keys only arrive via the kitty keyboard protocol; terminals
        // without it ignore the escape sequence.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES)
        );
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let now = Instant::now();
        let mut console = Console::new();
        let audio = AudioPlayer::new(assets.audio.clone());
        if assets.audio.is_none() {
            console.warn("no track.* audio file in the assets directory");
        } else if !audio.is_available() {
            console.warn("audio unavailable; will retry on play");
        }

        let mut timeline = TimelineController::new(Vec::new());
        if let Some(duration) = audio.duration() {
            // Whole seconds, like the rest of the song math.
            timeline.set_total(Duration::from_secs(duration.as_secs()));
        }

        let asset_rx = spawn_loader(assets, config.sheet.geometry());
        let spawn = SpawnController::new(config.spawn.spawn_config());

        Ok(Self {
            terminal,
            theme: Theme::default(),
            config,
            sprite: SpriteState::Loading,
            characters: Vec::new(),
            next_character_id: 0,
            timeline,
            spawn,
            audio,
            marquee: Marquee::new(now),
            song_list: SongListPopup::new(),
            console,
            layout: ScreenLayout::default(),
            asset_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut events = EventStream::new();
        let mut render_tick = tokio::time::interval(RENDER_INTERVAL);
        let mut timeline_tick = tokio::time::interval(self.config.timeline.tick_interval());

        while !self.should_quit {
            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(error)) => tracing::warn!(%error, "terminal event error"),
                        None => self.should_quit = true,
                    }
                }
                _ = timeline_tick.tick() => {
                    self.on_timeline_tick(Instant::now());
                }
                _ = render_tick.tick() => {
                    self.on_render_tick(Instant::now());
                    self.draw()?;
                }
            }
        }

        Ok(())
    }

    // ── Events ──────────────────────────────────────────────────────────

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.song_list.is_open {
            self.handle_song_list_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Media(MediaKeyCode::PlayPause) => self.toggle_playback(),
            KeyCode::Media(MediaKeyCode::Play) => self.start_playback(),
            KeyCode::Media(MediaKeyCode::Pause) => self.pause_playback(),
            KeyCode::Char('l') => self.open_song_list(),
            KeyCode::Left => self.seek_adjacent(-1),
            KeyCode::Right => self.seek_adjacent(1),
            _ => {}
        }
    }

    fn handle_song_list_key(&mut self, key: KeyEvent) {
        let visible = self
            .layout
            .popup
            .map(|p| usize::from(p.list.height))
            .unwrap_or(8);
        let len = self.timeline.songs().len();

        match key.code {
            KeyCode::Esc | KeyCode::Char('l') => self.song_list.close(),
            KeyCode::Up | KeyCode::Char('k') => self.song_list.prev(visible),
            KeyCode::Down | KeyCode::Char('j') => self.song_list.next(len, visible),
            KeyCode::Enter => {
                let index = self.song_list.selected_index;
                self.song_list.close();
                self.seek_to_song(index);
            }
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);

        if self.song_list.is_open {
            match self.layout.popup {
                Some(popup) if popup.frame.contains(position) => {
                    let len = self.timeline.songs().len();
                    if let Some(index) =
                        self.song_list.song_at(&popup, mouse.column, mouse.row, len)
                    {
                        self.song_list.close();
                        self.seek_to_song(index);
                    }
                }
                _ => self.song_list.close(),
            }
            return;
        }

        if self.layout.top_bar.contains(position) {
            self.open_song_list();
        } else if self.layout.cell_to_stage(mouse.column, mouse.row).is_some() {
            // The stage, characters included, is one big play/pause button.
            self.toggle_playback();
        }
    }

    // ── Playback ────────────────────────────────────────────────────────

    fn toggle_playback(&mut self) {
        if self.timeline.is_playing() {
            self.pause_playback();
        } else {
            self.start_playback();
        }
    }

    fn start_playback(&mut self) {
        if self.timeline.is_playing() {
            return;
        }
        // The sink can drain during a pause, before any tick sees it.
        // Resuming would replay from zero under a clock stuck at the end;
        // close the session instead.
        if self.timeline.has_started() && self.audio.finished() {
            self.end_of_media(Instant::now());
            return;
        }
        if !self.audio.play() {
            self.console.warn("audio unavailable; playback not started");
            return;
        }

        let now = Instant::now();
        let fresh = !self.timeline.has_started();
        self.timeline.play(now);
        if fresh {
            self.spawn.reset();
        }
        self.arm_spawn(now);
        self.sync_marquee();
    }

    fn pause_playback(&mut self) {
        if !self.timeline.is_playing() {
            return;
        }
        self.audio.pause();
        self.timeline.pause(Instant::now());
        self.spawn.cancel_pending();
    }

    fn seek_to_song(&mut self, index: usize) {
        if index >= self.timeline.songs().len() {
            return;
        }

        let fresh = !self.timeline.has_started();
        if !self.timeline.is_playing() && !self.audio.play() {
            self.console.warn("audio unavailable; playback not started");
            return;
        }

        let now = Instant::now();
        let Some(outcome) = self.timeline.seek_to_song(index, now) else {
            return;
        };
        if !self.audio.seek(outcome.position) {
            self.console.warn("seeking is not supported for this track");
        }

        if outcome.started {
            if fresh {
                self.spawn.reset();
            }
            self.arm_spawn(now);
        }
        self.sync_marquee();
    }

    fn seek_adjacent(&mut self, delta: isize) {
        let len = self.timeline.songs().len();
        if len == 0 {
            return;
        }
        let current = self.timeline.session().current_song().unwrap_or(0) as isize;
        let target = (current + delta).clamp(0, len as isize - 1) as usize;
        self.seek_to_song(target);
    }

    fn end_of_media(&mut self, now: Instant) {
        tracing::info!("track finished");
        self.timeline.finish();
        self.marquee.clear();
        self.spawn.begin_teardown(now);
    }

    fn open_song_list(&mut self) {
        // Lay the popup out now; the opening scroll must use the list
        // height of the first paint, not a guess.
        let rows = self.timeline.songs().len().clamp(1, POPUP_MAX_ROWS);
        if let Ok(size) = self.terminal.size() {
            let area = Rect::new(0, 0, size.width, size.height);
            self.layout = ScreenLayout::compute(area, Some(rows));
        }
        let visible = self
            .layout
            .popup
            .map(|p| usize::from(p.list.height))
            .unwrap_or(rows);
        self.song_list
            .open(self.timeline.session().current_song(), visible);
    }

    // ── Ticks ───────────────────────────────────────────────────────────

    fn on_timeline_tick(&mut self, now: Instant) {
        if !self.timeline.is_playing() {
            return;
        }
        self.timeline.tick(now, self.audio.position());
        if self.audio.finished() {
            self.end_of_media(now);
            return;
        }
        self.sync_marquee();
    }

    fn on_render_tick(&mut self, now: Instant) {
        self.poll_assets(now);
        self.poll_spawn(now);
        self.tick_characters(now);
        self.marquee.advance(now);
    }

    fn poll_assets(&mut self, now: Instant) {
        while let Ok(event) = self.asset_rx.try_recv() {
            match event {
                AssetEvent::Sprite(Ok((sheet, frames))) => {
                    tracing::info!(frames = frames.frame_count(), "sprite sheet ready");
                    self.sprite = SpriteState::Ready { sheet, frames };
                    self.spawn_center(now);
                }
                AssetEvent::Sprite(Err(error)) => {
                    self.console.warn(format!("characters disabled: {error}"));
                    self.sprite = SpriteState::Missing;
                }
                AssetEvent::Songs(Ok(songs)) => {
                    if songs.is_empty() {
                        self.console.warn("song list is empty");
                    }
                    if self.timeline.session().total().is_none() {
                        if let Some(last) = songs.last() {
                            self.timeline.set_total(last.end_position());
                        }
                    }
                    self.timeline.load_songs(songs);
                    self.sync_marquee();
                }
                AssetEvent::Songs(Err(error)) => {
                    self.console.warn(format!("song list unavailable: {error}"));
                }
            }
        }
    }

    fn poll_spawn(&mut self, now: Instant) {
        match self.spawn.poll(now) {
            Some(SpawnDirective::Spawn) => self.try_spawn(now),
            Some(SpawnDirective::Remove) => self.remove_one_wanderer(),
            None => {}
        }
    }

    fn try_spawn(&mut self, now: Instant) {
        let (size, interval_range) = match &self.sprite {
            SpriteState::Ready { sheet, .. } => (
                sheet.geometry().scaled_size(self.config.sheet.scale),
                self.config.animation.interval_range(),
            ),
            // Sheet still loading: try again after the next interval.
            SpriteState::Loading => {
                self.arm_spawn(now);
                return;
            }
            SpriteState::Missing => return,
        };

        let viewport = self.layout.stage_viewport();
        let existing: Vec<StageRect> = self.characters.iter().map(|c| c.bounds).collect();
        let exclusions = self.layout.stage_exclusions();
        let mut rng = rand::thread_rng();

        match find_placement(
            viewport,
            STAGE_TOP_MARGIN,
            size,
            &existing,
            &exclusions,
            &mut rng,
        ) {
            Placement::At { x, y } => {
                let id = self.next_id();
                if let SpriteState::Ready { frames, .. } = &self.sprite {
                    let frame_interval = Character::random_interval(interval_range, &mut rng);
                    self.characters.push(Character::wanderer(
                        id,
                        StageRect::new(x, y, size.0, size.1),
                        frames,
                        frame_interval,
                        now,
                        &mut rng,
                    ));
                    tracing::debug!(id, x, y, "wanderer placed");
                }
                self.arm_spawn(now);
            }
            Placement::Full => {
                self.console.info("the stage is full; spawning paused");
                self.spawn.mark_full();
            }
        }
    }

    fn remove_one_wanderer(&mut self) {
        if let Some(index) = self.characters.iter().position(|c| !c.is_center()) {
            let character = self.characters.remove(index);
            tracing::debug!(id = character.id, "wanderer removed");
        }
        if !self.characters.iter().any(|c| !c.is_center()) {
            self.spawn.finish_teardown();
        }
    }

    fn tick_characters(&mut self, now: Instant) {
        let SpriteState::Ready { frames, .. } = &self.sprite else {
            return;
        };
        let mut rng = rand::thread_rng();
        for character in &mut self.characters {
            character.poll(now, frames, &mut rng);
        }
    }

    fn spawn_center(&mut self, now: Instant) {
        let (size, frame) = match &self.sprite {
            SpriteState::Ready { sheet, .. } => {
                let geometry = sheet.geometry();
                (
                    geometry.scaled_size(self.config.sheet.scale),
                    self.config
                        .sheet
                        .center_frame
                        .min(geometry.frame_count().saturating_sub(1)),
                )
            }
            _ => return,
        };

        let id = self.next_id();
        self.characters.insert(
            0,
            Character::center(id, StageRect::new(0, 0, size.0, size.1), frame, now),
        );
        self.position_center();
    }

    /// Keep the center figure centered; it follows terminal resizes while
    /// the wanderers stay where they were placed.
    fn position_center(&mut self) {
        let viewport = self.layout.stage_viewport();
        let Some(center) = self.characters.iter_mut().find(|c| c.is_center()) else {
            return;
        };
        center.bounds.x = viewport.width.saturating_sub(center.bounds.width) / 2;
        center.bounds.y = viewport.height.saturating_sub(center.bounds.height) / 2;
    }

    fn arm_spawn(&mut self, now: Instant) {
        let mut rng = rand::thread_rng();
        self.spawn.arm(now, &mut rng);
    }

    fn sync_marquee(&mut self) {
        let title = self.timeline.current_song().map(|song| song.title.clone());
        self.marquee.set_text(title);
    }

    fn next_id(&mut self) -> CharacterId {
        let id = self.next_character_id;
        self.next_character_id += 1;
        id
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn draw(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let popup_rows = self
            .song_list
            .is_open
            .then(|| self.timeline.songs().len().clamp(1, POPUP_MAX_ROWS));
        self.layout = ScreenLayout::compute(area, popup_rows);
        self.position_center();

        let Self {
            terminal,
            theme,
            sprite,
            characters,
            timeline,
            marquee,
            song_list,
            console,
            layout,
            ..
        } = self;

        let session = timeline.session();
        let sprite_pair = match sprite {
            SpriteState::Ready { sheet, frames } => Some((&*sheet, &*frames)),
            _ => None,
        };
        let overlay = if session.is_playing() {
            None
        } else if timeline.has_started() {
            Some("paused")
        } else {
            Some("press space or click to play")
        };

        terminal.draw(|f| {
            f.render_widget(
                TopBar {
                    theme,
                    marquee,
                    elapsed: session.elapsed(),
                    total: session.total(),
                    playing: session.is_playing(),
                },
                layout.top_bar,
            );
            render_stage(f, layout.stage, theme, sprite_pair, characters, overlay);
            f.render_widget(HintBar { theme }, layout.hint_bar);
            console.render(f, layout.console, theme);

            if song_list.is_open {
                if let Some(popup) = &layout.popup {
                    song_list.render(f, theme, timeline.songs(), session.current_song(), popup);
                }
            }
        })?;

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        super::restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}
