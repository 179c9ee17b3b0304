//! Fixed-tick driver shared by every game
//!
//! One `Runner` per loaded game. It owns the session phase machine, routes
//! input, schedules ticks from an accumulator (the platform only reports
//! elapsed time), delivers host events and draws frames with the phase
//! overlays. Per tick the order is always: latched input, game update,
//! host reporting, render.

use crate::config::GameKind;
use crate::consts::MAX_SUBSTEPS;
use crate::error::Result;
use crate::games;
use crate::host::{self, Host};
use crate::renderer::{Color, Frame, Layer, Surface};
use crate::settings::Settings;
use crate::sim::{Game, GamePhase, HostEvent, InputEvent, Key, Session};

pub struct Runner<H: Host> {
    game: Box<dyn Game>,
    session: Session,
    host: H,
    frame: Frame,
    /// Inputs received since the last tick, handed to the game at tick start
    pending: Vec<InputEvent>,
    accumulator_ms: f64,
    ticks: u64,
    celebrations: bool,
    destroyed: bool,
}

impl<H: Host> Runner<H> {
    /// Build the runner for `kind`, seeded for reproducible runs
    pub fn new(kind: GameKind, settings: &Settings, seed: u64, host: H) -> Result<Self> {
        let config = kind.config();
        let lives = config.shows_lives.then_some(settings.start_lives);
        let mut runner = Self::with_game(games::create(kind, settings, seed)?, lives, host);
        runner.celebrations = settings.celebrations();
        Ok(runner)
    }

    /// Wrap an already-built game
    pub fn with_game(mut game: Box<dyn Game>, start_lives: Option<u32>, host: H) -> Self {
        let config = game.kind().config();
        let mut session = Session::new(start_lives);
        // Board preview behind the menu; nothing is reported before start
        game.reset(&mut session);
        session.drain_events();
        log::info!("{} loaded", config.title);
        Self {
            game,
            session,
            host,
            frame: Frame::new(config.canvas_width, config.canvas_height),
            pending: Vec::new(),
            accumulator_ms: 0.0,
            ticks: 0,
            celebrations: true,
            destroyed: false,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.game.kind()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Last frame drawn
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn game(&self) -> &dyn Game {
        self.game.as_ref()
    }

    /// Ticks run since load
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether the platform's tick source should be running
    pub fn wants_ticks(&self) -> bool {
        !self.destroyed && self.session.is_playing()
    }

    /// Current tick interval in ms
    pub fn tick_interval(&self) -> u32 {
        self.game.tick_ms(&self.session).max(1)
    }

    /// `Menu -> Playing`
    pub fn start(&mut self) -> bool {
        if self.destroyed || self.session.phase() != GamePhase::Menu {
            return false;
        }
        log::info!("Starting {}", self.kind());
        self.begin_run();
        true
    }

    /// `Playing -> Paused`. Idempotent.
    pub fn pause(&mut self) -> bool {
        if self.destroyed || !self.session.pause() {
            return false;
        }
        log::info!("Paused");
        self.game.clear_input();
        self.pending.clear();
        self.accumulator_ms = 0.0;
        self.flush();
        true
    }

    /// `Paused -> Playing`
    pub fn resume(&mut self) -> bool {
        if self.destroyed || !self.session.resume() {
            return false;
        }
        log::info!("Resumed");
        self.accumulator_ms = 0.0;
        self.flush();
        true
    }

    /// Fresh session from any phase
    pub fn restart(&mut self) {
        if self.destroyed {
            return;
        }
        log::info!("Restarting {}", self.kind());
        self.begin_run();
    }

    /// Auto-pause when the page is hidden
    pub fn on_visibility_hidden(&mut self) {
        if self.pause() {
            log::info!("Auto-paused (page hidden)");
        }
    }

    /// Stop for good; every later call is a no-op
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.game.clear_input();
        self.pending.clear();
        log::info!("{} destroyed", self.kind());
    }

    fn begin_run(&mut self) {
        self.pending.clear();
        self.accumulator_ms = 0.0;
        self.game.clear_input();
        self.session.begin();
        self.game.reset(&mut self.session);
        self.flush();
    }

    /// Route one input: phase keys are handled here, everything else is
    /// queued for the game while playing.
    pub fn handle_event(&mut self, event: InputEvent) {
        if self.destroyed {
            return;
        }
        let pressed = event.pressed();
        let is_tap = matches!(event, InputEvent::PointerDown { .. });

        match self.session.phase() {
            GamePhase::Menu => {
                if pressed == Some(Key::Space) || is_tap {
                    self.start();
                }
            }
            GamePhase::GameOver => {
                if pressed == Some(Key::Space) {
                    self.restart();
                }
            }
            GamePhase::Paused => {
                if matches!(pressed, Some(Key::Space | Key::Escape | Key::Char('p'))) {
                    self.resume();
                }
            }
            GamePhase::Playing => {
                let pauses = match pressed {
                    Some(Key::Escape) => true,
                    Some(Key::Char('p')) => !self.game.letter_input(),
                    Some(Key::Space) => self.game.space_pauses(),
                    _ => false,
                };
                if pauses {
                    self.pause();
                } else {
                    self.pending.push(event);
                }
            }
        }
    }

    /// Run exactly one tick (no-op unless playing)
    pub fn step(&mut self) {
        if !self.wants_ticks() {
            return;
        }
        let dt_ms = self.tick_interval();
        for event in self.pending.drain(..) {
            self.game.handle_input(&event);
        }
        self.game.update(&mut self.session, dt_ms as f32 / 1000.0);
        self.session.elapse(dt_ms);
        self.ticks += 1;
        self.flush();
    }

    /// Feed elapsed wall time, run the ticks that fit (bounded by
    /// `MAX_SUBSTEPS`) and draw once. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_ms: f64, surface: &mut dyn Surface) -> Result<u32> {
        let mut substeps = 0;
        if self.wants_ticks() {
            self.accumulator_ms += elapsed_ms.max(0.0);
            while self.wants_ticks() && substeps < MAX_SUBSTEPS {
                let tick = self.tick_interval() as f64;
                if self.accumulator_ms < tick {
                    break;
                }
                self.step();
                self.accumulator_ms -= tick;
                substeps += 1;
            }
            // Drop the backlog rather than spiral
            if substeps == MAX_SUBSTEPS {
                self.accumulator_ms = 0.0;
            }
        }
        self.render(surface)?;
        Ok(substeps)
    }

    /// Redraw the current state with the phase overlay
    pub fn render(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.draw();
        surface.present(&self.frame)
    }

    fn draw(&mut self) {
        let config = self.kind().config();
        self.frame.clear(Color::BLACK);
        self.game.render(&self.session, &mut self.frame);

        match self.session.phase() {
            GamePhase::Menu => {
                self.frame
                    .banner(&config.title.to_uppercase(), Some("Press SPACE to start"));
                let y = self.frame.height() / 2.0 + 56.0;
                self.frame
                    .centered_text(Layer::Overlay, y, config.description, 14.0, Color::hex(0x88ff88));
            }
            GamePhase::Paused => self.frame.banner("PAUSED", Some("Press SPACE to resume")),
            GamePhase::GameOver => {
                let hint = format!("Score: {} - Press SPACE to play again", self.session.score());
                self.frame.banner("GAME OVER", Some(&hint));
            }
            GamePhase::Playing => {}
        }
        self.frame.sort();
    }

    /// Deliver pending session events to the host, in order
    fn flush(&mut self) {
        for event in self.session.drain_events() {
            if !self.celebrations && matches!(event, HostEvent::Celebrate { .. }) {
                continue;
            }
            host::dispatch(&mut self.host, &event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::renderer::TextSurface;
    use crate::sim::TouchPhase;

    fn runner(kind: GameKind) -> Runner<RecordingHost> {
        Runner::new(kind, &Settings::default(), 7, RecordingHost::default()).unwrap()
    }

    #[test]
    fn test_menu_until_space() {
        let mut r = runner(GameKind::Wormy);
        assert_eq!(r.phase(), GamePhase::Menu);
        assert!(!r.wants_ticks());
        r.handle_event(InputEvent::KeyDown(Key::ArrowUp));
        assert_eq!(r.phase(), GamePhase::Menu);
        r.handle_event(InputEvent::KeyDown(Key::Space));
        assert_eq!(r.phase(), GamePhase::Playing);
        assert!(r.wants_ticks());
        assert_eq!(r.host().last_lives(), Some(3));
    }

    #[test]
    fn test_touch_space_starts() {
        let mut r = runner(GameKind::Chompy);
        r.handle_event(InputEvent::Touch {
            key: Key::Space,
            phase: TouchPhase::Down,
        });
        assert_eq!(r.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_twice_single_banner() {
        let mut r = runner(GameKind::Wormy);
        r.start();
        r.host_mut().clear();
        assert!(r.pause());
        assert!(!r.pause());
        let banners = r.host().count(|e| matches!(e, HostEvent::Status { .. }));
        assert_eq!(banners, 1);
        assert!(!r.wants_ticks());
    }

    #[test]
    fn test_paused_does_not_tick() {
        let mut r = runner(GameKind::PaddleBall);
        r.start();
        r.pause();
        let mut surface = TextSurface::new(40, 20);
        let ran = r.advance(1000.0, &mut surface).unwrap();
        assert_eq!(ran, 0);
        assert_eq!(r.ticks(), 0);
        assert!(r.frame().has_text("PAUSED"));
    }

    #[test]
    fn test_escape_pauses_and_resumes() {
        let mut r = runner(GameKind::BlockStack);
        r.start();
        r.handle_event(InputEvent::KeyDown(Key::Escape));
        assert_eq!(r.phase(), GamePhase::Paused);
        r.handle_event(InputEvent::KeyDown(Key::Char('p')));
        assert_eq!(r.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_space_is_gameplay_in_block_stack() {
        let mut r = runner(GameKind::BlockStack);
        r.start();
        r.handle_event(InputEvent::KeyDown(Key::Space));
        assert_eq!(r.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_p_is_a_letter_in_typing_games() {
        let mut r = runner(GameKind::WordDefenders);
        r.start();
        r.handle_event(InputEvent::KeyDown(Key::Char('p')));
        assert_eq!(r.phase(), GamePhase::Playing);
        r.handle_event(InputEvent::KeyDown(Key::Space));
        assert_eq!(r.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_advance_bounded_substeps() {
        let mut r = runner(GameKind::PaddleBall);
        r.start();
        let mut surface = TextSurface::new(40, 20);
        let ran = r.advance(10_000.0, &mut surface).unwrap();
        assert_eq!(ran, MAX_SUBSTEPS);
        // Backlog dropped
        let ran = r.advance(0.0, &mut surface).unwrap();
        assert_eq!(ran, 0);
    }

    #[test]
    fn test_advance_accumulates_partial_ticks() {
        let mut r = runner(GameKind::Wormy);
        r.start();
        let mut surface = TextSurface::new(20, 20);
        assert_eq!(r.advance(60.0, &mut surface).unwrap(), 0);
        assert_eq!(r.advance(60.0, &mut surface).unwrap(), 1);
    }

    #[test]
    fn test_destroy_stops_everything() {
        let mut r = runner(GameKind::Wormy);
        r.start();
        r.destroy();
        assert!(!r.wants_ticks());
        r.step();
        r.handle_event(InputEvent::KeyDown(Key::Escape));
        r.restart();
        assert_eq!(r.ticks(), 0);
        assert_eq!(r.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_visibility_hidden_pauses() {
        let mut r = runner(GameKind::RoadDash);
        r.start();
        r.on_visibility_hidden();
        assert_eq!(r.phase(), GamePhase::Paused);
        // Hidden again while paused: nothing new
        r.host_mut().clear();
        r.on_visibility_hidden();
        assert!(r.host().events.is_empty());
    }

    #[test]
    fn test_menu_overlay_rendered() {
        let mut r = runner(GameKind::Chompy);
        let mut surface = TextSurface::new(56, 64);
        r.render(&mut surface).unwrap();
        assert!(r.frame().has_text("CHOMPY"));
        assert!(r.frame().has_text("Press SPACE to start"));
    }

    #[test]
    fn test_reduced_motion_drops_celebrations() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut r = Runner::new(GameKind::Wormy, &settings, 1, RecordingHost::default()).unwrap();
        r.start();
        r.session.celebrate(1.0, 1.0);
        r.flush();
        assert_eq!(r.host().count(|e| matches!(e, HostEvent::Celebrate { .. })), 0);
    }
}
