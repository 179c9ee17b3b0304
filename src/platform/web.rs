//! Browser platform: DOM host, scoped listeners and the tick timer
//!
//! Every subscription is held by a guard that unsubscribes on drop, so
//! destroying a [`WebArcade`] releases all of its listeners and its timer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use crate::audio::{AudioManager, SoundEffect};
use crate::config::GameKind;
use crate::error::{ArcadeError, Result};
use crate::host::Host;
use crate::renderer::CanvasSurface;
use crate::runner::Runner;
use crate::settings::Settings;
use crate::sim::{InputEvent, ScoreDisplay, Severity};

use super::key_event;

fn js_err(context: &str, err: JsValue) -> ArcadeError {
    ArcadeError::Platform(format!("{context}: {err:?}"))
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| ArcadeError::Platform("no window".into()))
}

fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| ArcadeError::Platform("no document".into()))
}

/// DOM event subscription, removed when dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| js_err(event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// `setInterval` timer, cleared when dropped
pub struct IntervalTimer {
    window: Window,
    handle: i32,
    interval_ms: u32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalTimer {
    pub fn new<F: FnMut() + 'static>(interval_ms: u32, tick: F) -> Result<Self> {
        let window = window()?;
        let callback = Closure::<dyn FnMut()>::new(tick);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                interval_ms as i32,
            )
            .map_err(|e| js_err("setInterval", e))?;
        Ok(Self {
            window,
            handle,
            interval_ms,
            _callback: callback,
        })
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Stop firing. The callback stays alive until the timer is dropped.
    pub fn cancel(&self) {
        self.window.clear_interval_with_handle(self.handle);
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Host backed by page elements `#score`, `#lives`, `#level` and `#status`
pub struct DomHost {
    document: Document,
    audio: AudioManager,
}

impl DomHost {
    pub fn new(document: Document, settings: &Settings) -> Self {
        Self {
            document,
            audio: AudioManager::new(settings.master_volume, settings.muted),
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    fn set_text(&self, id: &str, text: &str) {
        match self.document.get_element_by_id(id) {
            Some(el) => el.set_text_content(Some(text)),
            None => log::debug!("No #{id} element on the page"),
        }
    }

    fn set_status_class(&self, class: &str) {
        if let Some(el) = self.document.get_element_by_id("status") {
            el.set_class_name(class);
        }
    }
}

impl Host for DomHost {
    fn update_score(&mut self, score: &ScoreDisplay) {
        self.set_text("score", &score.to_string());
    }

    fn update_lives(&mut self, lives: u32) {
        self.set_text("lives", &lives.to_string());
    }

    fn update_level(&mut self, level: u32) {
        self.set_text("level", &level.to_string());
    }

    fn show_status(&mut self, message: &str, severity: Severity) {
        self.set_text("status", message);
        let class = match severity {
            Severity::Info => "status info",
            Severity::Success => "status success",
            Severity::Warning => "status warning",
            Severity::Error => "status error",
        };
        self.set_status_class(class);
    }

    fn hide_status(&mut self) {
        self.set_text("status", "");
        self.set_status_class("status hidden");
    }

    fn play_sound(&mut self, effect: SoundEffect) -> Result<()> {
        self.audio.play(effect)
    }

    /// Calls the page's `window.celebrate(x, y)` when it provides one
    fn celebrate(&mut self, x: f32, y: f32) -> Result<()> {
        let window = window()?;
        let hook = js_sys::Reflect::get(&window, &JsValue::from_str("celebrate"))
            .map_err(|e| js_err("celebrate", e))?;
        let hook = hook
            .dyn_into::<js_sys::Function>()
            .map_err(|_| ArcadeError::Collaborator("page has no celebrate()".into()))?;
        hook.call2(&JsValue::NULL, &JsValue::from_f64(x as f64), &JsValue::from_f64(y as f64))
            .map_err(|e| js_err("celebrate", e))?;
        Ok(())
    }
}

struct Shared {
    runner: Runner<DomHost>,
    surface: CanvasSurface,
    last_tick_ms: Option<f64>,
    timer: Option<IntervalTimer>,
    /// Cancelled timers whose callback may still be on the stack
    retired: Vec<IntervalTimer>,
}

type SharedRef = Rc<RefCell<Shared>>;

/// Start, stop or re-pace the timer to match the runner. Inside the timer's
/// own callback (`from_tick`) the running closure must outlive this call, so
/// replaced timers are parked in `retired` instead of dropped.
fn sync_timer(state: &SharedRef, from_tick: bool) -> Result<()> {
    let mut s = state.borrow_mut();
    if !from_tick {
        s.retired.clear();
    }
    let wanted = s.runner.wants_ticks().then(|| s.runner.tick_interval());
    let current = s.timer.as_ref().map(IntervalTimer::interval_ms);
    if wanted == current {
        return Ok(());
    }

    if let Some(old) = s.timer.take() {
        old.cancel();
        s.retired.push(old);
    }
    if let Some(interval_ms) = wanted {
        log::debug!("Tick timer at {interval_ms} ms");
        let weak: Weak<RefCell<Shared>> = Rc::downgrade(state);
        s.last_tick_ms = None;
        s.timer = Some(IntervalTimer::new(interval_ms, move || {
            if let Some(state) = weak.upgrade() {
                on_tick(&state);
            }
        })?);
    }
    Ok(())
}

fn on_tick(state: &SharedRef) {
    {
        let mut s = state.borrow_mut();
        // Only the active timer fires, so parked ones are safe to drop now
        s.retired.clear();
        let now = js_sys::Date::now();
        let elapsed = s
            .last_tick_ms
            .map_or(s.runner.tick_interval() as f64, |last| now - last);
        s.last_tick_ms = Some(now);

        let Shared { runner, surface, .. } = &mut *s;
        if let Err(e) = runner.advance(elapsed, surface) {
            log::warn!("Frame failed: {e}");
        }
    }
    if let Err(e) = sync_timer(state, true) {
        log::error!("Could not reschedule ticks: {e}");
    }
}

/// Apply `action` to the runner outside the tick callback, redraw, then
/// bring the timer in line with the new phase.
fn with_runner(state: &SharedRef, action: impl FnOnce(&mut Runner<DomHost>)) {
    {
        let mut s = state.borrow_mut();
        let Shared { runner, surface, .. } = &mut *s;
        action(runner);
        if !runner.is_destroyed() {
            if let Err(e) = runner.render(surface) {
                log::warn!("Frame failed: {e}");
            }
        }
    }
    if let Err(e) = sync_timer(state, false) {
        log::error!("Could not reschedule ticks: {e}");
    }
}

fn is_scrolling_key(key: &str) -> bool {
    matches!(key, " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight")
}

/// Pointer position in canvas pixels
fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 {
        canvas.width() as f64 / rect.width()
    } else {
        1.0
    };
    let sy = if rect.height() > 0.0 {
        canvas.height() as f64 / rect.height()
    } else {
        1.0
    };
    (
        ((event.client_x() as f64 - rect.left()) * sx) as f32,
        ((event.client_y() as f64 - rect.top()) * sy) as f32,
    )
}

/// Resolves on the next animation frame, once the canvas has layout
async fn next_frame(window: &Window) -> Result<()> {
    let mut scheduled = Ok(0);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        scheduled = window.request_animation_frame(&resolve);
    });
    scheduled.map_err(|e| js_err("requestAnimationFrame", e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| js_err("requestAnimationFrame", e))?;
    Ok(())
}

/// One game mounted on a page canvas
#[wasm_bindgen]
pub struct WebArcade {
    state: SharedRef,
    listeners: Vec<Listener>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebArcade {
    /// Mount the game `game_id` on the canvas with id `canvas_id`
    pub async fn init(game_id: String, canvas_id: String) -> std::result::Result<WebArcade, JsValue> {
        Self::mount(&game_id, &canvas_id)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Host keyboard input (`KeyboardEvent.key` names)
    pub fn keydown(&self, key: &str) {
        self.input(key_event(key, true));
    }

    pub fn keyup(&self, key: &str) {
        self.input(key_event(key, false));
    }

    /// On-screen control: `kind` is `"start"` or `"end"`
    #[wasm_bindgen(js_name = touchControl)]
    pub fn touch_control(&self, key: &str, kind: &str) {
        self.input(InputEvent::touch(key, kind));
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f32, y: f32) {
        self.input(Some(InputEvent::PointerDown { x, y }));
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f32, y: f32) {
        self.input(Some(InputEvent::PointerMove { x, y }));
    }

    pub fn start(&self) {
        with_runner(&self.state, |r| {
            r.start();
        });
    }

    pub fn pause(&self) {
        with_runner(&self.state, |r| {
            r.pause();
        });
    }

    pub fn resume(&self) {
        with_runner(&self.state, |r| {
            r.resume();
        });
    }

    pub fn restart(&self) {
        with_runner(&self.state, Runner::restart);
    }

    /// Mute or unmute sound and remember the choice
    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.state.borrow_mut().runner.host_mut().set_muted(muted);
        if let Err(e) = self.settings.save() {
            log::warn!("Could not save settings: {e}");
        }
    }

    /// Current phase as `"menu"`, `"playing"`, `"paused"` or `"gameover"`
    pub fn phase(&self) -> String {
        self.state.borrow().runner.phase().as_str().to_string()
    }

    /// Stop the game and release every listener and the timer
    pub fn destroy(&mut self) {
        self.listeners.clear();
        with_runner(&self.state, Runner::destroy);
    }
}

impl WebArcade {
    async fn mount(game_id: &str, canvas_id: &str) -> Result<Self> {
        let kind: GameKind = game_id.parse()?;
        let config = kind.config();
        let window = window()?;
        let document = document()?;
        let settings = Settings::load();

        let surface = CanvasSurface::new(canvas_id, config.canvas_width, config.canvas_height)?;
        let canvas = surface.canvas().clone();
        let seed = js_sys::Date::now() as u64;
        let host = DomHost::new(document.clone(), &settings);
        let runner = Runner::new(kind, &settings, seed, host)?;

        next_frame(&window).await?;

        let state = Rc::new(RefCell::new(Shared {
            runner,
            surface,
            last_tick_ms: None,
            timer: None,
            retired: Vec::new(),
        }));
        let listeners = Self::listen(&state, &document, &canvas)?;
        with_runner(&state, |_| {});
        log::info!("{} mounted on #{canvas_id}", config.title);
        Ok(Self {
            state,
            listeners,
            settings,
        })
    }

    fn input(&self, event: Option<InputEvent>) {
        if let Some(event) = event {
            with_runner(&self.state, |r| r.handle_event(event));
        }
    }

    fn listen(state: &SharedRef, document: &Document, canvas: &HtmlCanvasElement) -> Result<Vec<Listener>> {
        let mut listeners = Vec::new();

        for (event, down) in [("keydown", true), ("keyup", false)] {
            let state = Rc::downgrade(state);
            listeners.push(Listener::new(document, event, move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                if is_scrolling_key(&key) {
                    event.prevent_default();
                }
                if let (Some(state), Some(input)) = (state.upgrade(), key_event(&key, down)) {
                    with_runner(&state, |r| r.handle_event(input));
                }
            })?);
        }

        for (event, is_down) in [("mousedown", true), ("mousemove", false)] {
            let state = Rc::downgrade(state);
            let target = canvas.clone();
            listeners.push(Listener::new(canvas, event, move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = canvas_point(&target, event);
                let input = if is_down {
                    InputEvent::PointerDown { x, y }
                } else {
                    InputEvent::PointerMove { x, y }
                };
                if let Some(state) = state.upgrade() {
                    with_runner(&state, |r| r.handle_event(input));
                }
            })?);
        }

        let weak = Rc::downgrade(state);
        let doc = document.clone();
        listeners.push(Listener::new(document, "visibilitychange", move |_event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                if let Some(state) = weak.upgrade() {
                    with_runner(&state, Runner::on_visibility_hidden);
                }
            }
        })?);

        Ok(listeners)
    }
}

impl Drop for WebArcade {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Wire up logging once per page
#[wasm_bindgen(start)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}
