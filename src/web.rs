//! Browser front end: one canvas, an animation-frame loop and input listeners.
//!
//! The loop only runs while a round is in progress. Its frame handle is kept so
//! reset and restart can cancel the pending callback instead of leaving it to
//! fire against a stale round.

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;

use glam::DVec2;
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::bow::{Axis, Direction};
use crate::config::GameConfig;
use crate::difficulty::OBSTACLE_PULSE_SECS;
use crate::error::{ArcheryError, Result};
use crate::session::{GameEvent, GameSession, Phase};
use crate::target::HIT_PULSE_SECS;

const CANVAS_ID: &str = "archery-canvas";

/// Longest frame gap fed to the simulation; a backgrounded tab resumes instead
/// of replaying seconds of catch-up ticks.
const MAX_FRAME_SECS: f64 = 0.25;

struct WebGame {
    session: GameSession,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    last_ts: Option<f64>,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = const { RefCell::new(None) };
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
    static FRAME_HANDLE: Cell<Option<i32>> = const { Cell::new(None) };
    static LISTENERS_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// Creates (or reuses) the canvas, replaces any running session and starts a round.
pub fn launch(config: GameConfig) -> Result<()> {
    let win = window().ok_or(ArcheryError::NoWindow)?;
    let doc = win.document().ok_or(ArcheryError::NoDocument)?;
    let area = config.play_area;

    let canvas: HtmlCanvasElement = match doc.get_element_by_id(CANVAS_ID) {
        Some(el) => el.dyn_into().map_err(|_| ArcheryError::NoCanvasContext)?,
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")?
                .dyn_into()
                .map_err(|_| ArcheryError::NoCanvasContext)?;
            c.set_id(CANVAS_ID);
            c.set_attribute(
                "style",
                "display:block; margin:24px auto; border:2px solid #222; border-radius:12px; background:#10151f; cursor:crosshair;",
            )?;
            doc.body().ok_or(ArcheryError::NoDocument)?.append_child(&c)?;
            c
        }
    };
    canvas.set_width(area.width as u32);
    canvas.set_height(area.height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(ArcheryError::NoCanvasContext)?
        .dyn_into()
        .map_err(|_| ArcheryError::NoCanvasContext)?;
    ctx.set_text_align("center");

    let mut session = GameSession::new(config)?;
    session.start();

    cancel_frame();
    let game = WebGame { session, canvas: canvas.clone(), ctx, last_ts: None };
    GAME.with(|cell| *cell.borrow_mut() = Some(game));
    install_frame_callback();
    if !LISTENERS_INSTALLED.with(Cell::get) {
        install_listeners(&canvas)?;
        LISTENERS_INSTALLED.with(|f| f.set(true));
    }
    request_frame()?;
    info!("archery canvas ready ({}x{})", area.width, area.height);
    Ok(())
}

pub fn reset() {
    cancel_frame();
    with_game(|g| {
        g.session.reset();
        g.flush_events();
        g.render();
    });
}

pub fn restart() -> Result<()> {
    cancel_frame();
    with_game(|g| {
        g.session.restart();
        g.last_ts = None;
    });
    request_frame()
}

pub fn score() -> u32 {
    GAME.with(|cell| cell.borrow().as_ref().map_or(0, |g| g.session.score()))
}

fn with_game<F: FnOnce(&mut WebGame)>(f: F) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            f(game);
        }
    });
}

// --- Frame loop --------------------------------------------------------------

fn install_frame_callback() {
    FRAME_CALLBACK.with(|cb| {
        if cb.borrow().is_some() {
            return;
        }
        *cb.borrow_mut() = Some(Closure::wrap(Box::new(|ts: f64| {
            FRAME_HANDLE.with(|h| h.set(None));
            let mut keep_going = false;
            with_game(|g| keep_going = g.frame(ts));
            if keep_going {
                if let Err(err) = request_frame() {
                    warn!("frame loop stopped: {err}");
                }
            }
        }) as Box<dyn FnMut(f64)>));
    });
}

fn request_frame() -> Result<()> {
    if FRAME_HANDLE.with(Cell::get).is_some() {
        return Ok(());
    }
    let win = window().ok_or(ArcheryError::NoWindow)?;
    FRAME_CALLBACK.with(|cb| {
        if let Some(cb) = cb.borrow().as_ref() {
            let id = win.request_animation_frame(cb.as_ref().unchecked_ref())?;
            FRAME_HANDLE.with(|h| h.set(Some(id)));
        }
        Ok(())
    })
}

fn cancel_frame() {
    if let Some(id) = FRAME_HANDLE.with(Cell::take) {
        if let Some(win) = window() {
            let _ = win.cancel_animation_frame(id);
        }
    }
}

impl WebGame {
    /// Advances and draws one frame. Returns whether another frame is wanted.
    fn frame(&mut self, ts: f64) -> bool {
        let dt = self
            .last_ts
            .map_or(0.0, |last| ((ts - last) / 1000.0).clamp(0.0, MAX_FRAME_SECS));
        self.last_ts = Some(ts);
        self.session.advance(dt);
        self.flush_events();
        self.render();
        self.session.is_playing()
    }

    fn flush_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                GameEvent::LevelUp { level } => info!("level {level}"),
                GameEvent::GameOver { score, level } => {
                    info!("final score {score} at level {level}")
                }
                GameEvent::Hit { score, .. } => debug!("hit, score {score}"),
                _ => {}
            }
        }
    }

    fn render(&self) {
        let ctx = &self.ctx;
        let s = &self.session;
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;

        ctx.set_fill_style_str("#10151f");
        ctx.fill_rect(0.0, 0.0, w, h);

        // Obstacles
        for o in s.obstacles() {
            let grow = 1.0 - 0.1 * (o.pulse() / OBSTACLE_PULSE_SECS);
            let c = o.rect.center();
            let (ow, oh) = (o.rect.w * grow, o.rect.h * grow);
            ctx.set_fill_style_str("#6d4c41");
            ctx.fill_rect(c.x - ow / 2.0, c.y - oh / 2.0, ow, oh);
        }

        // Target: concentric rings, briefly enlarged after a hit
        let t = s.target().rect();
        let scale = 1.0 + 0.2 * (s.target().pulse() / HIT_PULSE_SECS);
        let c = t.center();
        let radius = t.w / 2.0 * scale;
        for (i, color) in ["#f5f5f5", "#d63031", "#f5f5f5", "#d63031"].iter().enumerate() {
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            let _ = ctx.arc(c.x, c.y, radius * (1.0 - i as f64 * 0.25), 0.0, TAU);
            ctx.fill();
        }

        // Bow
        let bow = s.bow();
        let center = bow.center();
        ctx.save();
        let _ = ctx.translate(center.x, center.y);
        let _ = ctx.rotate(bow.angle());
        ctx.set_stroke_style_str("#c8a165");
        ctx.set_line_width(5.0);
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, 28.0, -TAU / 4.0, TAU / 4.0);
        ctx.stroke();
        ctx.restore();

        // Arrow
        let arrow = s.arrow();
        let tip = arrow.tip();
        let tail = tip - arrow.heading() * arrow.size().height;
        ctx.set_stroke_style_str(if arrow.is_flying() { "#ffeaa7" } else { "#b2bec3" });
        ctx.set_line_width(arrow.size().width);
        line(ctx, tail, tip);

        // HUD
        ctx.set_fill_style_str("#dfe6e9");
        ctx.set_font("16px ui-monospace, Menlo, Consolas, monospace");
        ctx.set_text_align("left");
        let _ = ctx.fill_text(
            &format!("Score: {}   Time: {}   Level: {}", s.score(), s.time_left(), s.level()),
            12.0,
            22.0,
        );
        ctx.set_text_align("center");

        match s.phase() {
            Phase::Playing => {}
            Phase::Idle => {
                ctx.set_font("bold 24px ui-sans-serif, system-ui");
                let _ = ctx.fill_text("Press Enter to start", w / 2.0, h / 2.0);
            }
            Phase::GameOver => {
                ctx.set_fill_style_str("rgba(0,0,0,0.55)");
                ctx.fill_rect(0.0, 0.0, w, h);
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("bold 30px ui-sans-serif, system-ui");
                let _ = ctx.fill_text("GAME OVER", w / 2.0, h / 2.0 - 20.0);
                ctx.set_font("18px ui-sans-serif, system-ui");
                let _ = ctx.fill_text(
                    &format!("Final score {} - level {}", s.score(), s.level()),
                    w / 2.0,
                    h / 2.0 + 12.0,
                );
                let _ = ctx.fill_text("Press Enter to play again", w / 2.0, h / 2.0 + 40.0);
            }
        }
    }
}

fn line(ctx: &CanvasRenderingContext2d, from: DVec2, to: DVec2) {
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
}

// --- Input -------------------------------------------------------------------

enum Command {
    Fire,
    Move(Direction),
    Restart,
    Reset,
}

fn command_for(code: &str, key: &str, axis: Axis) -> Option<Command> {
    if code == "Space" {
        return Some(Command::Fire);
    }
    let step = match (axis, key) {
        (Axis::Horizontal, "ArrowLeft" | "a" | "A") => Some(Direction::Backward),
        (Axis::Horizontal, "ArrowRight" | "d" | "D") => Some(Direction::Forward),
        (Axis::Vertical, "ArrowUp" | "w" | "W") => Some(Direction::Backward),
        (Axis::Vertical, "ArrowDown" | "s" | "S") => Some(Direction::Forward),
        _ => None,
    };
    if let Some(dir) = step {
        return Some(Command::Move(dir));
    }
    match key {
        "Enter" | "r" | "R" => Some(Command::Restart),
        "Escape" => Some(Command::Reset),
        _ => None,
    }
}

fn install_listeners(canvas: &HtmlCanvasElement) -> Result<()> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or(ArcheryError::NoDocument)?;

    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let mut command = None;
            GAME.with(|cell| {
                if let Some(g) = cell.borrow().as_ref() {
                    command = command_for(&evt.code(), &evt.key(), g.session.bow().axis());
                }
            });
            let Some(command) = command else { return };
            if !matches!(command, Command::Reset | Command::Restart) {
                evt.prevent_default();
            }
            match command {
                Command::Fire => with_game(|g| {
                    g.session.fire();
                }),
                Command::Move(dir) => with_game(|g| g.session.move_bow(dir)),
                Command::Reset => reset(),
                Command::Restart => {
                    let mut idle = false;
                    with_game(|g| idle = !g.session.is_playing());
                    if idle {
                        if let Err(err) = restart() {
                            warn!("restart failed: {err}");
                        }
                    }
                }
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_game(|g| {
                g.session.fire();
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        // offset_x/offset_y are canvas-local, which matches play-area coordinates.
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let point = DVec2::new(evt.offset_x() as f64, evt.offset_y() as f64);
            with_game(|g| g.session.aim_at(point));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}
