//! Pumpy Pills entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use pumpy_pills::Tuning;
#[cfg(not(target_arch = "wasm32"))]
use pumpy_pills::sim::{TickInput, World, tick};

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use pumpy_pills::characters::{CELL_SIZE, default_roster};
    use pumpy_pills::platform::perf::{JITTER_ALERT_MS, JITTER_WARN_MS};
    use pumpy_pills::platform::{FrameMonitor, JumpDebouncer};
    use pumpy_pills::sim::{CandleDirection, GamePhase, HudSnapshot, Pattern, TickInput, World, tick};
    use pumpy_pills::{CharacterManager, Tuning};

    const BACKGROUND: &str = "#0b0e14";
    const BARRIER: &str = "#ef5350";
    const CANDLE_UP: &str = "#26a69a";
    const CANDLE_DOWN: &str = "#ef5350";
    const TEXT: &str = "#e0e0e0";
    const MUTED: &str = "#b2b5be";
    const WARN: &str = "#ffaa55";
    const ALERT: &str = "#ff5555";
    /// Palette indexed by `Particle::color`
    const PARTICLE_COLORS: [&str; 3] = ["#ffffff", "#ffd54f", "#ff7043"];

    fn pattern_color(pattern: Pattern) -> &'static str {
        match pattern {
            Pattern::Staircase => "#34d399",
            Pattern::Wave => "#6ee7b7",
            Pattern::Zigzag => "#a7f3d0",
            Pattern::Narrow => "#059669",
            Pattern::Standard | Pattern::Rhythm => "#86efac",
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Game instance holding all state
    struct Game {
        world: World,
        characters: CharacterManager,
        debouncer: JumpDebouncer,
        perf: FrameMonitor,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        /// Set when the simulation reports a fatal error; the loop stops
        halted: bool,
    }

    impl Game {
        /// Queue a jump from any input source
        fn press(&mut self) {
            let now = js_sys::Date::now();
            self.debouncer.accept(now);
        }

        /// Pointer press in client pixels: character strip first, then jump
        fn press_at(&mut self, client_x: f32, client_y: f32) {
            let (x, y) = self.to_logical(client_x, client_y);
            let phase = self.world.game.phase;
            if matches!(phase, GamePhase::Start | GamePhase::GameOver) {
                let canvas = &self.world.tuning.canvas;
                if self
                    .characters
                    .handle_selection(x, y, phase, canvas.width, canvas.height)
                {
                    let id = self.characters.selected().id.clone();
                    self.world.set_selected_character(id);
                    return;
                }
            }
            self.press();
        }

        /// Map CSS pixels onto the logical canvas
        fn to_logical(&self, x: f32, y: f32) -> (f32, f32) {
            let canvas = &self.world.tuning.canvas;
            let cw = self.canvas.client_width().max(1) as f32;
            let ch = self.canvas.client_height().max(1) as f32;
            (x * canvas.width / cw, y * canvas.height / ch)
        }

        fn update(&mut self, time: f64) {
            self.perf.record(time);
            let input = TickInput {
                jump: self.debouncer.take(),
            };
            if let Err(e) = tick(&mut self.world, &input) {
                log::error!("Simulation halted: {}", e);
                self.halted = true;
            }
        }

        fn render(&self) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let w = self.world.tuning.canvas.width as f64;
            let h = self.world.tuning.canvas.height as f64;

            ctx.set_fill_style_str(BACKGROUND);
            ctx.fill_rect(0.0, 0.0, w, h);

            self.draw_chart();
            self.draw_obstacles();
            self.draw_particles()?;
            self.draw_player()?;
            self.draw_hud()?;
            Ok(())
        }

        fn draw_chart(&self) {
            let ctx = &self.ctx;
            let world_x = self.world.game.world_x;
            let player_x = self.world.player.x;
            let half = self.world.tuning.chart.candle_width as f64 / 2.0;

            for candle in &self.world.chart.candles {
                let x = (candle.x - world_x + player_x) as f64;
                let color = match candle.direction {
                    CandleDirection::Up => CANDLE_UP,
                    CandleDirection::Down => CANDLE_DOWN,
                };
                ctx.set_fill_style_str(color);
                ctx.set_global_alpha(0.35);
                ctx.fill_rect(x - 0.5, candle.high as f64, 1.0, (candle.low - candle.high) as f64);
                let top = candle.open.min(candle.close) as f64;
                let body = (candle.open - candle.close).abs().max(1.0) as f64;
                ctx.fill_rect(x - half + 1.0, top, half * 2.0 - 2.0, body);
            }
            ctx.set_global_alpha(1.0);
        }

        fn draw_obstacles(&self) {
            let ctx = &self.ctx;
            let width = self.world.obstacles.width() as f64;
            let h = self.world.tuning.canvas.height as f64;

            ctx.set_fill_style_str(BARRIER);
            for o in &self.world.obstacles.obstacles {
                let x = o.x as f64;
                let top = o.top as f64;
                let bottom = o.bottom as f64;
                ctx.fill_rect(x, 0.0, width, top);
                ctx.fill_rect(x, bottom, width, h - bottom);
                // Ragged caps
                ctx.fill_rect(x + 4.0, top, width - 8.0, o.top_jitter as f64);
                ctx.fill_rect(
                    x + 4.0,
                    bottom - o.bottom_jitter as f64,
                    width - 8.0,
                    o.bottom_jitter as f64,
                );
            }
        }

        fn draw_particles(&self) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let max_life = self.world.particles.max_life();
            for p in self.world.particles.iter() {
                let color = PARTICLE_COLORS
                    .get(p.color as usize)
                    .copied()
                    .unwrap_or(TEXT);
                ctx.set_fill_style_str(color);
                ctx.set_global_alpha(p.alpha(max_life) as f64);
                ctx.begin_path();
                ctx.arc(p.pos.x as f64, p.pos.y as f64, 2.5, 0.0, TAU)?;
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);
            Ok(())
        }

        fn draw_player(&self) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let player = &self.world.player;
            let r = player.radius() as f64;

            ctx.save();
            ctx.translate(player.x as f64, player.y as f64)?;
            ctx.rotate(player.rotation as f64)?;
            ctx.set_fill_style_str(&self.characters.selected().color);
            ctx.begin_path();
            ctx.arc(0.0, 0.0, r, 0.0, TAU)?;
            ctx.fill();
            // Pill split
            ctx.set_fill_style_str(TEXT);
            ctx.fill_rect(-r, -1.0, r * 2.0, 2.0);
            ctx.restore();
            Ok(())
        }

        fn draw_hud(&self) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let hud = HudSnapshot::capture(&self.world);
            let canvas = &self.world.tuning.canvas;
            let w = canvas.width as f64;
            let h = canvas.height as f64;

            ctx.set_fill_style_str(TEXT);
            ctx.set_font("16px monospace");
            ctx.set_text_align("left");
            ctx.fill_text(&hud.portfolio_text(), 12.0, 24.0)?;
            ctx.fill_text(&format!("Score {}", hud.score), 12.0, 44.0)?;
            ctx.set_text_align("right");
            ctx.fill_text(
                &format!("Lv {} ({}/{})", hud.level, hud.obstacles_in_level, hud.obstacles_needed),
                w - 12.0,
                24.0,
            )?;

            ctx.set_text_align("center");
            match hud.phase {
                GamePhase::Loading => ctx.fill_text("Loading...", w / 2.0, h / 2.0)?,
                GamePhase::Start => {
                    ctx.fill_text("Tap or press Space to buy in", w / 2.0, h / 2.0)?;
                    self.draw_character_strip(hud.phase)?;
                }
                GamePhase::GameOver => {
                    ctx.set_font("28px monospace");
                    ctx.fill_text("POSITION LIQUIDATED", w / 2.0, h / 2.0 - 40.0)?;
                    ctx.set_font("16px monospace");
                    ctx.fill_text(
                        &format!("Score {}  {}", hud.score, hud.portfolio_text()),
                        w / 2.0,
                        h / 2.0,
                    )?;
                    ctx.fill_text("Tap to re-enter", w / 2.0, h / 2.0 + 30.0)?;
                    self.draw_character_strip(hud.phase)?;
                }
                GamePhase::Playing => {
                    ctx.set_text_align("left");
                    ctx.set_font("12px monospace");
                    ctx.set_fill_style_str(MUTED);
                    ctx.fill_text(&hud.difficulty_text(), 12.0, 64.0)?;
                    ctx.set_fill_style_str(pattern_color(hud.pattern));
                    ctx.fill_text(&hud.pattern_text(), 12.0, 80.0)?;
                }
            }
            self.draw_debug_info()
        }

        fn draw_debug_info(&self) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let x = self.world.tuning.canvas.width as f64 * 0.8;
            let [fps, frame, jitter] = self.perf.debug_lines();

            ctx.set_font("12px monospace");
            ctx.set_text_align("left");
            ctx.set_fill_style_str(MUTED);
            ctx.fill_text(&fps, x, 40.0)?;
            ctx.fill_text(&frame, x, 55.0)?;
            let jitter_ms = self.perf.jitter_ms();
            if jitter_ms > JITTER_ALERT_MS {
                ctx.set_fill_style_str(ALERT);
            } else if jitter_ms > JITTER_WARN_MS {
                ctx.set_fill_style_str(WARN);
            }
            ctx.fill_text(&jitter, x, 70.0)?;
            Ok(())
        }

        fn draw_character_strip(&self, phase: GamePhase) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let canvas = &self.world.tuning.canvas;
            let y = CharacterManager::strip_y(phase, canvas.height) as f64;
            let selected = &self.characters.selected().id;
            let size = CELL_SIZE as f64;

            for (i, c) in self.characters.characters().iter().enumerate() {
                let x = self.characters.cell_x(i, canvas.width) as f64;
                ctx.set_fill_style_str(&c.color);
                ctx.set_global_alpha(if &c.id == selected { 1.0 } else { 0.4 });
                ctx.fill_rect(x, y, size, size);
                ctx.set_global_alpha(1.0);
                ctx.set_fill_style_str(TEXT);
                ctx.fill_text(&c.name, x + size / 2.0, y + size + 16.0)?;
            }
            Ok(())
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Pumpy Pills starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        let tuning = Tuning::default();
        canvas.set_width(tuning.canvas.width as u32);
        canvas.set_height(tuning.canvas.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| js_err("no 2d context"))?
            .dyn_into()?;

        let characters = CharacterManager::new(default_roster())
            .ok_or_else(|| js_err("empty character roster"))?;

        let seed = js_sys::Date::now() as u64;
        let mut world = World::new(tuning, seed).map_err(js_err)?;
        world.set_selected_character(characters.selected().id.clone());
        // Placeholder art is drawn procedurally, nothing to wait for
        world.finish_loading();

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            world,
            characters,
            debouncer: JumpDebouncer::default(),
            perf: FrameMonitor::new(),
            ctx,
            canvas: canvas.clone(),
            halted: false,
        }));

        setup_input_handlers(&window, &canvas, game.clone())?;
        request_animation_frame(game);

        log::info!("Pumpy Pills running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    game.borrow_mut().press();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .press_at(event.offset_x() as f32, event.offset_y() as f32);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().press_at(x, y);
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            if let Err(e) = g.render() {
                log::warn!("Render error: {:?}", e);
            }
            if g.halted {
                let summary = g.world.summary();
                log::error!("Game loop stopped: {:?}", summary);
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Headless run: `pumpy-pills [seed] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// Safety stop for runs the autopilot never loses
    const MAX_TICKS: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Pumpy Pills (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => 12345,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let mut world = World::new(tuning, seed)?;
    world.finish_loading();
    world.start_game();

    while world.game.is_playing() && world.time_ticks < MAX_TICKS {
        let input = autopilot(&world);
        tick(&mut world, &input)?;
    }

    let summary = world.dispose();
    log::info!("Run finished: {:?}", summary);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Flap whenever the pill sinks below the next gap's center
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(world: &World) -> TickInput {
    let player = &world.player;
    let width = world.obstacles.width();
    let target = world
        .obstacles
        .obstacles
        .iter()
        .find(|o| o.right(width) >= player.x - player.radius())
        .map(|o| o.gap_center() + 10.0)
        .unwrap_or(world.tuning.canvas.height / 2.0);
    TickInput {
        jump: player.y > target && player.vy > 0.0,
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
