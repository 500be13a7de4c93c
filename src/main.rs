//! Pong Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use pong_arena::input::{Action, InputState, analog_axis};
    use pong_arena::platform::web::{JsIdentity, JsScoreReporter};
    use pong_arena::sim::{Prompt, Rect, Side, Snapshot};
    use pong_arena::{Session, Settings};

    /// Joystick travel in CSS pixels for a full-speed deflection
    const JOYSTICK_RADIUS: f32 = 50.0;

    const BACKGROUND: &str = "#1a1a1a";
    const FOREGROUND: &str = "#f0f0f0";

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputState,
        ctx: CanvasRenderingContext2d,
        arena: (f64, f64),
        last_time: f64,
        /// Pointer id currently steering each joystick
        joysticks: [Option<i32>; 2],
    }

    impl Game {
        fn joystick_slot(side: Side) -> usize {
            match side {
                Side::Left => 0,
                Side::Right => 1,
            }
        }

        /// Run simulation ticks owed for this frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let input = self.input.snapshot();
            self.session.frame(dt, &input);
        }

        /// Render the current frame
        fn render(&self) {
            draw(&self.ctx, &self.session.snapshot(), self.arena);
        }
    }

    fn fill_rect(ctx: &CanvasRenderingContext2d, rect: &Rect) {
        ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn draw(ctx: &CanvasRenderingContext2d, snap: &Snapshot, (w, h): (f64, f64)) {
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str(FOREGROUND);
        fill_rect(ctx, &snap.left);
        fill_rect(ctx, &snap.right);

        let ball = &snap.ball;
        let r = (ball.width / 2.0) as f64;
        ctx.begin_path();
        let _ = ctx.arc(ball.x as f64 + r, ball.y as f64 + r, r, 0.0, TAU);
        ctx.fill();

        ctx.set_font("40px \"Orbitron\", sans-serif");
        let _ = ctx.fill_text(&snap.left_score.to_string(), w / 4.0, 50.0);
        let _ = ctx.fill_text(&snap.right_score.to_string(), w / 4.0 * 3.0, 50.0);

        let dash = js_sys::Array::of2(&JsValue::from_f64(10.0), &JsValue::from_f64(10.0));
        let _ = ctx.set_line_dash(&dash);
        ctx.set_stroke_style_str(FOREGROUND);
        ctx.begin_path();
        ctx.move_to(w / 2.0, 0.0);
        ctx.line_to(w / 2.0, h);
        ctx.stroke();

        if let Some(prompt) = snap.prompt {
            ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str(FOREGROUND);
            ctx.set_font("50px \"Orbitron\", sans-serif");
            ctx.set_text_align("center");
            let text = match prompt {
                Prompt::Serve => "Press A to Start",
                Prompt::Paused => "Paused",
            };
            let _ = ctx.fill_text(text, w / 2.0, h / 2.0);
            ctx.set_text_align("start");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pong Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas = document
            .get_element_by_id("game-canvas")
            .expect("no #game-canvas")
            .dyn_into::<HtmlCanvasElement>()
            .expect("#game-canvas is not a canvas");

        let settings = Settings::load();
        let config = settings.match_config.clone();
        canvas.set_width(config.arena_width as u32);
        canvas.set_height(config.arena_height as u32);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("2d context unavailable")
            .dyn_into::<CanvasRenderingContext2d>()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        log::info!("Match seed: {}", seed);

        let arena = (config.arena_width as f64, config.arena_height as f64);
        let session = Session::new(
            config,
            seed,
            Box::new(JsScoreReporter),
            Box::new(JsIdentity),
        );
        let game = Rc::new(RefCell::new(Game {
            session,
            input: InputState::new(settings.key_bindings.clone()),
            ctx,
            arena,
            last_time: 0.0,
            joysticks: [None, None],
        }));
        game.borrow().render();

        setup_keyboard(game.clone());
        setup_joystick("joystick-left", Side::Left, game.clone());
        setup_joystick("joystick-right", Side::Right, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Pong Arena running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                if game.borrow_mut().input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pointer-driven stick: deflection is measured from the zone's center
    fn setup_joystick(id: &str, side: Side, game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(zone) = document.get_element_by_id(id) else {
            log::info!("No #{} element, joystick disabled", id);
            return;
        };
        let slot = Game::joystick_slot(side);

        let steer = {
            let zone = zone.clone();
            move |game: &mut Game, event: &PointerEvent| {
                let rect = zone.get_bounding_client_rect();
                let cx = rect.left() + rect.width() / 2.0;
                let cy = rect.top() + rect.height() / 2.0;
                let dx = (event.client_x() as f64 - cx) as f32;
                let dy = (event.client_y() as f64 - cy) as f32;
                game.input.set_axis(side, analog_axis(dx, dy, JOYSTICK_RADIUS));
            }
        };

        {
            let game = game.clone();
            let zone_el = zone.clone();
            let steer = steer.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let _ = zone_el.set_pointer_capture(event.pointer_id());
                let mut g = game.borrow_mut();
                g.joysticks[slot] = Some(event.pointer_id());
                steer(&mut *g, &event);
            });
            let _ = zone
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if g.joysticks[slot] == Some(event.pointer_id()) {
                    steer(&mut *g, &event);
                }
            });
            let _ = zone
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for kind in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if g.joysticks[slot] == Some(event.pointer_id()) {
                    g.joysticks[slot] = None;
                    g.input.release_axis(side);
                }
            });
            let _ = zone.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// A: pause/serve, B: reset, X/Y: power-ups
    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let buttons = [
            ("btn-a", Action::TogglePause),
            ("btn-b", Action::Reset),
            ("btn-x", Action::PowerUp(Side::Left)),
            ("btn-y", Action::PowerUp(Side::Right)),
        ];

        for (id, action) in buttons {
            let Some(button) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().input.trigger(action);
            });
            let _ = button
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause when the window loses focus; held keys are dropped since their
    /// key-up events will go elsewhere
    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.input.release_all();
            g.input.trigger(Action::Pause);
            if !g.session.game.paused {
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pong Arena (native) starting...");
    log::info!("Native mode runs a headless demo match - build for wasm32 to play");

    demo::run(pong_arena::Settings::load(), 60.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Two scripted paddles play each other; the right one is deliberately slow
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use pong_arena::consts::SIM_DT;
    use pong_arena::input::{Action, InputState};
    use pong_arena::report::{Identity, LogReporter, StaticIdentity};
    use pong_arena::sim::{Match, Side};
    use pong_arena::{Session, Settings};

    /// Axis that steers `side`'s paddle toward the ball
    fn chase(game: &Match, side: Side, effort: f32) -> f32 {
        let paddle = game.paddle(side);
        let offset = game.ball.pos.y - paddle.center_y();
        (offset / (paddle.height / 2.0)).clamp(-effort, effort)
    }

    pub fn run(settings: Settings, seconds: f32) {
        let identity = StaticIdentity(Identity {
            uid: "local-demo".into(),
            display_name: Some("Demo".into()),
        });
        let mut session = Session::new(
            settings.match_config.clone(),
            0xC0FFEE,
            Box::new(LogReporter),
            Box::new(identity),
        );
        let mut input = InputState::new(settings.key_bindings.clone());

        let frames = (seconds / SIM_DT) as u32;
        for frame in 0..frames {
            if session.game.paused {
                input.trigger(Action::TogglePause);
            }
            if frame % 600 == 300 {
                input.trigger(Action::PowerUp(Side::Left));
            }
            input.set_axis(Side::Left, chase(&session.game, Side::Left, 1.0));
            input.set_axis(Side::Right, chase(&session.game, Side::Right, 0.6));

            let snapshot = input.snapshot();
            session.frame(SIM_DT, &snapshot);
        }

        log::info!(
            "Demo finished after {}s: {} - {}",
            seconds,
            session.game.left.score,
            session.game.right.score
        );
    }
}
