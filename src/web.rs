//! Browser host: canvas, input listeners and the animation-frame loop
//!
//! `start` runs when the wasm module is initialised.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

use crate::audio::WebAudio;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::persistence::{FallbackStorage, LocalStorage};
use crate::renderer::canvas2d::CanvasRenderer;
use crate::{App, InputEvent};

struct Host {
    app: App<FallbackStorage<LocalStorage>, WebAudio>,
    renderer: CanvasRenderer,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    log::info!("Flappy Axolotl starting...");

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("gameCanvas")
        .ok_or("no #gameCanvas element")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("#gameCanvas is not a canvas"))?;
    canvas.set_width(CANVAS_WIDTH as u32);
    canvas.set_height(CANVAS_HEIGHT as u32);

    let renderer = CanvasRenderer::new(&canvas).ok_or("2d context unavailable")?;
    let storage = FallbackStorage::new(LocalStorage::open());

    let seed = (js_sys::Math::random() * 2f64.powi(53)) as u64;
    let app = App::new(seed, storage, WebAudio::new());
    let host = Rc::new(RefCell::new(Host { app, renderer }));

    setup_input_handlers(&window, &canvas, host.clone());
    request_animation_frame(host);

    log::info!("Flappy Axolotl running with seed {}", seed);
    Ok(())
}

fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
    // Click
    {
        let host = host.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            host.borrow_mut().app.handle_input(InputEvent::Activate);
        });
        let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Tap
    {
        let host = host.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            host.borrow_mut().app.handle_input(InputEvent::Activate);
        });
        let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Keyboard
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            // Keep space and arrows from scrolling the page
            if key == " " || key.starts_with("Arrow") {
                event.prevent_default();
            }
            host.borrow_mut().app.handle_key(&key);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn request_animation_frame(host: Rc<RefCell<Host>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(host, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
    {
        let mut h = host.borrow_mut();
        let list = h.app.frame(time);
        h.renderer.render(&list);
    }

    request_animation_frame(host);
}
