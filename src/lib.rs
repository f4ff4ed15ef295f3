#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use wavefield_core::{Error, ParameterSeed, Session, SessionConfig, Viewport, WallClock};
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("wavefield starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    if !dom::has_webgpu(&window) {
        dom::show_error_dialog(&document, constants::WEBGPU_UNAVAILABLE_HTML);
        return Err(Error::RenderingUnavailable("navigator.gpu missing".into()).into());
    }

    let canvas = dom::find_or_create_canvas(&document)?;
    let (width, height) = dom::inner_size(&window);
    // startup renders at ratio 1; resizes apply the clamped device ratio
    let viewport = Viewport::new(width, height, 1.0);
    dom::size_canvas(&canvas, viewport);

    let mut seed = ParameterSeed::from_entropy();
    let session = Session::new(SessionConfig::default(), &mut seed, viewport);
    let scene = session.audio_scene(&mut seed);

    let gpu = match render::GpuState::new(&canvas, &session).await {
        Ok(g) => g,
        Err(e) => {
            dom::show_error_dialog(&document, constants::WEBGPU_UNAVAILABLE_HTML);
            return Err(e);
        }
    };

    dom::reveal_title(&document);

    let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    match audio::mount_scene(&audio_ctx, &scene) {
        // nodes stay alive through the audio graph itself
        Ok(_mounted) => {}
        Err(e) => log::error!("[audio] drone unavailable: {:?}", e),
    }
    wire_audio_resume(&window, &audio_ctx);

    let session = Rc::new(RefCell::new(session));
    wire_resize(&window, &canvas, &session);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        session,
        clock: WallClock::new(),
        gpu,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

/// Browsers keep a new AudioContext suspended until a user gesture.
fn wire_audio_resume(window: &web::Window, audio_ctx: &web::AudioContext) {
    for event in ["pointerdown", "keydown"] {
        let ctx = audio_ctx.clone();
        dom::add_listener(window, event, move || {
            _ = ctx.resume();
        });
    }
}

fn wire_resize(
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    session: &Rc<RefCell<Session>>,
) {
    let on_resize: Rc<dyn Fn()> = {
        let session = session.clone();
        let canvas = canvas.clone();
        Rc::new(move || {
            let Some(window) = web::window() else {
                return;
            };
            let (width, height) = dom::inner_size(&window);
            let viewport = session
                .borrow_mut()
                .resize(width, height, window.device_pixel_ratio());
            dom::size_canvas(&canvas, viewport);
        })
    };

    let handler = on_resize.clone();
    dom::add_listener(window, "resize", move || handler());
    match window.screen().map(|s| s.orientation()) {
        Ok(orientation) => {
            let handler = on_resize.clone();
            dom::add_listener(&orientation, "change", move || handler());
        }
        Err(e) => log::warn!("[viewport] no screen.orientation: {:?}", e),
    }
}
