use crate::render::GpuState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wavefield_core::{Clock, Session, WallClock};
use web_sys as web;

/// Everything one animation frame touches.
pub struct FrameContext {
    pub session: Rc<RefCell<Session>>,
    pub clock: WallClock,
    pub gpu: GpuState,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let t = self.clock.now_secs();
        // Resize handlers write between frames; nothing else holds the borrow.
        let Ok(mut session) = self.session.try_borrow_mut() else {
            return;
        };
        let info = session.tick(t);
        if info.background_changed {
            log::debug!(
                "[session] background lightness {:.2}{}",
                info.background.lightness,
                if session.fade.is_settled() { " (settled)" } else { "" }
            );
        }
        match self.gpu.render(&session, t as f32) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost, reconfiguring");
                self.gpu.reconfigure();
            }
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

/// Drive `frame` from requestAnimationFrame, re-registering every frame.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
