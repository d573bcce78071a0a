use sandfield_platform::{FrameScheduler, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` with at most one pending request.
pub struct RafScheduler {
    window: Window,
    callback: Option<FrameCallback>,
    pending: Option<i32>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
            pending: None,
        }
    }

    pub fn attach(&mut self, callback: FrameCallback) {
        self.callback = Some(callback);
    }

    /// Cancel and drop the callback. Must not be called from inside the callback.
    pub fn detach(&mut self) {
        self.cancel_frame();
        self.callback = None;
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<()> {
        let callback = self.callback.as_ref().ok_or("frame callback detached")?;
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|err| format!("requestAnimationFrame failed: {err:?}"))?;
        self.pending = Some(id);
        Ok(())
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}
