use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use sandfield_core::{CancelToken, FieldConfig, FrameLoop, Simulator};
use sandfield_platform::{FrameScheduler, HostEvent, InputSource};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

use crate::listeners::WindowListeners;
use crate::scheduler::RafScheduler;
use crate::surface::CanvasSurface;
use crate::viewport::{resize_event, viewport_size, OVERLAY_STYLE};

/// State touched by both the frame callback and the input listeners.
pub(crate) struct Shared {
    pub sim: Simulator,
    pub surface: CanvasSurface,
    pub frame_loop: FrameLoop,
    pub scheduler: RafScheduler,
}

pub(crate) type SharedField = Rc<RefCell<Shared>>;

fn inner_size(window: &Window) -> (f64, f64) {
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (read(window.inner_width()), read(window.inner_height()))
}

pub(crate) fn window_resize_event(window: &Window, config: &FieldConfig) -> HostEvent {
    let (width, height) = inner_size(window);
    resize_event(width, height, config)
}

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Mount with the stock tuning.
#[wasm_bindgen]
pub fn mount() -> Result<FieldHandle, JsValue> {
    mount_with_config(FieldConfig::default())
}

#[wasm_bindgen(js_name = mountWithToml)]
pub fn mount_with_toml(config: &str) -> Result<FieldHandle, JsValue> {
    mount_with_config(FieldConfig::from_toml_str(config).map_err(js_error)?)
}

/// Create the overlay canvas, seed the field and start animating.
///
/// A browser without a 2D context gets a handle that renders nothing.
pub fn mount_with_config(config: FieldConfig) -> Result<FieldHandle, JsValue> {
    for warning in config.validate() {
        warn!("field config: {warning}");
    }
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let body = document.body().ok_or_else(|| js_error("no document body"))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)?;
    canvas.set_attribute("style", OVERLAY_STYLE)?;
    canvas.set_attribute("aria-hidden", "true")?;
    mount_on_canvas(window, &body, canvas, config)
}

/// Everything fallible except attaching runs first, so an error leaves the page untouched.
fn mount_on_canvas(
    window: Window,
    body: &HtmlElement,
    canvas: HtmlCanvasElement,
    config: FieldConfig,
) -> Result<FieldHandle, JsValue> {
    let context = match canvas.get_context("2d")? {
        Some(context) => context.dyn_into::<CanvasRenderingContext2d>().map_err(JsValue::from)?,
        None => {
            warn!("2d canvas context unavailable; particle field disabled");
            return Ok(FieldHandle { mounted: None });
        }
    };

    let (width, height) = inner_size(&window);
    let size = viewport_size(width, height);
    let compact = config.is_compact_width(size.width);
    let sim = Simulator::mount(config, size, compact).map_err(js_error)?;
    let surface = CanvasSurface::new(canvas.clone(), context);
    surface.resize(size);
    body.prepend_with_node_1(&canvas)?;

    let frame_loop = FrameLoop::new();
    let token = frame_loop.token();
    let shared: SharedField = Rc::new(RefCell::new(Shared {
        sim,
        surface,
        frame_loop,
        scheduler: RafScheduler::new(window.clone()),
    }));

    // Weak so the callback stored in the scheduler does not keep `Shared` alive.
    let weak = Rc::downgrade(&shared);
    let callback = Closure::wrap(Box::new(move |_timestamp: f64| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut guard) = shared.try_borrow_mut() else {
            return;
        };
        let Shared {
            sim,
            surface,
            frame_loop,
            scheduler,
        } = &mut *guard;
        if let Err(err) = frame_loop.drive(sim, surface, scheduler) {
            warn!("particle frame loop stopped: {err}");
        }
    }) as Box<dyn FnMut(f64)>);

    let mut mounted = Mounted {
        listeners: WindowListeners::new(window, Rc::clone(&shared)),
        shared,
        canvas,
        token,
    };
    mounted.shared.borrow_mut().scheduler.attach(callback);
    let requested = mounted.shared.borrow_mut().scheduler.request_frame();
    let started = requested.and_then(|()| mounted.listeners.start());
    if let Err(err) = started {
        mounted.teardown();
        return Err(js_error(err));
    }

    info!("particle overlay mounted");
    Ok(FieldHandle {
        mounted: Some(mounted),
    })
}

struct Mounted {
    shared: SharedField,
    listeners: WindowListeners,
    canvas: HtmlCanvasElement,
    token: CancelToken,
}

impl Mounted {
    fn teardown(&mut self) {
        self.token.cancel();
        if let Err(err) = self.listeners.stop() {
            warn!("failed to remove window listeners: {err}");
        }
        if let Ok(mut guard) = self.shared.try_borrow_mut() {
            guard.scheduler.detach();
        }
        self.canvas.remove();
    }
}

/// Owner of a mounted overlay. Dropping it (or `free()` from JS) unmounts.
#[wasm_bindgen]
pub struct FieldHandle {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl FieldHandle {
    /// Cancel the pending frame, remove every listener and the canvas. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.teardown();
            info!("particle overlay unmounted");
        }
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.mounted
            .as_ref()
            .map_or(0, |m| m.shared.borrow().sim.field().particles().len())
    }

    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.mounted
            .as_ref()
            .map_or(0.0, |m| m.shared.borrow().frame_loop.frames() as f64)
    }
}

impl Drop for FieldHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}
