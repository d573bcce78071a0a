use std::rc::Rc;

use glam::Vec2;
use sandfield_platform::{HostEvent, InputSource, Result};
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, MouseEvent, TouchEvent, Window};

use crate::host::{window_resize_event, SharedField};

type Listener<E> = Closure<dyn FnMut(E)>;

fn js_error(err: JsValue) -> Box<dyn std::error::Error + Send + Sync> {
    format!("{err:?}").into()
}

/// Window-level resize, mouse and touch listeners feeding the simulator.
pub struct WindowListeners {
    window: Window,
    shared: SharedField,
    resize: Option<Listener<Event>>,
    mouse_move: Option<Listener<MouseEvent>>,
    // registered for both touchmove and touchstart
    touch: Option<Listener<TouchEvent>>,
}

impl WindowListeners {
    pub fn new(window: Window, shared: SharedField) -> Self {
        Self {
            window,
            shared,
            resize: None,
            mouse_move: None,
            touch: None,
        }
    }

    fn register(&self) -> Result<()> {
        let (Some(resize), Some(mouse_move), Some(touch)) =
            (&self.resize, &self.mouse_move, &self.touch)
        else {
            return Err("listeners not created".into());
        };

        // preventDefault is ignored on passive touch listeners
        let active = AddEventListenerOptions::new();
        active.set_passive(false);

        self.window
            .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.window
            .add_event_listener_with_callback("mousemove", mouse_move.as_ref().unchecked_ref())
            .map_err(js_error)?;
        for kind in ["touchmove", "touchstart"] {
            self.window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    touch.as_ref().unchecked_ref(),
                    &active,
                )
                .map_err(js_error)?;
        }
        Ok(())
    }

    fn dispatch(shared: &SharedField, event: HostEvent) {
        if let Ok(mut field) = shared.try_borrow_mut() {
            field.sim.handle_event(event);
        }
    }
}

impl InputSource for WindowListeners {
    fn start(&mut self) -> Result<()> {
        if self.resize.is_some() {
            return Ok(());
        }

        let shared = Rc::clone(&self.shared);
        let window = self.window.clone();
        let resize = Closure::wrap(Box::new(move |_event: Event| {
            let Ok(mut field) = shared.try_borrow_mut() else {
                return;
            };
            let event = window_resize_event(&window, field.sim.field().config());
            if let HostEvent::Resize { size, .. } = event {
                field.surface.resize(size);
            }
            field.sim.handle_event(event);
        }) as Box<dyn FnMut(Event)>);

        let shared = Rc::clone(&self.shared);
        let mouse_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let position = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            Self::dispatch(&shared, HostEvent::PointerMove(position));
        }) as Box<dyn FnMut(MouseEvent)>);

        let shared = Rc::clone(&self.shared);
        let touch = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(first) = event.touches().get(0) {
                let position = Vec2::new(first.client_x() as f32, first.client_y() as f32);
                let host_event = if event.type_() == "touchstart" {
                    HostEvent::TouchStart(position)
                } else {
                    HostEvent::TouchMove(position)
                };
                Self::dispatch(&shared, host_event);
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        self.resize = Some(resize);
        self.mouse_move = Some(mouse_move);
        self.touch = Some(touch);
        if let Err(err) = self.register() {
            // removing a listener that was never added is a no-op
            let _ = self.stop();
            return Err(err);
        }
        debug!("window listeners registered");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(resize) = self.resize.take() {
            self.window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
                .map_err(js_error)?;
        }
        if let Some(mouse_move) = self.mouse_move.take() {
            self.window
                .remove_event_listener_with_callback(
                    "mousemove",
                    mouse_move.as_ref().unchecked_ref(),
                )
                .map_err(js_error)?;
        }
        if let Some(touch) = self.touch.take() {
            for kind in ["touchmove", "touchstart"] {
                self.window
                    .remove_event_listener_with_callback(kind, touch.as_ref().unchecked_ref())
                    .map_err(js_error)?;
            }
        }
        debug!("window listeners removed");
        Ok(())
    }
}
