//! Lookups the page depends on. Anything the host template must provide
//! is fetched through [`require`], which names the missing selector instead
//! of panicking on first use.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlInputElement, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config;
use crate::forms::CSRF_FIELD;

/// Fixed navbar height subtracted when scrolling to an anchor.
pub const HEADER_OFFSET_PX: f64 = 72.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomError {
    #[error("no global window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("required element `{0}` is missing from the page")]
    Missing(String),
    #[error("element `{selector}` is not a {expected}")]
    WrongType {
        selector: String,
        expected: &'static str,
    },
    #[error("could not attach `{0}` listener")]
    Listener(&'static str),
    #[error("{0} is not supported by this browser")]
    Unsupported(&'static str),
}

pub fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::NoWindow)
}

pub fn document() -> Result<Document, DomError> {
    window()?.document().ok_or(DomError::NoDocument)
}

pub fn require<T: JsCast>(selector: &str) -> Result<T, DomError> {
    let element = document()?
        .query_selector(selector)
        .ok()
        .flatten()
        .ok_or_else(|| DomError::Missing(selector.to_string()))?;
    element.dyn_into::<T>().map_err(|_| DomError::WrongType {
        selector: selector.to_string(),
        expected: std::any::type_name::<T>(),
    })
}

pub fn mount_point() -> Result<Element, DomError> {
    require::<Element>(config::MOUNT_SELECTOR)
}

/// Anti-forgery token rendered by the host template as a hidden input.
pub fn csrf_token() -> Result<String, DomError> {
    require::<HtmlInputElement>(&format!("input[name=\"{}\"]", CSRF_FIELD)).map(|input| input.value())
}

pub fn prefers_reduced_motion() -> bool {
    window()
        .ok()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false)
}

pub fn scroll_y() -> f64 {
    window().ok().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn smooth_scroll_to(top: f64) {
    if let Ok(window) = window() {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

/// Scrolls to `#id` minus the header offset. Bare `#` and unknown ids are ignored.
pub fn scroll_to_anchor(hash: &str) -> bool {
    if hash.len() <= 1 || !hash.starts_with('#') {
        return false;
    }
    let Ok(target) = require::<Element>(hash) else {
        return false;
    };
    let top = target.get_bounding_client_rect().top() + scroll_y() - HEADER_OFFSET_PX;
    smooth_scroll_to(top);
    true
}

/// Event listener that detaches itself when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn on_document(event: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self, DomError> {
        Self::attach(document()?.into(), event, handler)
    }

    fn attach(
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, DomError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| DomError::Listener(event))?;
        Ok(Self {
            target,
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

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` loop. `frame` receives the frame timestamp and
/// returns whether another frame is wanted. Dropping the loop cancels it.
pub struct AnimationLoop {
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationLoop {
    pub fn start(mut frame: impl FnMut(f64) -> bool + 'static) -> Result<Self, DomError> {
        let window = window()?;
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let next = callback.clone();
        let next_pending = pending.clone();
        let next_window = window.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            next_pending.set(None);
            if !frame(timestamp) {
                return;
            }
            if let Some(cb) = next.borrow().as_ref() {
                next_pending.set(next_window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            }
        }) as Box<dyn FnMut(f64)>));

        let first = callback
            .borrow()
            .as_ref()
            .and_then(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()).ok())
            .ok_or(DomError::Unsupported("requestAnimationFrame"))?;
        pending.set(Some(first));
        Ok(Self { pending, callback })
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let (Some(handle), Ok(window)) = (self.pending.take(), window()) {
            let _ = window.cancel_animation_frame(handle);
        }
        // The closure holds a handle to itself; release it.
        self.callback.borrow_mut().take();
    }
}
