use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::DomError;

pub struct Visibility {
    pub target: Element,
    pub visible: bool,
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Viewport-visibility notifier over `IntersectionObserver`. Disconnects on drop.
pub struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl VisibilityObserver {
    pub fn new(
        threshold: f64,
        root_margin: Option<&str>,
        mut on_change: impl FnMut(Visibility, &IntersectionObserver) + 'static,
    ) -> Result<Self, DomError> {
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        let change = Visibility {
                            target: entry.target(),
                            visible: entry.is_intersecting(),
                        };
                        on_change(change, &observer);
                    }
                }
            },
        )
            as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            options.set_root_margin(margin);
        }
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(|_| DomError::Unsupported("IntersectionObserver"))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
