use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use web_sys::Element;
use yew::prelude::*;

use crate::dom::{self, AnimationLoop};
use crate::observe::VisibilityObserver;

pub const COUNT_DURATION_MS: f64 = 1_200.0;
/// Share of the counter that must be on screen before it starts.
pub const VISIBLE_THRESHOLD: f64 = 0.6;

/// Value shown `elapsed_ms` into the animation, and whether it is finished.
pub fn count_at(elapsed_ms: f64, target: u64) -> (u64, bool) {
    let progress = (elapsed_ms / COUNT_DURATION_MS).clamp(0.0, 1.0);
    ((progress * target as f64).floor() as u64, progress >= 1.0)
}

#[derive(Properties, PartialEq)]
pub struct AnimatedCounterProps {
    pub target: u64,
    #[prop_or_default]
    pub suffix: AttrValue,
}

#[function_component(AnimatedCounter)]
pub fn animated_counter(props: &AnimatedCounterProps) -> Html {
    let value = use_state(|| 0u64);
    let node = use_node_ref();

    {
        let value = value.setter();
        let node = node.clone();
        use_effect_with_deps(
            move |target: &u64| {
                let target = *target;
                let started = Rc::new(Cell::new(false));
                let frames: Rc<RefCell<Option<AnimationLoop>>> = Rc::new(RefCell::new(None));

                let observer = node.cast::<Element>().and_then(|element| {
                    let frames = frames.clone();
                    let observer = VisibilityObserver::new(VISIBLE_THRESHOLD, None, move |change, observer| {
                        if !change.visible || started.replace(true) {
                            return;
                        }
                        observer.disconnect();
                        if dom::prefers_reduced_motion() {
                            value.set(target);
                            return;
                        }
                        let frame_value = value.clone();
                        let mut start = None;
                        let frame = move |now: f64| {
                            let begun = *start.get_or_insert(now);
                            let (shown, done) = count_at(now - begun, target);
                            frame_value.set(shown);
                            !done
                        };
                        match AnimationLoop::start(frame) {
                            Ok(animation) => *frames.borrow_mut() = Some(animation),
                            Err(e) => {
                                debug!("Counter falls back to final value: {}", e);
                                value.set(target);
                            }
                        }
                    })
                    .ok()?;
                    observer.observe(&element);
                    Some(observer)
                });

                move || {
                    drop(observer);
                    frames.borrow_mut().take();
                }
            },
            props.target,
        );
    }

    html! {
        <span ref={node} class="count">{ *value }{ props.suffix.clone() }</span>
    }
}
