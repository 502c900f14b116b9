use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, KeyboardEvent, MouseEvent};
use yew::prelude::*;

use crate::clock::SystemClock;
use crate::components::form::{use_form_submission, FormStatus, SubmitButton};
use crate::dom::Listener;
use crate::forms::FormKind;
use crate::gate::{
    complete_submission, first_display, is_exit_intent, trigger_channel, EligibilityGate, GateState,
    Trigger, AUTO_CLOSE_MS, PROMPT_DELAY_MS,
};
use crate::storage::PromptFlags;

/// Live triggers for one page load. Dropping them removes the exit-intent
/// listener and cancels a timer that has not fired yet.
struct ArmedTriggers {
    _timer: Timeout,
    _exit_intent: Option<Listener>,
}

fn arm(gate: Rc<RefCell<EligibilityGate>>, open: UseStateSetter<bool>) -> Option<ArmedTriggers> {
    if gate.borrow_mut().evaluate() != GateState::Eligible {
        return None;
    }

    let (tx, rx) = trigger_channel();
    let timer_tx = tx.clone();
    let timer = Timeout::new(PROMPT_DELAY_MS, move || timer_tx.fire(Trigger::Timer));

    let exit_intent = Listener::on_document("mouseleave", move |e: Event| {
        if let Some(e) = e.dyn_ref::<MouseEvent>() {
            if is_exit_intent(e.client_y()) {
                tx.fire(Trigger::ExitIntent);
            }
        }
    })
    .map_err(|e| warn!("Exit-intent trigger unavailable: {}", e))
    .ok();

    spawn_local(async move {
        if first_display(&gate, rx).await.is_some() {
            open.set(true);
        }
    });

    Some(ArmedTriggers {
        _timer: timer,
        _exit_intent: exit_intent,
    })
}

#[function_component(EmailCaptureModal)]
pub fn email_capture_modal() -> Html {
    let open = use_state(|| false);
    let gate = use_mut_ref(|| EligibilityGate::new(PromptFlags::browser(), Rc::new(SystemClock)));

    {
        let gate = gate.clone();
        let open = open.setter();
        use_effect_with_deps(
            move |_| {
                let armed = arm(gate, open);
                move || drop(armed)
            },
            (),
        );
    }

    // Every way of closing goes through here so `closedAt` is always recorded.
    let close = {
        let gate = gate.clone();
        let open = open.setter();
        Callback::from(move |_: ()| {
            if gate.borrow_mut().dismiss() {
                open.set(false);
            }
        })
    };

    {
        let close = close.clone();
        use_effect_with_deps(
            move |is_open: &bool| {
                let escape = if *is_open {
                    Listener::on_document("keydown", move |e: Event| {
                        let is_escape = e
                            .dyn_ref::<KeyboardEvent>()
                            .map_or(false, |k| k.key() == "Escape");
                        if is_escape {
                            close.emit(());
                        }
                    })
                    .ok()
                } else {
                    None
                };
                move || drop(escape)
            },
            *open,
        );
    }

    let on_success = {
        let gate = gate.clone();
        let open = open.setter();
        Callback::from(move |_: ()| {
            let gate = gate.clone();
            let open = open.clone();
            spawn_local(async move {
                if complete_submission(&gate, TimeoutFuture::new(AUTO_CLOSE_MS)).await {
                    open.set(false);
                }
            });
        })
    };
    let form = use_form_submission(FormKind::Modal, on_success);

    if !*open {
        return html! {};
    }

    let on_backdrop = close.reform(|_: MouseEvent| ());
    let on_close_button = close.reform(|_: MouseEvent| ());
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="email-modal-backdrop" onclick={on_backdrop}>
            <div
                id="emailModal"
                class="email-modal"
                role="dialog"
                aria-modal="true"
                aria-labelledby="email-modal-title"
                onclick={keep_open}
            >
                <button type="button" class="email-modal-close" aria-label="Close" onclick={on_close_button}>
                    {"×"}
                </button>
                <h2 id="email-modal-title">{"Before you go"}</h2>
                <p>{"Get one practical tip a week on turning customer reviews into posts that sell."}</p>
                <form id={form.form_id()} novalidate={true} onsubmit={form.onsubmit.clone()}>
                    <input
                        id={form.input_id("input")}
                        type="email"
                        name="email"
                        placeholder="you@example.com"
                        autocomplete="email"
                        value={form.value("email")}
                        oninput={form.oninput("email")}
                    />
                    <SubmitButton label="Send me tips" disabled={form.submit_disabled()} />
                    <FormStatus kind={form.kind} state={(*form.state).clone()} />
                </form>
            </div>
        </div>
    }
}
