use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::dom;
use crate::forms::{FormFields, FormKind};
use crate::submission::{FormView, HttpTransport, SubmissionFlow, SubmissionState};

/// Routes submission renders into the component's state handles.
struct HandleView {
    state: UseStateHandle<SubmissionState>,
    fields: UseStateHandle<FormFields>,
}

impl FormView for HandleView {
    fn render(&mut self, state: SubmissionState) {
        self.state.set(state);
    }

    fn clear_fields(&mut self) {
        self.fields.set(self.fields.cleared());
    }
}

#[derive(Clone)]
pub struct FormController {
    pub kind: FormKind,
    pub fields: UseStateHandle<FormFields>,
    pub state: UseStateHandle<SubmissionState>,
    pub onsubmit: Callback<SubmitEvent>,
}

impl FormController {
    pub fn value(&self, name: &str) -> String {
        self.fields.get(name).to_string()
    }

    pub fn input_id(&self, name: &str) -> String {
        format!("{}-{}", self.kind.id_prefix(), name)
    }

    pub fn form_id(&self) -> String {
        format!("{}-form", self.kind.id_prefix())
    }

    pub fn submit_disabled(&self) -> bool {
        self.state.submit_disabled()
    }

    pub fn oninput(&self, name: &'static str) -> Callback<InputEvent> {
        let kind = self.kind;
        let fields = self.fields.clone();
        let state = self.state.clone();
        Callback::from(move |e: InputEvent| {
            let value = input_value(&e);
            let mut next = (*fields).clone();
            next.set(name, &value);
            fields.set(next);
            if kind.is_email_field(name) {
                state.set(state.after_email_input(&value));
            }
        })
    }
}

fn input_value(e: &InputEvent) -> String {
    let Some(target) = e.target() else {
        return String::new();
    };
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    target
        .dyn_ref::<HtmlTextAreaElement>()
        .map(|area| area.value())
        .unwrap_or_default()
}

/// Wires a form to the shared submission pipeline. `on_success` runs after
/// the success state is rendered.
#[hook]
pub fn use_form_submission(kind: FormKind, on_success: Callback<()>) -> FormController {
    let fields = use_state(|| kind.empty_fields());
    let state = use_state(SubmissionState::default);

    let onsubmit = {
        let fields = fields.clone();
        let state = state.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if state.submit_disabled() {
                return;
            }
            let snapshot = (*fields).clone();
            let mut view = HandleView {
                state: state.clone(),
                fields: fields.clone(),
            };
            let on_success = on_success.clone();
            spawn_local(async move {
                let flow = SubmissionFlow::new(kind, HttpTransport);
                if flow.submit(&snapshot, dom::csrf_token(), &mut view).await.is_ok() {
                    on_success.emit(());
                }
            });
        })
    };

    FormController {
        kind,
        fields,
        state,
        onsubmit,
    }
}

#[derive(Properties, PartialEq)]
pub struct FormStatusProps {
    pub kind: FormKind,
    pub state: SubmissionState,
}

/// Inline error and success messages; at most one is visible.
#[function_component(FormStatus)]
pub fn form_status(props: &FormStatusProps) -> Html {
    let prefix = props.kind.id_prefix();
    let error = props.state.error_message();
    let success = props.state.success_message();

    html! {
        <>
            <div
                id={format!("{}-error", prefix)}
                class={classes!("form-error", error.is_none().then(|| "d-none"))}
                role="alert"
            >
                { error.unwrap_or_default().to_string() }
            </div>
            <div
                id={format!("{}-success", prefix)}
                class={classes!("form-success", success.is_none().then(|| "d-none"))}
                role="status"
            >
                { success.unwrap_or_default().to_string() }
            </div>
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct SubmitButtonProps {
    pub label: AttrValue,
    pub disabled: bool,
}

#[function_component(SubmitButton)]
pub fn submit_button(props: &SubmitButtonProps) -> Html {
    html! {
        <button type="submit" class="btn btn-primary" disabled={props.disabled}>
            { if props.disabled { AttrValue::from("Sending...") } else { props.label.clone() } }
        </button>
    }
}
