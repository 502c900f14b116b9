use yew::prelude::*;

use crate::components::form::{use_form_submission, FormStatus, SubmitButton};
use crate::forms::FormKind;

#[function_component(ContactForm)]
pub fn contact_form() -> Html {
    let form = use_form_submission(FormKind::Contact, Callback::noop());

    html! {
        <form id={form.form_id()} class="contact-form" novalidate={true} onsubmit={form.onsubmit.clone()}>
            <label for={form.input_id("name")}>{"Name"}</label>
            <input
                id={form.input_id("name")}
                type="text"
                name="name"
                autocomplete="name"
                value={form.value("name")}
                oninput={form.oninput("name")}
            />
            <label for={form.input_id("email")}>{"Email"}</label>
            <input
                id={form.input_id("email")}
                type="email"
                name="email"
                autocomplete="email"
                value={form.value("email")}
                oninput={form.oninput("email")}
            />
            <label for={form.input_id("message")}>{"Message"}</label>
            <textarea
                id={form.input_id("message")}
                name="message"
                rows="5"
                value={form.value("message")}
                oninput={form.oninput("message")}
            />
            <SubmitButton label="Send message" disabled={form.submit_disabled()} />
            <FormStatus kind={form.kind} state={(*form.state).clone()} />
        </form>
    }
}
