use yew::prelude::*;

use crate::components::form::{use_form_submission, FormStatus, SubmitButton};
use crate::forms::FormKind;

#[function_component(NewsletterForm)]
pub fn newsletter_form() -> Html {
    let form = use_form_submission(FormKind::Newsletter, Callback::noop());

    html! {
        <form id={form.form_id()} class="newsletter-form" novalidate={true} onsubmit={form.onsubmit.clone()}>
            <div class="input-group">
                <input
                    id={form.input_id("email")}
                    type="email"
                    name="email"
                    placeholder="you@example.com"
                    autocomplete="email"
                    value={form.value("email")}
                    oninput={form.oninput("email")}
                />
                <SubmitButton label="Subscribe" disabled={form.submit_disabled()} />
            </div>
            <FormStatus kind={form.kind} state={(*form.state).clone()} />
        </form>
    }
}
