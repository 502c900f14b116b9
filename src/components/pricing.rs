use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::anchor::AnchorLink;
use crate::pricing::{Billing, PLANS};

#[function_component(PricingSection)]
pub fn pricing_section() -> Html {
    let billing = use_state(|| Billing::Monthly);

    let onchange = {
        let billing = billing.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            billing.set(Billing::from_toggle(input.checked()));
        })
    };

    let period = if billing.is_annual() { "/mo, billed yearly" } else { "/mo" };

    html! {
        <section id="pricing" class="pricing">
            <h2>{"Simple pricing"}</h2>
            <div class="billing-toggle">
                <span class={classes!((!billing.is_annual()).then(|| "selected"))}>{"Monthly"}</span>
                <input
                    id="billingToggle"
                    type="checkbox"
                    role="switch"
                    checked={billing.is_annual()}
                    onchange={onchange}
                />
                <label for="billingToggle" class={classes!(billing.is_annual().then(|| "selected"))}>
                    {"Annual"}
                </label>
            </div>
            <div class="pricing-cards">
                { for PLANS.iter().map(|plan| html! {
                    <div class="pricing-card">
                        <h3>{ plan.name }</h3>
                        <p>
                            <span class="price-wrap">
                                // New key per billing period restarts the fade.
                                <span key={format!("{}-{:?}", plan.name, *billing)} class="price fade-in">
                                    { plan.price_label(*billing) }
                                </span>
                            </span>
                            <span class="period">{ period }</span>
                        </p>
                        <ul>
                            { for plan.features.iter().map(|feature| html! { <li>{ *feature }</li> }) }
                        </ul>
                        <AnchorLink target="contact" class="btn btn-primary">{"Get started"}</AnchorLink>
                    </div>
                }) }
            </div>
        </section>
    }
}
