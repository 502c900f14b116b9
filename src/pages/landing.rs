use yew::prelude::*;

use crate::components::anchor::AnchorLink;
use crate::components::contact::ContactForm;
use crate::components::counter::AnimatedCounter;
use crate::components::email_modal::EmailCaptureModal;
use crate::components::newsletter::NewsletterForm;
use crate::components::pricing::PricingSection;
use crate::components::scroll_top::ScrollToTop;

#[function_component(Landing)]
pub fn landing() -> Html {
    // Scroll to top only on initial mount
    use_effect_with_deps(
        move |_| {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
            || ()
        },
        (),
    );

    html! {
        <div class="landing-page">
            <style>
                {r#"
                    .d-none { display: none !important; }
                    .fade-in { animation: fadeIn 0.25s ease-in-out; }
                    @keyframes fadeIn {
                        from { opacity: 0; }
                        to { opacity: 1; }
                    }
                    .email-modal-backdrop {
                        position: fixed;
                        inset: 0;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        background: rgba(0, 0, 0, 0.55);
                        z-index: 1055;
                    }
                    .email-modal {
                        position: relative;
                        width: 100%;
                        max-width: 440px;
                        padding: 2rem;
                        border-radius: 16px;
                        background: #fff;
                        animation: fadeIn 0.3s ease-out;
                    }
                    .email-modal-close {
                        position: absolute;
                        top: 0.75rem;
                        right: 1rem;
                        border: none;
                        background: none;
                        font-size: 1.5rem;
                    }
                    .form-error { color: #c0392b; margin-top: 0.5rem; }
                    .form-success { color: #1e8449; margin-top: 0.5rem; }
                    .scroll-top {
                        position: fixed;
                        right: 16px;
                        bottom: 16px;
                        z-index: 1050;
                    }
                "#}
            </style>

            <header class="hero">
                <div class="hero-content">
                    <h1>{"Turn every five-star review into a post"}</h1>
                    <p class="hero-subtitle">
                        {"Connect your store once. Fresh reviews become on-brand Instagram and Facebook posts, published while you sleep."}
                    </p>
                    <div class="hero-cta-group">
                        <AnchorLink target="pricing" class="btn btn-primary">{"See pricing"}</AnchorLink>
                        <AnchorLink target="contact" class="btn btn-link">{"Talk to us"}</AnchorLink>
                    </div>
                </div>
            </header>

            <section id="features" class="features">
                <h2>{"Social proof on autopilot"}</h2>
                <div class="trust-badges">
                    <div class="trust-badge">
                        <AnimatedCounter target={1_250} suffix="+" />
                        <span>{"stores connected"}</span>
                    </div>
                    <div class="trust-badge">
                        <AnimatedCounter target={48_000} />
                        <span>{"reviews published"}</span>
                    </div>
                    <div class="trust-badge">
                        <AnimatedCounter target={32} suffix="%" />
                        <span>{"average lift in engagement"}</span>
                    </div>
                </div>
            </section>

            <PricingSection />

            <section id="newsletter" class="newsletter">
                <h2>{"Get the playbook"}</h2>
                <p>{"A short email every week on growing with customer reviews."}</p>
                <NewsletterForm />
            </section>

            <section id="contact" class="contact">
                <h2>{"Contact us"}</h2>
                <ContactForm />
            </section>

            <ScrollToTop />
            <EmailCaptureModal />
        </div>
    }
}

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class="not-found">
            <h1>{"Page not found"}</h1>
            <a href="/">{"Back to the homepage"}</a>
        </div>
    }
}
