use log::{error, info, Level};
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};
use yew::prelude::*;
use yew_hooks::use_window_scroll;
use yew_router::prelude::*;

mod chrome;
mod clock;
mod config;
mod dom;
mod forms;
mod gate;
mod observe;
mod pricing;
mod storage;
mod submission;
mod validation;

mod components {
    pub mod anchor;
    pub mod contact;
    pub mod counter;
    pub mod email_modal;
    pub mod form;
    pub mod newsletter;
    pub mod pricing;
    pub mod scroll_top;
}
mod pages {
    pub mod landing;
}

use chrome::{nav_scrolled, ActiveSections, SectionChange};
use components::anchor::AnchorLink;
use observe::VisibilityObserver;
use pages::landing::{Landing, NotFound};

/// Band of the viewport a section must cross to count as the current one.
const SECTION_ROOT_MARGIN: &str = "-40% 0px -55% 0px";
const SECTION_THRESHOLD: f64 = 0.01;

const NAV_SECTIONS: &[(&str, &str)] = &[
    ("features", "Features"),
    ("pricing", "Pricing"),
    ("newsletter", "Newsletter"),
    ("contact", "Contact"),
];

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Landing page");
            html! { <Landing /> }
        }
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! { <NotFound /> }
        }
    }
}

/// Tracks which `section[id]` elements sit in the highlight band.
#[hook]
fn use_active_sections() -> UseReducerHandle<ActiveSections> {
    let sections = use_reducer(ActiveSections::default);

    {
        let dispatcher = sections.dispatcher();
        use_effect_with_deps(
            move |_| {
                let observer = VisibilityObserver::new(
                    SECTION_THRESHOLD,
                    Some(SECTION_ROOT_MARGIN),
                    move |change, _| {
                        let id = change.target.id();
                        if id.is_empty() {
                            return;
                        }
                        dispatcher.dispatch(if change.visible {
                            SectionChange::Entered(id)
                        } else {
                            SectionChange::Left(id)
                        });
                    },
                );
                let observer = match observer {
                    Ok(observer) => {
                        observe_sections(&observer);
                        Some(observer)
                    }
                    Err(e) => {
                        error!("Section highlighting disabled: {}", e);
                        None
                    }
                };
                move || drop(observer)
            },
            (),
        );
    }

    sections
}

fn observe_sections(observer: &VisibilityObserver) {
    let Ok(sections) = dom::document().and_then(|d| {
        d.query_selector_all("section[id]")
            .map_err(|_| dom::DomError::Missing("section[id]".to_string()))
    }) else {
        return;
    };
    for i in 0..sections.length() {
        if let Some(section) = sections.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            observer.observe(&section);
        }
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);
    let (_, scroll_y) = use_window_scroll();
    let sections = use_active_sections();

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: ()| menu_open.set(false))
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <nav class={classes!("navbar", nav_scrolled(scroll_y, *menu_open).then(|| "is-scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"provokely"}
                </Link<Route>>

                <button class="burger-menu" aria-label="Menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    { for NAV_SECTIONS.iter().map(|(id, label)| {
                        let active = sections.is_active(id);
                        html! {
                            <AnchorLink
                                target={*id}
                                class={classes!("nav-link", active.then(|| "active"))}
                                current={active}
                                onclick={close_menu.clone()}
                            >
                                { *label }
                            </AnchorLink>
                        }
                    }) }
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };
    console_log::init_with_level(level).expect("error initializing log");

    info!("Starting landing page");
    match dom::mount_point() {
        Ok(root) => {
            yew::Renderer::<App>::with_root(root).render();
        }
        Err(e) => error!("Landing page not mounted: {}", e),
    }
}
