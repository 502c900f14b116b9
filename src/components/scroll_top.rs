use yew::prelude::*;
use yew_hooks::use_window_scroll;

use crate::chrome::shows_back_to_top;
use crate::dom;

#[function_component(ScrollToTop)]
pub fn scroll_to_top() -> Html {
    let (_, scroll_y) = use_window_scroll();
    let onclick = Callback::from(|_: MouseEvent| dom::smooth_scroll_to(0.0));

    html! {
        <button
            class="btn btn-primary scroll-top"
            aria-label="Scroll to top"
            style={if shows_back_to_top(scroll_y) { "display: inline-flex;" } else { "display: none;" }}
            onclick={onclick}
        >
            {"↑"}
        </button>
    }
}
