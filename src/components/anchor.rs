use yew::prelude::*;

use crate::dom;

#[derive(Properties, PartialEq)]
pub struct AnchorLinkProps {
    /// Section id, without the leading `#`.
    pub target: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    /// Marks the link as the current section for assistive tech.
    #[prop_or_default]
    pub current: bool,
    #[prop_or_default]
    pub onclick: Callback<()>,
    #[prop_or_default]
    pub children: Children,
}

/// In-page link that scrolls smoothly, leaving room for the fixed navbar.
#[function_component(AnchorLink)]
pub fn anchor_link(props: &AnchorLinkProps) -> Html {
    let href = format!("#{}", props.target);

    let onclick = {
        let href = href.clone();
        let notify = props.onclick.clone();
        Callback::from(move |e: MouseEvent| {
            if dom::scroll_to_anchor(&href) {
                e.prevent_default();
            }
            notify.emit(());
        })
    };

    html! {
        <a
            href={href}
            class={props.class.clone()}
            aria-current={props.current.then(|| "true")}
            onclick={onclick}
        >
            { for props.children.iter() }
        </a>
    }
}
