use shared::{PageControl, PageView};
use yew::prelude::*;

use crate::styles::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub view: PageView,
    pub on_select: Callback<PageControl>,
}

#[function_component(Pager)]
pub fn pager(props: &Props) -> Html {
    let view = props.view;

    html! {
        <nav class="flex flex-wrap justify-center gap-2 mt-8">
            {for view.controls().into_iter().map(|control| {
                let label = match control {
                    PageControl::Prev => "<".to_string(),
                    PageControl::Next => ">".to_string(),
                    PageControl::Number(n) => n.to_string(),
                };
                let active = control == PageControl::Number(view.page);
                let class = if active {
                    combine_classes(&button("muted"), PAGE_ACTIVE)
                } else {
                    button("muted")
                };
                html! {
                    <button
                        type="button"
                        {class}
                        disabled={!view.is_enabled(control)}
                        onclick={props.on_select.reform(move |_: MouseEvent| control)}
                    >
                        {label}
                    </button>
                }
            })}
        </nav>
    }
}
