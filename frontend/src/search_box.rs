use gloo_timers::callback::Timeout;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::styles::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_search: Callback<String>,
    pub debounce_ms: u32,
}

/// Emits the query once typing pauses, or immediately on submit.
#[function_component(SearchBox)]
pub fn search_box(props: &Props) -> Html {
    let input_ref = use_node_ref();
    let pending = use_mut_ref(|| None::<Timeout>);

    let read = {
        let input_ref = input_ref.clone();
        move || input_ref.cast::<HtmlInputElement>().map(|i| i.value()).unwrap_or_default()
    };

    let oninput = {
        let pending = pending.clone();
        let on_search = props.on_search.clone();
        let read = read.clone();
        let debounce_ms = props.debounce_ms;
        Callback::from(move |_: InputEvent| {
            let query = read();
            let on_search = on_search.clone();
            // Replacing the handle cancels the previous timer.
            *pending.borrow_mut() = Some(Timeout::new(debounce_ms, move || on_search.emit(query)));
        })
    };

    let onsubmit = {
        let on_search = props.on_search.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            pending.borrow_mut().take();
            on_search.emit(read());
        })
    };

    html! {
        <form class="flex gap-2 mb-6" {onsubmit}>
            <input
                ref={input_ref}
                type="search"
                class={INPUT_BASE}
                placeholder="Search by name or city"
                {oninput}
            />
            <button type="submit" class={button("primary")}>{"Search"}</button>
        </form>
    }
}
