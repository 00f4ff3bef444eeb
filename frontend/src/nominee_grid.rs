use shared::{Nominee, NomineeId, VoteButton};
use yew::prelude::*;

use crate::styles::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub nominees: Vec<Nominee>,
    pub button: VoteButton,
    pub on_vote: Callback<NomineeId>,
}

#[function_component(NomineeGrid)]
pub fn nominee_grid(props: &Props) -> Html {
    if props.nominees.is_empty() {
        return html! {
            <div class="flex justify-center p-8">
                <div class={combine_classes("animate-pulse", TEXT_MUTED)}>{"No nominees to show yet."}</div>
            </div>
        };
    }

    html! {
        <div class={GRID_NOMINEES}>
            {for props.nominees.iter().map(|nominee| {
                let onclick = {
                    let id = nominee.id.clone();
                    props.on_vote.reform(move |_: MouseEvent| id.clone())
                };
                let name = nominee.display_name().to_string();

                html! {
                    <div class={CARD_HOVER_SCALE} key={nominee.id.to_string()}>
                        <img class="w-full h-64 object-cover rounded-md mb-3" src={nominee.photo().to_string()} alt={name.clone()} />
                        <h2 class={HEADING_SM}>{name}</h2>
                        <p class={combine_classes(TEXT_MUTED, "mb-2")}>{nominee.display_city()}</p>
                        <a class="text-blue-400 hover:underline" href={nominee.social_link().to_string()} target="_blank" rel="noopener">
                            {"Facebook"}
                        </a>
                        <div class={combine_classes(FLEX_BETWEEN, "mt-3")}>
                            <span class="text-gray-200 font-medium">{format!("Votes: {}", nominee.votes)}</span>
                            <button
                                type="button"
                                class={button("success")}
                                disabled={props.button.disabled()}
                                {onclick}
                            >
                                {props.button.label()}
                            </button>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
