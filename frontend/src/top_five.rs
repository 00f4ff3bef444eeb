use shared::Ranked;
use yew::prelude::*;

use crate::styles::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub ranked: Vec<Ranked>,
}

#[derive(Properties, PartialEq)]
pub struct PopupProps {
    pub ranked: Vec<Ranked>,
    pub on_close: Callback<()>,
}

#[function_component(TopFiveTable)]
pub fn top_five_table(props: &Props) -> Html {
    html! {
        <section class="mt-10">
            <h2 class={HEADING_SM}>{"Top 5"}</h2>
            <table class="w-full text-left text-gray-200">
                <thead class={TEXT_MUTED}>
                    <tr><th>{"Rank"}</th><th>{"Photo"}</th><th>{"Name"}</th><th>{"Votes"}</th></tr>
                </thead>
                <tbody>
                    {for props.ranked.iter().map(|r| html! {
                        <tr class="border-t border-gray-700" key={r.nominee.id.to_string()}>
                            <td class="py-2">{format!("{} {}", r.medal, r.rank)}</td>
                            <td><img class="w-12 h-12 rounded-full object-cover" src={r.nominee.photo().to_string()} alt={r.nominee.display_name().to_string()} /></td>
                            <td>{r.nominee.display_name()}</td>
                            <td>{r.nominee.votes}</td>
                        </tr>
                    })}
                </tbody>
            </table>
        </section>
    }
}

#[function_component(TopFivePopup)]
pub fn top_five_popup(props: &PopupProps) -> Html {
    let close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/70">
            <div class="bg-gray-900 border border-gray-700 rounded-xl p-6 max-w-3xl w-full">
                <div class={combine_classes(FLEX_BETWEEN, "mb-4")}>
                    <h2 class={HEADING_SM}>{"Leaderboard"}</h2>
                    <button type="button" class={button("muted")} onclick={close}>{"Close"}</button>
                </div>
                <div class="grid gap-4 grid-cols-2 md:grid-cols-5">
                    {for props.ranked.iter().map(|r| html! {
                        <div class="text-center text-gray-200" key={r.nominee.id.to_string()}>
                            <div class="text-lg font-bold">{r.medal}{" "}{r.rank}</div>
                            <img class="w-full h-32 object-cover rounded-md my-2" src={r.nominee.photo().to_string()} alt={r.nominee.display_name().to_string()} />
                            <div class="font-semibold">{r.nominee.display_name()}</div>
                            <div class={TEXT_MUTED}>{format!("Votes: {}", r.nominee.votes)}</div>
                        </div>
                    })}
                </div>
            </div>
        </div>
    }
}
