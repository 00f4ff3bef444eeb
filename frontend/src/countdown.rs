use gloo_timers::callback::Interval;
use shared::Countdown;
use time::OffsetDateTime;
use yew::prelude::*;

use crate::styles::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Shows zeros until loaded.
    pub target: Option<OffsetDateTime>,
}

#[function_component(CountdownClock)]
pub fn countdown_clock(props: &Props) -> Html {
    let now = use_state(OffsetDateTime::now_utc);

    {
        let now = now.clone();
        use_effect_with_deps(move |_| {
            let interval = Interval::new(1_000, move || now.set(OffsetDateTime::now_utc()));
            move || drop(interval)
        }, ());
    }

    let countdown = props.target
        .map(|target| Countdown::until(target, *now))
        .unwrap_or_default();
    let [days, hours, minutes, seconds] = countdown.digits();

    html! {
        <div class="flex justify-center gap-3 mb-6" aria-live="polite">
            {for [(days, "Days"), (hours, "Hours"), (minutes, "Minutes"), (seconds, "Seconds")]
                .into_iter()
                .map(|(value, label)| html! {
                    <div class={DIGIT_BOX}>
                        <span class="text-3xl font-bold text-yellow-300 font-mono">{value}</span>
                        <span class={TEXT_MUTED}>{label}</span>
                    </div>
                })}
        </div>
    }
}
