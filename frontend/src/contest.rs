use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{select, Either};
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use shared::{AuthEvent, AuthProvider, NomineeId, PageControl, StatusMessage, VoteClient, VoteOutcome};
use time::OffsetDateTime;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::browser;
use crate::config::{CONFIG, SETTINGS};
use crate::countdown::CountdownClock;
use crate::nominee_grid::NomineeGrid;
use crate::pager::Pager;
use crate::search_box::SearchBox;
use crate::storage::{self, BrowserMarkers};
use crate::styles::*;
use crate::supabase::{self, SupabaseAuth, SupabaseStore};
use crate::top_five::{TopFivePopup, TopFiveTable};

pub type Client = VoteClient<SupabaseAuth, SupabaseStore, BrowserMarkers>;

thread_local! {
    static RESET_MARKER: RefCell<Option<Callback<()>>> = RefCell::new(None);
}

/// Console escape hatch: forget this browser's "already voted" flag.
#[wasm_bindgen]
pub fn clear_device_votes() {
    RESET_MARKER.with(|slot| {
        if let Some(callback) = slot.borrow().as_ref() {
            callback.emit(());
        }
    });
}

pub enum Msg {
    Started(OffsetDateTime),
    Render,
    Retry,
    Refresh,
    Auth(AuthEvent),
    Vote(NomineeId),
    VoteFinished(VoteOutcome),
    Search(String),
    Page(PageControl),
    ToggleTable,
    TogglePopup,
    ClearStatus,
    ResetMarker,
    SignOut,
}

pub struct Contest {
    client: Rc<Client>,
    countdown_target: Option<OffsetDateTime>,
    status: Option<StatusMessage>,
    show_table: bool,
    show_popup: bool,
    grid_ref: NodeRef,
    _status_timer: Option<Timeout>,
    _retry_timer: Option<Timeout>,
    _refetch_timer: Option<Timeout>,
}

impl Component for Contest {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (auth, store) = supabase::connect(CONFIG.supabase_url, CONFIG.supabase_anon_key);
        let client = Rc::new(VoteClient::new(auth, store, BrowserMarkers, SETTINGS, browser::sign_in_redirect()));

        let events = ctx.link().clone();
        client.auth().on_auth_state_change(Box::new(move |event| events.send_message(Msg::Auth(event))));
        RESET_MARKER.with(|slot| {
            *slot.borrow_mut() = Some(ctx.link().callback(|_| Msg::ResetMarker));
        });

        let startup = client.clone();
        let link = ctx.link().clone();
        ctx.link().send_future(async move {
            info!("starting contest client");
            storage::discard_pending_vote();

            if let Some(fragment) = browser::oauth_fragment() {
                if startup.complete_sign_in(&fragment).await.is_some() {
                    browser::strip_fragment();
                }
            }

            // Only the wait is bounded; a slow lookup still fills in the user.
            let (done, resolved) = oneshot::channel();
            let lookup = startup.clone();
            spawn_local(async move {
                lookup.resolve_identity().await;
                link.send_message(Msg::Render);
                let _ = done.send(());
            });
            let timeout = Box::pin(TimeoutFuture::new(startup.settings().identity_timeout_ms));
            if let Either::Right(_) = select(resolved, timeout).await {
                warn!("identity lookup still pending, continuing without it");
            }

            let target = startup.load_countdown_target().await;
            if let Err(e) = startup.load_nominees(true).await {
                warn!("initial nominee load failed: {}", e);
            }
            Msg::Started(target)
        });

        Self {
            client,
            countdown_target: None,
            status: None,
            show_table: false,
            show_popup: false,
            grid_ref: NodeRef::default(),
            _status_timer: None,
            _retry_timer: None,
            _refetch_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Started(target) => {
                self.countdown_target = Some(target);
                let link = ctx.link().clone();
                self._retry_timer = Some(Timeout::new(SETTINGS.retry_delay_ms, move || {
                    link.send_message(Msg::Retry);
                }));
                true
            }
            Msg::Render => true,
            Msg::Retry => {
                if self.client.nominee_count() == 0 {
                    info!("retrying nominee fetch");
                    self.reload(ctx, false);
                }
                false
            }
            Msg::Refresh => {
                self.reload(ctx, true);
                false
            }
            Msg::Auth(event) => {
                let client = self.client.clone();
                ctx.link().send_future(async move {
                    client.handle_auth_event(event).await;
                    Msg::Render
                });
                false
            }
            Msg::Vote(id) => {
                let client = self.client.clone();
                ctx.link().send_future(async move { Msg::VoteFinished(client.cast_vote(&id).await) });
                false
            }
            Msg::VoteFinished(outcome) => {
                if let Some(status) = outcome.status() {
                    self.show_status(ctx, status);
                }
                if outcome.is_recorded() {
                    let link = ctx.link().clone();
                    self._refetch_timer = Some(Timeout::new(SETTINGS.refetch_delay_ms, move || {
                        link.send_message(Msg::Refresh);
                    }));
                }
                true
            }
            Msg::Search(query) => {
                self.client.set_query(&query);
                true
            }
            Msg::Page(control) => {
                self.client.select_page(control);
                browser::scroll_above(&self.grid_ref, 60.0);
                true
            }
            Msg::ToggleTable => {
                self.show_table = !self.show_table;
                true
            }
            Msg::TogglePopup => {
                self.show_popup = !self.show_popup;
                true
            }
            Msg::ClearStatus => {
                self.status = None;
                self._status_timer = None;
                true
            }
            Msg::ResetMarker => {
                if let Err(e) = self.client.clear_marker() {
                    warn!("marker reset failed: {}", e);
                }
                true
            }
            Msg::SignOut => {
                let client = self.client.clone();
                ctx.link().send_future(async move {
                    if let Err(e) = client.sign_out().await {
                        warn!("sign out failed: {}", e);
                    }
                    Msg::Render
                });
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let grid = self.client.view();
        let ranked = self.client.leaderboard();
        let user = self.client.user();
        let link = ctx.link();

        html! {
            <div class="min-h-screen bg-gray-900">
                <div class={CONTAINER}>
                    <h1 class={HEADING_LG}>{"Ashenda Nominees"}</h1>
                    <CountdownClock target={self.countdown_target} />

                    {self.render_status()}

                    <SearchBox
                        on_search={link.callback(Msg::Search)}
                        debounce_ms={SETTINGS.search_debounce_ms}
                    />

                    <div class={combine_classes(FLEX_BETWEEN, "mb-4")}>
                        <p class={TEXT_MUTED}>{format!("{} nominees", grid.matches)}</p>
                        <div class="flex gap-2">
                            <button type="button" class={button("warning")} onclick={link.callback(|_| Msg::TogglePopup)}>
                                {"Leaderboard"}
                            </button>
                            <button type="button" class={button("primary")} onclick={link.callback(|_| Msg::ToggleTable)}>
                                {if self.show_table { "Hide Top 5" } else { "Top 5" }}
                            </button>
                        </div>
                    </div>

                    <div ref={self.grid_ref.clone()}>
                        <NomineeGrid
                            nominees={grid.nominees}
                            button={grid.button}
                            on_vote={link.callback(Msg::Vote)}
                        />
                    </div>
                    <Pager view={grid.page} on_select={link.callback(Msg::Page)} />

                    {if self.show_table {
                        html! { <TopFiveTable ranked={ranked.clone()} /> }
                    } else { html! {} }}

                    {if self.show_popup {
                        html! { <TopFivePopup ranked={ranked} on_close={link.callback(|_| Msg::TogglePopup)} /> }
                    } else { html! {} }}

                    <footer class={combine_classes(FLEX_BETWEEN, "mt-12 pt-4 border-t border-gray-800")}>
                        <span class={TEXT_MUTED}>{format!("© {}", browser::current_year())}</span>
                        {match user {
                            Some(user) => html! {
                                <div class="flex items-center gap-2">
                                    <span class={TEXT_MUTED}>{user.email.unwrap_or(user.id)}</span>
                                    <button type="button" class={button("muted")} onclick={link.callback(|_| Msg::ResetMarker)}>
                                        {"Reset device"}
                                    </button>
                                    <button type="button" class={button("muted")} onclick={link.callback(|_| Msg::SignOut)}>
                                        {"Sign out"}
                                    </button>
                                </div>
                            },
                            None => html! {},
                        }}
                    </footer>
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        RESET_MARKER.with(|slot| slot.borrow_mut().take());
    }
}

impl Contest {
    /// `force` bypasses the nominee TTL; post-vote refreshes need fresh counts.
    fn reload(&self, ctx: &Context<Self>, force: bool) {
        let client = self.client.clone();
        ctx.link().send_future(async move {
            if let Err(e) = client.load_nominees(force).await {
                warn!("nominee refresh failed: {}", e);
            }
            Msg::Render
        });
    }

    fn show_status(&mut self, ctx: &Context<Self>, status: StatusMessage) {
        self.status = Some(status);
        let link = ctx.link().clone();
        self._status_timer = Some(Timeout::new(SETTINGS.status_display_ms, move || {
            link.send_message(Msg::ClearStatus);
        }));
    }

    fn render_status(&self) -> Html {
        match self.status {
            Some(status) => {
                let style = match status {
                    StatusMessage::ThankYou => "success",
                    StatusMessage::AlreadyVoted => "warning",
                    StatusMessage::VoteError | StatusMessage::SignInFailed => "error",
                };
                html! { <div class={alert_style(style)} role="status">{status.text()}</div> }
            }
            None => html! {},
        }
    }
}
