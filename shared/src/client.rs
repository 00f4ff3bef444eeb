use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use log::{debug, info, warn};
use time::OffsetDateTime;

use crate::boundary::{voted_nominees, AuthProvider, DataStore, MarkerStore};
use crate::countdown::resolve_target;
use crate::error::Result;
use crate::leaderboard::{self, Ranked};
use crate::models::{AuthEvent, Nominee, NomineeId, Session, TokenHandback, User, VoteButton, VoteRow};
use crate::outcome::{Guard, LoadOutcome, VoteOutcome};
use crate::pagination::{page_view, PageControl, PageView};
use crate::search::SearchCache;
use crate::settings::{ContestSettings, LEADERBOARD_SIZE};
use crate::tally::merge_counts;

#[derive(Debug)]
struct ClientState {
    nominees: Vec<Nominee>,
    loaded_at: Option<OffsetDateTime>,
    user: Option<User>,
    voted: HashSet<NomineeId>,
    query: String,
    page: usize,
    search: SearchCache,
}

/// What the grid shows for the current query and page.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub nominees: Vec<Nominee>,
    pub page: PageView,
    pub matches: usize,
    pub button: VoteButton,
}

pub struct VoteClient<A, S, M> {
    auth: A,
    store: S,
    markers: M,
    settings: ContestSettings,
    redirect_to: String,
    clock: Box<dyn Fn() -> OffsetDateTime>,
    /// Latest fetch ticket handed out; only that fetch may write `nominees`.
    requested: Cell<u64>,
    state: RefCell<ClientState>,
}

impl<A, S, M> VoteClient<A, S, M>
where
    A: AuthProvider,
    S: DataStore,
    M: MarkerStore,
{
    pub fn new(auth: A, store: S, markers: M, settings: ContestSettings, redirect_to: impl Into<String>) -> Self {
        let search = SearchCache::new(settings.search_ttl, settings.search_cache_entries);
        Self {
            auth,
            store,
            markers,
            settings,
            redirect_to: redirect_to.into(),
            clock: Box::new(OffsetDateTime::now_utc),
            requested: Cell::new(0),
            state: RefCell::new(ClientState {
                nominees: Vec::new(),
                loaded_at: None,
                user: None,
                voted: HashSet::new(),
                query: String::new(),
                page: 1,
                search,
            }),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> OffsetDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn settings(&self) -> &ContestSettings {
        &self.settings
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.requested.get() + 1;
        self.requested.set(ticket);
        ticket
    }

    // --- nominees ---------------------------------------------------------

    /// Fetches nominees and votes and merges the counts. Within the TTL the
    /// cached list is kept unless `force` is set. A failed nominee fetch
    /// empties the list.
    pub async fn load_nominees(&self, force: bool) -> Result<LoadOutcome> {
        let now = self.now();
        {
            let state = self.state.borrow();
            let fresh = state.loaded_at.map_or(false, |at| now - at < self.settings.nominee_ttl);
            if !force && fresh {
                return Ok(LoadOutcome::Cached(state.nominees.len()));
            }
        }

        let ticket = self.next_ticket();
        let nominees = match self.store.select_nominees().await {
            Ok(nominees) => nominees,
            Err(e) => {
                warn!("nominee fetch failed: {}", e);
                if ticket == self.requested.get() {
                    self.apply(ticket, Vec::new(), None);
                }
                return Err(e);
            }
        };

        let votes = self.store.select_votes(None).await.unwrap_or_else(|e| {
            warn!("vote fetch failed, counting zero votes: {}", e);
            Vec::new()
        });

        if ticket != self.requested.get() {
            debug!("dropping nominee fetch {} (latest is {})", ticket, self.requested.get());
            return Ok(LoadOutcome::Superseded);
        }

        let merged = merge_counts(nominees, &votes);
        let count = merged.len();
        self.apply(ticket, merged, Some(self.now()));
        info!("loaded {} nominees, {} votes", count, votes.len());
        Ok(LoadOutcome::Applied(count))
    }

    fn apply(&self, ticket: u64, nominees: Vec<Nominee>, loaded_at: Option<OffsetDateTime>) {
        let mut state = self.state.borrow_mut();
        state.nominees = nominees;
        state.loaded_at = loaded_at;
        state.search.sync_generation(ticket);
    }

    pub fn nominee_count(&self) -> usize {
        self.state.borrow().nominees.len()
    }

    pub fn nominees(&self) -> Vec<Nominee> {
        self.state.borrow().nominees.clone()
    }

    // --- identity ---------------------------------------------------------

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn voted(&self) -> HashSet<NomineeId> {
        self.state.borrow().voted.clone()
    }

    /// Reads the current user and their votes. A failed vote read yields an
    /// empty set; the store's uniqueness check still catches a repeat.
    pub async fn resolve_identity(&self) -> Option<User> {
        let user = match self.auth.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("user lookup failed: {}", e);
                None
            }
        };

        let Some(user) = user else {
            self.forget_user();
            return None;
        };

        let voted = match self.store.select_votes(Some(&user.id)).await {
            Ok(rows) => {
                self.reconcile_marker(&user.id, !rows.is_empty());
                voted_nominees(&rows).into_iter().collect()
            }
            Err(e) => {
                warn!("vote lookup for {} failed: {}", user.id, e);
                HashSet::new()
            }
        };

        let mut state = self.state.borrow_mut();
        state.user = Some(user.clone());
        state.voted = voted;
        Some(user)
    }

    /// Brings the local hint in line with what the store says.
    fn reconcile_marker(&self, user_id: &str, has_vote: bool) {
        let marked = self.markers.has_marker(user_id).unwrap_or(false);
        let result = match (has_vote, marked) {
            (true, false) => self.markers.set_marker(user_id),
            (false, true) => self.markers.clear_marker(user_id),
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!("marker reconcile for {} failed: {}", user_id, e);
        }
    }

    fn forget_user(&self) {
        let mut state = self.state.borrow_mut();
        state.user = None;
        state.voted.clear();
    }

    pub async fn handle_auth_event(&self, event: AuthEvent) {
        info!("auth event {:?}", event);
        match event {
            AuthEvent::SignedIn | AuthEvent::TokenRefreshed => {
                self.resolve_identity().await;
            }
            AuthEvent::SignedOut => self.forget_user(),
        }
    }

    /// Consumes an OAuth fragment handback. `None` if the fragment carried no
    /// tokens or the provider rejected them.
    pub async fn complete_sign_in(&self, fragment: &str) -> Option<Session> {
        let handback = TokenHandback::from_fragment(fragment)?;
        match self.auth.set_session(&handback).await {
            Ok(session) => {
                info!("session established for {}", session.user.id);
                Some(session)
            }
            Err(e) => {
                warn!("token handback rejected: {}", e);
                None
            }
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await?;
        self.forget_user();
        Ok(())
    }

    async fn start_sign_in(&self) -> VoteOutcome {
        match self.auth.sign_in_with_redirect(&self.redirect_to).await {
            Ok(()) => VoteOutcome::SignInStarted,
            Err(e) => {
                warn!("sign-in could not start: {}", e);
                VoteOutcome::SignInFailed
            }
        }
    }

    // --- voting -----------------------------------------------------------

    pub async fn cast_vote(&self, nominee: &NomineeId) -> VoteOutcome {
        if self.user().is_none() {
            match self.auth.current_session().await {
                Ok(Some(_)) => {
                    self.resolve_identity().await;
                }
                Ok(None) => {}
                Err(e) => warn!("silent session check failed: {}", e),
            }
            if self.user().is_none() {
                return self.start_sign_in().await;
            }
        }

        let Some(user) = self.resolve_identity().await else {
            return self.start_sign_in().await;
        };

        if !self.state.borrow().voted.is_empty() {
            return VoteOutcome::AlreadyVoted(Guard::VoteSet);
        }

        match self.markers.has_marker(&user.id) {
            Ok(true) => return VoteOutcome::AlreadyVoted(Guard::Marker),
            Ok(false) => {}
            Err(e) => warn!("marker check skipped: {}", e),
        }

        let row = VoteRow { user_id: user.id.clone(), nominee_id: nominee.clone() };
        match self.store.insert_vote(&row).await {
            Ok(_) => {
                self.record_local_vote(&user.id, nominee);
                info!("vote recorded for {}", nominee);
                VoteOutcome::Recorded
            }
            Err(e) if e.is_conflict() => {
                if let Err(e) = self.markers.set_marker(&user.id) {
                    warn!("marker write failed: {}", e);
                }
                VoteOutcome::AlreadyVoted(Guard::Store)
            }
            Err(e) => {
                warn!("vote insert failed: {}", e);
                VoteOutcome::Failed
            }
        }
    }

    /// Applied only after the store confirmed the insert. Invalidates any
    /// in-flight nominee fetch so pre-vote counts cannot overwrite this one.
    fn record_local_vote(&self, user_id: &str, nominee: &NomineeId) {
        self.next_ticket();
        {
            let mut state = self.state.borrow_mut();
            if let Some(n) = state.nominees.iter_mut().find(|n| &n.id == nominee) {
                n.votes += 1;
            }
            state.voted.insert(nominee.clone());
        }
        if let Err(e) = self.markers.set_marker(user_id) {
            warn!("marker write failed: {}", e);
        }
    }

    pub fn button_state(&self) -> VoteButton {
        let state = self.state.borrow();
        let Some(user) = &state.user else {
            return VoteButton::Vote;
        };
        let marked = !user.id.is_empty() && self.markers.has_marker(&user.id).unwrap_or(false);
        if !state.voted.is_empty() || marked {
            VoteButton::Voted
        } else {
            VoteButton::Vote
        }
    }

    /// Removes the current user's local hint. The store is untouched.
    pub fn clear_marker(&self) -> Result<()> {
        match self.user() {
            Some(user) => self.markers.clear_marker(&user.id),
            None => Ok(()),
        }
    }

    // --- views ------------------------------------------------------------

    pub fn query(&self) -> String {
        self.state.borrow().query.clone()
    }

    /// New search text; the grid returns to the first page.
    pub fn set_query(&self, query: &str) {
        let mut state = self.state.borrow_mut();
        state.query = query.to_string();
        state.page = 1;
    }

    pub fn select_page(&self, control: PageControl) {
        let view = self.view().page;
        if view.is_enabled(control) {
            self.state.borrow_mut().page = view.target(control);
        }
    }

    /// Filters, clamps the stored page, and slices out the visible nominees.
    pub fn view(&self) -> GridView {
        let now = self.now();
        let button = self.button_state();
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        let indices = state.search.lookup(&state.nominees, &state.query, self.settings.search_scope, now);
        let page = page_view(indices.len(), state.page, self.settings.page_size);
        state.page = page.page;

        let nominees = page.slice(&indices)
            .iter()
            .filter_map(|&i| state.nominees.get(i).cloned())
            .collect();

        GridView { nominees, page, matches: indices.len(), button }
    }

    pub fn leaderboard(&self) -> Vec<Ranked> {
        leaderboard::top(&self.state.borrow().nominees, LEADERBOARD_SIZE)
    }

    // --- countdown --------------------------------------------------------

    /// Stored target, or the configured fallback when absent or unreadable.
    pub async fn load_countdown_target(&self) -> OffsetDateTime {
        let stored = match self.store.select_setting(self.settings.countdown_source).await {
            Ok(value) => value,
            Err(e) => {
                warn!("countdown setting unavailable: {}", e);
                None
            }
        };
        resolve_target(stored.as_deref(), self.settings.countdown_policy, self.now())
    }
}
