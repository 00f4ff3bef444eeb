//! Seams to the hosted backend and to browser storage.
//!
//! The browser build implements these over HTTP and `localStorage`; tests use
//! in-memory fakes. Futures are not required to be `Send`: everything runs on
//! the single wasm event loop.
#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::models::{AuthEvent, NomineeId, Nominee, Session, TokenHandback, User, VoteRow};
use crate::settings::CountdownSource;

pub trait AuthProvider {
    async fn current_session(&self) -> Result<Option<Session>>;

    async fn current_user(&self) -> Result<Option<User>>;

    /// Starts the interactive OAuth flow. The page navigates away on success.
    async fn sign_in_with_redirect(&self, redirect_to: &str) -> Result<()>;

    async fn sign_out(&self) -> Result<()>;

    async fn set_session(&self, handback: &TokenHandback) -> Result<Session>;

    /// Registers a listener for sign-in, sign-out and token refresh.
    fn on_auth_state_change(&self, listener: Box<dyn Fn(AuthEvent)>);
}

pub trait DataStore {
    async fn select_nominees(&self) -> Result<Vec<Nominee>>;

    /// All votes, or only the given voter's.
    async fn select_votes(&self, voter: Option<&str>) -> Result<Vec<VoteRow>>;

    /// Fails with `ErrorCode::Conflict` when the voter already has a row.
    async fn insert_vote(&self, vote: &VoteRow) -> Result<VoteRow>;

    async fn select_setting(&self, source: CountdownSource) -> Result<Option<String>>;
}

/// Per-browser "already voted" hints. Never authoritative.
pub trait MarkerStore {
    fn has_marker(&self, user_id: &str) -> Result<bool>;

    fn set_marker(&self, user_id: &str) -> Result<()>;

    fn clear_marker(&self, user_id: &str) -> Result<()>;
}

pub fn voted_nominees(rows: &[VoteRow]) -> Vec<NomineeId> {
    rows.iter().map(|r| r.nominee_id.clone()).collect()
}
