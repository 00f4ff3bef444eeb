use serde::{de::DeserializeOwned, Serialize};
use shared::settings::marker_key;
use shared::{Error, ErrorCode, MarkerStore, Result};
use web_sys::Storage;

pub const SESSION_KEY: &str = "ashenda.auth.session";
const PENDING_VOTE_KEY: &str = "pendingVote";

fn storage_error(e: impl std::fmt::Debug) -> Error {
    Error::new(ErrorCode::Storage, format!("{:?}", e))
}

fn local_storage() -> Result<Storage> {
    web_sys::window()
        .ok_or_else(|| storage_error("no window"))?
        .local_storage()
        .map_err(storage_error)?
        .ok_or_else(|| storage_error("localStorage disabled"))
}

pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = local_storage().ok()?.get_item(key).ok()??;
    serde_json::from_str(&raw).ok()
}

pub fn save<T: Serialize>(key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    local_storage()?.set_item(key, &raw).map_err(storage_error)
}

pub fn remove(key: &str) -> Result<()> {
    local_storage()?.remove_item(key).map_err(storage_error)
}

/// Drops a vote queued before an OAuth redirect. Returning users click again.
pub fn discard_pending_vote() {
    let removed = web_sys::window()
        .and_then(|w| w.session_storage().ok().flatten())
        .map(|s| s.remove_item(PENDING_VOTE_KEY));
    if let Some(Err(e)) = removed {
        log::warn!("could not clear pending vote: {:?}", e);
    }
}

/// `localStorage` flags keyed by user id.
#[derive(Clone, Copy, Default)]
pub struct BrowserMarkers;

impl MarkerStore for BrowserMarkers {
    fn has_marker(&self, user_id: &str) -> Result<bool> {
        let value = local_storage()?.get_item(&marker_key(user_id)).map_err(storage_error)?;
        Ok(value.is_some())
    }

    fn set_marker(&self, user_id: &str) -> Result<()> {
        local_storage()?.set_item(&marker_key(user_id), "true").map_err(storage_error)
    }

    fn clear_marker(&self, user_id: &str) -> Result<()> {
        remove(&marker_key(user_id))
    }
}
