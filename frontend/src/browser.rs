use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;
use yew::NodeRef;

use crate::config::CONFIG;

/// URL fragment when it looks like an OAuth handback.
pub fn oauth_fragment() -> Option<String> {
    let hash = web_sys::window()?.location().hash().ok()?;
    hash.contains("access_token=").then_some(hash)
}

/// Removes the consumed token handback from the address bar.
pub fn strip_fragment() {
    let Some(window) = web_sys::window() else { return };
    let path = window.location().pathname().unwrap_or_else(|_| "/".into());
    let replaced = window.history()
        .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&path)));
    if let Err(e) = replaced {
        log::warn!("could not strip URL fragment: {:?}", e);
    }
}

/// Back to this page on localhost, the deployed site otherwise.
pub fn sign_in_redirect() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return CONFIG.production_redirect.to_string();
    };
    let host = location.hostname().unwrap_or_default();
    if host == "localhost" || host == "127.0.0.1" {
        let origin = location.origin().unwrap_or_default();
        let path = location.pathname().unwrap_or_else(|_| "/".into());
        format!("{}{}", origin, path)
    } else {
        CONFIG.production_redirect.to_string()
    }
}

pub fn scroll_above(node: &NodeRef, offset: f64) {
    let Some(window) = web_sys::window() else { return };
    if let Some(element) = node.get().and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
        window.scroll_to_with_x_and_y(0.0, f64::from(element.offset_top()) - offset);
    }
}

pub fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}
