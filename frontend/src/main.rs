mod browser;
mod config;
mod contest;
mod countdown;
mod nominee_grid;
mod pager;
mod search_box;
mod storage;
mod styles;
mod supabase;
mod top_five;

use crate::contest::Contest;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    yew::Renderer::<Contest>::new().render();
}
