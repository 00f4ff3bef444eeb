pub const CONTAINER: &str = "bg-gray-900 container mx-auto px-6 py-10 max-w-5xl rounded-xl shadow-lg mt-8";

pub const CARD_HOVER_SCALE: &str = "bg-gray-800 border border-gray-700 rounded-lg shadow-md p-4 transform transition-transform duration-200 hover:scale-105";
pub const ALERT_CARD: &str = "p-4 rounded-lg shadow-md mb-6 text-center";

pub const INPUT_BASE: &str = "appearance-none border border-gray-600 bg-gray-800 text-white text-lg rounded-md w-full py-2 px-4 focus:outline-none focus:border-blue-500";

pub const BUTTON_BASE: &str = "px-5 py-2 rounded-lg font-medium text-white transition-all duration-150 disabled:opacity-50 disabled:cursor-not-allowed";
pub const BUTTON_PRIMARY: &str = "bg-blue-600 hover:bg-blue-700 focus:ring-2 focus:ring-blue-400 focus:outline-none";
pub const BUTTON_SUCCESS: &str = "bg-green-600 hover:bg-green-700 focus:ring-2 focus:ring-green-400 focus:outline-none";
pub const BUTTON_WARNING: &str = "bg-yellow-600 hover:bg-yellow-700 focus:ring-2 focus:ring-yellow-400 focus:outline-none";
pub const BUTTON_MUTED: &str = "bg-gray-700 hover:bg-gray-600 focus:outline-none";

pub const TEXT_MUTED: &str = "text-sm text-gray-400";
pub const HEADING_LG: &str = "text-3xl font-extrabold mb-4 text-center text-gray-100";
pub const HEADING_SM: &str = "text-xl font-semibold mb-3 text-gray-100";

pub const FLEX_BETWEEN: &str = "flex justify-between items-center";
pub const GRID_NOMINEES: &str = "grid gap-4 sm:grid-cols-2 lg:grid-cols-4";

pub const DIGIT_BOX: &str = "flex flex-col items-center bg-gray-800 border border-gray-700 rounded-lg px-4 py-2 min-w-[4.5rem]";
pub const PAGE_ACTIVE: &str = "ring-2 ring-blue-400 bg-blue-600";

pub fn combine_classes(base: &str, additional: &str) -> String {
    format!("{} {}", base, additional)
}

pub fn button(kind: &str) -> String {
    match kind {
        "success" => combine_classes(BUTTON_BASE, BUTTON_SUCCESS),
        "warning" => combine_classes(BUTTON_BASE, BUTTON_WARNING),
        "muted" => combine_classes(BUTTON_BASE, BUTTON_MUTED),
        _ => combine_classes(BUTTON_BASE, BUTTON_PRIMARY),
    }
}

pub fn alert_style(style: &str) -> String {
    match style {
        "error" => combine_classes(ALERT_CARD, "bg-red-500 text-white shadow-lg"),
        "success" => combine_classes(ALERT_CARD, "bg-green-500 text-white shadow-lg"),
        "warning" => combine_classes(ALERT_CARD, "bg-yellow-500 text-white shadow-lg"),
        _ => combine_classes(ALERT_CARD, "bg-blue-500 text-white shadow-lg"),
    }
}
