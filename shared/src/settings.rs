use time::{Duration, OffsetDateTime};

pub const MARKER_PREFIX: &str = "ashenda_voted_";
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Name,
    NameAndCity,
}

/// Where the countdown target lives in the settings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownSource {
    FirstRow,
    Key(&'static str),
}

/// Fallback used when the settings table has no usable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPolicy {
    /// Last millisecond of the day, this many calendar months from now.
    MonthsAhead(u8),
    FixedDate(OffsetDateTime),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContestSettings {
    pub page_size: usize,
    pub nominee_ttl: Duration,
    pub search_ttl: Duration,
    pub search_cache_entries: usize,
    pub search_scope: SearchScope,
    pub search_debounce_ms: u32,
    pub refetch_delay_ms: u32,
    pub retry_delay_ms: u32,
    pub status_display_ms: u32,
    pub identity_timeout_ms: u32,
    pub countdown_source: CountdownSource,
    pub countdown_policy: CountdownPolicy,
}

impl ContestSettings {
    pub const fn new() -> Self {
        Self {
            page_size: 10,
            nominee_ttl: Duration::seconds(30),
            search_ttl: Duration::seconds(30),
            search_cache_entries: 64,
            search_scope: SearchScope::NameAndCity,
            search_debounce_ms: 100,
            refetch_delay_ms: 1_000,
            retry_delay_ms: 3_000,
            status_display_ms: 2_200,
            identity_timeout_ms: 5_000,
            countdown_source: CountdownSource::FirstRow,
            countdown_policy: CountdownPolicy::MonthsAhead(3),
        }
    }
}

impl Default for ContestSettings {
    fn default() -> Self {
        Self::new()
    }
}

pub fn marker_key(user_id: &str) -> String {
    format!("{MARKER_PREFIX}{user_id}")
}
