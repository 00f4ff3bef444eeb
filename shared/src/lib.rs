pub mod error;
pub mod models;
pub mod settings;
pub mod boundary;
pub mod outcome;
pub mod tally;
pub mod pagination;
pub mod search;
pub mod leaderboard;
pub mod countdown;
pub mod client;

pub use error::{Error, ErrorCode, ErrorResponse, Result};
pub use models::*;
pub use settings::{ContestSettings, CountdownPolicy, CountdownSource, SearchScope};
pub use boundary::{AuthProvider, DataStore, MarkerStore};
pub use outcome::{Guard, LoadOutcome, StatusMessage, VoteOutcome};
pub use client::{GridView, VoteClient};
pub use countdown::Countdown;
pub use leaderboard::Ranked;
pub use pagination::{PageControl, PageView};
