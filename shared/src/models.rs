use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const PLACEHOLDER_PHOTO: &str = "https://via.placeholder.com/300x400/FFD700/000000?text=Photo";
pub const UNKNOWN_NAME: &str = "Unknown";

/// Nominee key. The store may hand these back as numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NomineeId(String);

impl NomineeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NomineeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for NomineeId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for NomineeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NomineeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self::from(n),
            RawId::Text(s) => Self(s),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nominee {
    pub id: NomineeId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub facebook_url: Option<String>,
    /// Derived client-side from the votes table; never read from the store.
    #[serde(default, skip_deserializing)]
    pub votes: u32,
}

impl Nominee {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(UNKNOWN_NAME)
    }

    pub fn display_city(&self) -> &str {
        self.city.as_deref().unwrap_or_default()
    }

    pub fn photo(&self) -> &str {
        self.photo_url.as_deref().filter(|p| !p.is_empty()).unwrap_or(PLACEHOLDER_PHOTO)
    }

    pub fn social_link(&self) -> &str {
        self.facebook_url.as_deref().filter(|l| !l.is_empty()).unwrap_or("#")
    }
}

/// A row of the votes table. Unique per `user_id` across the contest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRow {
    pub user_id: String,
    pub nominee_id: NomineeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds; absent when the provider did not say.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    pub fn expires_within(&self, now_unix: i64, margin_secs: i64) -> bool {
        self.expires_at.map_or(false, |at| at - margin_secs <= now_unix)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingRow {
    pub value: Option<String>,
}

/// Tokens handed back in the URL fragment after an OAuth redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHandback {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<i64>,
}

impl TokenHandback {
    /// Parses `#access_token=..&refresh_token=..`. Both tokens are required.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let mut access_token = None;
        let mut refresh_token = None;
        let mut expires_at = None;

        for pair in fragment.trim_start_matches('#').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "access_token" if !value.is_empty() => access_token = Some(value.to_string()),
                "refresh_token" if !value.is_empty() => refresh_token = Some(value.to_string()),
                "expires_at" => expires_at = value.parse().ok(),
                _ => {}
            }
        }

        Some(Self {
            access_token: access_token?,
            refresh_token: refresh_token?,
            expires_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteButton {
    Vote,
    Voted,
}

impl VoteButton {
    pub fn label(self) -> &'static str {
        match self {
            VoteButton::Vote => "Vote",
            VoteButton::Voted => "Voted",
        }
    }

    pub fn disabled(self) -> bool {
        self == VoteButton::Voted
    }
}
