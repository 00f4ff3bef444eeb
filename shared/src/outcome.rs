use std::fmt;

/// Which check rejected a repeat vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    VoteSet,
    Marker,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    AlreadyVoted(Guard),
    /// No identity; the interactive sign-in was started and nothing was written.
    SignInStarted,
    SignInFailed,
    Failed,
}

/// The only texts ever shown in the status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    ThankYou,
    AlreadyVoted,
    VoteError,
    SignInFailed,
}

impl StatusMessage {
    pub fn text(self) -> &'static str {
        match self {
            StatusMessage::ThankYou => "Thank you for voting!",
            StatusMessage::AlreadyVoted => "You already voted!",
            StatusMessage::VoteError => "Error voting. Please try again.",
            StatusMessage::SignInFailed => "Sign in failed. Please try again.",
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl VoteOutcome {
    pub fn status(self) -> Option<StatusMessage> {
        match self {
            VoteOutcome::Recorded => Some(StatusMessage::ThankYou),
            VoteOutcome::AlreadyVoted(_) => Some(StatusMessage::AlreadyVoted),
            VoteOutcome::SignInStarted => None,
            VoteOutcome::SignInFailed => Some(StatusMessage::SignInFailed),
            VoteOutcome::Failed => Some(StatusMessage::VoteError),
        }
    }

    pub fn is_recorded(self) -> bool {
        self == VoteOutcome::Recorded
    }
}

/// Result of a nominee refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Served from the cache without touching the network.
    Cached(usize),
    Applied(usize),
    /// A newer fetch or a local vote started meanwhile; this result was dropped.
    Superseded,
}
