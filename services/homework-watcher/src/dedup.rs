//! Suppression of repeated notifications

use std::fmt;

/// Which kind of text a notification carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Homework status change
    Status,
    /// Error report
    Error,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Status => write!(f, "status"),
            Track::Error => write!(f, "error"),
        }
    }
}

/// Last text successfully delivered on each track.
///
/// The two tracks never suppress each other. State only moves forward on
/// [`Deduplicator::mark_sent`], so a failed delivery is attempted again.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    last_message: Option<String>,
    last_error: Option<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `text` differs from the last text sent on `track`
    pub fn should_send(&self, track: Track, text: &str) -> bool {
        self.last(track) != Some(text)
    }

    /// Record that `text` was delivered on `track`
    pub fn mark_sent(&mut self, track: Track, text: String) {
        match track {
            Track::Status => self.last_message = Some(text),
            Track::Error => self.last_error = Some(text),
        }
    }

    pub fn last(&self, track: Track) -> Option<&str> {
        match track {
            Track::Status => self.last_message.as_deref(),
            Track::Error => self.last_error.as_deref(),
        }
    }
}
