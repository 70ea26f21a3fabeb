/// Crawl phase definitions for tracking coordinator progress
///
/// A coordinator walks listing pages (`Paginating`), then waits on every task
/// it dispatched (`Draining`), then stops (`Done`).
use std::fmt;
use thiserror::Error;

/// Represents the current phase of a coordinator run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Listing pages are being fetched and their items dispatched
    Paginating,

    /// Pagination stopped; dispatched tasks are being awaited
    Draining,

    /// Every dispatched task has resolved
    Done,
}

/// Raised when a coordinator attempts an illegal phase change
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: CrawlPhase, to: CrawlPhase },
}

impl CrawlPhase {
    /// Returns true if no further work happens in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while new tasks may still be dispatched
    pub fn accepts_dispatch(&self) -> bool {
        matches!(self, Self::Paginating)
    }

    /// Checks whether moving from `self` to `next` is allowed
    ///
    /// Phases only move forward, one step at a time.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Paginating, Self::Draining) | (Self::Draining, Self::Done)
        )
    }

    /// Returns the phase that follows `self`, validating the move
    pub fn transition(self, next: CrawlPhase) -> Result<CrawlPhase, StateError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StateError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paginating => "paginating",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
