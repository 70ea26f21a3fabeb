//! State management module
//!
//! This module defines the phase machine a coordinator moves through while
//! paginating, draining dispatched tasks and finishing.

mod page_state;

pub use page_state::{CrawlPhase, StateError};
