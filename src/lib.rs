//! chatdeck
//!
//! Two view-state subsystems for hosts built on a virtualized
//! collection-view widget:
//!
//! - [`chat`]: an ordered message store with batched, coalesced
//!   insert/update/remove/move application — safe under concurrent
//!   producers, replayed as minimal structural edits.
//! - [`browser`]: a paged photo-browser detail controller — current-item
//!   tracking with hit caching, a synchronized thumbnail indicator, and an
//!   interactive, cancellable dismiss gesture.
//!
//! The widget itself is a collaborator behind the [`collection`] traits;
//! chatdeck is headless and toolkit-agnostic.

pub mod browser;
pub mod chat;
pub mod collection;
pub mod config;
pub mod logging;
pub mod model;

#[cfg(any(test, feature = "bench-internals"))]
pub mod test_harness;
