//! Photo-browser detail pager: current-item tracking, indicator sync, and
//! the interactive dismiss session.

pub mod controller;
pub mod gesture;
pub mod indicator;
pub mod transition;

pub use controller::{detail_reuse_key, DetailController};
pub use gesture::{DismissGeometry, GestureKind, OtherGesture, PanSnapshot, PanState};
pub use indicator::{Indicator, ItemContainer};
pub use transition::{DismissalHost, TransitionContext};

use crate::model::EdgeInsets;

/// Layout inset that bleeds each page into the inter-page gap, hiding the
/// seam while paging.
pub const PAGE_BLEED_INSET: EdgeInsets = EdgeInsets::new(0.0, -20.0, 0.0, -20.0);
