//! Contract with the virtualized list/grid collaborator.
//!
//! The rendering widget — cell recycling, viewport culling, the layout pass —
//! lives in the host toolkit. This crate consumes it through [`CollectionView`]
//! and drives it with [`StructuralEdit`] batches. The host supplies viewport
//! geometry and scroll offsets; chatdeck supplies the state machines.

use crate::model::{EdgeInsets, IndexPath, Point, Rect, Size};

/// Identifies which cell template to recycle for a given item shape.
///
/// Keys are derived deterministically from item content (see
/// [`crate::chat::identity`]); identical shapes always produce identical
/// keys, so one registration per key suffices for the life of the view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReuseKey(String);

impl ReuseKey {
    /// Create a key from a raw string tag.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReuseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Layout attributes of one item as reported by the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutAttributes {
    /// The item this box belongs to.
    pub index_path: IndexPath,
    /// Item frame in content coordinates.
    pub frame: Rect,
}

/// One visual structural edit, expressed in the coordinates the operation
/// was enqueued with.
///
/// Edits inside a batch are ordered and must be applied sequentially; the
/// engine does not re-normalize indices across the batch (callers reason
/// about intra-batch index shift themselves).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralEdit {
    /// A new item appears at this position.
    Insert(IndexPath),
    /// The item at this position changed content.
    Reload(IndexPath),
    /// The item at this position disappears.
    Remove(IndexPath),
    /// An item relocates.
    Move {
        /// Position before the edit.
        from: IndexPath,
        /// Position after the edit.
        to: IndexPath,
    },
}

/// The virtualized list/grid widget, as seen from this crate.
///
/// One committed batch produces exactly one [`CollectionView::apply_edits`]
/// call; everything else is queries and scroll commands.
pub trait CollectionView {
    /// Opaque recycled-cell handle returned by [`CollectionView::dequeue`].
    type Cell;

    /// Register a cell template under `key`. Called at most once per key.
    fn register(&mut self, key: &ReuseKey);

    /// Dequeue a recycled cell for `index_path` using a previously
    /// registered key.
    fn dequeue(&mut self, key: &ReuseKey, index_path: IndexPath) -> Self::Cell;

    /// Layout attributes for an item, or `None` if the widget has not laid
    /// it out.
    fn layout_attributes(&self, index_path: IndexPath) -> Option<LayoutAttributes>;

    /// The item whose frame contains `point` (content coordinates), if any.
    fn index_path_at(&self, point: Point) -> Option<IndexPath>;

    /// Items currently within the viewport.
    fn visible_index_paths(&self) -> Vec<IndexPath>;

    /// Scroll so that `index_path` is centered in the viewport.
    fn scroll_to(&mut self, index_path: IndexPath, animated: bool);

    /// Viewport bounds in content coordinates.
    fn bounds(&self) -> Rect;

    /// Current scroll position.
    fn content_offset(&self) -> Point;

    /// Set the scroll position directly.
    fn set_content_offset(&mut self, offset: Point);

    /// Total content extent.
    fn content_size(&self) -> Size;

    /// Insets applied around the content.
    fn content_inset(&self) -> EdgeInsets;

    /// Enable or disable user scrolling.
    fn set_scroll_enabled(&mut self, enabled: bool);

    /// Force a synchronous layout pass so freshly scrolled-to cells exist.
    fn force_layout(&mut self);

    /// Apply one committed batch of structural edits, in order.
    fn apply_edits(&mut self, edits: &[StructuralEdit]);
}
