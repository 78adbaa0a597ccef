//! Thumbnail-indicator and item-container contracts.

use crate::model::{IndexPath, Size};

/// The items being browsed: photos, media assets, whatever the host pages
/// through. Feeds both the pager and the indicator data sources.
pub trait ItemContainer {
    /// Opaque item handed to the host for display binding.
    type Item;

    /// Number of sections.
    fn number_of_sections(&self) -> usize;

    /// Number of items in `section`.
    fn number_of_items(&self, section: usize) -> usize;

    /// The item at `index_path`.
    fn item(&self, index_path: IndexPath) -> &Self::Item;

    /// Thumbnail size for the item at `index_path`.
    fn item_size(&self, index_path: IndexPath) -> Size;
}

/// The secondary thumbnail strip kept in lockstep with the pager.
///
/// The controller pushes interpolation updates as the pager scrolls and
/// brackets drags with begin/end interactive-movement notifications; the
/// strip renders however it likes.
pub trait Indicator {
    /// Scroll the strip so `index_path` is focused.
    fn scroll_to_item(&mut self, index_path: IndexPath, animated: bool);

    /// Interpolated highlight between two adjacent items.
    ///
    /// `percent` is the progress from `from` toward `to`; either side may be
    /// `None` while the pager overscrolls past the first or last page.
    fn update_interpolation(
        &mut self,
        from: Option<IndexPath>,
        to: Option<IndexPath>,
        percent: f64,
    );

    /// The pager started tracking a drag.
    fn begin_interactive_movement(&mut self);

    /// The pager settled after a drag.
    fn end_interactive_movement(&mut self);

    /// Force a synchronous layout pass.
    fn force_layout(&mut self);
}
