//! Recording fakes for the external collaborators.
//!
//! In-crate tests and the whitebox benches drive the chat engine and the
//! detail controller against these instead of a real widget. Every call the
//! crate makes is recorded so tests can assert on call counts and ordering,
//! not just end state.

use std::cell::Cell;
use std::sync::{Arc, Mutex, PoisonError};

use crate::browser::gesture::PanState;
use crate::browser::indicator::{Indicator, ItemContainer};
use crate::browser::transition::{DismissalHost, TransitionContext};
use crate::collection::{CollectionView, LayoutAttributes, ReuseKey, StructuralEdit};
use crate::model::{EdgeInsets, IndexPath, Point, Rect, Size};

/// Cell handle produced by [`RecordingView::dequeue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCell {
    /// Key the cell was dequeued with.
    pub key: ReuseKey,
    /// Item the cell was dequeued for.
    pub index_path: IndexPath,
}

/// A scripted collection view that records every call.
#[derive(Debug)]
pub struct RecordingView {
    /// Viewport bounds.
    pub bounds: Rect,
    /// Current scroll position.
    pub offset: Point,
    /// Total content extent.
    pub size: Size,
    /// Content insets.
    pub inset: EdgeInsets,
    /// Whether user scrolling is enabled.
    pub scroll_enabled: bool,
    /// Scripted item frames, in item order (single section).
    pub item_frames: Vec<Rect>,
    /// Keys registered so far, in call order.
    pub registered: Vec<ReuseKey>,
    /// (key, index path) per dequeue, in call order.
    pub dequeued: Vec<(ReuseKey, IndexPath)>,
    /// One entry per `apply_edits` call.
    pub edit_batches: Vec<Vec<StructuralEdit>>,
    /// (index path, animated) per `scroll_to`, in call order.
    pub scrolled_to: Vec<(IndexPath, bool)>,
    /// Number of `force_layout` calls.
    pub layout_passes: usize,
    /// Number of positional lookups (`index_path_at`) issued so far.
    pub lookups: Cell<usize>,
}

impl RecordingView {
    /// An empty view with the given viewport bounds.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            offset: Point::ZERO,
            size: Size::ZERO,
            inset: EdgeInsets::ZERO,
            scroll_enabled: true,
            item_frames: Vec::new(),
            registered: Vec::new(),
            dequeued: Vec::new(),
            edit_batches: Vec::new(),
            scrolled_to: Vec::new(),
            layout_passes: 0,
            lookups: Cell::new(0),
        }
    }

    /// A horizontally paged view: `count` full-viewport pages of
    /// `page_width` × `height`.
    pub fn paged(count: usize, page_width: f64, height: f64) -> Self {
        let mut view = Self::new(Rect::new(0.0, 0.0, page_width, height));
        view.item_frames = (0..count)
            .map(|i| Rect::new(i as f64 * page_width, 0.0, page_width, height))
            .collect();
        view.size = Size::new(count as f64 * page_width, height);
        view
    }

    /// Total structural edits across all batches.
    pub fn total_edits(&self) -> usize {
        self.edit_batches.iter().map(Vec::len).sum()
    }
}

impl CollectionView for RecordingView {
    type Cell = RecordedCell;

    fn register(&mut self, key: &ReuseKey) {
        self.registered.push(key.clone());
    }

    fn dequeue(&mut self, key: &ReuseKey, index_path: IndexPath) -> RecordedCell {
        self.dequeued.push((key.clone(), index_path));
        RecordedCell {
            key: key.clone(),
            index_path,
        }
    }

    fn layout_attributes(&self, index_path: IndexPath) -> Option<LayoutAttributes> {
        self.item_frames
            .get(index_path.item())
            .map(|&frame| LayoutAttributes { index_path, frame })
    }

    fn index_path_at(&self, point: Point) -> Option<IndexPath> {
        self.lookups.set(self.lookups.get() + 1);
        self.item_frames
            .iter()
            .position(|frame| frame.contains_x(point.x))
            .map(|item| IndexPath::new(0, item))
    }

    fn visible_index_paths(&self) -> Vec<IndexPath> {
        let min = self.offset.x;
        let max = self.offset.x + self.bounds.width();
        self.item_frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.max_x() > min && frame.min_x() < max)
            .map(|(item, _)| IndexPath::new(0, item))
            .collect()
    }

    fn scroll_to(&mut self, index_path: IndexPath, animated: bool) {
        self.scrolled_to.push((index_path, animated));
        if let Some(frame) = self.item_frames.get(index_path.item()) {
            let center = (frame.min_x() + frame.max_x()) / 2.0;
            self.offset.x = center - self.bounds.width() / 2.0;
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn content_offset(&self) -> Point {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    fn content_size(&self) -> Size {
        self.size
    }

    fn content_inset(&self) -> EdgeInsets {
        self.inset
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }

    fn force_layout(&mut self) {
        self.layout_passes += 1;
    }

    fn apply_edits(&mut self, edits: &[StructuralEdit]) {
        self.edit_batches.push(edits.to_vec());
    }
}

/// A thumbnail indicator that records every sync call.
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    /// (from, to, percent) per interpolation push, in call order.
    pub interpolations: Vec<(Option<IndexPath>, Option<IndexPath>, f64)>,
    /// (index path, animated) per `scroll_to_item`, in call order.
    pub scrolled_to: Vec<(IndexPath, bool)>,
    /// Number of `begin_interactive_movement` calls.
    pub begin_moves: usize,
    /// Number of `end_interactive_movement` calls.
    pub end_moves: usize,
    /// Number of `force_layout` calls.
    pub layout_passes: usize,
}

impl Indicator for RecordingIndicator {
    fn scroll_to_item(&mut self, index_path: IndexPath, animated: bool) {
        self.scrolled_to.push((index_path, animated));
    }

    fn update_interpolation(
        &mut self,
        from: Option<IndexPath>,
        to: Option<IndexPath>,
        percent: f64,
    ) {
        self.interpolations.push((from, to, percent));
    }

    fn begin_interactive_movement(&mut self) {
        self.begin_moves += 1;
    }

    fn end_interactive_movement(&mut self) {
        self.end_moves += 1;
    }

    fn force_layout(&mut self) {
        self.layout_passes += 1;
    }
}

/// A fixed-size item container for the pager.
#[derive(Debug)]
pub struct FixedContainer {
    /// Per-item thumbnail sizes (single section).
    pub sizes: Vec<Size>,
}

impl FixedContainer {
    /// A container with `count` items of identical `size`.
    pub fn uniform(count: usize, size: Size) -> Self {
        Self {
            sizes: vec![size; count],
        }
    }
}

impl ItemContainer for FixedContainer {
    type Item = Size;

    fn number_of_sections(&self) -> usize {
        1
    }

    fn number_of_items(&self, _section: usize) -> usize {
        self.sizes.len()
    }

    fn item(&self, index_path: IndexPath) -> &Size {
        &self.sizes[index_path.item()]
    }

    fn item_size(&self, index_path: IndexPath) -> Size {
        self.sizes[index_path.item()]
    }
}

/// Shared log written by [`RecordingContext`] and read by the test after
/// the context has been handed to the controller.
#[derive(Debug, Default)]
pub struct TransitionLog {
    /// (percent, offset) per update, in call order.
    pub updates: Vec<(f64, Point)>,
    /// Completion decision, once delivered.
    pub completion: Option<bool>,
}

/// A transition context that records percent updates and the completion
/// signal into a shared [`TransitionLog`].
#[derive(Debug)]
pub struct RecordingContext {
    log: Arc<Mutex<TransitionLog>>,
}

impl RecordingContext {
    /// A context plus the log handle the test keeps.
    pub fn new() -> (Self, Arc<Mutex<TransitionLog>>) {
        let log = Arc::new(Mutex::new(TransitionLog::default()));
        (
            Self {
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl TransitionContext for RecordingContext {
    fn update(&mut self, percent: f64, offset: Point) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .updates
            .push((percent, offset));
    }

    fn complete(&mut self, completed: bool) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .completion = Some(completed);
    }
}

/// A dismissal host that counts how often the controller asked to dismiss.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Number of `begin_dismissal` calls.
    pub dismissals: usize,
}

impl DismissalHost for RecordingHost {
    fn begin_dismissal(&mut self) {
        self.dismissals += 1;
    }
}

/// A pan snapshot builder for gesture tests.
pub fn pan(state: PanState, location: Point, velocity: Point) -> crate::browser::gesture::PanSnapshot {
    crate::browser::gesture::PanSnapshot {
        state,
        location,
        velocity,
    }
}
