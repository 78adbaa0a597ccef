//! Paging state machine for the photo-browser detail view.
//!
//! [`DetailController`] tracks which item is current while the user pages a
//! horizontal, paginated collection view, keeps the thumbnail indicator in
//! lockstep, and owns the interactive dismiss session.
//!
//! Three mechanisms carry the load:
//!
//! - **Current-item hit caching.** Every scroll update first tests whether
//!   the cached item's horizontal span still contains the viewport-center
//!   x; only a cache miss performs a positional lookup against the widget.
//! - **Memoized indicator interpolation.** The continuous offset maps to
//!   (floor, ceil) page indices and a fractional percent; index-path
//!   lookups for the two ends re-run only when the page index changes.
//! - **Feedback-loop suppression.** Programmatic scrolls (indicator taps,
//!   initial positioning) run under a guard that mutes the resulting
//!   offset-change notification, so the sync logic never fights the update
//!   that caused it. The guard resets on every exit path, panics included.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::browser::gesture::{self, DismissGeometry, OtherGesture, PanSnapshot, PanState};
use crate::browser::indicator::{Indicator, ItemContainer};
use crate::browser::transition::{DismissalHost, TransitionContext};
use crate::collection::{CollectionView, LayoutAttributes, ReuseKey};
use crate::config::PagerTunables;
use crate::model::{IndexPath, Point, Size};

/// Reuse key for the single detail-page cell template.
pub fn detail_reuse_key() -> ReuseKey {
    ReuseKey::new("asset-detail")
}

/// Sets the suppression flag for its lifetime; releases on drop, so every
/// exit path restores the flag, panics included.
struct SuppressGuard {
    flag: Arc<Mutex<bool>>,
}

impl SuppressGuard {
    fn engage(flag: Arc<Mutex<bool>>) -> Self {
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        Self { flag }
    }
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        *self.flag.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }
}

/// Per-browser paging state machine.
///
/// Collaborators (the collection view, the indicator strip, the transition
/// context, the dismissal host) are passed into each entry point rather
/// than owned, so the controller itself stays a plain state value.
pub struct DetailController<C: ItemContainer> {
    container: C,
    tunables: PagerTunables,

    // Current-item cache.
    current_index_path: Option<IndexPath>,
    current_item: Option<LayoutAttributes>,

    // Memoized interpolation endpoints. Signed: leading-edge bounce takes
    // the floor index below zero.
    from_index: Option<i64>,
    from_index_path: Option<IndexPath>,
    to_index: Option<i64>,
    to_index_path: Option<IndexPath>,

    ignore_offset_changes: Arc<Mutex<bool>>,

    // Interactive dismiss session.
    session_running: bool,
    session_origin: Point,
    transition: Option<Box<dyn TransitionContext>>,
    transition_target: Option<IndexPath>,

    dismiss_gesture_enabled: bool,
}

impl<C: ItemContainer> DetailController<C> {
    /// Create a controller presenting `container`, starting at
    /// `initial_index_path`.
    pub fn new(container: C, initial_index_path: Option<IndexPath>) -> Self {
        Self::with_tunables(container, initial_index_path, PagerTunables::default())
    }

    /// Create a controller with explicit gesture tunables.
    pub fn with_tunables(
        container: C,
        initial_index_path: Option<IndexPath>,
        tunables: PagerTunables,
    ) -> Self {
        Self {
            container,
            tunables,
            current_index_path: initial_index_path,
            current_item: None,
            from_index: None,
            from_index_path: None,
            to_index: None,
            to_index_path: None,
            ignore_offset_changes: Arc::new(Mutex::new(false)),
            session_running: false,
            session_origin: Point::ZERO,
            transition: None,
            transition_target: None,
            dismiss_gesture_enabled: true,
        }
    }

    /// Register the detail cell template and scroll the collection view and
    /// the indicator to the starting item, unanimated and with offset sync
    /// suppressed.
    pub fn prepare<V: CollectionView, I: Indicator>(&mut self, view: &mut V, indicator: &mut I) {
        view.register(&detail_reuse_key());
        let Some(index_path) = self.current_index_path else {
            return;
        };
        self.without_offset_sync(|_| {
            indicator.scroll_to_item(index_path, false);
            view.scroll_to(index_path, false);
        });
    }

    /// The item currently centered in the viewport, if established.
    pub fn current_index_path(&self) -> Option<IndexPath> {
        self.current_index_path
    }

    /// Cached layout attributes of the current item.
    pub fn current_item(&self) -> Option<LayoutAttributes> {
        self.current_item
    }

    /// Whether an interactive dismiss session is running.
    pub fn is_interactive(&self) -> bool {
        self.session_running
    }

    /// Whether the dismiss gesture should currently receive touches.
    pub fn dismiss_gesture_enabled(&self) -> bool {
        self.dismiss_gesture_enabled
    }

    /// The browsed item container.
    pub fn container(&self) -> &C {
        &self.container
    }

    // ===== Offset-change suppression =====

    /// Run `action` with offset-change notifications muted.
    ///
    /// Use for any programmatic scroll whose resulting notification must
    /// not re-enter [`DetailController::scroll_did_change`]. The closure
    /// receives the controller back so notification entry points stay
    /// callable inside the muted window.
    pub fn without_offset_sync<R>(&mut self, action: impl FnOnce(&mut Self) -> R) -> R {
        let _guard = SuppressGuard::engage(Arc::clone(&self.ignore_offset_changes));
        action(self)
    }

    fn offset_changes_ignored(&self) -> bool {
        *self
            .ignore_offset_changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Scroll tracking =====

    /// Entry point for the widget's offset-changed notification.
    ///
    /// Muted while a suppressed programmatic scroll runs. Otherwise updates
    /// the current-item cache and pushes an interpolation sample to the
    /// indicator.
    pub fn scroll_did_change<V: CollectionView, I: Indicator>(
        &mut self,
        view: &V,
        indicator: &mut I,
    ) {
        if self.offset_changes_ignored() {
            return;
        }
        let offset = view.content_offset();
        self.update_current_item(view, offset);
        self.update_indicator_sync(view, indicator, offset);
    }

    /// The user put a finger down on the pager.
    pub fn scroll_will_begin_dragging<I: Indicator>(&mut self, indicator: &mut I) {
        indicator.begin_interactive_movement();
    }

    /// The user lifted the finger; `will_decelerate` says whether the pager
    /// keeps coasting (in which case the settle notification follows).
    pub fn scroll_did_end_dragging<I: Indicator>(&mut self, indicator: &mut I, will_decelerate: bool) {
        if !will_decelerate {
            indicator.end_interactive_movement();
        }
    }

    /// The pager finished coasting.
    pub fn scroll_did_end_decelerating<I: Indicator>(&mut self, indicator: &mut I) {
        indicator.end_interactive_movement();
    }

    /// Refresh the current-item cache for `offset`.
    ///
    /// Fast path: the cached item's span still contains the viewport-center
    /// x — no widget query at all. On a miss, one positional lookup; if the
    /// widget reports nothing at that point (mid-layout, overscroll), the
    /// stale cache is retained.
    fn update_current_item<V: CollectionView>(&mut self, view: &V, offset: Point) {
        let x = offset.x + view.bounds().width() / 2.0;
        if let Some(item) = &self.current_item {
            if item.frame.contains_x(x) {
                return;
            }
        }
        let Some(index_path) = view.index_path_at(Point::new(x, 0.0)) else {
            return;
        };
        debug!(x, ?index_path, "current item changed");

        let attributes = view.layout_attributes(index_path);
        self.current_item = attributes;
        self.current_index_path = attributes.map(|a| a.index_path);
    }

    /// Push an interpolation sample to the indicator.
    ///
    /// `value = offset_x / page_width`; the strip highlights between
    /// `floor(value)` and `ceil(value)` at the fractional percent. The two
    /// index-path lookups are memoized on their page index, so steady
    /// scrolling inside one page boundary costs no widget queries.
    fn update_indicator_sync<V: CollectionView, I: Indicator>(
        &mut self,
        view: &V,
        indicator: &mut I,
        offset: Point,
    ) {
        let page_width = view.bounds().width();
        if page_width <= 0.0 {
            return;
        }
        let value = offset.x / page_width;
        let to = value.ceil() as i64;
        let from = value.floor() as i64;
        let percent = (value + 1.0).fract();

        if self.from_index != Some(from) {
            let center = Point::new((from as f64 + 0.5) * page_width, 0.0);
            self.from_index = Some(from);
            self.from_index_path = view.index_path_at(center);
        }
        if self.to_index != Some(to) {
            let center = Point::new((to as f64 + 0.5) * page_width, 0.0);
            self.to_index = Some(to);
            self.to_index_path = view.index_path_at(center);
        }
        indicator.update_interpolation(self.from_index_path, self.to_index_path, percent);
    }

    // ===== Indicator data source / delegate =====

    /// Section count for the indicator strip.
    pub fn indicator_number_of_sections(&self) -> usize {
        self.container.number_of_sections()
    }

    /// Item count for one indicator section.
    pub fn indicator_number_of_items(&self, section: usize) -> usize {
        self.container.number_of_items(section)
    }

    /// Thumbnail size for one indicator item.
    pub fn indicator_item_size(&self, index_path: IndexPath) -> Size {
        self.container.item_size(index_path)
    }

    /// The item to bind into a thumbnail cell about to display.
    pub fn item_for_display(&self, index_path: IndexPath) -> &C::Item {
        self.container.item(index_path)
    }

    /// The user grabbed the indicator strip: freeze the pager and the
    /// dismiss gesture until the drag ends.
    pub fn indicator_will_begin_dragging<V: CollectionView>(&mut self, view: &mut V) {
        view.set_scroll_enabled(false);
        self.dismiss_gesture_enabled = false;
    }

    /// The indicator drag ended: thaw the pager and the dismiss gesture.
    pub fn indicator_did_end_dragging<V: CollectionView>(&mut self, view: &mut V) {
        view.set_scroll_enabled(true);
        self.dismiss_gesture_enabled = true;
    }

    /// The user tapped an indicator thumbnail.
    ///
    /// Adopts the selection as current and scrolls the pager there
    /// programmatically — suppressed, so the resulting offset notification
    /// does not re-enter the sync logic and fight this update. Selecting
    /// the already-current item is a no-op.
    pub fn indicator_did_select<V: CollectionView>(&mut self, view: &mut V, index_path: IndexPath) {
        debug!(?index_path, "indicator selection");
        if self.current_index_path == Some(index_path) {
            return;
        }
        self.current_item = view.layout_attributes(index_path);
        self.current_index_path = Some(index_path);
        self.without_offset_sync(|_| {
            view.scroll_to(index_path, false);
        });
    }

    // ===== Pager data source =====

    /// Section count for the pager.
    pub fn number_of_sections(&self) -> usize {
        self.container.number_of_sections()
    }

    /// Item count for one pager section.
    pub fn number_of_items(&self, section: usize) -> usize {
        self.container.number_of_items(section)
    }

    /// Page size: every detail page fills the viewport.
    pub fn size_for_item<V: CollectionView>(&self, view: &V, _index_path: IndexPath) -> Size {
        view.bounds().size
    }

    // ===== Dismiss gesture =====

    /// Gesture-delegate gate: may the dismiss recognizer begin?
    pub fn should_begin_dismiss<V: CollectionView>(
        &self,
        view: &V,
        velocity: Point,
        geometry: Option<&DismissGeometry>,
    ) -> bool {
        if !self.dismiss_gesture_enabled {
            return false;
        }
        gesture::should_begin(
            velocity,
            view.bounds().height(),
            geometry,
            self.tunables.max_axis_ratio,
        )
    }

    /// Gesture-delegate arbitration against a competing recognizer.
    pub fn should_recognize_simultaneously(&self, other: &OtherGesture) -> bool {
        gesture::should_recognize_simultaneously(self.session_running, other)
    }

    /// Entry point for samples of the dismiss pan.
    ///
    /// Drives the session state machine: an idle controller starts a
    /// session when the start gating passes (and asks `host` to begin the
    /// dismissal so a transition context gets attached); a running session
    /// maps changed samples to percent updates and ends on anything else,
    /// completing when the gesture ended still moving downward.
    pub fn handle_pan<V: CollectionView, H: DismissalHost>(
        &mut self,
        view: &V,
        snapshot: PanSnapshot,
        geometry: Option<&DismissGeometry>,
        host: &mut H,
    ) {
        if !self.session_running {
            let Some(geometry) = geometry else {
                return;
            };
            if !gesture::should_start_session(
                &snapshot,
                view.bounds().height(),
                geometry,
                self.tunables.max_axis_ratio,
            ) {
                return;
            }
            self.session_origin = snapshot.location;
            self.session_running = true;
            debug!("interactive dismiss started");
            host.begin_dismissal();
        } else if snapshot.state == PanState::Changed {
            let offset = Point::new(
                snapshot.location.x - self.session_origin.x,
                snapshot.location.y - self.session_origin.y,
            );
            let percent = gesture::dismiss_percent(
                offset.y,
                view.bounds().height(),
                self.tunables.dismiss_distance_fraction,
            );
            if let Some(context) = self.transition.as_mut() {
                context.update(percent, offset);
            }
        } else {
            let completed = gesture::should_complete(snapshot.state, snapshot.velocity.y);
            debug!(completed, "interactive dismiss finished");
            if let Some(mut context) = self.transition.take() {
                context.complete(completed);
            }
            self.session_running = false;
        }
    }

    // ===== Transition data source =====

    /// The item the transition animates, fixed at session start.
    pub fn transition_index_path(&self) -> Option<IndexPath> {
        self.transition_target
    }

    /// Layout box of the transition item, for the animator's view lookup.
    pub fn transition_view<V: CollectionView>(&self, view: &V) -> Option<LayoutAttributes> {
        self.transition_target
            .and_then(|index_path| view.layout_attributes(index_path))
    }

    /// May a (non-interactive or interactive) transition start?
    ///
    /// Pins the transition target to the current item; declined until a
    /// current item has been established by layout.
    pub fn transition_should_start(&mut self) -> bool {
        self.transition_target = self.current_index_path;
        self.transition_target.is_some()
    }

    /// May the transition start interactively? Only while the dismiss
    /// gesture is actually tracking.
    pub fn transition_should_start_interactive(&self, gesture_state: PanState) -> bool {
        matches!(gesture_state, PanState::Began | PanState::Changed)
    }

    /// Pre-transition layout: if the target item is not visible, scroll it
    /// into view unanimated and force a layout pass on both collaborators
    /// so the target cell exists before the animation reads it.
    pub fn transition_prepare<V: CollectionView, I: Indicator>(
        &mut self,
        view: &mut V,
        indicator: &mut I,
    ) {
        let Some(index_path) = self.transition_target else {
            return;
        };
        if !view.visible_index_paths().contains(&index_path) {
            view.scroll_to(index_path, false);
            indicator.force_layout();
            view.force_layout();
        }
    }

    /// A transition session began: take ownership of its context.
    pub fn transition_did_start(&mut self, context: Box<dyn TransitionContext>) {
        self.transition = Some(context);
    }

    /// The transition tore down; drop the context if one is still attached.
    pub fn transition_did_end(&mut self, _completed: bool) {
        self.transition = None;
    }
}

impl<C: ItemContainer> std::fmt::Debug for DetailController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailController")
            .field("current_index_path", &self.current_index_path)
            .field("session_running", &self.session_running)
            .field("dismiss_gesture_enabled", &self.dismiss_gesture_enabled)
            .finish_non_exhaustive()
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
