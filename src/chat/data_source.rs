//! Data-source surface the chat list widget calls back into.
//!
//! Cell registration is lazy: the first time a message shape is dequeued,
//! its reuse key is registered with the view. This runs during the render
//! pass that follows a batch replay, never during replay itself.
//!
//! The per-style geometry the host layout sizes rows with (avatar and card
//! boxes, the inset family) lives in [`crate::chat::metrics`].

use tracing::debug;

use crate::chat::engine::ChatUpdateEngine;
use crate::chat::identity::{reuse_key, ReuseRegistry};
use crate::collection::CollectionView;
use crate::model::geometry::IndexPath;
use crate::model::message::Message;

/// Context-menu action on one message row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Copy the message content to the host clipboard.
    Copy,
    /// Re-send: relocate the row to the tail of the conversation.
    Paste,
    /// Remove the row.
    Delete,
}

/// Data-source adapter pairing an update engine with a reuse registry.
///
/// The widget asks this for item counts and cells; menu dispatch funnels
/// structural actions back through the engine's batch protocol.
#[derive(Debug, Default)]
pub struct ChatDataSource {
    registry: ReuseRegistry,
}

impl ChatDataSource {
    /// Create a data source with an empty reuse registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Item count for the single chat section.
    pub fn item_count(&self, engine: &ChatUpdateEngine) -> usize {
        engine.len()
    }

    /// Produce the cell for `index_path`, registering its reuse key on
    /// first sight.
    ///
    /// # Panics
    ///
    /// Panics when `index_path` is out of range — the widget and the store
    /// can only disagree if a committed batch was never flushed, which is a
    /// programmer error.
    pub fn cell_for_item<V: CollectionView>(
        &mut self,
        engine: &ChatUpdateEngine,
        view: &mut V,
        index_path: IndexPath,
    ) -> V::Cell {
        let message = engine
            .message(index_path.item())
            .unwrap_or_else(|| {
                panic!(
                    "cell requested for item {} but store has {} messages",
                    index_path.item(),
                    engine.len()
                )
            });
        let key = reuse_key(message);
        if self.registry.insert_if_new(&key) {
            view.register(&key);
        }
        view.dequeue(&key, index_path)
    }

    /// Hook invoked just before a cell becomes visible. Binding content
    /// into the cell is host territory; the default does nothing.
    pub fn will_display(&self, _index_path: IndexPath) {}

    /// Number of distinct reuse keys registered so far.
    pub fn registered_key_count(&self) -> usize {
        self.registry.len()
    }

    // ===== Context menu =====

    /// Whether a context menu may open on this row.
    pub fn should_show_menu(&self, engine: &ChatUpdateEngine, index_path: IndexPath) -> bool {
        index_path.item() < engine.len()
    }

    /// Whether `action` applies to this row.
    pub fn can_perform_action(
        &self,
        engine: &ChatUpdateEngine,
        _action: MenuAction,
        index_path: IndexPath,
    ) -> bool {
        index_path.item() < engine.len()
    }

    /// Dispatch a menu action.
    ///
    /// `Delete` removes the row and `Paste` relocates it to the tail, both
    /// through the engine's batch protocol. `Copy` mutates nothing and
    /// returns a clone of the message for the host clipboard.
    pub fn perform_action<V: CollectionView>(
        &mut self,
        engine: &mut ChatUpdateEngine,
        view: &mut V,
        action: MenuAction,
        index_path: IndexPath,
    ) -> Option<Message> {
        debug!(?action, ?index_path, "menu action");
        match action {
            MenuAction::Copy => engine.message(index_path.item()).cloned(),
            MenuAction::Paste => {
                let tail = engine.len().saturating_sub(1);
                engine.move_item(view, index_path.item(), tail);
                None
            }
            MenuAction::Delete => {
                engine.remove(view, index_path.item());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::StructuralEdit;
    use crate::model::geometry::Rect;
    use crate::model::message::{Alignment, Message};
    use crate::model::IndexPath;
    use crate::test_harness::RecordingView;

    fn engine_with(messages: Vec<Message>) -> (ChatUpdateEngine, RecordingView) {
        let mut engine = ChatUpdateEngine::new();
        let mut view = RecordingView::new(Rect::new(0.0, 0.0, 320.0, 480.0));
        engine.append_all(&mut view, messages);
        (engine, view)
    }

    #[test]
    fn cell_for_item_registers_each_shape_once() {
        let (engine, mut view) = engine_with(vec![
            Message::text("a", Alignment::Left),
            Message::text("b", Alignment::Left),
            Message::text("c", Alignment::Right),
        ]);
        let mut source = ChatDataSource::new();

        for item in 0..3 {
            source.cell_for_item(&engine, &mut view, IndexPath::new(0, item));
        }

        assert_eq!(
            view.registered.len(),
            2,
            "two shapes: text.left and text.right"
        );
        assert_eq!(view.dequeued.len(), 3, "every row dequeues");
        assert_eq!(source.registered_key_count(), 2);
    }

    #[test]
    fn redisplaying_a_row_does_not_reregister() {
        let (engine, mut view) = engine_with(vec![Message::text("a", Alignment::Left)]);
        let mut source = ChatDataSource::new();

        source.cell_for_item(&engine, &mut view, IndexPath::new(0, 0));
        source.cell_for_item(&engine, &mut view, IndexPath::new(0, 0));

        assert_eq!(view.registered.len(), 1);
        assert_eq!(view.dequeued.len(), 2);
    }

    #[test]
    fn delete_action_removes_the_row() {
        let (mut engine, mut view) = engine_with(vec![
            Message::text("a", Alignment::Left),
            Message::text("b", Alignment::Left),
        ]);
        let mut source = ChatDataSource::new();

        let copied = source.perform_action(
            &mut engine,
            &mut view,
            MenuAction::Delete,
            IndexPath::new(0, 0),
        );

        assert!(copied.is_none());
        assert_eq!(engine.len(), 1);
        assert_eq!(
            view.edit_batches.last().map(Vec::as_slice),
            Some(&[StructuralEdit::Remove(IndexPath::new(0, 0))][..])
        );
    }

    #[test]
    fn paste_action_moves_the_row_to_the_tail() {
        let (mut engine, mut view) = engine_with(vec![
            Message::text("a", Alignment::Left),
            Message::text("b", Alignment::Left),
            Message::text("c", Alignment::Left),
        ]);
        let mut source = ChatDataSource::new();

        source.perform_action(
            &mut engine,
            &mut view,
            MenuAction::Paste,
            IndexPath::new(0, 0),
        );

        let bodies: Vec<_> = engine
            .messages()
            .iter()
            .map(|m| format!("{:?}", m.content()))
            .collect();
        assert!(bodies[2].contains('a'), "first row moved to the tail");
    }

    #[test]
    fn copy_action_returns_the_message_without_mutation() {
        let (mut engine, mut view) = engine_with(vec![Message::text("a", Alignment::Left)]);
        let mut source = ChatDataSource::new();
        let batches_before = view.edit_batches.len();

        let copied = source.perform_action(
            &mut engine,
            &mut view,
            MenuAction::Copy,
            IndexPath::new(0, 0),
        );

        assert_eq!(copied.as_ref(), engine.message(0));
        assert_eq!(view.edit_batches.len(), batches_before, "no structural edit");
    }

    #[test]
    fn menu_predicates_respect_store_bounds() {
        let (engine, _view) = engine_with(vec![Message::text("a", Alignment::Left)]);
        let source = ChatDataSource::new();

        assert!(source.should_show_menu(&engine, IndexPath::new(0, 0)));
        assert!(!source.should_show_menu(&engine, IndexPath::new(0, 1)));
        assert!(!source.can_perform_action(&engine, MenuAction::Delete, IndexPath::new(0, 9)));
    }
}
