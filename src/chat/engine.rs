//! Batched chat-list update engine.
//!
//! Mutation calls do not touch the list widget directly. Each call wraps a
//! begin → enqueue → commit triple against a per-engine batch buffer; only
//! when the outermost commit drains the buffer is the accumulated operation
//! sequence replayed against the message store and the collection view, as
//! one structural-edit batch. Calls issued while a batch is open — from
//! nested scopes or from other threads — coalesce into that batch.
//!
//! The buffer cycles Idle → Buffering(depth 1) → Buffering(depth N) → ... →
//! Idle-with-replay, indefinitely, per engine instance. A single mutex
//! guards the depth counter and the operation list for the duration of each
//! begin or commit; nothing blocks while holding it.
//!
//! Background producers get a cloneable [`ChatUpdateHandle`]. A handle
//! commit that drains the buffer forwards the batch through a channel; the
//! UI side replays it on the next [`ChatUpdateEngine::flush`]. Replay
//! therefore always happens on the thread that owns the view.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::collection::{CollectionView, StructuralEdit};
use crate::model::geometry::IndexPath;
use crate::model::message::Message;

/// One buffered mutation request.
///
/// Indices are store-relative at enqueue time and are NOT re-normalized as
/// later operations join the same batch: replay applies operations
/// sequentially in enqueue order, so a caller enqueueing several operations
/// into one batch must account for the index shift its earlier operations
/// cause. Positional identity also means concurrent producers that race on
/// the same region must serialize their structural knowledge themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperation {
    /// Insert `message` so that it ends up at position `at`.
    Insert {
        /// The new message.
        message: Message,
        /// Target position, `0 ..= len`.
        at: usize,
    },
    /// Replace the message at position `at`.
    Update {
        /// The replacement message.
        message: Message,
        /// Position to replace, `0 .. len`.
        at: usize,
    },
    /// Remove the message at position `at`.
    Remove {
        /// Position to remove, `0 .. len`.
        at: usize,
    },
    /// Relocate a message.
    Move {
        /// Source position, `0 .. len`.
        from: usize,
        /// Destination position after removal, `0 .. len`.
        to: usize,
    },
}

/// Buffer state shared between the engine and its handles.
#[derive(Debug)]
struct BatchInner {
    /// Reentrancy depth: number of `begin` calls without a matching commit.
    depth: usize,
    /// Operations accumulated since the buffer was last drained.
    ops: Vec<UpdateOperation>,
    /// Committed batches travel to the UI side through this channel.
    committed_tx: Sender<Vec<UpdateOperation>>,
}

#[derive(Debug)]
struct BatchShared {
    inner: Mutex<BatchInner>,
}

impl BatchShared {
    fn lock(&self) -> MutexGuard<'_, BatchInner> {
        // The buffer stays structurally valid across a poisoning panic;
        // recover the guard.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut inner = self.lock();
        inner.depth = inner.depth.saturating_add(1).max(1);
    }

    fn enqueue(&self, op: UpdateOperation) {
        self.lock().ops.push(op);
    }

    /// Decrement the depth; at zero, atomically detach the buffered
    /// operations and forward them for replay. Returns `true` when a
    /// non-empty batch was forwarded.
    fn commit(&self) -> bool {
        let mut inner = self.lock();
        inner.depth = inner.depth.saturating_sub(1);
        if inner.depth != 0 || inner.ops.is_empty() {
            return false;
        }
        let batch = std::mem::take(&mut inner.ops);
        debug!(ops = batch.len(), "batch committed");
        // Unbounded channel: the send never blocks. It only fails if the
        // engine (receiver) is gone, in which case there is nothing to
        // replay against anyway.
        let _ = inner.committed_tx.send(batch);
        true
    }

    /// A whole logical mutation call under one lock acquisition, so other
    /// producers observe it atomically: begin, enqueue all, commit.
    fn enqueue_batch(&self, ops: Vec<UpdateOperation>) -> bool {
        let mut inner = self.lock();
        inner.depth = inner.depth.saturating_add(1).max(1);
        inner.ops.extend(ops);
        inner.depth = inner.depth.saturating_sub(1);
        if inner.depth != 0 || inner.ops.is_empty() {
            return false;
        }
        let batch = std::mem::take(&mut inner.ops);
        debug!(ops = batch.len(), "batch committed");
        let _ = inner.committed_tx.send(batch);
        true
    }
}

/// Cloneable producer handle for threads that do not own the view.
///
/// Handles enqueue the same operations as the engine; a handle commit that
/// drains the buffer hands the batch off asynchronously, and the UI side
/// replays it on its next [`ChatUpdateEngine::flush`]. `append` is not
/// offered here: it resolves the store length at enqueue time, which only
/// the UI side can read without racing.
#[derive(Debug, Clone)]
pub struct ChatUpdateHandle {
    shared: Arc<BatchShared>,
}

impl ChatUpdateHandle {
    /// Open a batch scope (increments the reentrancy counter).
    pub fn begin_updates(&self) {
        self.shared.begin();
    }

    /// Close a batch scope. When this was the outermost scope, the batch is
    /// forwarded for replay on the UI side.
    pub fn commit_updates(&self) {
        self.shared.commit();
    }

    /// Enqueue a raw operation into the currently open batch scope.
    pub fn enqueue(&self, op: UpdateOperation) {
        self.shared.enqueue(op);
    }

    /// Insert `message` at `at`.
    pub fn insert(&self, message: Message, at: usize) {
        self.shared
            .enqueue_batch(vec![UpdateOperation::Insert { message, at }]);
    }

    /// Insert `messages` in argument order starting at `at`.
    pub fn insert_all(&self, messages: Vec<Message>, at: usize) {
        self.shared.enqueue_batch(insert_ops(messages, at));
    }

    /// Replace the message at `at`.
    pub fn update(&self, message: Message, at: usize) {
        self.shared
            .enqueue_batch(vec![UpdateOperation::Update { message, at }]);
    }

    /// Remove the message at `at`.
    pub fn remove(&self, at: usize) {
        self.shared
            .enqueue_batch(vec![UpdateOperation::Remove { at }]);
    }

    /// Remove the messages at `indices`, in the order given.
    pub fn remove_all(&self, indices: &[usize]) {
        self.shared.enqueue_batch(remove_ops(indices));
    }

    /// Relocate a message from `from` to `to`.
    pub fn move_item(&self, from: usize, to: usize) {
        self.shared
            .enqueue_batch(vec![UpdateOperation::Move { from, to }]);
    }
}

/// The chat-list update engine: owns the ordered message store and the
/// batch buffer, and replays committed batches against the collection view.
///
/// The store is mutated exclusively by batch replay — never directly by UI
/// callbacks — so the visible list and the store can only disagree while a
/// committed batch is still in flight, and reconcile at the next flush.
#[derive(Debug)]
pub struct ChatUpdateEngine {
    store: Vec<Message>,
    shared: Arc<BatchShared>,
    committed_rx: Receiver<Vec<UpdateOperation>>,
}

impl Default for ChatUpdateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatUpdateEngine {
    /// Create an engine with an empty store.
    pub fn new() -> Self {
        let (committed_tx, committed_rx) = mpsc::channel();
        Self {
            store: Vec::new(),
            shared: Arc::new(BatchShared {
                inner: Mutex::new(BatchInner {
                    depth: 0,
                    ops: Vec::new(),
                    committed_tx,
                }),
            }),
            committed_rx,
        }
    }

    /// A producer handle for background threads.
    pub fn handle(&self) -> ChatUpdateHandle {
        ChatUpdateHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of messages in the store.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The message at `index`, if in range.
    pub fn message(&self, index: usize) -> Option<&Message> {
        self.store.get(index)
    }

    /// All messages, in store order.
    pub fn messages(&self) -> &[Message] {
        &self.store
    }

    // ===== Batch protocol =====

    /// Open a batch scope (increments the reentrancy counter).
    pub fn begin_updates(&self) {
        self.shared.begin();
    }

    /// Enqueue a raw operation into the currently open batch scope.
    pub fn enqueue(&self, op: UpdateOperation) {
        self.shared.enqueue(op);
    }

    /// Close a batch scope. When this was the outermost scope, the batch is
    /// replayed synchronously against `view` — after any batches other
    /// producers committed earlier, in commit order.
    pub fn commit_updates<V: CollectionView>(&mut self, view: &mut V) {
        if self.shared.commit() {
            self.flush(view);
        }
    }

    /// Replay every batch committed since the last flush. Call from the UI
    /// tick (or any point on the view-owning thread) to pick up batches
    /// committed by background handles. Returns the number of batches
    /// replayed.
    pub fn flush<V: CollectionView>(&mut self, view: &mut V) -> usize {
        let mut replayed = 0;
        while let Ok(ops) = self.committed_rx.try_recv() {
            self.replay(view, ops);
            replayed += 1;
        }
        replayed
    }

    /// Apply one detached batch to the store and the view.
    ///
    /// Operations apply sequentially in enqueue order; each becomes exactly
    /// one structural edit, and the whole batch becomes exactly one
    /// `apply_edits` call.
    ///
    /// # Panics
    ///
    /// Panics when an operation references an out-of-range index. That is a
    /// programmer error at the enqueue site — positional operations are not
    /// validated against structural drift on the caller's behalf.
    fn replay<V: CollectionView>(&mut self, view: &mut V, ops: Vec<UpdateOperation>) {
        let mut edits = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                UpdateOperation::Insert { message, at } => {
                    assert!(
                        at <= self.store.len(),
                        "insert index {} out of bounds (len: {})",
                        at,
                        self.store.len()
                    );
                    self.store.insert(at, message);
                    edits.push(StructuralEdit::Insert(IndexPath::new(0, at)));
                }
                UpdateOperation::Update { message, at } => {
                    assert!(
                        at < self.store.len(),
                        "update index {} out of bounds (len: {})",
                        at,
                        self.store.len()
                    );
                    self.store[at] = message;
                    edits.push(StructuralEdit::Reload(IndexPath::new(0, at)));
                }
                UpdateOperation::Remove { at } => {
                    assert!(
                        at < self.store.len(),
                        "remove index {} out of bounds (len: {})",
                        at,
                        self.store.len()
                    );
                    self.store.remove(at);
                    edits.push(StructuralEdit::Remove(IndexPath::new(0, at)));
                }
                UpdateOperation::Move { from, to } => {
                    assert!(
                        from < self.store.len(),
                        "move source {} out of bounds (len: {})",
                        from,
                        self.store.len()
                    );
                    let message = self.store.remove(from);
                    assert!(
                        to <= self.store.len(),
                        "move destination {} out of bounds (len: {})",
                        to,
                        self.store.len()
                    );
                    self.store.insert(to, message);
                    edits.push(StructuralEdit::Move {
                        from: IndexPath::new(0, from),
                        to: IndexPath::new(0, to),
                    });
                }
            }
        }
        debug!(edits = edits.len(), "replaying batch");
        view.apply_edits(&edits);
    }

    // ===== Convenience mutations (begin → enqueue → commit) =====

    /// Insert `message` at `at` and replay.
    pub fn insert<V: CollectionView>(&mut self, view: &mut V, message: Message, at: usize) {
        if self
            .shared
            .enqueue_batch(vec![UpdateOperation::Insert { message, at }])
        {
            self.flush(view);
        }
    }

    /// Insert `messages` in argument order starting at `at` and replay.
    pub fn insert_all<V: CollectionView>(
        &mut self,
        view: &mut V,
        messages: Vec<Message>,
        at: usize,
    ) {
        if self.shared.enqueue_batch(insert_ops(messages, at)) {
            self.flush(view);
        }
    }

    /// Replace the message at `at` and replay.
    pub fn update<V: CollectionView>(&mut self, view: &mut V, message: Message, at: usize) {
        if self
            .shared
            .enqueue_batch(vec![UpdateOperation::Update { message, at }])
        {
            self.flush(view);
        }
    }

    /// Remove the message at `at` and replay.
    pub fn remove<V: CollectionView>(&mut self, view: &mut V, at: usize) {
        if self.shared.enqueue_batch(vec![UpdateOperation::Remove { at }]) {
            self.flush(view);
        }
    }

    /// Remove the messages at `indices` (enqueue order) and replay.
    pub fn remove_all<V: CollectionView>(&mut self, view: &mut V, indices: &[usize]) {
        if self.shared.enqueue_batch(remove_ops(indices)) {
            self.flush(view);
        }
    }

    /// Relocate a message from `from` to `to` and replay.
    pub fn move_item<V: CollectionView>(&mut self, view: &mut V, from: usize, to: usize) {
        if self
            .shared
            .enqueue_batch(vec![UpdateOperation::Move { from, to }])
        {
            self.flush(view);
        }
    }

    /// Append `message` at the current end of the store and replay.
    ///
    /// The tail position is read at enqueue time; operations already
    /// buffered in an open batch do not move it.
    pub fn append<V: CollectionView>(&mut self, view: &mut V, message: Message) {
        let at = self.store.len();
        self.insert(view, message, at);
    }

    /// Append `messages` at the current end of the store and replay.
    pub fn append_all<V: CollectionView>(&mut self, view: &mut V, messages: Vec<Message>) {
        let at = self.store.len();
        self.insert_all(view, messages, at);
    }
}

/// Expand a multi-insert into per-message operations at ascending indices,
/// so the messages land in argument order.
fn insert_ops(messages: Vec<Message>, at: usize) -> Vec<UpdateOperation> {
    messages
        .into_iter()
        .enumerate()
        .map(|(offset, message)| UpdateOperation::Insert {
            message,
            at: at + offset,
        })
        .collect()
}

fn remove_ops(indices: &[usize]) -> Vec<UpdateOperation> {
    indices
        .iter()
        .map(|&at| UpdateOperation::Remove { at })
        .collect()
}

// ===== Tests =====

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
