//! Cell reuse identity for chat messages.
//!
//! Rows that share a (content kind, alignment) pair share a cell template.
//! The key is derived from the explicit
//! [`ContentKind`](crate::model::message::ContentKind) tag rather than any
//! runtime type inspection, so it is deterministic and total.

use std::collections::HashSet;

use crate::collection::ReuseKey;
use crate::model::message::Message;

/// Derive the reuse key for a message.
///
/// Injective over distinct (kind, alignment) pairs: the two tags are drawn
/// from disjoint fixed alphabets and joined with a separator neither
/// contains.
///
/// # Examples
///
/// ```
/// # use chatdeck::chat::identity::reuse_key;
/// # use chatdeck::model::{Alignment, Message};
/// let a = reuse_key(&Message::text("hi", Alignment::Left));
/// let b = reuse_key(&Message::text("completely different body", Alignment::Left));
/// assert_eq!(a, b, "same shape, same key");
/// assert_eq!(a.as_str(), "text.left");
/// ```
pub fn reuse_key(message: &Message) -> ReuseKey {
    let kind = message.content().kind();
    let alignment = message.options().alignment;
    ReuseKey::new(format!("{}.{}", kind.tag(), alignment.tag()))
}

/// Tracks which reuse keys have been registered with one view instance.
///
/// Registration happens lazily during the render pass, the first time a
/// message shape is dequeued — never during batch replay.
#[derive(Debug, Default)]
pub struct ReuseRegistry {
    registered: HashSet<ReuseKey>,
}

impl ReuseRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; returns `true` the first time a key is seen, when the
    /// caller must register the template with the view.
    pub fn insert_if_new(&mut self, key: &ReuseKey) -> bool {
        if self.registered.contains(key) {
            return false;
        }
        self.registered.insert(key.clone());
        true
    }

    /// Number of distinct keys registered so far.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Whether no key has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::message::{Alignment, Message, MessageContent, MessageOptions};

    fn image(alignment: Alignment) -> Message {
        Message::new(
            MessageContent::Image {
                source: "p.png".into(),
                width: 64.0,
                height: 64.0,
            },
            MessageOptions::bubble(alignment),
        )
    }

    #[test]
    fn equal_shape_yields_equal_key() {
        let a = reuse_key(&Message::text("one", Alignment::Left));
        let b = reuse_key(&Message::text("two", Alignment::Left));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_kind_or_alignment_yields_distinct_keys() {
        let keys = [
            reuse_key(&Message::text("m", Alignment::Left)),
            reuse_key(&Message::text("m", Alignment::Right)),
            reuse_key(&image(Alignment::Left)),
            reuse_key(&image(Alignment::Right)),
            reuse_key(&Message::notice("m")),
        ];
        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "keys {i} and {j} collide: {a}");
                }
            }
        }
    }

    #[test]
    fn registry_reports_new_keys_exactly_once() {
        let mut registry = ReuseRegistry::new();
        let key = reuse_key(&Message::text("m", Alignment::Left));

        assert!(registry.insert_if_new(&key), "first sighting registers");
        assert!(!registry.insert_if_new(&key), "second sighting does not");
        assert_eq!(registry.len(), 1);
    }
}
