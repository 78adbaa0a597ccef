//! Domain model types (pure).
//!
//! Messages, geometry, and the crate error taxonomy. Everything here is
//! plain data; behavior lives in `chat` and `browser`.

pub mod error;
pub mod geometry;
pub mod message;

pub use error::ChatdeckError;
pub use geometry::{EdgeInsets, IndexPath, Point, Rect, Size};
pub use message::{Alignment, ContentKind, Message, MessageContent, MessageOptions, MessageStyle};
