//! Chat message list: the batched update engine and its data-source
//! surface.

pub mod data_source;
pub mod engine;
pub mod identity;
pub mod metrics;

pub use data_source::{ChatDataSource, MenuAction};
pub use engine::{ChatUpdateEngine, ChatUpdateHandle, UpdateOperation};
