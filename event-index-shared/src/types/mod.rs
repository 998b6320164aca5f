//! This module defines the core data structures used across the event index.
//! It re-exports `EventDocument` and `ErrorNode`.

pub mod error_node;
pub mod event_document;
pub mod known_keys;

pub use error_node::ErrorNode;
pub use event_document::EventDocument;
