//! # Event Index Shared
//!
//! This crate defines the event document shape shared by the event index
//! producers and the indexing service. It includes the typed event, the
//! recursive error node and the well-known data bag keys.

pub mod types;

pub use types::error_node::ErrorNode;
pub use types::event_document::EventDocument;
pub use types::known_keys;
