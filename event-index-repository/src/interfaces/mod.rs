//! Interface definitions for the event index provider.
//!
//! This module defines the abstract `EventIndexProvider` trait that allows
//! for dependency injection and swappable search backend implementations.

mod event_index_provider;

pub use event_index_provider::EventIndexProvider;
