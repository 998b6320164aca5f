//! Error types for the event index repository.
//!
//! `EventIndexError` covers schema construction, provisioning and document
//! writes. `UnresolvedAlias` is the non-fatal query-side lookup failure.

mod event_index_error;
mod unresolved_alias;

pub use event_index_error::EventIndexError;
pub use unresolved_alias::UnresolvedAlias;
