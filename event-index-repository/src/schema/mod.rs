//! Field registry for the event index.
//!
//! Fields are declared on a [`SchemaBuilder`] and frozen into a [`Schema`] by
//! a single validating `build` step. The schema owns the [`AliasResolver`]
//! used by the query layer and the [`ProjectionRule`]s that feed derived
//! fields.

pub mod alias;
pub mod analysis;
pub mod builder;
pub mod event_schema;
pub mod field;
pub mod projection;
pub mod registry;

pub use alias::AliasResolver;
pub use builder::{FullTextField, SchemaBuilder};
pub use event_schema::event_schema;
pub use field::{DynamicTemplate, FieldDescriptor, FieldOptions, FieldType};
pub use projection::{ProjectionOptions, ProjectionRule};
pub use registry::Schema;
