//! # regatta-codec
//!
//! Validation, semantic resolution, and canonical-form rendering for Regatta
//! configuration snapshots.
//!
//! [`ConfigLoader`] validates a candidate snapshot and returns a resolved
//! copy; [`ConfigWriter`] renders a snapshot to its intermediate document,
//! verifies that document against the schema, and serializes it to the
//! canonical YAML text.

pub mod error;
pub mod loader;
pub mod schema;
pub mod writer;

pub use error::{SchemaError, ValidationError};
pub use loader::ConfigLoader;
pub use writer::{ConfigDocument, ConfigWriter};
