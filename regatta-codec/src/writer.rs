//! Canonical document rendering and serialization.
//!
//! [`ConfigWriter`] exposes three independent capabilities so that schema
//! verification can run on the intermediate document before the textual
//! serialization is trusted as authoritative:
//! render → [`ConfigDocument`], verify, serialize → text.

use serde::Serialize;
use serde_yaml::Value;

use regatta_core::types::{ConfigSnapshot, Environment, Pipeline, PipelineTemplate};

use crate::error::SchemaError;
use crate::schema;

/// Intermediate YAML form of a snapshot, between rendering and serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument(Value);

impl ConfigDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// The on-disk shape of the canonical config file. Partials and the
/// fingerprint are deliberately absent: fragments live only in the merged
/// in-memory view, never in the served file.
#[derive(Serialize)]
struct CanonicalDocument<'a> {
    pipelines: &'a [Pipeline],
    templates: &'a [PipelineTemplate],
    environments: &'a [Environment],
}

/// Renders snapshots to the canonical serialized form and checks that form
/// against the schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigWriter;

impl ConfigWriter {
    pub fn new() -> Self {
        Self
    }

    /// Build the intermediate document from `snapshot`.
    pub fn render(&self, snapshot: &ConfigSnapshot) -> Result<ConfigDocument, SchemaError> {
        let document = CanonicalDocument {
            pipelines: &snapshot.pipelines,
            templates: &snapshot.templates,
            environments: &snapshot.environments,
        };
        Ok(ConfigDocument(serde_yaml::to_value(document)?))
    }

    /// Verify the document against the canonical schema.
    pub fn verify(&self, document: &ConfigDocument) -> Result<(), SchemaError> {
        schema::verify_document(&document.0)
    }

    /// Serialize the document to canonical YAML text.
    pub fn serialize(&self, document: &ConfigDocument) -> Result<String, SchemaError> {
        Ok(serde_yaml::to_string(&document.0)?)
    }
}
