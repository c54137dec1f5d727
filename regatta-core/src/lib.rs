//! Regatta core library — domain types, fingerprinting, extension registry,
//! and injected providers.
//!
//! Public API surface:
//! - [`types`] — newtypes, snapshot, fragments, revisions
//! - [`fingerprint`] — content checksums for optimistic concurrency
//! - [`registry`] — [`ElementRegistry`] of recognized element kinds
//! - [`providers`] — clock / product-version / process-env traits

pub mod fingerprint;
pub mod providers;
pub mod registry;
pub mod types;

pub use fingerprint::fingerprint;
pub use registry::ElementRegistry;
pub use types::{
    ConfigRevision, ConfigSnapshot, Environment, EnvironmentName, FragmentSource,
    FullConfigUpdate, Material, MaterialKind, PartialConfig, Pipeline, PipelineName,
    PipelineTemplate, Stage, StageName, TemplateName, Username,
};
