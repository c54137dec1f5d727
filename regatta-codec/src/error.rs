//! Error types for regatta-codec.

use thiserror::Error;

use regatta_core::types::{
    EnvironmentName, MaterialKind, PipelineName, StageName, TemplateName,
};

/// Structural/semantic rejection of a candidate snapshot. No side effect has
/// occurred when one of these is returned.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("duplicate pipeline name: {name}")]
    DuplicatePipeline { name: PipelineName },

    #[error("duplicate template name: {name}")]
    DuplicateTemplate { name: TemplateName },

    #[error("duplicate environment name: {name}")]
    DuplicateEnvironment { name: EnvironmentName },

    #[error("environment {environment} references undefined pipeline {pipeline}")]
    UnknownPipelineInEnvironment {
        environment: EnvironmentName,
        pipeline: PipelineName,
    },

    #[error("pipeline {pipeline} references undefined template {template}")]
    UnknownTemplate {
        pipeline: PipelineName,
        template: TemplateName,
    },

    #[error("pipeline {pipeline} uses unregistered material kind {kind}")]
    UnknownMaterialKind {
        pipeline: PipelineName,
        kind: MaterialKind,
    },

    #[error("pipeline {name} defines neither stages nor a template")]
    EmptyPipeline { name: PipelineName },

    #[error("pipeline {name} defines both inline stages and a template")]
    StagesAndTemplate { name: PipelineName },

    #[error("stage {stage} in pipeline {pipeline} has no jobs")]
    EmptyStage {
        pipeline: PipelineName,
        stage: StageName,
    },
}

/// The rendered document failed schema verification, or could not be built
/// or serialized at all.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A structural rule of the canonical document was violated.
    #[error("schema violation at {location}: {message}")]
    Violation { location: String, message: String },

    /// YAML engine failure while building or serializing the document.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
