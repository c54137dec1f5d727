//! Validation and semantic resolution of candidate snapshots.
//!
//! [`ConfigLoader::preprocess_and_validate`] is a pure function of its input
//! plus the injected [`ElementRegistry`]: the candidate is never mutated, and
//! the returned copy has template references expanded into concrete stages.

use std::collections::HashSet;

use regatta_core::{
    registry::ElementRegistry,
    types::{ConfigSnapshot, Pipeline},
};

use crate::error::ValidationError;

/// Validates and semantically resolves candidate snapshots.
pub struct ConfigLoader {
    registry: ElementRegistry,
}

impl ConfigLoader {
    pub fn new(registry: ElementRegistry) -> Self {
        Self { registry }
    }

    /// Validate `snapshot` and return a resolved copy.
    ///
    /// Checks run in a fixed order: duplicate names, environment→pipeline
    /// references, pipeline→template references, material kinds, stage
    /// shape. Resolution expands template references into inline stages on
    /// the returned copy only.
    pub fn preprocess_and_validate(
        &self,
        snapshot: &ConfigSnapshot,
    ) -> Result<ConfigSnapshot, ValidationError> {
        self.check_duplicates(snapshot)?;
        self.check_environment_references(snapshot)?;
        self.check_pipelines(snapshot)?;
        Ok(self.resolve(snapshot))
    }

    fn check_duplicates(&self, snapshot: &ConfigSnapshot) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for pipeline in &snapshot.pipelines {
            if !seen.insert(&pipeline.name) {
                return Err(ValidationError::DuplicatePipeline {
                    name: pipeline.name.clone(),
                });
            }
        }
        let mut seen = HashSet::new();
        for template in &snapshot.templates {
            if !seen.insert(&template.name) {
                return Err(ValidationError::DuplicateTemplate {
                    name: template.name.clone(),
                });
            }
        }
        let mut seen = HashSet::new();
        for environment in &snapshot.environments {
            if !seen.insert(&environment.name) {
                return Err(ValidationError::DuplicateEnvironment {
                    name: environment.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_environment_references(
        &self,
        snapshot: &ConfigSnapshot,
    ) -> Result<(), ValidationError> {
        for environment in &snapshot.environments {
            for pipeline in &environment.pipelines {
                if snapshot.pipeline(pipeline).is_none() {
                    return Err(ValidationError::UnknownPipelineInEnvironment {
                        environment: environment.name.clone(),
                        pipeline: pipeline.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_pipelines(&self, snapshot: &ConfigSnapshot) -> Result<(), ValidationError> {
        for pipeline in &snapshot.pipelines {
            match (&pipeline.template, pipeline.stages.is_empty()) {
                (Some(template), true) => {
                    if snapshot.template(template).is_none() {
                        return Err(ValidationError::UnknownTemplate {
                            pipeline: pipeline.name.clone(),
                            template: template.clone(),
                        });
                    }
                }
                (Some(_), false) => {
                    return Err(ValidationError::StagesAndTemplate {
                        name: pipeline.name.clone(),
                    });
                }
                (None, true) => {
                    return Err(ValidationError::EmptyPipeline {
                        name: pipeline.name.clone(),
                    });
                }
                (None, false) => {}
            }

            for material in &pipeline.materials {
                if !self.registry.is_registered(&material.kind) {
                    return Err(ValidationError::UnknownMaterialKind {
                        pipeline: pipeline.name.clone(),
                        kind: material.kind.clone(),
                    });
                }
            }

            for stage in &pipeline.stages {
                if stage.jobs.is_empty() {
                    return Err(ValidationError::EmptyStage {
                        pipeline: pipeline.name.clone(),
                        stage: stage.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Expand template references into concrete stages on a fresh copy.
    fn resolve(&self, snapshot: &ConfigSnapshot) -> ConfigSnapshot {
        let mut resolved = snapshot.clone();
        let pipelines: Vec<Pipeline> = resolved
            .pipelines
            .iter()
            .map(|pipeline| {
                let mut pipeline = pipeline.clone();
                if let Some(template) = &pipeline.template {
                    if let Some(definition) = snapshot.template(template) {
                        pipeline.stages = definition.stages.clone();
                    }
                }
                pipeline
            })
            .collect();
        resolved.pipelines = pipelines;
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regatta_core::types::{
        Environment, EnvironmentName, Material, MaterialKind, PipelineName, PipelineTemplate,
        Stage, StageName, TemplateName,
    };

    fn stage(name: &str) -> Stage {
        Stage {
            name: StageName::from(name),
            jobs: vec!["defaultJob".to_string()],
        }
    }

    fn pipeline(name: &str) -> Pipeline {
        Pipeline {
            name: PipelineName::from(name),
            materials: vec![Material {
                kind: MaterialKind::from("git"),
                url: format!("https://example.com/{name}.git"),
            }],
            template: None,
            stages: vec![stage("build")],
        }
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::new(ElementRegistry::new())
    }

    #[test]
    fn valid_snapshot_passes() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![pipeline("build")],
            ..ConfigSnapshot::default()
        };
        loader().preprocess_and_validate(&snapshot).expect("valid");
    }

    #[test]
    fn input_snapshot_is_not_mutated() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                template: Some(TemplateName::from("tpl")),
                stages: vec![],
                ..pipeline("build")
            }],
            templates: vec![PipelineTemplate {
                name: TemplateName::from("tpl"),
                stages: vec![stage("deploy")],
            }],
            ..ConfigSnapshot::default()
        };
        let before = snapshot.clone();
        loader().preprocess_and_validate(&snapshot).expect("valid");
        assert_eq!(snapshot, before);
    }

    #[test]
    fn template_reference_is_expanded_on_resolved_copy() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                template: Some(TemplateName::from("tpl")),
                stages: vec![],
                ..pipeline("build")
            }],
            templates: vec![PipelineTemplate {
                name: TemplateName::from("tpl"),
                stages: vec![stage("deploy")],
            }],
            ..ConfigSnapshot::default()
        };
        let resolved = loader().preprocess_and_validate(&snapshot).expect("valid");
        assert_eq!(resolved.pipelines[0].stages, vec![stage("deploy")]);
        assert!(snapshot.pipelines[0].stages.is_empty());
    }

    #[test]
    fn duplicate_pipeline_rejected() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![pipeline("build"), pipeline("build")],
            ..ConfigSnapshot::default()
        };
        let err = loader().preprocess_and_validate(&snapshot).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicatePipeline { .. }));
    }

    #[test]
    fn environment_referencing_undefined_pipeline_rejected() {
        let snapshot = ConfigSnapshot {
            environments: vec![Environment {
                name: EnvironmentName::from("uat"),
                pipelines: vec![PipelineName::from("ghost")],
            }],
            ..ConfigSnapshot::default()
        };
        let err = loader().preprocess_and_validate(&snapshot).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownPipelineInEnvironment { .. }
        ));
    }

    #[test]
    fn undefined_template_rejected() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                template: Some(TemplateName::from("ghost")),
                stages: vec![],
                ..pipeline("build")
            }],
            ..ConfigSnapshot::default()
        };
        let err = loader().preprocess_and_validate(&snapshot).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownTemplate { .. }));
    }

    #[test]
    fn unregistered_material_kind_rejected() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                materials: vec![Material {
                    kind: MaterialKind::from("package-repo"),
                    url: "repo".to_string(),
                }],
                ..pipeline("build")
            }],
            ..ConfigSnapshot::default()
        };
        let err = loader().preprocess_and_validate(&snapshot).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownMaterialKind { .. }));
    }

    #[test]
    fn plugin_registered_kind_accepted() {
        let mut registry = ElementRegistry::new();
        registry.register(MaterialKind::from("package-repo"));
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                materials: vec![Material {
                    kind: MaterialKind::from("package-repo"),
                    url: "repo".to_string(),
                }],
                ..pipeline("build")
            }],
            ..ConfigSnapshot::default()
        };
        ConfigLoader::new(registry)
            .preprocess_and_validate(&snapshot)
            .expect("valid with plugin kind");
    }

    #[test]
    fn pipeline_with_neither_stages_nor_template_rejected() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                stages: vec![],
                ..pipeline("build")
            }],
            ..ConfigSnapshot::default()
        };
        let err = loader().preprocess_and_validate(&snapshot).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyPipeline { .. }));
    }

    #[test]
    fn pipeline_with_both_stages_and_template_rejected() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                template: Some(TemplateName::from("tpl")),
                ..pipeline("build")
            }],
            templates: vec![PipelineTemplate {
                name: TemplateName::from("tpl"),
                stages: vec![stage("deploy")],
            }],
            ..ConfigSnapshot::default()
        };
        let err = loader().preprocess_and_validate(&snapshot).unwrap_err();
        assert!(matches!(err, ValidationError::StagesAndTemplate { .. }));
    }

    #[test]
    fn stage_without_jobs_rejected() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                stages: vec![Stage {
                    name: StageName::from("empty"),
                    jobs: vec![],
                }],
                ..pipeline("build")
            }],
            ..ConfigSnapshot::default()
        };
        let err = loader().preprocess_and_validate(&snapshot).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyStage { .. }));
    }
}
