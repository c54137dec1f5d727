//! Structural schema rules for the canonical config document.
//!
//! The rules operate on the YAML document, not the domain types, so a
//! malformed document is caught regardless of how it was produced.

use serde_yaml::Value;

use crate::error::SchemaError;

fn violation(location: impl Into<String>, message: impl Into<String>) -> SchemaError {
    SchemaError::Violation {
        location: location.into(),
        message: message.into(),
    }
}

/// Verify `document` against the canonical config schema.
pub fn verify_document(document: &Value) -> Result<(), SchemaError> {
    if document.as_mapping().is_none() {
        return Err(violation("$", "document root must be a mapping"));
    }

    for key in ["pipelines", "templates", "environments"] {
        if document.get(key).is_none() {
            return Err(violation("$", format!("missing required key `{key}`")));
        }
    }

    let pipelines = require_sequence(document, "pipelines")?;
    for (i, entry) in pipelines.iter().enumerate() {
        verify_pipeline(entry, &format!("pipelines[{i}]"))?;
    }

    let templates = require_sequence(document, "templates")?;
    for (i, entry) in templates.iter().enumerate() {
        let location = format!("templates[{i}]");
        require_string(entry, "name", &location)?;
        let stages = entry
            .get("stages")
            .and_then(Value::as_sequence)
            .ok_or_else(|| violation(&location, "`stages` must be a sequence"))?;
        for (j, stage) in stages.iter().enumerate() {
            verify_stage(stage, &format!("{location}.stages[{j}]"))?;
        }
    }

    let environments = require_sequence(document, "environments")?;
    for (i, entry) in environments.iter().enumerate() {
        let location = format!("environments[{i}]");
        require_string(entry, "name", &location)?;
        let members = entry
            .get("pipelines")
            .and_then(Value::as_sequence)
            .ok_or_else(|| violation(&location, "`pipelines` must be a sequence"))?;
        for (j, member) in members.iter().enumerate() {
            if !member.is_string() {
                return Err(violation(
                    format!("{location}.pipelines[{j}]"),
                    "pipeline reference must be a string",
                ));
            }
        }
    }

    Ok(())
}

fn verify_pipeline(entry: &Value, location: &str) -> Result<(), SchemaError> {
    require_string(entry, "name", location)?;

    let materials = entry
        .get("materials")
        .and_then(Value::as_sequence)
        .ok_or_else(|| violation(location, "`materials` must be a sequence"))?;
    for (j, material) in materials.iter().enumerate() {
        let material_location = format!("{location}.materials[{j}]");
        require_string(material, "kind", &material_location)?;
        require_string(material, "url", &material_location)?;
    }

    if let Some(template) = entry.get("template") {
        if !template.is_string() {
            return Err(violation(location, "`template` must be a string"));
        }
    }

    let stages = entry
        .get("stages")
        .and_then(Value::as_sequence)
        .ok_or_else(|| violation(location, "`stages` must be a sequence"))?;
    for (j, stage) in stages.iter().enumerate() {
        verify_stage(stage, &format!("{location}.stages[{j}]"))?;
    }

    Ok(())
}

fn verify_stage(entry: &Value, location: &str) -> Result<(), SchemaError> {
    require_string(entry, "name", location)?;
    let jobs = entry
        .get("jobs")
        .and_then(Value::as_sequence)
        .ok_or_else(|| violation(location, "`jobs` must be a sequence"))?;
    for (j, job) in jobs.iter().enumerate() {
        if !job.is_string() {
            return Err(violation(
                format!("{location}.jobs[{j}]"),
                "job must be a string",
            ));
        }
    }
    Ok(())
}

fn require_sequence<'a>(
    document: &'a Value,
    key: &str,
) -> Result<&'a Vec<Value>, SchemaError> {
    document
        .get(key)
        .and_then(Value::as_sequence)
        .ok_or_else(|| violation("$", format!("`{key}` must be a sequence")))
}

fn require_string(entry: &Value, key: &str, location: &str) -> Result<(), SchemaError> {
    match entry.get(key) {
        Some(value) if value.is_string() => Ok(()),
        Some(_) => Err(violation(location, format!("`{key}` must be a string"))),
        None => Err(violation(location, format!("missing required key `{key}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).expect("parse test yaml")
    }

    #[test]
    fn minimal_valid_document() {
        let document = parse("pipelines: []\ntemplates: []\nenvironments: []\n");
        verify_document(&document).expect("valid");
    }

    #[test]
    fn missing_top_level_key_rejected() {
        let document = parse("pipelines: []\ntemplates: []\n");
        let err = verify_document(&document).unwrap_err();
        assert!(err.to_string().contains("environments"));
    }

    #[test]
    fn non_mapping_root_rejected() {
        let document = parse("- a\n- b\n");
        let err = verify_document(&document).unwrap_err();
        assert!(err.to_string().contains("mapping"));
    }

    #[test]
    fn pipeline_without_name_rejected() {
        let document = parse(
            "pipelines:\n- materials: []\n  stages: []\ntemplates: []\nenvironments: []\n",
        );
        let err = verify_document(&document).unwrap_err();
        assert!(err.to_string().contains("pipelines[0]"));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn material_without_url_rejected() {
        let document = parse(
            "pipelines:\n- name: build\n  materials:\n  - kind: git\n  stages: []\ntemplates: []\nenvironments: []\n",
        );
        let err = verify_document(&document).unwrap_err();
        assert!(err.to_string().contains("materials[0]"));
    }

    #[test]
    fn stage_with_non_string_job_rejected() {
        let document = parse(
            "pipelines:\n- name: build\n  materials: []\n  stages:\n  - name: compile\n    jobs:\n    - 42\ntemplates: []\nenvironments: []\n",
        );
        let err = verify_document(&document).unwrap_err();
        assert!(err.to_string().contains("jobs[0]"));
    }

    #[test]
    fn environment_with_non_string_reference_rejected() {
        let document = parse(
            "pipelines: []\ntemplates: []\nenvironments:\n- name: uat\n  pipelines:\n  - {bad: ref}\n",
        );
        let err = verify_document(&document).unwrap_err();
        assert!(err.to_string().contains("environments[0]"));
    }
}
