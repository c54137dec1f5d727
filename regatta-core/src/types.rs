//! Domain types for the Regatta configuration model.
//!
//! All types are serializable/deserializable via serde; the canonical config
//! document and the revision records are both projections of these structs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineName(pub String);

impl fmt::Display for PipelineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PipelineName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PipelineName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed name for an environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentName(pub String);

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EnvironmentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EnvironmentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed name for a pipeline template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateName(pub String);

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TemplateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TemplateName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed name for a stage within a pipeline or template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageName(pub String);

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for StageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StageName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The origin of a partial configuration fragment (e.g. a config repository
/// URL or a plugin identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentSource(pub String);

impl fmt::Display for FragmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FragmentSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FragmentSource {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The acting user behind a save. Saves without one are system-initiated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(pub String);

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The element kind of a pipeline material (`git`, `hg`, or a
/// plugin-contributed kind). Which kinds are recognized is decided by the
/// [`crate::registry::ElementRegistry`], not hard-coded here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialKind(pub String);

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for MaterialKind {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MaterialKind {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A source of changes a pipeline builds from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub kind: MaterialKind,
    pub url: String,
}

/// A stage: a named, ordered group of jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: StageName,
    pub jobs: Vec<String>,
}

/// A delivery pipeline. A pipeline either defines its stages inline or
/// references a [`PipelineTemplate`]; the loader resolves template references
/// into concrete stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: PipelineName,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateName>,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

/// A reusable stage sequence that pipelines can reference by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTemplate {
    pub name: TemplateName,
    pub stages: Vec<Stage>,
}

/// A named group of pipelines sharing deployment context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: EnvironmentName,
    #[serde(default)]
    pub pipelines: Vec<PipelineName>,
}

/// An independently sourced unit of configuration contributed from outside
/// the canonical file (e.g. by an external config repository).
///
/// Fragments are validated as a set during a save and are never mutated by
/// the save pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialConfig {
    pub source: FragmentSource,
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
    #[serde(default)]
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub is_valid: bool,
}

/// The complete in-memory configuration of a server at one point in time.
///
/// `fingerprint` is the checksum of the last known-persisted state the
/// snapshot was edited from; `partials` is the ordered fragment sequence
/// attached to the merged view (order is caller-significant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
    #[serde(default)]
    pub templates: Vec<PipelineTemplate>,
    #[serde(default)]
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub partials: Vec<PartialConfig>,
}

impl ConfigSnapshot {
    /// Replace the attached fragment sequence, preserving `fragments` order.
    pub fn attach_partials(&mut self, fragments: &[PartialConfig]) {
        self.partials = fragments.to_vec();
    }

    /// Look up a pipeline by name.
    pub fn pipeline(&self, name: &PipelineName) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| &p.name == name)
    }

    /// Look up a template by name.
    pub fn template(&self, name: &TemplateName) -> Option<&PipelineTemplate> {
        self.templates.iter().find(|t| &t.name == name)
    }
}

/// An immutable record of one successfully saved snapshot, appended to the
/// version history. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRevision {
    /// The exact text written to the served config file.
    pub content: String,
    /// Acting user; `None` denotes a system-initiated or anonymous save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<Username>,
    /// Fingerprint of the candidate snapshot the save was initiated against.
    pub fingerprint: String,
    pub product_version: String,
    pub time: DateTime<Utc>,
}

/// The save command: an edited snapshot plus the fingerprint of the base it
/// was edited from (the caller's optimistic-concurrency assertion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullConfigUpdate {
    config: ConfigSnapshot,
}

impl FullConfigUpdate {
    /// Stamp `fingerprint` onto the candidate and wrap it as a save command.
    pub fn new(mut config: ConfigSnapshot, fingerprint: impl Into<String>) -> Self {
        config.fingerprint = fingerprint.into();
        Self { config }
    }

    /// The candidate snapshot being saved.
    pub fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    /// The asserted base fingerprint.
    pub fn fingerprint(&self) -> &str {
        &self.config.fingerprint
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(PipelineName::from("build").to_string(), "build");
        assert_eq!(EnvironmentName::from("uat").to_string(), "uat");
        assert_eq!(Username::from("alice").to_string(), "alice");
    }

    #[test]
    fn newtype_equality() {
        let a = PipelineName::from("x");
        let b = PipelineName::from(String::from("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let snapshot = ConfigSnapshot {
            pipelines: vec![Pipeline {
                name: PipelineName::from("build"),
                materials: vec![Material {
                    kind: MaterialKind::from("git"),
                    url: "https://example.com/repo.git".to_string(),
                }],
                template: None,
                stages: vec![Stage {
                    name: StageName::from("compile"),
                    jobs: vec!["cargo".to_string()],
                }],
            }],
            templates: vec![],
            environments: vec![Environment {
                name: EnvironmentName::from("uat"),
                pipelines: vec![PipelineName::from("build")],
            }],
            fingerprint: "abc".to_string(),
            partials: vec![],
        };
        let yaml = serde_yaml::to_string(&snapshot).expect("serialize");
        let back: ConfigSnapshot = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(back, snapshot);
    }

    #[test]
    fn attach_partials_preserves_order() {
        let fragments = vec![
            PartialConfig {
                source: FragmentSource::from("repo-b"),
                pipelines: vec![],
                environments: vec![],
                is_valid: false,
            },
            PartialConfig {
                source: FragmentSource::from("repo-a"),
                pipelines: vec![],
                environments: vec![],
                is_valid: false,
            },
        ];
        let mut snapshot = ConfigSnapshot::default();
        snapshot.attach_partials(&fragments);
        assert_eq!(snapshot.partials, fragments);
    }

    #[test]
    fn update_command_stamps_fingerprint_on_candidate() {
        let command = FullConfigUpdate::new(ConfigSnapshot::default(), "md5");
        assert_eq!(command.fingerprint(), "md5");
        assert_eq!(command.config().fingerprint, "md5");
    }

    #[test]
    fn revision_serde_omits_absent_username() {
        let revision = ConfigRevision {
            content: "text".to_string(),
            username: None,
            fingerprint: "md5".to_string(),
            product_version: "16.13.0".to_string(),
            time: Utc::now(),
        };
        let yaml = serde_yaml::to_string(&revision).expect("serialize");
        assert!(!yaml.contains("username"));
    }
}
