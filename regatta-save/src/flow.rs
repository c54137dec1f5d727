//! The full-config save flow.
//!
//! One save is a fixed sequence of fallible steps, each gating the next:
//!
//! 1. validate/resolve the candidate snapshot,
//! 2. render the *original* candidate and verify the document against the
//!    schema,
//! 3. append a revision record to the history,
//! 4. write the canonical config file,
//! 5. mark the fragment set as valid (best effort),
//! 6. attach the fragments to the resolved snapshot and return it.
//!
//! History-append always precedes the file write, which always precedes the
//! cache mark. The first failing step aborts the remainder; already-durable
//! steps are never rolled back (a failed file write after a successful
//! append leaves the history one revision ahead of the served file, to be
//! reconciled by the next successful save).

use regatta_codec::{
    ConfigDocument, ConfigLoader, ConfigWriter, SchemaError, ValidationError,
};
use regatta_core::{
    providers::{Clock, ProcessEnv, ProductVersion},
    types::{ConfigRevision, ConfigSnapshot, FullConfigUpdate, PartialConfig, Username},
};

use crate::error::SaveError;
use crate::file_store::ConfigFileStore;
use crate::partials::FragmentCache;
use crate::revision_store::RevisionStore;

/// Validation seam consumed by the flow.
pub trait LoadsConfig {
    fn preprocess_and_validate(
        &self,
        snapshot: &ConfigSnapshot,
    ) -> Result<ConfigSnapshot, ValidationError>;
}

impl LoadsConfig for ConfigLoader {
    fn preprocess_and_validate(
        &self,
        snapshot: &ConfigSnapshot,
    ) -> Result<ConfigSnapshot, ValidationError> {
        ConfigLoader::preprocess_and_validate(self, snapshot)
    }
}

/// Rendering seam consumed by the flow.
pub trait WritesConfig {
    fn render(&self, snapshot: &ConfigSnapshot) -> Result<ConfigDocument, SchemaError>;
    fn verify(&self, document: &ConfigDocument) -> Result<(), SchemaError>;
    fn serialize(&self, document: &ConfigDocument) -> Result<String, SchemaError>;
}

impl WritesConfig for ConfigWriter {
    fn render(&self, snapshot: &ConfigSnapshot) -> Result<ConfigDocument, SchemaError> {
        ConfigWriter::render(self, snapshot)
    }

    fn verify(&self, document: &ConfigDocument) -> Result<(), SchemaError> {
        ConfigWriter::verify(self, document)
    }

    fn serialize(&self, document: &ConfigDocument) -> Result<String, SchemaError> {
        ConfigWriter::serialize(self, document)
    }
}

/// Orchestrates one full-config save across loader, writer, history, file
/// store, and fragment cache.
///
/// All collaborators are supplied at construction; the flow owns none of the
/// stores' lifecycles beyond a single [`SaveFlow::execute`] call.
pub struct SaveFlow {
    loader: Box<dyn LoadsConfig>,
    writer: Box<dyn WritesConfig>,
    revisions: Box<dyn RevisionStore>,
    file_store: Box<dyn ConfigFileStore>,
    cache: Box<dyn FragmentCache>,
    version: Box<dyn ProductVersion>,
    clock: Box<dyn Clock>,
    env: Box<dyn ProcessEnv>,
}

/// When set truthy in the process environment, every successful save emits
/// an info-level audit line naming the actor and base fingerprint.
pub const AUDIT_SAVES_FLAG: &str = "REGATTA_AUDIT_SAVES";

impl SaveFlow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        loader: Box<dyn LoadsConfig>,
        writer: Box<dyn WritesConfig>,
        revisions: Box<dyn RevisionStore>,
        file_store: Box<dyn ConfigFileStore>,
        cache: Box<dyn FragmentCache>,
        version: Box<dyn ProductVersion>,
        clock: Box<dyn Clock>,
        env: Box<dyn ProcessEnv>,
    ) -> Self {
        Self {
            loader,
            writer,
            revisions,
            file_store,
            cache,
            version,
            clock,
            env,
        }
    }

    /// Run one save and return the resolved snapshot with `partials`
    /// attached, or the typed failure of the first step that refused.
    ///
    /// Blocking call: the history append and file write run back to back on
    /// the calling thread. The caller must serialize saves against a given
    /// configuration root; the flow itself does not lock across calls.
    pub fn execute(
        &self,
        command: &FullConfigUpdate,
        partials: &[PartialConfig],
        user: Option<Username>,
    ) -> Result<ConfigSnapshot, SaveError> {
        let candidate = command.config();

        let mut resolved = self.loader.preprocess_and_validate(candidate)?;

        // Render the original candidate, not the resolved copy: the served
        // file records what the caller edited, with template references
        // intact.
        let document = self.writer.render(candidate)?;
        self.writer.verify(&document)?;
        let content = self.writer.serialize(&document)?;

        let revision = ConfigRevision {
            content: content.clone(),
            username: user,
            fingerprint: candidate.fingerprint.clone(),
            product_version: self.version.version(),
            time: self.clock.now(),
        };
        self.revisions.append(&revision)?;

        self.file_store.write(&content)?;

        if let Err(err) = self.cache.mark_valid(partials) {
            tracing::warn!("fragment cache update failed after successful save: {err}");
        }

        if self.env.flag(AUDIT_SAVES_FLAG) {
            let actor = revision
                .username
                .as_ref()
                .map(|u| u.0.as_str())
                .unwrap_or("<system>");
            tracing::info!(
                "full config saved by {actor} against fingerprint {}",
                revision.fingerprint
            );
        }

        resolved.attach_partials(partials);
        Ok(resolved)
    }
}
