//! # regatta-save
//!
//! Persistence of a server's full configuration across three coupled stores:
//! the canonical served file, the append-only revision history, and the
//! in-memory partial-config cache.
//!
//! [`SaveFlow::execute`] is the single save entrypoint; everything else in
//! this crate exists to be wired into it.

pub mod error;
pub mod file_store;
pub mod flow;
pub mod partials;
pub mod revision_store;

pub use error::{CacheError, HistoryError, PersistError, SaveError};
pub use file_store::{AtomicFileStore, ConfigFileStore};
pub use flow::{LoadsConfig, SaveFlow, WritesConfig, AUDIT_SAVES_FLAG};
pub use partials::{CachedPartials, FragmentCache};
pub use revision_store::{FileRevisionStore, RevisionStore};
