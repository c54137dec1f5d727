//! Process-wide cache of the last known-valid partial configuration set.
//!
//! Constructed once per server and injected wherever it is needed; all
//! mutation goes through [`FragmentCache::mark_valid`]. Readers tolerate
//! eventual consistency: a just-failed save leaves the previous set in place.

use std::sync::Mutex;

use regatta_core::types::PartialConfig;

use crate::error::CacheError;

/// Cache of the current valid fragment set.
pub trait FragmentCache {
    fn mark_valid(&self, fragments: &[PartialConfig]) -> Result<(), CacheError>;
}

// The cache is process-wide; hosts hold it behind an Arc and hand the same
// instance to the save flow and to readers.
impl<C: FragmentCache + ?Sized> FragmentCache for std::sync::Arc<C> {
    fn mark_valid(&self, fragments: &[PartialConfig]) -> Result<(), CacheError> {
        (**self).mark_valid(fragments)
    }
}

/// In-memory single-authority fragment cache.
#[derive(Debug, Default)]
pub struct CachedPartials {
    inner: Mutex<Vec<PartialConfig>>,
}

impl CachedPartials {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently validated fragment set, in the order it was saved.
    pub fn last_valid(&self) -> Result<Vec<PartialConfig>, CacheError> {
        let guard = self.inner.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(guard.clone())
    }
}

impl FragmentCache for CachedPartials {
    fn mark_valid(&self, fragments: &[PartialConfig]) -> Result<(), CacheError> {
        let mut guard = self.inner.lock().map_err(|_| CacheError::Poisoned)?;
        *guard = fragments
            .iter()
            .cloned()
            .map(|mut fragment| {
                fragment.is_valid = true;
                fragment
            })
            .collect();
        tracing::debug!("marked {} fragment(s) as valid", guard.len());
        Ok(())
    }
}
