//! Content fingerprinting for optimistic-concurrency checks.
//!
//! Fingerprints are SHA-256 hex digests of LF-normalized text, so the same
//! logical content produces the same fingerprint regardless of platform line
//! endings.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of `content` with CRLF normalized to LF.
pub fn fingerprint(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
