//! Identifier pseudonymization
//!
//! Participant identifiers never leave the process in clear text. They are
//! replaced by the SHA-224 hex digest of the identifier, which is stable across
//! runs so that re-submissions of the same case produce the same reference.

use sha2::{Digest, Sha224};

/// Map a sensitive identifier to its stable pseudonymous token
pub fn hash_id(identifier: &str) -> String {
    let mut hasher = Sha224::new();
    hasher.update(identifier.as_bytes());
    format!("{:x}", hasher.finalize())
}
