// Cache module for the per-user LOC cache file.
// Record codec, on-disk store, and path derivation.

pub mod paths;
pub mod record;
pub mod store;

use sha2::{Digest, Sha256};

pub use paths::{cache_dir, cache_file_path};
pub use record::{CacheRecord, repo_hash};
pub use store::{CacheFile, CacheLock, CacheStore, PLACEHOLDER_COMMENT, validate_shape};

/// Lowercase hex SHA-256 of a string.
pub(crate) fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
