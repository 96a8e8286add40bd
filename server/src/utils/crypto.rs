//! Hashing helpers

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a string (migration checksums)
pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}
