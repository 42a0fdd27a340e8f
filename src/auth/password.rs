use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the password's UTF-8 bytes.
///
/// Unsalted and single-round: equal passwords always produce equal digests,
/// which is what lets login look users up by digest.
pub fn hash_password(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}
