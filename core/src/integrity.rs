//! SHA-256 verification for downloaded artifacts.

use std::io::Read;
use std::path::Path;

use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("hash mismatch: expected {expected}, but found {actual}")]
    HashMismatch { expected: String, actual: String },
}

/// Stream `path` through SHA-256 and compare against `expected_hash`
/// (hex, case-insensitive).
pub fn verify_file_hash(path: &Path, expected_hash: &str) -> Result<(), VerificationError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }

    let actual = hex::encode(hasher.finalize());
    if actual.eq_ignore_ascii_case(expected_hash) {
        Ok(())
    } else {
        Err(VerificationError::HashMismatch {
            expected: expected_hash.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    // echo -n "hello world" | sha256sum
    const HELLO_WORLD_SHA256: &str =
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn temp_file_with(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents).expect("write");
        file
    }

    #[test]
    fn accepts_matching_hash_in_any_case() {
        let file = temp_file_with(b"hello world");
        verify_file_hash(file.path(), HELLO_WORLD_SHA256).expect("lowercase matches");
        verify_file_hash(file.path(), &HELLO_WORLD_SHA256.to_uppercase())
            .expect("uppercase matches");
    }

    #[test]
    fn reports_both_digests_on_mismatch() {
        let file = temp_file_with(b"tampered");
        let err = verify_file_hash(file.path(), HELLO_WORLD_SHA256).expect_err("must mismatch");
        match err {
            VerificationError::HashMismatch { expected, actual } => {
                assert_eq!(expected, HELLO_WORLD_SHA256);
                assert_ne!(actual, HELLO_WORLD_SHA256);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
