//! Migration checksums
//!
//! Recorded in `schema_version` when a migration is applied, so an edited
//! migration file is rejected instead of silently diverging from the store.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the migration SQL, with line endings normalized so a
/// checkout with CRLF endings hashes the same as one with LF
pub fn compute_checksum(sql: &str) -> String {
    let normalized = sql.replace("\r\n", "\n");
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_hex_sha256() {
        let checksum = compute_checksum("CREATE TABLE plans (id TEXT);");
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_checksum_ignores_line_endings() {
        assert_eq!(
            compute_checksum("CREATE TABLE a (id TEXT);\r\nCREATE TABLE b (id TEXT);"),
            compute_checksum("CREATE TABLE a (id TEXT);\nCREATE TABLE b (id TEXT);")
        );
    }

    #[test]
    fn test_edited_migration_changes_checksum() {
        assert_ne!(
            compute_checksum("ALTER TABLE plans ADD COLUMN summary TEXT;"),
            compute_checksum("ALTER TABLE plans ADD COLUMN summary TEXT NOT NULL;")
        );
    }
}
