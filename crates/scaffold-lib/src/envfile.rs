//! Flat `KEY=VALUE` env-file I/O.
//!
//! One entry per line. Lines starting with `#` and blank lines are
//! passed through untouched by writes and skipped by reads. The reader
//! does no unquoting: surrounding quotes on a value are preserved
//! literally.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Result, ScaffoldError};

/// Load all `KEY=VALUE` pairs from an env file.
///
/// Both sides of the first `=` are trimmed. Lines without `=`,
/// comments, and blank lines are skipped. Duplicate keys keep the
/// last occurrence.
///
/// # Errors
///
/// Returns `EnvFileRead` if the file cannot be opened or read.
pub fn load(path: &Path) -> Result<Vec<(String, String)>> {
    let file = fs::File::open(path).map_err(|e| ScaffoldError::EnvFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let mut pairs = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| ScaffoldError::EnvFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            pairs.push((key.to_string(), value.trim().to_string()));
        }
    }

    Ok(pairs)
}

/// Set or update a single key in an env file.
///
/// The first line whose trimmed content starts with `KEY=` is rewritten
/// in place; later lines for the same key are dropped so the file holds
/// exactly one line per key after the write. All other lines (pairs,
/// comments, blanks) pass through byte-for-byte. If the key is absent
/// it is appended. A missing file is created.
///
/// # Errors
///
/// Returns `InvalidKey` if the key is empty or contains `=` or
/// whitespace, `EnvFileRead`/`EnvFileWrite` on I/O failure.
pub fn set_key(path: &Path, key: &str, value: &str) -> Result<()> {
    validate_key(key)?;

    let mut lines: Vec<String> = Vec::new();
    let mut key_found = false;
    let prefix = format!("{key}=");

    if path.exists() {
        let file = fs::File::open(path).map_err(|e| ScaffoldError::EnvFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| ScaffoldError::EnvFileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            if line.trim().starts_with(&prefix) {
                if !key_found {
                    lines.push(format!("{key}={value}"));
                    key_found = true;
                }
                // Duplicate lines for the key are collapsed.
            } else {
                lines.push(line);
            }
        }
    }

    if !key_found {
        lines.push(format!("{key}={value}"));
    }

    let mut file = fs::File::create(path).map_err(|e| ScaffoldError::EnvFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    for line in &lines {
        writeln!(file, "{line}").map_err(|e| ScaffoldError::EnvFileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ScaffoldError::invalid_key(key, "key is empty"));
    }
    if key.contains('=') {
        return Err(ScaffoldError::invalid_key(key, "key contains '='"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(ScaffoldError::invalid_key(key, "key contains whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# header\n\nAPP_NAME=Demo\n  \nDEBUG=true\n").unwrap();

        let pairs = load(&path).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("APP_NAME".to_string(), "Demo".to_string()),
                ("DEBUG".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_splits_on_first_equals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "DATABASE_URL=postgres://u:p@host/db?x=1\n").unwrap();

        let pairs = load(&path).unwrap();
        assert_eq!(pairs[0].1, "postgres://u:p@host/db?x=1");
    }

    #[test]
    fn test_load_preserves_quotes_literally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "GREETING=\"hello world\"\n").unwrap();

        let pairs = load(&path).unwrap();
        assert_eq!(pairs[0].1, "\"hello world\"");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("/nonexistent/.env"));
        assert!(result.is_err());
    }

    #[test]
    fn test_set_key_appends_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "APP_NAME=Demo\n").unwrap();

        set_key(&path, "DEBUG", "true").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "APP_NAME=Demo\nDEBUG=true\n");
    }

    #[test]
    fn test_set_key_rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# note\nAPP_NAME=Old\n\nDEBUG=true\n").unwrap();

        set_key(&path, "APP_NAME", "New").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# note\nAPP_NAME=New\n\nDEBUG=true\n");
    }

    #[test]
    fn test_set_key_collapses_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "KEY=a\nKEY=b\n").unwrap();

        set_key(&path, "KEY", "c").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "KEY=c\n");
    }

    #[test]
    fn test_set_key_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        set_key(&path, "KEY", "value").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "KEY=value\n");
    }

    #[test]
    fn test_set_key_rejects_bad_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        assert!(set_key(&path, "", "v").is_err());
        assert!(set_key(&path, "A=B", "v").is_err());
        assert!(set_key(&path, "A B", "v").is_err());
    }

    #[test]
    fn test_set_key_repeated_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        for _ in 0..5 {
            set_key(&path, "WORKING_DIRECTORY", "/tmp/wd").unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let count = content
            .lines()
            .filter(|l| l.starts_with("WORKING_DIRECTORY="))
            .count();
        assert_eq!(count, 1);
    }
}
