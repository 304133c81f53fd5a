//! Repository list loading.
//!
//! The list is a plain text file with one repository path per line. Blank lines
//! and lines starting with `#` are ignored.

use crate::error::UpdateError;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads the repository list at `path`.
///
/// Fails with `ConfigMissing` if the file does not exist. An empty result is not an
/// error here; see [`require_entries`].
pub fn load_repository_list(path: &Path) -> Result<Vec<String>, UpdateError> {
    if !path.exists() {
        return Err(UpdateError::ConfigMissing {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| UpdateError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_repository_list(&content))
}

/// Splits list content into entries, keeping their order and duplicates.
///
/// A leading byte-order mark (editors on Windows add one) is ignored.
#[must_use]
pub fn parse_repository_list(content: &str) -> Vec<String> {
    content
        .strip_prefix(BYTE_ORDER_MARK)
        .unwrap_or(content)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Rejects a list with no usable entries.
pub fn require_entries(entries: Vec<String>, path: &Path) -> Result<Vec<String>, UpdateError> {
    if entries.is_empty() {
        return Err(UpdateError::ConfigEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_drops_comments_and_blank_lines() {
        let entries = parse_repository_list("/repos/a\n# comment\n\n/repos/b");
        assert_eq!(entries, vec!["/repos/a", "/repos/b"]);
    }

    #[test]
    fn test_parse_handles_crlf_and_surrounding_whitespace() {
        let entries = parse_repository_list("  /repos/a  \r\n\t# indented comment\r\n   \r\n/repos/b\r\n");
        assert_eq!(entries, vec!["/repos/a", "/repos/b"]);
    }

    #[test]
    fn test_parse_ignores_byte_order_mark() {
        let entries = parse_repository_list("\u{feff}# my repos\n/repos/a\n");
        assert_eq!(entries, vec!["/repos/a"]);

        let entries = parse_repository_list("\u{feff}/repos/a\r\n/repos/b\r\n");
        assert_eq!(entries, vec!["/repos/a", "/repos/b"]);
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let entries = parse_repository_list("/x\n/y\n/x\n");
        assert_eq!(entries, vec!["/x", "/y", "/x"]);
    }

    #[test]
    fn test_parse_keeps_hash_inside_path() {
        let entries = parse_repository_list("/repos/c#sharp\n");
        assert_eq!(entries, vec!["/repos/c#sharp"]);
    }

    #[test]
    fn test_load_missing_file_is_config_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repositories.txt");
        assert!(matches!(
            load_repository_list(&path),
            Err(UpdateError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn test_load_reads_file_contents() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("repositories.txt");
        std::fs::write(&path, "# my repos\n/repos/a\n\n/repos/b\n")?;

        assert_eq!(load_repository_list(&path)?, vec!["/repos/a", "/repos/b"]);
        Ok(())
    }

    #[test]
    fn test_require_entries_rejects_comment_only_list() {
        let path = Path::new("repositories.txt");
        let entries = parse_repository_list("# nothing here\n\n");
        assert!(matches!(
            require_entries(entries, path),
            Err(UpdateError::ConfigEmpty { .. })
        ));
        assert!(require_entries(vec!["/repos/a".to_string()], path).is_ok());
    }
}
