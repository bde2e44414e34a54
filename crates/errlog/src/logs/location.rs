//! Source location and code snippet extraction.
//!
//! Runs once per new entry. A message ending in ` in <path> on line <N>` or
//! ` in <path>:<N>` gets its location split off and, best effort, a short
//! window of the referenced source file.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::conf::SnippetConfig;

/// Trailing location clause. The path must look absolute: a leading `/`,
/// a drive letter, or `zend`, optionally behind a `scheme://` prefix.
static LOCATION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<clause> in (?P<path>(?:[A-Za-z][A-Za-z0-9+.\-]*://)?(?:/|[A-Za-z]:[\\/]|zend)[^ :]*)(?: on line |:)(?P<line>\d+))$",
    )
    .expect("Invalid LOCATION_SUFFIX regex")
});

/// Longest source row kept in a snippet; the rest of the row is skipped.
const MAX_ROW_BYTES: usize = 1024;
/// Most bytes read from one source file while looking for the window.
const MAX_SCAN_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    pub line: u64,
    /// Message with the location clause removed
    pub core: String,
    /// `"<n>. <source line>"` rows joined by `\n`; empty when unreadable
    pub snippet: String,
}

/// Split the trailing location clause off `message`.
///
/// Returns `(path, line, core)`.
pub fn split_location(message: &str) -> Option<(String, u64, String)> {
    let caps = LOCATION_SUFFIX.captures(message)?;
    let line = caps["line"].parse().ok()?;
    let clause = caps.name("clause")?;
    Some((
        caps["path"].to_string(),
        line,
        message[..clause.start()].to_string(),
    ))
}

pub struct LocationExtractor {
    snippets_enabled: bool,
    lines_before: u64,
    lines_after: u64,
    virtual_prefixes: Vec<String>,
}

impl LocationExtractor {
    pub fn new(config: &SnippetConfig) -> Self {
        Self {
            snippets_enabled: config.enabled,
            lines_before: config.lines_before,
            lines_after: config.lines_after,
            virtual_prefixes: config.virtual_prefixes.clone(),
        }
    }

    /// Extract the location of `message`, reading the snippet if enabled.
    pub fn extract(&self, message: &str) -> Option<SourceLocation> {
        let (path, line, core) = split_location(message)?;
        let snippet = if self.snippets_enabled {
            self.read_snippet(&path, line)
        } else {
            String::new()
        };

        Some(SourceLocation {
            path,
            line,
            core,
            snippet,
        })
    }

    /// Read lines `[line - before, line + after]` of the file behind `path`.
    /// Any I/O failure yields an empty snippet.
    pub fn read_snippet(&self, path: &str, line: u64) -> String {
        let real_path = self.strip_virtual_prefix(path);
        match read_window(
            Path::new(real_path),
            line.saturating_sub(self.lines_before).max(1),
            line.saturating_add(self.lines_after),
        ) {
            Ok(rows) => rows.join("\n"),
            Err(e) => {
                tracing::debug!(path = real_path, error = %e, "snippet: source unreadable");
                String::new()
            }
        }
    }

    fn strip_virtual_prefix<'a>(&self, path: &'a str) -> &'a str {
        self.virtual_prefixes
            .iter()
            .find_map(|prefix| path.strip_prefix(prefix.as_str()))
            .unwrap_or(path)
    }
}

impl Default for LocationExtractor {
    fn default() -> Self {
        Self::new(&SnippetConfig::default())
    }
}

/// Numbered rows `first..=last` (1-based), clamped at end of file.
///
/// Only regular files are read, and at most [`MAX_SCAN_BYTES`] of them.
fn read_window(path: &Path, first: u64, last: u64) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    if !file.metadata()?.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }

    let mut reader = BufReader::new(file.take(MAX_SCAN_BYTES));
    let mut rows = Vec::new();
    let mut buf = Vec::new();
    let mut number = 0u64;

    while number < last {
        buf.clear();
        if read_row(&mut reader, &mut buf)? == 0 {
            break;
        }
        number += 1;
        if number >= first {
            let text = String::from_utf8_lossy(&buf);
            rows.push(format!("{}. {}", number, text.trim_end_matches(['\n', '\r'])));
        }
    }

    Ok(rows)
}

/// Read one row into `buf`, keeping at most [`MAX_ROW_BYTES`] of it and
/// discarding the remainder up to and including the newline.
fn read_row<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<usize> {
    let read = reader
        .by_ref()
        .take(MAX_ROW_BYTES as u64)
        .read_until(b'\n', buf)?;
    if read < MAX_ROW_BYTES || buf.last() == Some(&b'\n') {
        return Ok(read);
    }

    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                break;
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source_file(lines: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 1..=lines {
            writeln!(file, "line {}", i).unwrap();
        }
        file.flush().unwrap();
        file
    }

    // ─── Clause splitting ───────────────────────────────────────

    #[test]
    fn test_split_on_line_form() {
        let (path, line, core) =
            split_location("Undefined variable in /var/www/app.php on line 42").unwrap();
        assert_eq!(path, "/var/www/app.php");
        assert_eq!(line, 42);
        assert_eq!(core, "Undefined variable");
    }

    #[test]
    fn test_split_colon_form() {
        let (path, line, core) =
            split_location("Uncaught Error: Call to a member function x() on null in /srv/a/b.php:17")
                .unwrap();
        assert_eq!(path, "/srv/a/b.php");
        assert_eq!(line, 17);
        assert_eq!(core, "Uncaught Error: Call to a member function x() on null");
    }

    #[test]
    fn test_split_picks_trailing_clause() {
        let (path, line, core) =
            split_location("include(): Failed opening 'x' in /inc in /var/www/a.php on line 3")
                .unwrap();
        assert_eq!(path, "/var/www/a.php");
        assert_eq!(line, 3);
        assert_eq!(core, "include(): Failed opening 'x' in /inc");
    }

    #[test]
    fn test_split_virtual_and_windows_paths() {
        let (path, _, _) =
            split_location("Oops in zend.view:///var/www/v.phtml on line 9").unwrap();
        assert_eq!(path, "zend.view:///var/www/v.phtml");

        let (path, line, _) = split_location(r"Oops in C:\www\index.php:12").unwrap();
        assert_eq!(path, r"C:\www\index.php");
        assert_eq!(line, 12);
    }

    #[test]
    fn test_split_requires_absolute_path_and_suffix() {
        assert!(split_location("Undefined variable in app.php on line 42").is_none());
        assert!(split_location("Undefined variable in /var/www/app.php on line 42.").is_none());
        assert!(split_location("Database gone away").is_none());
    }

    // ─── Snippets ───────────────────────────────────────────────

    #[test]
    fn test_snippet_window_centered() {
        let file = source_file(20);
        let extractor = LocationExtractor::default();
        let snippet = extractor.read_snippet(file.path().to_str().unwrap(), 10);
        let rows: Vec<_> = snippet.lines().collect();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], "7. line 7");
        assert_eq!(rows[3], "10. line 10");
        assert_eq!(rows[6], "13. line 13");
    }

    #[test]
    fn test_snippet_clamped_at_edges() {
        let file = source_file(5);
        let extractor = LocationExtractor::default();

        let head = extractor.read_snippet(file.path().to_str().unwrap(), 1);
        assert_eq!(head, "1. line 1\n2. line 2\n3. line 3\n4. line 4");

        let tail = extractor.read_snippet(file.path().to_str().unwrap(), 5);
        assert_eq!(tail, "2. line 2\n3. line 3\n4. line 4\n5. line 5");
    }

    #[test]
    fn test_snippet_past_eof_empty() {
        let file = source_file(3);
        let extractor = LocationExtractor::default();
        assert_eq!(extractor.read_snippet(file.path().to_str().unwrap(), 50), "");
    }

    #[test]
    fn test_snippet_missing_file_empty() {
        let extractor = LocationExtractor::default();
        assert_eq!(extractor.read_snippet("/definitely/not/here.php", 3), "");
    }

    #[test]
    fn test_virtual_prefix_stripped() {
        let file = source_file(3);
        let extractor = LocationExtractor::default();
        let virtual_path = format!("zend.view://{}", file.path().display());
        assert_eq!(
            extractor.read_snippet(&virtual_path, 2),
            "1. line 1\n2. line 2\n3. line 3"
        );
    }

    #[test]
    fn test_extract_full() {
        let file = source_file(8);
        let extractor = LocationExtractor::default();
        let message = format!("Division by zero in {} on line 4", file.path().display());

        let location = extractor.extract(&message).unwrap();
        assert_eq!(location.line, 4);
        assert_eq!(location.core, "Division by zero");
        assert!(location.snippet.starts_with("1. line 1"));
        assert!(location.snippet.ends_with("7. line 7"));
    }

    #[test]
    fn test_extract_with_snippets_disabled() {
        let config = SnippetConfig {
            enabled: false,
            ..SnippetConfig::default()
        };
        let extractor = LocationExtractor::new(&config);
        let location = extractor.extract("x in /etc/hostname on line 1").unwrap();
        assert_eq!(location.snippet, "");
    }

    // ─── Non-source paths ───────────────────────────────────────

    #[cfg(unix)]
    #[test]
    fn test_device_path_yields_empty_snippet() {
        let extractor = LocationExtractor::default();
        let location = extractor
            .extract("WordPress database error x for query SELECT 1 in /dev/zero on line 3")
            .unwrap();
        assert_eq!(location.path, "/dev/zero");
        assert_eq!(location.snippet, "");
    }

    #[test]
    fn test_directory_path_yields_empty_snippet() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = LocationExtractor::default();
        assert_eq!(extractor.read_snippet(dir.path().to_str().unwrap(), 1), "");
    }

    #[test]
    fn test_long_row_truncated_and_numbering_kept() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", "a".repeat(MAX_ROW_BYTES * 5)).unwrap();
        writeln!(file, "second").unwrap();
        file.flush().unwrap();

        let extractor = LocationExtractor::default();
        let snippet = extractor.read_snippet(file.path().to_str().unwrap(), 2);
        let rows: Vec<_> = snippet.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], format!("1. {}", "a".repeat(MAX_ROW_BYTES)));
        assert_eq!(rows[1], "2. second");
    }

    #[test]
    fn test_file_without_newlines_is_bounded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("b".repeat(MAX_ROW_BYTES * 3).as_bytes()).unwrap();
        file.flush().unwrap();

        let extractor = LocationExtractor::default();
        let snippet = extractor.read_snippet(file.path().to_str().unwrap(), 1);
        assert_eq!(snippet, format!("1. {}", "b".repeat(MAX_ROW_BYTES)));
    }
}
