//! Frequency-ranked reference lists for the difficulty tiers.
//!
//! Each non-empty line contributes its first Han code point, so a plain
//! one-character-per-line list and a ranked report written by this crate
//! (text or CSV) both load the same way.

use crate::scan::is_qualifying;
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

pub fn load_ranked_list(path: impl AsRef<Path>) -> Result<Vec<char>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open reference list: {}", path.display()))?;
    let ranked = parse_ranked_list(BufReader::new(file))
        .with_context(|| format!("Failed to read reference list: {}", path.display()))?;
    info!(entries = ranked.len(), path = %path.display(), "Reference list loaded");
    Ok(ranked)
}

/// Later duplicates are ignored; rank is the first appearance.
pub fn parse_ranked_list<R: BufRead>(reader: R) -> Result<Vec<char>> {
    let mut seen = FxHashSet::default();
    let mut ranked = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(c) = line.chars().find(|&c| is_qualifying(c)) {
            if seen.insert(c) {
                ranked.push(c);
            }
        }
    }
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn plain_list() {
        let ranked = parse_ranked_list("的\n一\n\n是\n".as_bytes()).unwrap();
        assert_eq!(ranked, vec!['的', '一', '是']);
    }

    #[test]
    fn text_report_lines() {
        let report = "    0 7684 的 120\n    1 4E00 一 80\n";
        let ranked = parse_ranked_list(report.as_bytes()).unwrap();
        assert_eq!(ranked, vec!['的', '一']);
    }

    #[test]
    fn csv_report_with_header() {
        let report = "rank,codepoint,glyph,count\n0,7684,的,120\n1,4E00,一,80\n";
        let ranked = parse_ranked_list(report.as_bytes()).unwrap();
        assert_eq!(ranked, vec!['的', '一']);
    }

    #[test]
    fn duplicates_keep_first_rank() {
        let ranked = parse_ranked_list("的\n一\n的\n".as_bytes()).unwrap();
        assert_eq!(ranked, vec!['的', '一']);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "人\n大").unwrap();
        let ranked = load_ranked_list(tmp.path()).unwrap();
        assert_eq!(ranked, vec!['人', '大']);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load_ranked_list("/nonexistent/reference.txt").is_err());
    }
}
