//! Stand-in files rebuilt from commit diffs
//!
//! The classifier only needs an extension and something that looks like the
//! code, so each change becomes `{index}{extension}` holding the lines the
//! diff touched.

use std::path::Path;

use compact_str::{CompactString, format_compact};

use crate::domain::FileChange;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticFile {
    pub path: CompactString,
    pub content: String,
    /// Position of the originating change in the analysed slice
    pub source: usize,
}

/// One synthetic file per change, named after its index
pub fn synthesize(files: &[FileChange]) -> Vec<SyntheticFile> {
    files
        .iter()
        .enumerate()
        .map(|(index, change)| SyntheticFile {
            path: synthetic_path(index, &change.path),
            content: synthetic_content(change),
            source: index,
        })
        .collect()
}

/// `src/lib.rs` at index 3 becomes `3.rs`; names without extension stay bare
pub fn synthetic_path(index: usize, original: &str) -> CompactString {
    match Path::new(original).extension() {
        Some(ext) => format_compact!("{}.{}", index, ext.to_string_lossy()),
        None => format_compact!("{}", index),
    }
}

/// Added and removed lines without their markers, or blank lines sized by the
/// change count when GitHub left the patch out
pub fn synthetic_content(change: &FileChange) -> String {
    match change.patch.as_deref() {
        Some(patch) if !patch.is_empty() => patch
            .split('\n')
            .filter(|line| line.starts_with('+') || line.starts_with('-'))
            .map(|line| &line[1..])
            .collect::<Vec<_>>()
            .join("\n"),
        _ => "\n".repeat(change.changes as usize),
    }
}
