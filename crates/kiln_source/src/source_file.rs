//! Single source with line-start indexing for line/column lookup.

use crate::file_id::FileId;
use kiln_common::ContentHash;

/// One source registered in a compile session.
///
/// Stores the text with precomputed line-start offsets for line/column
/// resolution during diagnostic rendering, plus a content hash used by the
/// cache for identity computation.
pub struct SourceFile {
    /// The unique identifier of this source within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// Logical name of this source: an include name, or a synthetic name
    /// like `<recipe>` / `<data>` for the entry sources.
    pub name: String,
    /// The full text content.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    /// Hash of the content, used in cache identity.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts and content hash.
    pub fn new(id: FileId, name: String, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        Self {
            id,
            name,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns a substring of the content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(FileId::from_raw(0), "<recipe>".to_string(), content.to_string())
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(4), (2, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn snippet_extraction() {
        let f = make_file("width: u32");
        assert_eq!(f.snippet(0, 5), "width");
        assert_eq!(f.snippet(7, 10), "u32");
    }

    #[test]
    fn empty_source() {
        let f = make_file("");
        assert_eq!(f.line_col(0), (1, 1));
    }

    #[test]
    fn content_hash_computed() {
        let f = make_file("width: u32");
        assert_eq!(f.content_hash, ContentHash::from_bytes(b"width: u32"));
    }
}
