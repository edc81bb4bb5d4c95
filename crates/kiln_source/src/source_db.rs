//! Database of all sources involved in one compile session.

use crate::file_id::FileId;
use crate::source_file::SourceFile;
use crate::span::Span;
use std::fmt;

/// The source database, owning all source text for one compile and
/// resolving [`FileId`] + byte offsets to line/column coordinates.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

/// A [`Span`] resolved to human-readable coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Logical name of the source.
    pub name: String,
    /// 1-indexed start line.
    pub line: u32,
    /// 1-indexed start column.
    pub col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.line, self.col)
    }
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Registers a source from an in-memory string and returns its [`FileId`].
    ///
    /// The `name` is the logical name used in diagnostics (an include name,
    /// or a synthetic name for the entry recipe and data sources).
    pub fn add_source(&mut self, name: impl Into<String>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name.into(), content));
        id
    }

    /// Returns the [`SourceFile`] for the given [`FileId`].
    ///
    /// # Panics
    ///
    /// Panics if the `FileId` is invalid.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Resolves a [`Span`] to a source name and line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (line, col) = file.line_col(span.start);
        ResolvedSpan {
            name: file.name.clone(),
            line,
            col,
        }
    }

    /// Returns the source text corresponding to a [`Span`].
    pub fn snippet(&self, span: Span) -> &str {
        let file = self.get_file(span.file);
        file.snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
