//! Opaque identifier for sources registered in a compile session.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a source registered in the [`SourceDb`](crate::SourceDb).
///
/// The entry recipe, every included recipe, and the data source each get a
/// unique `FileId`. These IDs appear in [`Span`](crate::Span) to associate
/// byte ranges with the source they came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// A dummy file ID used for synthetic spans (builtin types have no source).
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw `u32` value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` value of this `FileId`.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}
