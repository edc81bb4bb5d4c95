//! Cache keys.

use kiln_common::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one compiled artifact.
///
/// The recipe hash covers the flattened include closure, not just the entry
/// file, so an unchanged entry file whose included file changed produces a
/// different key and is correctly treated as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Identity hash of the flattened recipe.
    pub recipe: ContentHash,
    /// Content hash of the data source.
    pub data: ContentHash,
}

impl CacheKey {
    /// Builds a key from the two hashes.
    pub fn new(recipe: ContentHash, data: ContentHash) -> Self {
        Self { recipe, data }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.recipe, self.data)
    }
}
