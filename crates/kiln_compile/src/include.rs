//! Include resolution and identity hashing.
//!
//! Includes are discovered by a lightweight scan of the leading
//! `include name;` statements, so a cache hit never runs a full parse. The
//! scan feeds both the identity hash (the flattened recipe content) and, on
//! a miss, the list of sources to actually parse and merge.

use kiln_common::ContentHash;
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_source::Span;
use std::collections::{HashMap, HashSet};

/// The capability to look include names up.
///
/// The compiler never touches the filesystem itself; whoever calls
/// [`compile`](crate::compile) decides what an include name means.
pub trait IncludeResolver {
    /// Returns the recipe source for a name, or `None` when unknown.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// A resolver backed by an in-memory name-to-source map.
#[derive(Default)]
pub struct MapResolver {
    sources: HashMap<String, String>,
}

impl MapResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source under a name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }
}

impl IncludeResolver for MapResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        self.sources.get(name).cloned()
    }
}

/// A resolver that knows no includes.
pub struct NoIncludes;

impl IncludeResolver for NoIncludes {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Scans the leading `include name;` statements of recipe source text.
///
/// Skips whitespace, `//` line comments, and nestable block comments. The
/// scan stops at the first token that does not continue an include
/// statement; malformed text is left for the full parse to report.
pub fn scan_includes(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut pos = 0;
    let mut names = Vec::new();
    loop {
        pos = skip_trivia(bytes, pos);
        let Some(after_kw) = eat_word(source, pos, "include") else {
            break;
        };
        pos = skip_trivia(bytes, after_kw);
        let name_start = pos;
        while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
            pos += 1;
        }
        if pos == name_start {
            break;
        }
        let name = &source[name_start..pos];
        pos = skip_trivia(bytes, pos);
        if pos >= bytes.len() || bytes[pos] != b';' {
            break;
        }
        pos += 1;
        names.push(name);
    }
    names
}

fn eat_word(source: &str, pos: usize, word: &str) -> Option<usize> {
    let end = pos + word.len();
    if source.get(pos..end) != Some(word) {
        return None;
    }
    // Keyword boundary: `includex` is an identifier, not a statement.
    match source.as_bytes().get(end) {
        Some(b) if b.is_ascii_alphanumeric() || *b == b'_' => None,
        _ => Some(end),
    }
}

fn skip_trivia(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos + 1 < bytes.len() && bytes[pos] == b'/' && bytes[pos + 1] == b'/' {
            pos += 2;
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }
        if pos + 1 < bytes.len() && bytes[pos] == b'/' && bytes[pos + 1] == b'*' {
            pos += 2;
            let mut depth = 1;
            while pos < bytes.len() && depth > 0 {
                if pos + 1 < bytes.len() && bytes[pos] == b'/' && bytes[pos + 1] == b'*' {
                    depth += 1;
                    pos += 2;
                } else if pos + 1 < bytes.len() && bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                    depth -= 1;
                    pos += 2;
                } else {
                    pos += 1;
                }
            }
            continue;
        }
        return pos;
    }
}

/// The flattened include closure of one entry recipe: `(name, source)`
/// pairs in depth-first preorder.
pub type IncludeClosure = Vec<(String, String)>;

/// Resolves the include closure of the entry source.
///
/// A missing include or a cycle is a fatal Include error: the closure is
/// `None` and the compile must not proceed. A file included along two
/// paths is resolved once.
pub fn resolve_closure(
    entry: &str,
    resolver: &dyn IncludeResolver,
    log: &Log,
) -> Option<IncludeClosure> {
    let mut out = Vec::new();
    let mut visiting = Vec::new();
    let mut visited = HashSet::new();
    let mut ok = true;
    for name in scan_includes(entry) {
        ok &= visit(name, resolver, &mut visiting, &mut visited, &mut out, log);
    }
    ok.then_some(out)
}

fn visit(
    name: &str,
    resolver: &dyn IncludeResolver,
    visiting: &mut Vec<String>,
    visited: &mut HashSet<String>,
    out: &mut IncludeClosure,
    log: &Log,
) -> bool {
    if visiting.iter().any(|n| n == name) {
        log.error(
            DiagnosticKind::Include,
            format!("include cycle through `{name}`"),
            Span::DUMMY,
        );
        return false;
    }
    if visited.contains(name) {
        return true;
    }
    let Some(source) = resolver.resolve(name) else {
        log.error(
            DiagnosticKind::Include,
            format!("include `{name}` not found"),
            Span::DUMMY,
        );
        return false;
    };
    visited.insert(name.to_string());
    out.push((name.to_string(), source.clone()));
    visiting.push(name.to_string());
    let mut ok = true;
    for dep in scan_includes(&source) {
        ok &= visit(dep, resolver, visiting, visited, out, log);
    }
    visiting.pop();
    ok
}

/// Hashes the flattened recipe content: the entry source plus every closure
/// file, each preceded by its resolved name so renames invalidate.
pub fn identity_hash(entry: &str, closure: &IncludeClosure) -> ContentHash {
    let mut buf = Vec::with_capacity(entry.len());
    buf.extend_from_slice(entry.as_bytes());
    for (name, source) in closure {
        buf.push(0);
        buf.extend_from_slice(name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(source.as_bytes());
    }
    ContentHash::from_bytes(&buf)
}
