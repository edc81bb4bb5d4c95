//! The compile pipeline.

use crate::include::{identity_hash, resolve_closure, IncludeResolver};
use crate::source_ast::SourceAst;
use kiln_cache::{CacheKey, CacheStore};
use kiln_common::{ContentHash, Interner};
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_elaborate::{resolve_root, validate};
use kiln_source::{SourceDb, Span};

/// Whether a compile ran the full pipeline or was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The stored artifact was reused; nothing was parsed.
    CacheHit,
    /// The parse/validate/encode pipeline ran.
    Recompiled,
}

/// The result of one compile attempt.
pub struct CompileResult {
    /// The binary artifact, present iff the log has no errors.
    pub binary: Option<Vec<u8>>,
    /// Whether the pipeline ran or the cache answered.
    pub outcome: CompileOutcome,
    /// Every diagnostic of this attempt.
    pub log: Log,
    /// The sources involved, for rendering diagnostic locations.
    pub sources: SourceDb,
}

impl CompileResult {
    /// Renders the log against this compile's sources.
    pub fn render_log(&self) -> String {
        self.log.render(&self.sources)
    }

    fn failed(log: Log, sources: SourceDb) -> Self {
        CompileResult {
            binary: None,
            outcome: CompileOutcome::Recompiled,
            log,
            sources,
        }
    }
}

/// Compiles a (recipe, data) pair into a binary artifact.
///
/// The cache is keyed on the flattened recipe identity and the data source
/// content: a hit returns the stored bytes without parsing anything. On a
/// miss the full pipeline runs and the store is updated only when the log
/// is error-free. A missing or cyclic include is fatal: no binary, store
/// untouched.
pub fn compile(
    recipe_source: &str,
    data_source: &str,
    includes: &dyn IncludeResolver,
    store: &dyn CacheStore,
) -> CompileResult {
    let log = Log::new();
    let mut sources = SourceDb::new();

    let Some(closure) = resolve_closure(recipe_source, includes, &log) else {
        return CompileResult::failed(log, sources);
    };
    let key = CacheKey::new(
        identity_hash(recipe_source, &closure),
        ContentHash::from_bytes(data_source.as_bytes()),
    );

    if let Some(bytes) = store.load(&key) {
        return CompileResult {
            binary: Some(bytes),
            outcome: CompileOutcome::CacheHit,
            log,
            sources,
        };
    }

    let interner = Interner::new();

    let recipe_file = sources.add_source("<recipe>", recipe_source.to_string());
    let mut entry = SourceAst::default();
    entry.set_recipe(kiln_recipe_parser::parse_recipe(
        recipe_source,
        recipe_file,
        &interner,
        &log,
    ));

    let mut included = Vec::with_capacity(closure.len());
    for (name, text) in &closure {
        let file = sources.add_source(name, text.clone());
        included.push(kiln_recipe_parser::parse_recipe(
            text, file, &interner, &log,
        ));
    }

    let data_file = sources.add_source("<data>", data_source.to_string());
    let mut data = SourceAst::default();
    data.set_data(kiln_data_parser::parse_data(
        data_source,
        data_file,
        &interner,
        &log,
    ));

    let include_roots: Vec<_> = included.iter().map(|r| &r.root).collect();
    let ty = resolve_root(&entry.recipe().root, &include_roots, &interner, &log);
    validate(data.data(), &ty, &interner, &log);

    if !log.good() {
        return CompileResult::failed(log, sources);
    }

    let binary = match kiln_codec::encode(data.data(), &ty, &interner) {
        Ok(bytes) => bytes,
        Err(e) => {
            // Validation admits everything the encoder consumes, so this is
            // unreachable for user input.
            log.error(
                DiagnosticKind::Shape,
                format!("encoding failed: {e}"),
                Span::DUMMY,
            );
            return CompileResult::failed(log, sources);
        }
    };

    if let Err(e) = store.store(&key, &binary) {
        log.warning(
            DiagnosticKind::Cache,
            format!("artifact not cached: {e}"),
            Span::DUMMY,
        );
    }

    CompileResult {
        binary: Some(binary),
        outcome: CompileOutcome::Recompiled,
        log,
        sources,
    }
}
