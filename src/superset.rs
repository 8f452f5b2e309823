//! Superset projection across multiple queries.
//!
//! In a high-throughput pipeline many downstream queries share overlapping
//! field needs; computing one superset projection per incoming document
//! (instead of one projection per query) is the main performance lever of
//! this module. The memoized variant caches built projectors process-wide,
//! keyed by the set of contributing query texts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::ast::Query;
use crate::error::SyntaxError;
use crate::projector::PathSet;
use crate::value::Value;

/// A combined projector for the unioned field needs of several queries.
///
/// Immutable once built; safe to share across threads.
#[derive(Debug)]
pub struct SupersetProjector {
    paths: PathSet,
}

impl SupersetProjector {
    pub fn new(queries: &[Query]) -> Self {
        let mut paths = PathSet::new();
        for query in queries {
            paths.add_query(query);
        }
        SupersetProjector { paths }
    }

    /// Produce one merged projection containing every field path any of the
    /// source queries requires.
    pub fn project(&self, doc: &Value) -> Value {
        self.paths.project(doc)
    }
}

/// Build a combined projector from already-compiled queries.
pub fn make_superset_projector(queries: &[Query]) -> SupersetProjector {
    SupersetProjector::new(queries)
}

// Entries live for the process lifetime; callers are expected to request a
// bounded number of distinct combinations. clear_superset_cache() exists
// for deployments that need to bound it explicitly.
static CACHE: OnceLock<Mutex<HashMap<String, Arc<SupersetProjector>>>> = OnceLock::new();

fn cache() -> &'static Mutex<HashMap<String, Arc<SupersetProjector>>> {
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Build a combined projector from raw query texts, reusing a previously
/// built projector when the same set of texts has been seen before.
///
/// The cache key is order-insensitive: the union of required fields does
/// not depend on the order the queries are listed in.
pub fn make_superset_projector_memoized(
    texts: &[&str],
) -> Result<Arc<SupersetProjector>, SyntaxError> {
    let mut sorted: Vec<&str> = texts.to_vec();
    sorted.sort_unstable();
    let key = sorted.join("\u{1}");

    // The build happens under the lock so concurrent first-time requests
    // for the same combination cannot race to insert duplicate entries.
    let mut entries = cache().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(projector) = entries.get(&key) {
        return Ok(Arc::clone(projector));
    }

    let queries = texts
        .iter()
        .enumerate()
        .map(|(i, text)| crate::compile(&format!("superset-{}", i), text))
        .collect::<Result<Vec<_>, _>>()?;

    let projector = Arc::new(SupersetProjector::new(&queries));
    entries.insert(key, Arc::clone(&projector));
    Ok(projector)
}

/// Drop every cached projector. Intended for long-running services that
/// need to bound the cache, and for tests.
pub fn clear_superset_cache() {
    cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
