use crate::ast::{Expr, FieldPath, Sample};

/// The field list of a SELECT clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// `select *` — every top-level field
    All,
    /// Explicit ordered field list
    Paths(Vec<FieldPath>),
}

/// A compiled query.
///
/// Immutable once constructed; the unit of compilation and the unit cached
/// by superset-projector memoization. Safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Caller-supplied label (subscription id etc.), not parsed from text
    pub name: String,

    /// Raw source text, retained for cache keys and diagnostics
    pub text: String,

    /// SELECT field list
    pub select: Selection,

    /// Optional WINDOW size; opaque to the engine, passed through to the
    /// enclosing stream processor
    pub window: Option<u64>,

    /// Optional WHERE predicate; absent means "always true"
    pub where_clause: Option<Expr>,

    /// Optional GROUP BY field list
    pub group_by: Option<Vec<FieldPath>>,

    /// Optional SAMPLE descriptor
    pub sample: Option<Sample>,
}
