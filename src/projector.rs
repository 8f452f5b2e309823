//! Projection: minimal-but-sufficient sub-documents.
//!
//! A query needs the union of its select, where, and group-by field paths
//! (the window value is not a field reference and contributes nothing).
//! Projection copies only the addressed sub-structure, preserving nesting:
//! selecting `e['req']['url']` yields `{"req": {"url": ...}}`. A list index
//! keeps its integer index as the key of a mapping at that level, so
//! `e['commands'][1]` projects to `{"commands": {"1": "b"}}` rather than a
//! trimmed list. Absent targets are silently omitted, and paths sharing a
//! prefix merge into one sub-document.

use std::collections::HashMap;

use crate::ast::{Expr, FieldPath, Query, Segment, Selection};
use crate::matcher::resolve_all;
use crate::value::Value;

/// The deduplicated union of field paths one or more queries require.
#[derive(Debug, Default)]
pub(crate) struct PathSet {
    all: bool,
    paths: Vec<FieldPath>,
}

impl PathSet {
    pub(crate) fn new() -> Self {
        PathSet::default()
    }

    /// Union in everything the query touches.
    pub(crate) fn add_query(&mut self, query: &Query) {
        match &query.select {
            Selection::All => self.all = true,
            Selection::Paths(paths) => {
                for path in paths {
                    self.add_path(path);
                }
            }
        }
        if let Some(expr) = &query.where_clause {
            self.add_expr(expr);
        }
        if let Some(paths) = &query.group_by {
            for path in paths {
                self.add_path(path);
            }
        }
    }

    fn add_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::FieldRef(path) => self.add_path(path),
            Expr::Comparison { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.add_expr(left);
                self.add_expr(right);
            }
            Expr::Not(inner) => self.add_expr(inner),
            Expr::Literal(_) => {}
        }
    }

    fn add_path(&mut self, path: &FieldPath) {
        if !path.is_empty() && !self.paths.contains(path) {
            self.paths.push(path.clone());
        }
    }

    /// Extract the sub-document covering every path in the set.
    pub(crate) fn project(&self, doc: &Value) -> Value {
        if self.all {
            // select * — the identity projection over top-level fields
            return doc.clone();
        }
        let mut result = HashMap::new();
        if matches!(doc, Value::Object(_)) {
            for path in &self.paths {
                insert_path(&mut result, doc, &path.segments);
            }
        }
        Value::Object(result)
    }
}

/// Project a document down to the fields a single query requires.
pub fn project(query: &Query, doc: &Value) -> Value {
    let mut paths = PathSet::new();
    paths.add_query(query);
    paths.project(doc)
}

fn insert_path(dest: &mut HashMap<String, Value>, src: &Value, segments: &[Segment]) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    match segment {
        Segment::Key(key) => {
            if let Some(child) = src.get_segment(segment) {
                place(dest, key.clone(), child, rest);
            }
        }
        Segment::Index(index) => {
            if let Some(child) = src.get_segment(segment) {
                place(dest, index.to_string(), child, rest);
            }
        }
        // A leading star addresses every top-level value
        Segment::Star => {
            if let Value::Object(map) = src {
                for (key, child) in map {
                    dest.insert(key.clone(), child.clone());
                }
            }
        }
        Segment::Prefix(prefix) => {
            if let Value::Object(map) = src {
                for (key, child) in map {
                    if key.starts_with(prefix.as_str()) {
                        place(dest, key.clone(), child, rest);
                    }
                }
            }
        }
    }
}

fn place(dest: &mut HashMap<String, Value>, key: String, child: &Value, rest: &[Segment]) {
    // A star below this point keeps the whole container, so any element the
    // remaining segments could address survives the projection.
    if rest.is_empty() || matches!(rest.first(), Some(Segment::Star)) {
        dest.insert(key, child.clone());
        return;
    }
    // Absent targets are omitted entirely, including intermediate levels
    if resolve_all(child, rest).is_empty() {
        return;
    }
    let entry = dest
        .entry(key)
        .or_insert_with(|| Value::Object(HashMap::new()));
    if let Value::Object(map) = entry {
        insert_path(map, child, rest);
    }
    // A non-object entry here is a whole-value clone of this src node made
    // for a shorter path, which already covers the remaining segments.
}
