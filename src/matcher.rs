//! WHERE predicate evaluation.
//!
//! Evaluation is a pure recursive descent over the immutable expression
//! tree. It never fails: absent fields, type mismatches, and out-of-range
//! indices all degrade to well-defined boolean outcomes so that a stream of
//! heterogeneous, partially-malformed documents never interrupts throughput.
//!
//! Coercion rules, per operator:
//!
//! - Equality compares numbers numerically (exact, decimal-backed), strings
//!   by string equality, booleans by boolean equality; mismatched types are
//!   unequal.
//! - Ordering requires both sides to be numbers; anything else is false.
//! - `==~` requires a string on the left and matches the pattern anywhere
//!   in it (substring search, never implicitly anchored).
//! - An absent operand makes the comparison false for every operator,
//!   including `!=` (the total absent-compares-false rule).

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::ast::{CmpOp, Expr, Literal, LogicalOp, Query, RegexLiteral, Segment};
use crate::value::Value;

/// Evaluate a compiled query's WHERE clause against a document.
///
/// Returns true unconditionally when the query has no WHERE clause.
pub fn matches(query: &Query, doc: &Value) -> bool {
    match &query.where_clause {
        None => true,
        Some(expr) => eval(expr, doc),
    }
}

fn eval(expr: &Expr, doc: &Value) -> bool {
    match expr {
        // && and || short-circuit left to right
        Expr::Logical {
            op: LogicalOp::And,
            left,
            right,
        } => eval(left, doc) && eval(right, doc),
        Expr::Logical {
            op: LogicalOp::Or,
            left,
            right,
        } => eval(left, doc) || eval(right, doc),
        Expr::Not(inner) => !eval(inner, doc),
        Expr::Comparison { op, left, right } => eval_comparison(*op, left, right, doc),
        // A bare literal or field reference is not a boolean predicate
        Expr::Literal(_) | Expr::FieldRef(_) => false,
    }
}

/// One side of a comparison: a literal, or the document values a field
/// path resolved to. An empty value list is the absent sentinel. A star or
/// prefix segment fans out to every matching value; the comparison holds
/// if it holds for any of them.
enum Operand<'a> {
    Literal(&'a Literal),
    Values(Vec<&'a Value>),
}

fn operand<'a>(expr: &'a Expr, doc: &'a Value) -> Option<Operand<'a>> {
    match expr {
        Expr::Literal(lit) => Some(Operand::Literal(lit)),
        Expr::FieldRef(path) => Some(Operand::Values(resolve_all(doc, &path.segments))),
        _ => None,
    }
}

pub(crate) fn resolve_all<'a>(value: &'a Value, segments: &[Segment]) -> Vec<&'a Value> {
    let Some((segment, rest)) = segments.split_first() else {
        return vec![value];
    };
    match segment {
        Segment::Star => match value {
            Value::Array(arr) => arr.iter().flat_map(|v| resolve_all(v, rest)).collect(),
            Value::Object(map) => map.values().flat_map(|v| resolve_all(v, rest)).collect(),
            _ => Vec::new(),
        },
        Segment::Prefix(prefix) => match value {
            Value::Object(map) => map
                .iter()
                .filter(|(k, _)| k.starts_with(prefix.as_str()))
                .flat_map(|(_, v)| resolve_all(v, rest))
                .collect(),
            _ => Vec::new(),
        },
        segment => value
            .get_segment(segment)
            .map(|v| resolve_all(v, rest))
            .unwrap_or_default(),
    }
}

fn eval_comparison(op: CmpOp, left: &Expr, right: &Expr, doc: &Value) -> bool {
    let (Some(left), Some(right)) = (operand(left, doc), operand(right, doc)) else {
        return false;
    };

    match (left, right) {
        (Operand::Literal(a), Operand::Literal(b)) => {
            compare(op, scalar_of_literal(a), scalar_of_literal(b))
        }
        (Operand::Literal(a), Operand::Values(values)) => values
            .iter()
            .any(|v| compare(op, scalar_of_literal(a), scalar_of_value(v))),
        (Operand::Values(values), Operand::Literal(b)) => values
            .iter()
            .any(|v| compare(op, scalar_of_value(v), scalar_of_literal(b))),
        (Operand::Values(lhs), Operand::Values(rhs)) => lhs
            .iter()
            .any(|l| rhs.iter().any(|r| compare(op, scalar_of_value(l), scalar_of_value(r)))),
    }
}

/// Tagged scalar view of an operand, the unit the coercion rules operate on.
enum Scalar<'a> {
    Number(Decimal),
    Str(&'a str),
    Bool(bool),
    Regex(&'a RegexLiteral),
    /// Null, containers, and non-finite numbers: present but never
    /// comparable to anything
    Other,
}

fn scalar_of_value(value: &Value) -> Scalar<'_> {
    match value {
        Value::Integer(n) => Decimal::from_i64(*n).map_or(Scalar::Other, Scalar::Number),
        Value::Float(n) => Decimal::from_f64(*n).map_or(Scalar::Other, Scalar::Number),
        Value::String(s) => Scalar::Str(s),
        Value::Boolean(b) => Scalar::Bool(*b),
        _ => Scalar::Other,
    }
}

fn scalar_of_literal(literal: &Literal) -> Scalar<'_> {
    match literal {
        Literal::Number(n) => Decimal::from_f64(*n).map_or(Scalar::Other, Scalar::Number),
        Literal::String(s) => Scalar::Str(s),
        Literal::Regex(r) => Scalar::Regex(r),
    }
}

fn compare(op: CmpOp, left: Scalar<'_>, right: Scalar<'_>) -> bool {
    match op {
        CmpOp::Equal => scalars_equal(&left, &right),
        CmpOp::NotEqual => !scalars_equal(&left, &right),
        CmpOp::LessThan => match (left, right) {
            (Scalar::Number(a), Scalar::Number(b)) => a < b,
            _ => false,
        },
        CmpOp::GreaterThan => match (left, right) {
            (Scalar::Number(a), Scalar::Number(b)) => a > b,
            _ => false,
        },
        CmpOp::LessEqual => match (left, right) {
            (Scalar::Number(a), Scalar::Number(b)) => a <= b,
            _ => false,
        },
        CmpOp::GreaterEqual => match (left, right) {
            (Scalar::Number(a), Scalar::Number(b)) => a >= b,
            _ => false,
        },
        CmpOp::RegexMatch => match (left, right) {
            (Scalar::Str(s), Scalar::Regex(r)) => r.regex.is_match(s),
            _ => false,
        },
    }
}

fn scalars_equal(left: &Scalar<'_>, right: &Scalar<'_>) -> bool {
    match (left, right) {
        (Scalar::Number(a), Scalar::Number(b)) => a == b,
        (Scalar::Str(a), Scalar::Str(b)) => a == b,
        (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
        _ => false,
    }
}
