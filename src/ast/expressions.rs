use regex::Regex;

use crate::ast::{CmpOp, FieldPath, LogicalOp};

/// A regex literal: the compiled pattern plus its source text.
///
/// The source text is retained for diagnostics and structural equality;
/// two queries compiled from identical text produce equal expression trees.
#[derive(Debug, Clone)]
pub struct RegexLiteral {
    pub pattern: String,
    pub regex: Regex,
}

impl PartialEq for RegexLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

/// Literal operand of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal
    ///
    /// # Examples
    /// ```text
    /// 15
    /// 450.0
    /// ```
    Number(f64),

    /// String literal
    ///
    /// # Examples
    /// ```text
    /// 'get'
    /// "pass"
    /// ```
    String(String),

    /// Regex literal, compiled at parse time
    ///
    /// # Examples
    /// ```text
    /// /htt/
    /// /^htt$/
    /// ```
    Regex(RegexLiteral),
}

/// Predicate tree node for a WHERE clause.
///
/// The tree is immutable after parsing; evaluation never mutates it. It is
/// owned exclusively by the [`Query`](crate::ast::Query) that contains it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Literal),

    /// Field reference, resolved against the document at match time
    ///
    /// # Examples
    /// ```text
    /// b
    /// e['req']['url']
    /// ```
    FieldRef(FieldPath),

    /// Comparison between two operands
    ///
    /// Typically a field reference against a literal, but either side may
    /// be any operand expression (symmetric forms like `10 < a` parse).
    Comparison {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Boolean connective; evaluation short-circuits left to right
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary negation (`not <expr>`)
    Not(Box<Expr>),
}
