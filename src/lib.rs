//! MQL: a compiled query engine for filtering, projecting, and sampling
//! streaming JSON events.
//!
//! A query is compiled once with [`compile`] and then evaluated repeatedly:
//! [`matches`] decides inclusion, [`project`] derives a minimal sub-document
//! of the fields the query touches, and [`sample`] applies the query's
//! sampling policy. Multi-query pipelines build one combined projector with
//! [`make_superset_projector_memoized`] and reuse it across all documents.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod projector;
pub mod sampler;
pub mod superset;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{
    CmpOp, Expr, FieldPath, Literal, LogicalOp, Query, Sample, Segment, Selection, Token,
    SAMPLE_DOMAIN,
};
pub use error::SyntaxError;
pub use lexer::Lexer;
pub use matcher::matches;
pub use output::{to_json, to_json_pretty};
pub use parser::Parser;
pub use projector::project;
pub use sampler::sample;
pub use superset::{
    clear_superset_cache, make_superset_projector, make_superset_projector_memoized,
    SupersetProjector,
};
pub use value::Value;

/// Compile query text into a reusable [`Query`].
///
/// The name is a caller-supplied label (a subscription id, typically) used
/// for diagnostics; it is not parsed from the text.
pub fn compile(name: &str, text: &str) -> Result<Query, SyntaxError> {
    let mut parser = Parser::new(Lexer::new(text))?;
    parser.parse_query(name, text)
}
