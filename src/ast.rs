//! # MQL - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for MQL, a small
//! SQL-like language for filtering, projecting, and sampling streaming
//! JSON events.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[path]** - Field paths addressing values inside a document
//! - **[expressions]** - WHERE predicate nodes (literals, field refs, comparisons)
//! - **[operators]** - Comparison and logical operators
//! - **[sample]** - Sampling strategy descriptors
//! - **[query]** - The compiled query structure
//!
//! ## Quick Start
//!
//! ```text
//! select e['req']['url'], resp from stream where e['nqOrg'] == 'iosui'
//! ```
//!
//! This query keeps events whose `nqOrg` field equals `iosui` and projects
//! them down to the request URL and the `resp` field.
//!
//! ## Core Concepts
//!
//! ### Query Structure
//!
//! ```text
//! SELECT <fields> FROM stream [WINDOW <n>] [WHERE <predicate>]
//!     [GROUP BY <fields>] [SAMPLE <json-object>]
//! ```
//!
//! ### Field References
//!
//! - Bare identifiers address top-level keys: `resp`
//! - Bracket chains address nested values: `e['req']['url']`
//! - Integer segments index into lists: `e['commands'][1]`
//! - `[*]` matches any element, `[^'p']` matches keys with prefix `p`
//!
//! ### Compilation Contract
//!
//! A query is compiled once and evaluated many times. The whole tree is
//! immutable after parsing; all syntax problems (including malformed regex
//! literals and invalid sample descriptors) surface at compile time as
//! [`SyntaxError`](crate::error::SyntaxError), never at evaluation time.
pub mod tokens;
pub mod path;
pub mod expressions;
pub mod operators;
pub mod sample;
pub mod query;

pub use tokens::Token;
pub use path::{FieldPath, Segment};
pub use expressions::{Expr, Literal, RegexLiteral};
pub use operators::{CmpOp, LogicalOp};
pub use sample::{Sample, SAMPLE_DOMAIN};
pub use query::{Query, Selection};
