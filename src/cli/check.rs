use crate::cli::CliError;
use crate::Query;

/// Compile a query, surfacing any syntax error with its position.
///
/// Returns the compiled query so callers can inspect the parsed structure.
pub fn execute_check(query: &str) -> Result<Query, CliError> {
    Ok(crate::compile("cli", query)?)
}
