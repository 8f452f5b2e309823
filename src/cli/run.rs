use std::io::Write;

use crate::cli::CliError;
use crate::output::{to_json, to_json_pretty};
use crate::value::Value;
use crate::{matches, project, sample};

/// Options for streaming documents through a query.
pub struct RunOptions {
    /// The query text to compile
    pub query: String,
    /// NDJSON input: one document per line
    pub input: String,
    /// Pretty-print projected documents
    pub pretty: bool,
}

/// Compile the query and run every input document through the full
/// pipeline: filter, sample, project. Projected documents for kept records
/// are written to `out`, one per line (one block per record when pretty).
pub fn execute_run(options: &RunOptions, out: &mut impl Write) -> Result<(), CliError> {
    let query = crate::compile("cli", &options.query)?;

    for line in options.input.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let doc: Value = serde_json::from_str::<serde_json::Value>(line)?.into();

        if !matches(&query, &doc) || !sample(&query, &doc) {
            continue;
        }

        let projected = project(&query, &doc);
        let rendered = if options.pretty {
            to_json_pretty(&projected)
        } else {
            to_json(&projected)
        };
        writeln!(out, "{}", rendered)?;
    }
    Ok(())
}
