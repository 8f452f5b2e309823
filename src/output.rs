//! JSON output serialization for projected documents.
//!
//! Output is deterministic (object keys are sorted), which matters in two
//! places: projected documents diff cleanly in tests and logs, and the
//! sticky sampler relies on stable serialization of container key values.
//!
//! # Examples
//!
//! ```
//! use mql::Value;
//! use mql::output::{to_json, to_json_pretty};
//!
//! let value = Value::Integer(42);
//!
//! // Compact output
//! assert_eq!(to_json(&value), "42");
//!
//! // Pretty output (identical for simple values)
//! assert_eq!(to_json_pretty(&value), "42");
//! ```

use crate::value::Value;

pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        self.print_value(value, 0)
    }

    fn print_value(&self, value: &Value, indent: usize) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => format!("\"{}\"", self.escape_string(s)),
            Value::Array(arr) => self.print_array(arr, indent),
            Value::Object(obj) => self.print_object(obj, indent),
        }
    }

    fn print_array(&self, arr: &[Value], indent: usize) -> String {
        if arr.is_empty() {
            return "[]".to_string();
        }

        if self.pretty {
            let mut result = "[\n".to_string();
            let items: Vec<String> = arr
                .iter()
                .map(|v| {
                    format!(
                        "{}{}",
                        self.indent(indent + 1),
                        self.print_value(v, indent + 1)
                    )
                })
                .collect();
            result.push_str(&items.join(",\n"));
            result.push('\n');
            result.push_str(&self.indent(indent));
            result.push(']');
            result
        } else {
            let items: Vec<String> = arr.iter().map(|v| self.print_value(v, indent)).collect();
            format!("[{}]", items.join(","))
        }
    }

    fn print_object(
        &self,
        obj: &std::collections::HashMap<String, Value>,
        indent: usize,
    ) -> String {
        if obj.is_empty() {
            return "{}".to_string();
        }

        // Sort keys for deterministic output
        let mut keys: Vec<_> = obj.keys().collect();
        keys.sort();

        if self.pretty {
            let mut result = "{\n".to_string();
            let items: Vec<String> = keys
                .iter()
                .map(|k| {
                    format!(
                        "{}\"{}\": {}",
                        self.indent(indent + 1),
                        self.escape_string(k),
                        self.print_value(&obj[*k], indent + 1)
                    )
                })
                .collect();
            result.push_str(&items.join(",\n"));
            result.push('\n');
            result.push_str(&self.indent(indent));
            result.push('}');
            result
        } else {
            let items: Vec<String> = keys
                .iter()
                .map(|k| {
                    format!(
                        "\"{}\":{}",
                        self.escape_string(k),
                        self.print_value(&obj[*k], indent)
                    )
                })
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }

    fn escape_string(&self, s: &str) -> String {
        s.chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                '\r' => vec!['\\', 'r'],
                '\t' => vec!['\\', 't'],
                c if c.is_control() => {
                    // Unicode escape for control chars
                    format!("\\u{:04x}", c as u32).chars().collect()
                }
                c => vec![c],
            })
            .collect()
    }
}

/// Converts a Value to a compact JSON string (no extra whitespace, sorted
/// object keys, proper escaping).
pub fn to_json(value: &Value) -> String {
    JsonPrinter::new(false).print(value)
}

/// Converts a Value to a pretty-printed JSON string with 2-space
/// indentation and sorted object keys.
pub fn to_json_pretty(value: &Value) -> String {
    JsonPrinter::new(true).print(value)
}
