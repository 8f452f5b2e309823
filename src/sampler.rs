//! Sampling: keep/drop decisions per document.
//!
//! RANDOM draws a fresh uniform value per evaluation (statistical sampling,
//! intentionally non-deterministic across calls). STICKY hashes the values
//! at the key paths, so every document sharing the same key values gets the
//! same decision — consistent sampling of one logical entity across a
//! distributed pipeline.

use rand::Rng;
use xxhash_rust::xxh64::xxh64;

use crate::ast::{FieldPath, Query, Sample, Segment, SAMPLE_DOMAIN};
use crate::output::to_json;
use crate::value::Value;

/// Evaluate a compiled query's sample clause against a document.
///
/// Returns true (keep) unconditionally when the query has no sample clause.
pub fn sample(query: &Query, doc: &Value) -> bool {
    match &query.sample {
        None => true,
        Some(sample) => evaluate(sample, doc),
    }
}

fn evaluate(sample: &Sample, doc: &Value) -> bool {
    match sample {
        Sample::Random { threshold } => {
            rand::thread_rng().gen_range(0.0..SAMPLE_DOMAIN) < *threshold
        }
        Sample::Sticky { keys, threshold } => sticky_bucket(keys, doc) < *threshold,
    }
}

/// Deterministic bucket in `0..SAMPLE_DOMAIN` for the document's key values.
fn sticky_bucket(keys: &[FieldPath], doc: &Value) -> f64 {
    let mut joined = String::new();
    for key in keys {
        if !joined.is_empty() {
            joined.push(':');
        }
        joined.push_str(&key_value_string(resolve(doc, key)));
    }
    (xxh64(joined.as_bytes(), 0) % SAMPLE_DOMAIN as u64) as f64
}

fn resolve<'a>(doc: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = doc;
    for segment in &path.segments {
        match segment {
            // Star and prefix segments never contribute to key extraction
            Segment::Star | Segment::Prefix(_) => return None,
            segment => current = current.get_segment(segment)?,
        }
    }
    Some(current)
}

/// Serialize one key value deterministically. Absent values coerce to the
/// fixed placeholder "null" so partially-populated documents still bucket
/// stably.
fn key_value_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Integer(n)) => n.to_string(),
        Some(Value::Float(n)) => n.to_string(),
        Some(Value::Boolean(b)) => b.to_string(),
        // to_json sorts object keys, so container keys serialize stably
        Some(other) => to_json(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sticky_bucket_is_deterministic() {
        let mut map = HashMap::new();
        map.insert("esn".to_string(), Value::String("NFANDROID-1".to_string()));
        let doc = Value::Object(map);
        let keys = vec![FieldPath::key("esn")];

        let first = sticky_bucket(&keys, &doc);
        let second = sticky_bucket(&keys, &doc);
        assert_eq!(first, second);
        assert!(first >= 0.0 && first < SAMPLE_DOMAIN);
    }

    #[test]
    fn test_absent_key_uses_placeholder() {
        let doc = Value::Object(HashMap::new());
        let keys = vec![FieldPath::key("esn")];
        assert_eq!(
            sticky_bucket(&keys, &doc),
            (xxh64(b"null", 0) % 1000) as f64
        );
    }
}
