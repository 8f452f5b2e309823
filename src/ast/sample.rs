use crate::ast::FieldPath;

/// Upper bound of the sampling domain: thresholds, random draws, and sticky
/// hashes all live in `0..1000`.
pub const SAMPLE_DOMAIN: f64 = 1000.0;

/// Sampling strategy descriptor, parsed from the `sample {...}` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// Statistical sampling: a fresh uniform draw per evaluation, kept iff
    /// the draw falls below the threshold. Intentionally non-deterministic
    /// across repeated calls on the same document.
    ///
    /// # Examples
    /// ```text
    /// sample {"strategy": "RANDOM", "threshold": 200}
    /// ```
    Random { threshold: f64 },

    /// Identity-based sampling: a deterministic hash of the values at the
    /// key paths is compared against the threshold, so every document
    /// sharing the same key values gets the same keep/drop decision.
    ///
    /// # Examples
    /// ```text
    /// sample {"strategy": "STICKY", "keys": ["esn"], "threshold": 200}
    /// ```
    Sticky {
        keys: Vec<FieldPath>,
        threshold: f64,
    },
}
