use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping lookup by string key
    ///
    /// # Examples
    /// ```text
    /// resp
    /// e['req']
    /// ```
    Key(String),

    /// List lookup by integer index
    ///
    /// Negative indices parse but never resolve; the engine does not
    /// implement tail-relative indexing.
    ///
    /// # Examples
    /// ```text
    /// e['commands'][1]
    /// ```
    Index(i64),

    /// Any-element segment (`[*]`)
    ///
    /// Matches every element of a list, or every value of a mapping,
    /// at this position.
    ///
    /// # Examples
    /// ```text
    /// e['events'][*]['latency']
    /// ```
    Star,

    /// Prefix segment (`[^'...']`)
    ///
    /// Matches every key starting with the given prefix.
    ///
    /// # Examples
    /// ```text
    /// e[^'result']
    /// ```
    Prefix(String),
}

/// Ordered key/index chain addressing a value inside a document.
///
/// Paths are pure values: equality and hashing are structural so paths can
/// be deduplicated when unioned across queries. An empty path denotes the
/// whole document and is only produced by `select *`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    pub segments: Vec<Segment>,
}

impl FieldPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        FieldPath { segments }
    }

    /// Single top-level key path, the form a bare identifier parses to.
    pub fn key(name: impl Into<String>) -> Self {
        FieldPath {
            segments: vec![Segment::Key(name.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(k) => write!(f, "['{}']", k)?,
                Segment::Index(i) => write!(f, "[{}]", i)?,
                Segment::Star => write!(f, "[*]")?,
                Segment::Prefix(p) => write!(f, "[^'{}']", p)?,
            }
        }
        Ok(())
    }
}
