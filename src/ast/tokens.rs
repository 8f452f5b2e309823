/// Lexical tokens produced by the lexer.
///
/// Keywords are matched case-insensitively by the lexer (`SELECT` and
/// `select` both yield [`Token::Select`]); field names and string literal
/// contents stay case-sensitive. Operator tokens are matched longest-first,
/// so `==~` is a single [`Token::RegexMatch`] and never `==` followed by `~`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 10000
    /// ```
    Integer(i64),

    /// Floating-point literal
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 450.0
    /// ```
    Float(f64),

    /// String literal, single- or double-quoted
    ///
    /// # Examples
    /// ```text
    /// 'iosui'
    /// "http://www.netflix.com"
    /// ```
    String(String),

    /// Regex literal delimited by slashes; the pattern text is kept raw
    /// and compiled by the parser so malformed patterns fail at compile
    /// time rather than match time.
    ///
    /// # Examples
    /// ```text
    /// /htt/
    /// /.*NF.*/
    /// ```
    Regex(String),

    /// Field name or stream name
    ///
    /// # Examples
    /// ```text
    /// resp
    /// nqOrg
    /// stream
    /// ```
    Identifier(String),

    // Keywords (case-insensitive)
    Select,
    From,
    Where,
    Window,
    Group,
    By,
    Sample,
    And,
    Or,
    Not,

    // Comparison operators
    /// Equality (`==`, or bare `=`)
    EqEq,
    /// Inequality (`!=`)
    NotEq,
    /// Less than (`<`)
    Lt,
    /// Greater than (`>`)
    Gt,
    /// Less than or equal (`<=`)
    LtEq,
    /// Greater than or equal (`>=`)
    GtEq,
    /// Regex match (`==~` or `=~`)
    RegexMatch,

    // Delimiters
    /// Left bracket for field access chains
    LBracket,
    /// Right bracket
    RBracket,
    /// Left brace opening a sample descriptor object
    LBrace,
    /// Right brace
    RBrace,
    /// Left parenthesis for predicate grouping
    LParen,
    /// Right parenthesis
    RParen,
    /// Comma separating select or group-by fields
    Comma,
    /// Colon inside a sample descriptor object
    Colon,
    /// Star for `select *` and the any-element segment `[*]`
    Star,
    /// Minus sign for negative number literals
    Minus,
    /// Caret marking a prefix segment, as in `e[^'result']`
    Caret,

    /// End of input
    Eof,
}
