use std::mem;

use regex::Regex;

use crate::{
    ast::{
        CmpOp, Expr, FieldPath, Literal, LogicalOp, Query, RegexLiteral, Sample, Segment,
        Selection, Token,
    },
    error::SyntaxError,
    lexer::Lexer,
};

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_pos: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, SyntaxError> {
        let current_token = lexer.next_token()?;
        let current_pos = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_pos,
        })
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.current_token = self.lexer.next_token()?;
        self.current_pos = self.lexer.token_start();
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), SyntaxError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&format!("expected {:?}", expected)));
        }
        self.advance()
    }

    fn unexpected(&self, what: &str) -> SyntaxError {
        SyntaxError::new(
            self.current_pos,
            format!("{}, got {:?}", what, self.current_token),
        )
    }

    /// Parse a complete query:
    /// `SELECT <fields> FROM <stream> [WINDOW <n>] [WHERE <predicate>]
    /// [GROUP BY <fields>] [SAMPLE <json-object>]`
    pub fn parse_query(&mut self, name: &str, text: &str) -> Result<Query, SyntaxError> {
        self.expect(Token::Select)?;
        let select = self.parse_select_list()?;

        // `from stream` is required syntax; the source name itself is not
        // semantically used (single logical stream).
        self.expect(Token::From)?;
        if !self.check(&Token::Identifier(String::new())) {
            return Err(self.unexpected("expected stream source after 'from'"));
        }
        self.advance()?;

        let mut window = None;
        if self.check(&Token::Window) {
            self.advance()?;
            window = Some(self.parse_window_size()?);
        }

        let mut where_clause = None;
        if self.check(&Token::Where) {
            self.advance()?;
            where_clause = Some(self.parse_expression()?);
        }

        let mut group_by = None;
        if self.check(&Token::Group) {
            self.advance()?;
            self.expect(Token::By)?;
            group_by = Some(self.parse_field_list()?);
        }

        let mut sample = None;
        if self.check(&Token::Sample) {
            self.advance()?;
            sample = Some(self.parse_sample()?);
        }

        self.expect(Token::Eof)?;

        Ok(Query {
            name: name.to_string(),
            text: text.to_string(),
            select,
            window,
            where_clause,
            group_by,
            sample,
        })
    }

    fn parse_select_list(&mut self) -> Result<Selection, SyntaxError> {
        if self.check(&Token::Star) {
            self.advance()?;
            return Ok(Selection::All);
        }
        Ok(Selection::Paths(self.parse_field_list()?))
    }

    fn parse_field_list(&mut self) -> Result<Vec<FieldPath>, SyntaxError> {
        let mut paths = vec![self.parse_field_ref()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            paths.push(self.parse_field_ref()?);
        }
        Ok(paths)
    }

    /// Parse a field reference: either a bare identifier naming a top-level
    /// key, or a bracket chain rooted at the event reference `e`.
    fn parse_field_ref(&mut self) -> Result<FieldPath, SyntaxError> {
        let name = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => name,
            token => {
                self.current_token = token;
                return Err(self.unexpected("expected field reference"));
            }
        };
        self.advance()?;

        if name == "e" && self.check(&Token::LBracket) {
            let mut segments = Vec::new();
            while self.check(&Token::LBracket) {
                segments.push(self.parse_segment()?);
            }
            Ok(FieldPath::new(segments))
        } else {
            Ok(FieldPath::key(name))
        }
    }

    fn parse_segment(&mut self) -> Result<Segment, SyntaxError> {
        self.expect(Token::LBracket)?;

        let segment = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(key) => {
                self.advance()?;
                Segment::Key(key)
            }
            Token::Integer(i) => {
                self.advance()?;
                Segment::Index(i)
            }
            Token::Minus => {
                self.advance()?;
                match mem::replace(&mut self.current_token, Token::Eof) {
                    Token::Integer(i) => {
                        self.advance()?;
                        Segment::Index(-i)
                    }
                    token => {
                        self.current_token = token;
                        return Err(self.unexpected("expected integer index after '-'"));
                    }
                }
            }
            Token::Star => {
                self.advance()?;
                Segment::Star
            }
            Token::Caret => {
                self.advance()?;
                match mem::replace(&mut self.current_token, Token::Eof) {
                    Token::String(prefix) => {
                        self.advance()?;
                        Segment::Prefix(prefix)
                    }
                    token => {
                        self.current_token = token;
                        return Err(self.unexpected("expected string prefix after '^'"));
                    }
                }
            }
            token => {
                self.current_token = token;
                return Err(self.unexpected("expected key, index, '*' or '^' inside brackets"));
            }
        };

        self.expect(Token::RBracket)?;
        Ok(segment)
    }

    // Predicate grammar, precedence low to high: OR < AND < NOT < comparison.

    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::Or) {
            self.advance()?;
            let right = self.parse_and()?;

            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_not()?;

        while self.check(&Token::And) {
            self.advance()?;
            let right = self.parse_not()?;

            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, SyntaxError> {
        if self.check(&Token::Not) {
            self.advance()?;
            let operand = self.parse_not()?; // right-associative
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.parse_operand()?;

        if let Some(op) = match &self.current_token {
            Token::EqEq => Some(CmpOp::Equal),
            Token::NotEq => Some(CmpOp::NotEqual),
            Token::Lt => Some(CmpOp::LessThan),
            Token::Gt => Some(CmpOp::GreaterThan),
            Token::LtEq => Some(CmpOp::LessEqual),
            Token::GtEq => Some(CmpOp::GreaterEqual),
            Token::RegexMatch => Some(CmpOp::RegexMatch),
            _ => None,
        } {
            self.advance()?;
            let right = self.parse_operand()?;

            return Ok(Expr::Comparison {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_operand(&mut self) -> Result<Expr, SyntaxError> {
        if self.check(&Token::LParen) {
            self.advance()?;
            let expr = self.parse_expression()?;
            self.expect(Token::RParen)?;
            return Ok(expr);
        }

        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::String(s)))
            }
            Token::Integer(n) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Number(n as f64)))
            }
            Token::Float(n) => {
                self.advance()?;
                Ok(Expr::Literal(Literal::Number(n)))
            }
            Token::Minus => {
                self.advance()?;
                match mem::replace(&mut self.current_token, Token::Eof) {
                    Token::Integer(n) => {
                        self.advance()?;
                        Ok(Expr::Literal(Literal::Number(-(n as f64))))
                    }
                    Token::Float(n) => {
                        self.advance()?;
                        Ok(Expr::Literal(Literal::Number(-n)))
                    }
                    token => {
                        self.current_token = token;
                        Err(self.unexpected("expected number after '-'"))
                    }
                }
            }
            Token::Regex(pattern) => {
                let pos = self.current_pos;
                self.advance()?;
                let regex = Regex::new(&pattern).map_err(|e| {
                    SyntaxError::new(pos, format!("Invalid regex /{}/: {}", pattern, e))
                })?;
                Ok(Expr::Literal(Literal::Regex(RegexLiteral { pattern, regex })))
            }
            token @ Token::Identifier(_) => {
                self.current_token = token;
                Ok(Expr::FieldRef(self.parse_field_ref()?))
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("unexpected token in predicate"))
            }
        }
    }

    fn parse_window_size(&mut self) -> Result<u64, SyntaxError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Integer(n) if n > 0 => {
                self.advance()?;
                Ok(n as u64)
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("expected positive integer window size"))
            }
        }
    }

    // The sample clause body is a JSON object. It is reassembled from the
    // token stream (the lexer already handles strings, numbers, brackets
    // and braces) and then validated into a Sample descriptor.

    fn parse_sample(&mut self) -> Result<Sample, SyntaxError> {
        let pos = self.current_pos;
        if !self.check(&Token::LBrace) {
            return Err(self.unexpected("expected '{' after 'sample'"));
        }
        let descriptor = self.parse_json_value()?;
        self.sample_from_descriptor(pos, &descriptor)
    }

    fn parse_json_value(&mut self) -> Result<serde_json::Value, SyntaxError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::LBrace => {
                self.advance()?;
                let mut map = serde_json::Map::new();
                while !self.check(&Token::RBrace) {
                    let key = match mem::replace(&mut self.current_token, Token::Eof) {
                        Token::String(s) => s,
                        token => {
                            self.current_token = token;
                            return Err(self.unexpected("expected string key in sample object"));
                        }
                    };
                    self.advance()?;
                    self.expect(Token::Colon)?;
                    let value = self.parse_json_value()?;
                    map.insert(key, value);

                    if !self.check(&Token::RBrace) {
                        self.expect(Token::Comma)?;
                    }
                }
                self.advance()?; // consume '}'
                Ok(serde_json::Value::Object(map))
            }
            Token::LBracket => {
                self.advance()?;
                let mut elements = Vec::new();
                while !self.check(&Token::RBracket) {
                    elements.push(self.parse_json_value()?);
                    if !self.check(&Token::RBracket) {
                        self.expect(Token::Comma)?;
                    }
                }
                self.advance()?; // consume ']'
                Ok(serde_json::Value::Array(elements))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(serde_json::Value::String(s))
            }
            Token::Integer(n) => {
                self.advance()?;
                Ok(serde_json::Value::Number(n.into()))
            }
            Token::Float(n) => {
                self.advance()?;
                serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| {
                        SyntaxError::new(self.current_pos, "non-finite number in sample object")
                    })
            }
            Token::Minus => {
                self.advance()?;
                match mem::replace(&mut self.current_token, Token::Eof) {
                    Token::Integer(n) => {
                        self.advance()?;
                        Ok(serde_json::Value::Number((-n).into()))
                    }
                    Token::Float(n) => {
                        self.advance()?;
                        serde_json::Number::from_f64(-n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| {
                                SyntaxError::new(
                                    self.current_pos,
                                    "non-finite number in sample object",
                                )
                            })
                    }
                    token => {
                        self.current_token = token;
                        Err(self.unexpected("expected number after '-'"))
                    }
                }
            }
            Token::Identifier(word) if word == "true" => {
                self.advance()?;
                Ok(serde_json::Value::Bool(true))
            }
            Token::Identifier(word) if word == "false" => {
                self.advance()?;
                Ok(serde_json::Value::Bool(false))
            }
            Token::Identifier(word) if word == "null" => {
                self.advance()?;
                Ok(serde_json::Value::Null)
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("invalid JSON in sample clause"))
            }
        }
    }

    fn sample_from_descriptor(
        &self,
        pos: usize,
        descriptor: &serde_json::Value,
    ) -> Result<Sample, SyntaxError> {
        let obj = descriptor
            .as_object()
            .ok_or_else(|| SyntaxError::new(pos, "sample descriptor must be a JSON object"))?;

        let strategy = obj
            .get("strategy")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SyntaxError::new(pos, "sample descriptor requires a 'strategy' string"))?;

        let threshold = obj.get("threshold").and_then(|v| v.as_f64());

        match strategy {
            "RANDOM" => {
                let threshold = threshold.ok_or_else(|| {
                    SyntaxError::new(pos, "RANDOM sampling requires a numeric 'threshold'")
                })?;
                Ok(Sample::Random { threshold })
            }
            "STICKY" => {
                let threshold = threshold.ok_or_else(|| {
                    SyntaxError::new(pos, "STICKY sampling requires a numeric 'threshold'")
                })?;
                let keys = obj
                    .get("keys")
                    .and_then(|v| v.as_array())
                    .ok_or_else(|| {
                        SyntaxError::new(pos, "STICKY sampling requires a 'keys' array")
                    })?
                    .iter()
                    .map(|k| {
                        k.as_str().map(FieldPath::key).ok_or_else(|| {
                            SyntaxError::new(pos, "STICKY sampling keys must be field name strings")
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if keys.is_empty() {
                    return Err(SyntaxError::new(
                        pos,
                        "STICKY sampling requires at least one key",
                    ));
                }
                Ok(Sample::Sticky { keys, threshold })
            }
            other => Err(SyntaxError::new(
                pos,
                format!("unknown sample strategy '{}'", other),
            )),
        }
    }
}
