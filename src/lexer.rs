use crate::ast::Token;
use crate::error::SyntaxError;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Start offset of the most recently returned token, for diagnostics.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, SyntaxError> {
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(SyntaxError::new(
                                self.position,
                                format!("Invalid escape sequence: \\{}", ch),
                            ));
                        }
                        None => {
                            return Err(SyntaxError::new(
                                self.position,
                                "Unterminated string: unexpected end of input after backslash",
                            ));
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(SyntaxError::new(
            self.token_start,
            "Unterminated string: missing closing quote",
        ))
    }

    /// Regex literals are `/.../` with `\/` for an embedded slash. All other
    /// escapes are passed through verbatim for the regex engine to interpret.
    fn read_regex(&mut self) -> Result<String, SyntaxError> {
        let mut result = String::new();
        self.advance(); // consume opening slash

        while let Some(ch) = self.current_char() {
            match ch {
                '/' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('/') => result.push('/'),
                        Some(ch) => {
                            result.push('\\');
                            result.push(ch);
                        }
                        None => {
                            return Err(SyntaxError::new(
                                self.position,
                                "Unterminated regex: unexpected end of input after backslash",
                            ));
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(SyntaxError::new(
            self.token_start,
            "Unterminated regex: missing closing slash",
        ))
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            // Digits and at most one dot, f64 parse cannot fail
            Token::Float(number.parse::<f64>().unwrap_or(0.0))
        } else {
            match number.parse::<i64>() {
                Ok(n) => Token::Integer(n),
                // Digit run wider than i64: widen to the float domain,
                // where comparison literals live anyway
                Err(_) => Token::Float(number.parse::<f64>().unwrap_or(0.0)),
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        self.token_start = self.position;

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    if self.peek_char(2) == Some('~') {
                        self.advance();
                        self.advance();
                        self.advance();
                        Ok(Token::RegexMatch)
                    } else {
                        self.advance();
                        self.advance();
                        Ok(Token::EqEq)
                    }
                } else if self.peek_char(1) == Some('~') {
                    self.advance();
                    self.advance();
                    Ok(Token::RegexMatch)
                } else {
                    // Bare '=' is accepted as a synonym for '=='
                    self.advance();
                    Ok(Token::EqEq)
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    Err(SyntaxError::new(
                        self.position,
                        "Unexpected '!' (did you mean '!=' or 'not'?)",
                    ))
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::GtEq)
                } else {
                    self.advance();
                    Ok(Token::Gt)
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::LtEq)
                } else {
                    self.advance();
                    Ok(Token::Lt)
                }
            }
            Some('&') => {
                if self.peek_char(1) == Some('&') {
                    self.advance();
                    self.advance();
                    Ok(Token::And)
                } else {
                    Err(SyntaxError::new(
                        self.position,
                        "Unexpected '&' (did you mean '&&' or 'and'?)",
                    ))
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.advance();
                    self.advance();
                    Ok(Token::Or)
                } else {
                    Err(SyntaxError::new(
                        self.position,
                        "Unexpected '|' (did you mean '||' or 'or'?)",
                    ))
                }
            }
            Some('[') => {
                self.advance();
                Ok(Token::LBracket)
            }
            Some(']') => {
                self.advance();
                Ok(Token::RBracket)
            }
            Some('{') => {
                self.advance();
                Ok(Token::LBrace)
            }
            Some('}') => {
                self.advance();
                Ok(Token::RBrace)
            }
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some(':') => {
                self.advance();
                Ok(Token::Colon)
            }
            Some('*') => {
                self.advance();
                Ok(Token::Star)
            }
            Some('-') => {
                self.advance();
                Ok(Token::Minus)
            }
            Some('^') => {
                self.advance();
                Ok(Token::Caret)
            }
            Some('"') => Ok(Token::String(self.read_string('"')?)),
            Some('\'') => Ok(Token::String(self.read_string('\'')?)),
            Some('/') => Ok(Token::Regex(self.read_regex()?)),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                // Keywords are case-insensitive; identifiers keep their case
                match ident.to_ascii_lowercase().as_str() {
                    "select" => Ok(Token::Select),
                    "from" => Ok(Token::From),
                    "where" => Ok(Token::Where),
                    "window" => Ok(Token::Window),
                    "group" => Ok(Token::Group),
                    "by" => Ok(Token::By),
                    "sample" => Ok(Token::Sample),
                    "and" => Ok(Token::And),
                    "or" => Ok(Token::Or),
                    "not" => Ok(Token::Not),
                    _ => Ok(Token::Identifier(ident)),
                }
            }
            Some(ch) if ch.is_ascii_digit() => Ok(self.read_number()),
            Some(ch) => Err(SyntaxError::new(
                self.position,
                format!("Unexpected character '{}'", ch),
            )),
        }
    }
}

#[test]
fn test_keywords_case_insensitive() {
    let mut lexer = Lexer::new("SELECT from Where AND or");
    assert_eq!(lexer.next_token().unwrap(), Token::Select);
    assert_eq!(lexer.next_token().unwrap(), Token::From);
    assert_eq!(lexer.next_token().unwrap(), Token::Where);
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_bracket_chain() {
    let mut lexer = Lexer::new("e['req']['url']");
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("e".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::LBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::String("req".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::RBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::LBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::String("url".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::RBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
