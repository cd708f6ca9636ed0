//! Lexer for RSQL/FIQL filter expressions
//!
//! Tokenizes strings like `age=ge=18;(city==Prague,city=="Hradec Kralove")`.

use crate::error::{FilterError, Result};

/// Token types for RSQL parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unreserved word: a selector, an unquoted value or an `and`/`or` keyword
    Word(String),
    /// Single or double quoted value, escapes resolved
    Quoted(String),
    /// Comparison operator spelling such as `==`, `<=` or `=in=`
    Operator(String),
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    LeftParen,
    RightParen,
    /// End of input
    Eof,
}

impl Token {
    /// Check if this token is the given keyword (case-insensitive)
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

/// Lexer for tokenizing RSQL strings
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Character offset where the last returned token started
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.token_start = self.position;

        if self.position >= self.input.len() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();

        match ch {
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            '"' | '\'' => {
                self.advance();
                self.read_quoted(ch)
            }
            '=' | '!' | '<' | '>' => self.read_operator(),
            _ if Self::is_unreserved(ch) => Ok(self.read_word()),
            _ => Err(self.error(format!("unexpected character '{}'", ch))),
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while self.position < self.input.len() && Self::is_unreserved(self.current_char()) {
            word.push(self.current_char());
            self.advance();
        }
        Token::Word(word)
    }

    fn read_quoted(&mut self, quote: char) -> Result<Token> {
        let mut s = String::new();

        while self.position < self.input.len() {
            let ch = self.current_char();
            self.advance();
            if ch == quote {
                return Ok(Token::Quoted(s));
            }
            if ch == '\\' {
                // a backslash makes the next character literal
                if self.position < self.input.len() {
                    s.push(self.current_char());
                    self.advance();
                }
            } else {
                s.push(ch);
            }
        }

        Err(self.error("unterminated quoted value".to_string()))
    }

    /// Read `==`, `!=`, `<`, `<=`, `>`, `>=` or `=name=`
    fn read_operator(&mut self) -> Result<Token> {
        let first = self.current_char();
        self.advance();

        let symbol = match first {
            '<' | '>' => {
                if self.peek_is('=') {
                    self.advance();
                    format!("{}=", first)
                } else {
                    first.to_string()
                }
            }
            '!' => {
                if !self.peek_is('=') {
                    return Err(self.error("expected '=' after '!'".to_string()));
                }
                self.advance();
                "!=".to_string()
            }
            _ => {
                let mut name = String::new();
                while self.position < self.input.len() && self.current_char().is_ascii_alphabetic() {
                    name.push(self.current_char());
                    self.advance();
                }
                if !self.peek_is('=') {
                    return Err(self.error(format!("malformed operator '={}'", name)));
                }
                self.advance();
                format!("={}=", name)
            }
        };

        Ok(Token::Operator(symbol))
    }

    fn error(&self, message: String) -> FilterError {
        FilterError::Syntax(format!("{} at position {}", message, self.token_start))
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Check the character at the current position
    fn peek_is(&self, expected: char) -> bool {
        self.input.get(self.position) == Some(&expected)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Check if a character may appear in an unquoted word
    pub fn is_unreserved(ch: char) -> bool {
        !ch.is_whitespace()
            && !matches!(
                ch,
                '"' | '\'' | '(' | ')' | ';' | ',' | '=' | '!' | '~' | '<' | '>'
            )
    }
}
