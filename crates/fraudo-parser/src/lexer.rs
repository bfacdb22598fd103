//! Tokenizer for rule template text

use crate::error::{ParseError, Result};
use fraudo_core::Position;
use std::fmt;

/// Token kinds of the rule language
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword (`rule`, `AND`, `count`, ...)
    Ident(String),
    /// Double-quoted string literal, unescaped
    Str(String),
    Number(f64),
    Colon,
    Semicolon,
    Comma,
    LParen,
    RParen,
    /// `->`
    Arrow,
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "'{}'", name),
            TokenKind::Str(s) => write!(f, "string \"{}\"", s),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Arrow => f.write_str("'->'"),
            TokenKind::Gt => f.write_str("'>'"),
            TokenKind::Ge => f.write_str("'>='"),
            TokenKind::Lt => f.write_str("'<'"),
            TokenKind::Le => f.write_str("'<='"),
            TokenKind::Eq => f.write_str("'='"),
            TokenKind::Ne => f.write_str("'!='"),
        }
    }
}

/// Token with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

/// Rule text tokenizer
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input
    pub fn tokenize(input: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        let position = self.position();
        let ch = match self.bump() {
            Some(ch) => ch,
            None => return Ok(None),
        };

        let kind = match ch {
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '=' => TokenKind::Eq,
            '>' => self.with_eq(TokenKind::Ge, TokenKind::Gt),
            '<' => self.with_eq(TokenKind::Le, TokenKind::Lt),
            '!' => {
                if self.chars.peek() == Some(&'=') {
                    self.bump();
                    TokenKind::Ne
                } else {
                    return Err(ParseError::InvalidCharacter { ch, position });
                }
            }
            '-' => match self.chars.peek() {
                Some('>') => {
                    self.bump();
                    TokenKind::Arrow
                }
                Some(c) if c.is_ascii_digit() => self.number(String::from("-"), position)?,
                _ => return Err(ParseError::InvalidCharacter { ch, position }),
            },
            '"' => self.string(position)?,
            c if c.is_ascii_digit() => self.number(c.to_string(), position)?,
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = c.to_string();
                while let Some(&c) = self.chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                TokenKind::Ident(ident)
            }
            _ => return Err(ParseError::InvalidCharacter { ch, position }),
        };

        Ok(Some(Token { kind, position }))
    }

    fn with_eq(&mut self, with: TokenKind, without: TokenKind) -> TokenKind {
        if self.chars.peek() == Some(&'=') {
            self.bump();
            with
        } else {
            without
        }
    }

    fn number(&mut self, mut text: String, position: Position) -> Result<TokenKind> {
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ParseError::InvalidNumber { text, position })
    }

    fn string(&mut self, position: Position) -> Result<TokenKind> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(ParseError::UnterminatedString { position }),
                },
                Some(c) => value.push(c),
                None => return Err(ParseError::UnterminatedString { position }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_rule() {
        let tokens = kinds(r#"rule: count("email", 10) >= 5 -> decline;"#);
        assert_eq!(
            tokens,
            vec![
                TokenKind::Ident("rule".to_string()),
                TokenKind::Colon,
                TokenKind::Ident("count".to_string()),
                TokenKind::LParen,
                TokenKind::Str("email".to_string()),
                TokenKind::Comma,
                TokenKind::Number(10.0),
                TokenKind::RParen,
                TokenKind::Ge,
                TokenKind::Number(5.0),
                TokenKind::Arrow,
                TokenKind::Ident("decline".to_string()),
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_number_followed_by_arrow() {
        let tokens = kinds("5->accept");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Number(5.0),
                TokenKind::Arrow,
                TokenKind::Ident("accept".to_string()),
            ]
        );
    }

    #[test]
    fn test_negative_and_decimal_numbers() {
        assert_eq!(kinds("-3.5"), vec![TokenKind::Number(-3.5)]);
        assert_eq!(kinds("100.25"), vec![TokenKind::Number(100.25)]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b""#),
            vec![TokenKind::Str("a\"b".to_string())]
        );
    }

    #[test]
    fn test_positions_track_lines() {
        let tokens = Lexer::tokenize("rule:\n  accept").unwrap();
        assert_eq!(tokens[2].position, Position::new(2, 3));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Lexer::tokenize("\"open"),
            Err(ParseError::UnterminatedString { .. })
        ));
        assert!(matches!(
            Lexer::tokenize("a & b"),
            Err(ParseError::InvalidCharacter { ch: '&', .. })
        ));
        assert!(matches!(
            Lexer::tokenize("1.2.3"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }
}
