//! Rule template parser
//!
//! Recursive descent over the token stream. Precedence, lowest first:
//! `OR`, `AND`, `not`, comparison, operand.

use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use fraudo_core::{Action, CompareOp, Expression, Position, RuleDef, RuleTemplate};

/// Deepest expression tree a template may build
///
/// Counts parentheses, `not`, call arguments and every chained `AND`/`OR`
/// operand, so the tree handed to later stages never exceeds it.
pub const MAX_NESTING: usize = 128;

/// Rule template parser
pub struct TemplateParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl TemplateParser {
    /// Parse template source text
    pub fn parse(input: &str) -> Result<RuleTemplate> {
        let tokens = Lexer::tokenize(input)?;
        let mut parser = TemplateParser {
            tokens,
            pos: 0,
            depth: 0,
        };

        let mut rules = Vec::new();
        while parser.peek().is_some() {
            rules.push(parser.parse_rule()?);
        }

        tracing::debug!("Parsed template with {} rules", rules.len());
        Ok(RuleTemplate::new(rules))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn advance(&mut self, expected: &str) -> Result<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let expected = kind.to_string();
        let token = self.advance(&expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(&expected, &token))
        }
    }

    fn position(&self) -> Position {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.position)
            .unwrap_or_default()
    }

    fn descend(&mut self, position: Position) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING,
                position,
            });
        }
        Ok(())
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek_kind(0), Some(TokenKind::Ident(name)) if name.eq_ignore_ascii_case(keyword))
    }

    fn parse_rule(&mut self) -> Result<RuleDef> {
        let start = self.advance("'rule'")?;
        match &start.kind {
            TokenKind::Ident(name) if name == "rule" => {}
            _ => return Err(unexpected("'rule'", &start)),
        }
        self.expect(TokenKind::Colon)?;

        let name = match (self.peek_kind(0), self.peek_kind(1)) {
            (Some(TokenKind::Ident(name)), Some(TokenKind::Colon)) => {
                let name = name.clone();
                self.pos += 2;
                Some(name)
            }
            _ => None,
        };

        let condition = self.parse_or()?;
        self.expect(TokenKind::Arrow)?;

        let action_token = self.advance("action")?;
        let action = match &action_token.kind {
            TokenKind::Ident(keyword) => Action::from_keyword(&keyword.to_ascii_lowercase())
                .ok_or_else(|| ParseError::UnknownAction {
                    action: keyword.clone(),
                    position: action_token.position,
                })?,
            _ => return Err(unexpected("action", &action_token)),
        };
        self.expect(TokenKind::Semicolon)?;

        Ok(RuleDef {
            name,
            condition,
            action,
            position: start.position,
        })
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let base = self.depth;
        let mut left = self.parse_and()?;
        while self.is_keyword("or") {
            self.descend(self.position())?;
            self.pos += 1;
            left = Expression::or(left, self.parse_and()?);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let base = self.depth;
        let mut left = self.parse_not()?;
        while self.is_keyword("and") {
            self.descend(self.position())?;
            self.pos += 1;
            left = Expression::and(left, self.parse_not()?);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression> {
        let base = self.depth;
        let mut negations = 0usize;
        while self.is_keyword("not") {
            self.descend(self.position())?;
            self.pos += 1;
            negations += 1;
        }

        let mut expr = self.parse_compare()?;
        for _ in 0..negations {
            expr = Expression::not(expr);
        }
        self.depth = base;
        Ok(expr)
    }

    fn parse_compare(&mut self) -> Result<Expression> {
        let left = self.parse_operand()?;

        let op = match self.peek_kind(0) {
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Ge) => CompareOp::Ge,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Le) => CompareOp::Le,
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Ne) => CompareOp::Ne,
            _ => return Ok(left),
        };
        self.pos += 1;

        let right = self.parse_operand()?;
        Ok(Expression::compare(left, op, right))
    }

    fn parse_operand(&mut self) -> Result<Expression> {
        let token = self.advance("operand")?;
        match token.kind {
            TokenKind::Number(n) => Ok(Expression::Number(n)),
            TokenKind::Str(s) => Ok(Expression::String(s)),
            TokenKind::LParen => {
                self.descend(token.position)?;
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                self.expect(TokenKind::LParen)?;
                self.descend(token.position)?;
                let args = self.parse_args()?;
                self.depth -= 1;
                Ok(Expression::call(name, args, token.position))
            }
            _ => Err(unexpected("operand", &token)),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expression>> {
        let mut args = Vec::new();
        if self.peek_kind(0) == Some(&TokenKind::RParen) {
            self.pos += 1;
            return Ok(args);
        }

        loop {
            args.push(self.parse_or()?);
            let token = self.advance("',' or ')'")?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => return Ok(args),
                _ => return Err(unexpected("',' or ')'", &token)),
            }
        }
    }
}

fn unexpected(expected: &str, token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.to_string(),
        found: token.kind.to_string(),
        position: token.position,
    }
}
