pub mod class;
pub mod expression;
pub mod function;
pub mod statement;

#[cfg(test)]
pub mod test;

use crate::ast::{Program, TypeAnnot};
use crate::error::BrewError;
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::position::{LineIndex, Position};

use thiserror::Error;

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected {expected}, found {found} at {position}")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub span: Range<usize>,
    pub position: Position,
    /// Syntax hint shown under the diagnostic.
    pub note: Option<String>,
}

impl ParseError {
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

pub struct Parser {
    tokens: Vec<SpannedToken>,
    cursor: usize,
    index: LineIndex,
    // `break`/`continue` are only legal while this is non-zero
    loop_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>, source: &str) -> Self {
        Parser {
            tokens,
            cursor: 0,
            index: LineIndex::new(source),
            loop_depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut tree = vec![];
        while self.peek().is_some() {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            tree.push(self.parse_statement()?);
        }
        Ok(tree)
    }

    fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + n).map(|(token, _)| token)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn next(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<Range<usize>, ParseError> {
        if self.check(&token) {
            let (_, span) = &self.tokens[self.cursor];
            let span = span.clone();
            self.cursor += 1;
            Ok(span)
        } else {
            Err(self.error_here(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<(String, Range<usize>), ParseError> {
        match self.tokens.get(self.cursor) {
            Some((Token::Variable(name), span)) => {
                let found = (name.clone(), span.clone());
                self.cursor += 1;
                Ok(found)
            }
            _ => Err(self.error_here(expected)),
        }
    }

    /// Span of the next token, or an empty span at end of input.
    fn current_span(&self) -> Range<usize> {
        match self.tokens.get(self.cursor) {
            Some((_, span)) => span.clone(),
            None => {
                let end = self.index.source().len();
                end..end
            }
        }
    }

    /// End offset of the most recently consumed token.
    fn last_end(&self) -> usize {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }

    fn error_here(&self, expected: impl Into<String>) -> ParseError {
        let span = self.current_span();
        let found = match self.peek() {
            Some(token) => token.to_string(),
            None => "end of file".to_string(),
        };
        ParseError {
            expected: expected.into(),
            found,
            position: self.index.position(span.start),
            span,
            note: None,
        }
    }

    fn error_at(&self, expected: impl Into<String>, found: impl Into<String>, span: Range<usize>) -> ParseError {
        ParseError {
            expected: expected.into(),
            found: found.into(),
            position: self.index.position(span.start),
            span,
            note: None,
        }
    }

    /// `Name` or `[Name]`, accepted after `:` or `->` and never enforced.
    fn parse_type_annot(&mut self) -> Result<(TypeAnnot, Range<usize>), ParseError> {
        let start = self.current_span().start;
        if self.eat(&Token::LBracket) {
            let (inner, _) = self.parse_type_annot()?;
            self.expect(Token::RBracket, "`]` to close the array type")?;
            return Ok((TypeAnnot::Array(Box::new(inner)), start..self.last_end()));
        }
        let (name, _) = self.expect_identifier("a type name")?;
        let mut annot = TypeAnnot::Named(name);
        while self.check(&Token::LBracket) && self.peek_nth(1) == Some(&Token::RBracket) {
            self.cursor += 2;
            annot = TypeAnnot::Array(Box::new(annot));
        }
        Ok((annot, start..self.last_end()))
    }
}

/// Lexes and parses one source unit.
pub fn parse_program(source: &str) -> Result<Program, BrewError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens, source);
    Ok(parser.parse_program()?)
}
