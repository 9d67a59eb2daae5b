use crate::ast::{Expr, Literal, Stmt, SwitchCase};
use crate::lexer::Token;
use crate::parser::{ParseError, Parser};

use ariadne::{Color, Fmt};
use yansi::Paint;

use std::ops::Range;

type ParsedStmt = Result<(Stmt, Range<usize>), ParseError>;

impl Parser {
    pub fn parse_statement(&mut self) -> ParsedStmt {
        let start = self.current_span().start;
        let Some(token) = self.peek() else {
            return Err(self.error_here("a statement"));
        };

        let stmt = match token {
            Token::KeywordBeans => self.parse_let()?,
            Token::KeywordBrew => {
                let function = self.parse_function()?;
                (Stmt::Function(function), start..self.last_end())
            }
            Token::KeywordBean => self.parse_class()?,
            Token::KeywordRecipe => self.parse_recipe()?,
            Token::KeywordTaste => self.parse_if()?,
            Token::KeywordSteep => self.parse_while()?,
            Token::KeywordPour => self.parse_for()?,
            Token::KeywordForeach => {
                self.next();
                self.parse_foreach(start)?
            }
            Token::KeywordRoast => self.parse_switch()?,
            Token::KeywordTasteCarefully => self.parse_try()?,
            Token::KeywordServe => self.parse_return()?,
            Token::KeywordBreak | Token::KeywordContinue => {
                let Some((token, span)) = self.next() else {
                    unreachable!()
                };
                if self.loop_depth == 0 {
                    return Err(self
                        .error_at("a statement", format!("{} outside of a loop", token), span)
                        .with_note("`break` and `continue` can only appear inside `steep` or `pour` loops"));
                }
                let stmt = if token == Token::KeywordBreak {
                    Stmt::Break
                } else {
                    Stmt::Continue
                };
                (stmt, span)
            }
            Token::KeywordGrind if matches!(self.peek_nth(1), Some(Token::String(_))) => {
                self.parse_import()?
            }
            Token::KeywordPourout => {
                self.next();
                let mut values = vec![self.parse_expression()?];
                while self.eat(&Token::Comma) {
                    values.push(self.parse_expression()?);
                }
                (Stmt::Print(values), start..self.last_end())
            }
            Token::KeywordBrewTime => {
                self.next();
                let seconds = self.parse_expression()?;
                (Stmt::Sleep(Box::new(seconds)), start..self.last_end())
            }
            Token::LBrace => {
                let body = self.parse_block()?;
                (Stmt::Block(body), start..self.last_end())
            }
            _ => {
                let expr = self.parse_expression()?;
                let span = expr.1.clone();
                (Stmt::Expr(expr), span)
            }
        };

        self.eat(&Token::Semicolon);
        Ok(stmt)
    }

    /// `{ statements }`
    pub fn parse_block(&mut self) -> Result<Vec<(Stmt, Range<usize>)>, ParseError> {
        self.expect(Token::LBrace, "`{` to open a block")?;
        let mut body = vec![];
        while !self.eat(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(self.error_here("`}` to close the block"));
            }
            if self.eat(&Token::Semicolon) {
                continue;
            }
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    fn parse_loop_body(&mut self) -> Result<Vec<(Stmt, Range<usize>)>, ParseError> {
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        body
    }

    fn parse_let(&mut self) -> ParsedStmt {
        // `beans` has not been eaten yet
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let (name, _) = self.expect_identifier("a variable name after `beans`")?;
        let type_annot = if self.eat(&Token::Colon) {
            Some(self.parse_type_annot()?)
        } else {
            None
        };
        self.expect(Token::Assign, "`<-` after the variable name")
            .map_err(|err| {
                err.with_note(format!(
                    "the syntax for declaring a variable is 'beans name {} value'",
                    Fmt::fg("<-", Color::Yellow).bold(),
                ))
            })?;
        let value = self.parse_expression()?;
        let end = value.1.end;
        Ok((
            Stmt::Let {
                name,
                type_annot,
                value: Box::new(value),
            },
            span.start..end,
        ))
    }

    fn parse_if(&mut self) -> ParsedStmt {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block()?;

        // `otherwise:` is a roast's catch-all label, not an else
        let is_else = self.check(&Token::KeywordOtherwise) && self.peek_nth(1) != Some(&Token::Colon);
        let else_branch = if is_else {
            self.next();
            let else_start = self.current_span().start;
            if self.check(&Token::KeywordTaste) {
                Some(Box::new(self.parse_if()?))
            } else {
                let body = self.parse_block()?;
                Some(Box::new((Stmt::Block(body), else_start..self.last_end())))
            }
        } else {
            None
        };

        Ok((
            Stmt::If {
                condition: Box::new(condition),
                then_branch,
                else_branch,
            },
            span.start..self.last_end(),
        ))
    }

    fn parse_while(&mut self) -> ParsedStmt {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let condition = self.parse_expression()?;
        let body = self.parse_loop_body()?;
        Ok((
            Stmt::While {
                condition: Box::new(condition),
                body,
            },
            span.start..self.last_end(),
        ))
    }

    fn parse_for(&mut self) -> ParsedStmt {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };

        let is_foreach = matches!(
            (self.peek(), self.peek_nth(1), self.peek_nth(2)),
            (Some(Token::Variable(_)), Some(Token::KeywordIn), _)
                | (Some(Token::LParen), Some(Token::Variable(_)), Some(Token::KeywordIn))
        );
        if is_foreach {
            return self.parse_foreach(span.start);
        }

        let parenthesised = self.eat(&Token::LParen);

        let init = if self.check(&Token::Semicolon) {
            None
        } else if self.check(&Token::KeywordBeans) {
            Some(Box::new(self.parse_let()?))
        } else {
            let expr = self.parse_expression()?;
            let span = expr.1.clone();
            Some(Box::new((Stmt::Expr(expr), span)))
        };
        self.expect(Token::Semicolon, "`;` after the loop initializer")
            .map_err(|err| {
                err.with_note(format!(
                    "the syntax for a counting loop is 'pour init{} condition{} update {{ ... }}'",
                    Fmt::fg(";", Color::Yellow).bold(),
                    Fmt::fg(";", Color::Yellow).bold(),
                ))
            })?;

        let condition = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(Token::Semicolon, "`;` after the loop condition")?;

        let update = if self.check(&Token::LBrace) || self.check(&Token::RParen) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        if parenthesised {
            self.expect(Token::RParen, "`)` to close the loop header")?;
        }

        let body = self.parse_loop_body()?;
        Ok((
            Stmt::For {
                init,
                condition,
                update,
                body,
            },
            span.start..self.last_end(),
        ))
    }

    /// `x in iterable { ... }`, optionally with the header in parentheses.
    fn parse_foreach(&mut self, start: usize) -> ParsedStmt {
        let parenthesised = self.eat(&Token::LParen);
        let (var, _) = self.expect_identifier("a loop variable name")?;
        self.expect(Token::KeywordIn, "`in` after the loop variable")?;
        let iterable = self.parse_expression()?;
        if parenthesised {
            self.expect(Token::RParen, "`)` to close the loop header")?;
        }
        let body = self.parse_loop_body()?;
        Ok((
            Stmt::ForEach {
                var,
                iterable: Box::new(iterable),
                body,
            },
            start..self.last_end(),
        ))
    }

    fn parse_switch(&mut self) -> ParsedStmt {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let scrutinee = self.parse_expression()?;
        self.expect(Token::LBrace, "`{` to open the roast body")?;

        let mut cases = vec![];
        let mut default = None;
        while !self.eat(&Token::RBrace) {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            if self.check(&Token::KeywordOtherwise) || self.check(&Token::KeywordDefault) {
                let Some((token, label_span)) = self.next() else {
                    unreachable!()
                };
                if default.is_some() {
                    return Err(self.error_at(
                        "a single catch-all label",
                        format!("a second {}", token),
                        label_span,
                    ));
                }
                self.expect(Token::Colon, "`:` after the catch-all label")?;
                default = Some(self.parse_case_body()?);
                continue;
            }

            self.eat(&Token::KeywordCase);
            let label = self.parse_literal()?;
            self.expect(Token::Colon, "`:` after the case label")
                .map_err(|err| {
                    err.with_note(format!(
                        "the syntax for a case is 'value{} body'",
                        Fmt::fg(":", Color::Yellow).bold(),
                    ))
                })?;
            let body = self.parse_case_body()?;
            cases.push(SwitchCase { label, body });
        }

        Ok((
            Stmt::Switch {
                scrutinee: Box::new(scrutinee),
                cases,
                default,
            },
            span.start..self.last_end(),
        ))
    }

    fn parse_case_body(&mut self) -> Result<Vec<(Stmt, Range<usize>)>, ParseError> {
        if self.check(&Token::LBrace) {
            self.parse_block()
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    fn parse_literal(&mut self) -> Result<(Literal, Range<usize>), ParseError> {
        let start = self.current_span().start;
        let negative = self.eat(&Token::Minus);
        let literal = match self.peek() {
            Some(Token::Number(n)) if negative => Literal::Number(-n),
            Some(Token::Number(n)) => Literal::Number(*n),
            Some(Token::String(s)) if !negative => Literal::String(s.clone()),
            Some(Token::Bool(b)) if !negative => Literal::Bool(*b),
            Some(Token::KeywordNull) if !negative => Literal::Null,
            _ => return Err(self.error_here("a literal case label")),
        };
        self.next();
        Ok((literal, start..self.last_end()))
    }

    fn parse_try(&mut self) -> ParsedStmt {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let body = self.parse_block()?;
        self.expect(Token::KeywordIfSpilled, "`if_spilled` after the guarded block")
            .map_err(|err| {
                err.with_note(format!(
                    "a guarded block reads 'taste_carefully {{ ... }} {} (error) {{ ... }}'",
                    Fmt::fg("if_spilled", Color::Yellow).bold(),
                ))
            })?;

        let binding = if self.eat(&Token::LParen) {
            let binding = if self.check(&Token::RParen) {
                None
            } else {
                Some(self.expect_identifier("a name for the spill")?.0)
            };
            self.expect(Token::RParen, "`)` after the spill name")?;
            binding
        } else if let Some(Token::Variable(name)) = self.peek() {
            let name = name.clone();
            self.next();
            Some(name)
        } else {
            None
        };

        let handler = self.parse_block()?;
        Ok((
            Stmt::Try {
                body,
                binding,
                handler,
            },
            span.start..self.last_end(),
        ))
    }

    fn parse_return(&mut self) -> ParsedStmt {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let value = match self.peek() {
            None | Some(Token::Semicolon) | Some(Token::RBrace) => None,
            Some(_) => Some(Box::new(self.parse_expression()?)),
        };
        Ok((Stmt::Return(value), span.start..self.last_end()))
    }

    fn parse_import(&mut self) -> ParsedStmt {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let Some((Token::String(path), _)) = self.next() else {
            unreachable!()
        };
        let alias = if self.eat(&Token::KeywordAs) {
            Some(self.expect_identifier("a module name after `as`")?.0)
        } else {
            None
        };
        Ok((Stmt::Import { path, alias }, span.start..self.last_end()))
    }
}

impl Stmt {
    /// True for statements that only exist to be evaluated for their value.
    pub fn as_expression(&self) -> Option<&(Expr, Range<usize>)> {
        match self {
            Stmt::Expr(expr) => Some(expr),
            _ => None,
        }
    }
}
