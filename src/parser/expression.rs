use crate::ast::{BinOp, Expr, UnOp};
use crate::lexer::Token;
use crate::parser::{ParseError, Parser};

use ariadne::{Color, Fmt};
use yansi::Paint;

use std::ops::Range;

type ParsedExpr = Result<(Expr, Range<usize>), ParseError>;

fn binop_of(token: &Token) -> Option<BinOp> {
    let op = match token {
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Sub,
        Token::Mul => BinOp::Mul,
        Token::Div => BinOp::Div,
        Token::Mod => BinOp::Mod,
        Token::Eq => BinOp::Eq,
        Token::NotEq => BinOp::NotEq,
        Token::Less => BinOp::Less,
        Token::Greater => BinOp::Greater,
        Token::LessEq => BinOp::LessEq,
        Token::GreaterEq => BinOp::GreaterEq,
        Token::And => BinOp::And,
        Token::Or => BinOp::Or,
        Token::BitAnd => BinOp::BitAnd,
        Token::BitOr => BinOp::BitOr,
        Token::BitXor => BinOp::BitXor,
        Token::Shl => BinOp::Shl,
        Token::Shr => BinOp::Shr,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    pub fn parse_expression(&mut self) -> ParsedExpr {
        let target = self.parse_binary(1)?;
        if !self.check(&Token::Assign) {
            return Ok(target);
        }
        let Some((_, span_op)) = self.next() else {
            unreachable!()
        };
        if !matches!(
            target.0,
            Expr::Variable(_) | Expr::Member { .. } | Expr::Index { .. }
        ) {
            return Err(self
                .error_at("an assignable target", "expression", target.1.start..span_op.end)
                .with_note(format!(
                    "only names, fields and indexes can be assigned, as in 'name {} value'",
                    Fmt::fg("<-", Color::Yellow).bold(),
                )));
        }
        // right-associative
        let value = self.parse_expression()?;
        let span = target.1.start..value.1.end;
        Ok((
            Expr::Assign {
                l_value: Box::new(target),
                r_value: Box::new(value),
            },
            span,
        ))
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParsedExpr {
        let mut l_expr = self.parse_unary()?;

        while let Some(operator) = self.peek().and_then(binop_of) {
            let prec = operator.precedence();
            if prec < min_prec {
                break;
            }
            self.next();
            let r_expr = self.parse_binary(prec + 1)?;
            let span = l_expr.1.start..r_expr.1.end;
            l_expr = (
                Expr::BinOp {
                    operator,
                    l_value: Box::new(l_expr),
                    r_value: Box::new(r_expr),
                },
                span,
            );
        }

        Ok(l_expr)
    }

    fn parse_unary(&mut self) -> ParsedExpr {
        let unop = match self.peek() {
            Some(Token::Minus) => UnOp::Minus,
            Some(Token::Not) => UnOp::Not,
            Some(Token::BitNot) => UnOp::BitNot,
            _ => return self.parse_postfix(),
        };
        let start = self.current_span().start;
        self.next();
        let expression = self.parse_unary()?;
        let span = start..expression.1.end;
        Ok((
            Expr::UnOp {
                unop,
                expression: Box::new(expression),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> ParsedExpr {
        let mut l_expr = self.parse_primary()?;

        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    self.next();
                    let args = self.parse_args()?;
                    let span = l_expr.1.start..self.last_end();
                    l_expr = (
                        Expr::Call {
                            function: Box::new(l_expr),
                            args,
                        },
                        span,
                    );
                } // call
                Some(Token::Dot) => {
                    self.next();
                    let (field_name, span_field) =
                        self.expect_identifier("a field name after `.`")?;
                    let span = l_expr.1.start..span_field.end;
                    l_expr = (
                        Expr::Member {
                            object: Box::new(l_expr),
                            field_name,
                        },
                        span,
                    );
                }
                Some(Token::LBracket) => {
                    self.next();
                    let index = self.parse_expression()?;
                    self.expect(Token::RBracket, "`]` after index").map_err(|err| {
                        err.with_note(format!(
                            "the syntax for indexing is 'your_expression{}your_index{}'",
                            Fmt::fg("[", Color::Yellow).bold(),
                            Fmt::fg("]", Color::Yellow).bold(),
                        ))
                    })?;
                    let span = l_expr.1.start..self.last_end();
                    l_expr = (
                        Expr::Index {
                            array: Box::new(l_expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                } // index
                _ => break,
            }
        }

        Ok(l_expr)
    }

    /// Arguments after an opening `(`, up to and including the closing `)`.
    pub(crate) fn parse_args(&mut self) -> Result<Vec<(Expr, Range<usize>)>, ParseError> {
        let mut args = vec![];
        while !self.eat(&Token::RParen) {
            args.push(self.parse_expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen, "`,` or `)` in argument list")
                .map_err(|err| {
                    err.with_note(format!(
                        "the syntax for calling a function is 'your_function{}your_arg1, your_arg2, ...{}'",
                        Fmt::fg("(", Color::Yellow).bold(),
                        Fmt::fg(")", Color::Yellow).bold(),
                    ))
                })?;
            break;
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParsedExpr {
        let Some((token, span)) = self.next() else {
            return Err(self.error_here("an expression"));
        };

        let expr = match token {
            // literals
            Token::Number(n) => Expr::Number(n),
            Token::String(s) => Expr::String(s),
            Token::Bool(b) => Expr::Bool(b),
            Token::KeywordNull => Expr::Null,

            Token::Variable(name) => Expr::Variable(name),
            Token::KeywordThis => Expr::This,

            Token::KeywordSuper => return self.parse_super(span),
            Token::KeywordNew => return self.parse_new(span),

            Token::KeywordGrind => {
                let Some(Token::String(path)) = self.peek().cloned() else {
                    return Err(self
                        .error_here("a module path string after `grind`")
                        .with_note("modules are imported as 'grind \"path/to/module.brewco\"'"));
                };
                self.next();
                Expr::Grind(path)
            }

            Token::LParen => {
                let (inner, _) = self.parse_expression()?;
                self.expect(Token::RParen, "`)` to close the parenthesis")?;
                inner
            }

            Token::LBracket => {
                let mut elements = vec![];
                while !self.eat(&Token::RBracket) {
                    elements.push(self.parse_expression()?);
                    if !self.eat(&Token::Comma) {
                        self.expect(Token::RBracket, "`,` or `]` after array element")?;
                        break;
                    }
                }
                Expr::Array { elements }
            }

            Token::LBrace => {
                let mut entries = vec![];
                while !self.eat(&Token::RBrace) {
                    let key = match self.peek() {
                        Some(Token::Variable(key)) | Some(Token::String(key)) => key.clone(),
                        _ => return Err(self.error_here("an object key")),
                    };
                    self.next();
                    self.expect(Token::Colon, "`:` after object key")?;
                    let value = self.parse_expression()?;
                    entries.push((key, value));
                    if !self.eat(&Token::Comma) {
                        self.expect(Token::RBrace, "`,` or `}` after object entry")?;
                        break;
                    }
                }
                Expr::Object { entries }
            }

            _ => {
                self.cursor -= 1;
                return Err(self.error_here("an expression"));
            }
        };

        Ok((expr, span.start..self.last_end()))
    }

    fn parse_super(&mut self, span: Range<usize>) -> ParsedExpr {
        let method = if self.eat(&Token::Dot) {
            Some(self.expect_identifier("a method name after `super.`")?.0)
        } else {
            None
        };
        self.expect(Token::LParen, "`(` to call the parent").map_err(|err| {
            err.with_note(format!(
                "use '{}' for the parent constructor or '{}' for a parent method",
                Fmt::fg("super(args)", Color::Yellow).bold(),
                Fmt::fg("super.method(args)", Color::Yellow).bold(),
            ))
        })?;
        let args = self.parse_args()?;
        Ok((Expr::SuperCall { method, args }, span.start..self.last_end()))
    }

    fn parse_new(&mut self, span: Range<usize>) -> ParsedExpr {
        let (class_name, _) = self.expect_identifier("a bean name after `new`")?;
        let args = if self.eat(&Token::LParen) {
            self.parse_args()?
        } else {
            vec![]
        };
        Ok((Expr::New { class_name, args }, span.start..self.last_end()))
    }
}
