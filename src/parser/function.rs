use crate::ast::{Function, MethodSignature, Param, TypeAnnot};
use crate::lexer::Token;
use crate::parser::{ParseError, Parser};

use ariadne::{Color, Fmt};
use yansi::Paint;

use std::ops::Range;
use std::rc::Rc;

pub fn function_syntax() -> String {
    format!(
        "\
        The syntax for declaring a brew is:
            {} brew_name({}: {}, {}: {}, ...) -> return_type {{ body }}
        ",
        Fmt::fg("brew", Color::Yellow).bold(),
        Fmt::fg("arg1", Color::Rgb(150, 200, 100)).bold(),
        Fmt::fg("type1", Color::Rgb(205, 150, 100)).bold(),
        Fmt::fg("arg2", Color::Rgb(150, 200, 100)).bold(),
        Fmt::fg("type2", Color::Rgb(205, 150, 100)).bold(),
    )
}

impl Parser {
    /// `brew name(params) [-> Type] { body }`, starting at the `brew` keyword.
    pub fn parse_function(&mut self) -> Result<Rc<Function>, ParseError> {
        self.expect(Token::KeywordBrew, "`brew`")?;
        self.parse_function_rest()
    }

    /// Everything after `brew`: also used by class bodies, where `brew` is optional.
    pub(crate) fn parse_function_rest(&mut self) -> Result<Rc<Function>, ParseError> {
        let name = self
            .expect_identifier("a brew name")
            .map_err(|err| err.with_note(function_syntax()))?;
        self.expect(Token::LParen, "`(` after the brew name")
            .map_err(|err| err.with_note(function_syntax()))?;
        let args = self.parse_params()?;
        let return_type = self.parse_return_annot()?;

        // loops outside the function do not extend into it
        let loop_depth = std::mem::take(&mut self.loop_depth);
        let body = self.parse_block();
        self.loop_depth = loop_depth;

        Ok(Rc::new(Function {
            name,
            args,
            body: body?,
            return_type,
        }))
    }

    /// Parameters after an opening `(`, up to and including the closing `)`.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params: Vec<Param> = vec![];
        while !self.eat(&Token::RParen) {
            let (name, span) = self
                .expect_identifier("a parameter name")
                .map_err(|err| err.with_note(function_syntax()))?;
            if params.iter().any(|param| param.name == name) {
                return Err(self.error_at(
                    "distinct parameter names",
                    format!("`{}` twice", name),
                    span,
                ));
            }
            let type_annot = if self.eat(&Token::Colon) {
                Some(self.parse_type_annot()?.0)
            } else {
                None
            };
            params.push(Param {
                name,
                type_annot,
                range: span.start..self.last_end(),
            });
            if !self.eat(&Token::Comma) {
                self.expect(Token::RParen, "`,` or `)` in parameter list")?;
                break;
            }
        }
        Ok(params)
    }

    fn parse_return_annot(&mut self) -> Result<Option<(TypeAnnot, Range<usize>)>, ParseError> {
        if self.eat(&Token::Arrow) || self.eat(&Token::Colon) {
            Ok(Some(self.parse_type_annot()?))
        } else {
            Ok(None)
        }
    }

    /// A bodiless `[brew] name(params) [-> Type]` inside a recipe.
    pub(crate) fn parse_method_signature(&mut self) -> Result<MethodSignature, ParseError> {
        let start = self.current_span().start;
        self.eat(&Token::KeywordBrew);
        let (name, _) = self.expect_identifier("a method name")?;
        self.expect(Token::LParen, "`(` after the method name")?;
        let args = self.parse_params()?;
        let return_type = self.parse_return_annot()?.map(|(annot, _)| annot);
        Ok(MethodSignature {
            name,
            args,
            return_type,
            range: start..self.last_end(),
        })
    }
}
