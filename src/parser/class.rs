use crate::ast::{Class, Field, Recipe, Stmt, Visibility};
use crate::lexer::Token;
use crate::parser::{ParseError, Parser};

use ariadne::{Color, Fmt};
use yansi::Paint;

use std::ops::Range;
use std::rc::Rc;

fn class_syntax() -> String {
    format!(
        "\
        The syntax for declaring a bean is:
            {} Name {} Parent {{
                beans field <- default
                brew method(args) {{ ... }}
            }}
        ",
        Fmt::fg("bean", Color::Yellow).bold(),
        Fmt::fg("blend", Color::Yellow).bold(),
    )
}

impl Parser {
    pub fn parse_class(&mut self) -> Result<(Stmt, Range<usize>), ParseError> {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let name = self
            .expect_identifier("a bean name")
            .map_err(|err| err.with_note(class_syntax()))?;
        let parent = if self.eat(&Token::KeywordBlend) {
            Some(self.expect_identifier("a parent bean after `blend`")?)
        } else {
            None
        };
        self.expect(Token::LBrace, "`{` to open the bean body")
            .map_err(|err| err.with_note(class_syntax()))?;

        let mut fields: Vec<Field> = vec![];
        let mut methods = vec![];
        while !self.eat(&Token::RBrace) {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            let visibility = if self.eat(&Token::KeywordPrivate) {
                Visibility::Private
            } else {
                self.eat(&Token::KeywordPublic);
                Visibility::Public
            };

            let is_method = self.eat(&Token::KeywordBrew)
                || matches!(
                    (self.peek(), self.peek_nth(1)),
                    (Some(Token::Variable(_)), Some(Token::LParen))
                );
            if is_method {
                methods.push((visibility, self.parse_function_rest()?));
                continue;
            }

            self.eat(&Token::KeywordBeans);
            let field_name = self
                .expect_identifier("a field or method declaration")
                .map_err(|err| err.with_note(class_syntax()))?;
            if fields.iter().any(|field| field.name.0 == field_name.0) {
                return Err(self.error_at(
                    "distinct field names",
                    format!("field `{}` declared twice", field_name.0),
                    field_name.1,
                ));
            }
            let type_annot = if self.eat(&Token::Colon) {
                Some(self.parse_type_annot()?.0)
            } else {
                None
            };
            self.expect(Token::Assign, "`<-` and a default value for the field")
                .map_err(|err| err.with_note(class_syntax()))?;
            let default = self.parse_expression()?;
            fields.push(Field {
                name: field_name,
                visibility,
                type_annot,
                default,
            });
        }

        Ok((
            Stmt::Class(Rc::new(Class {
                name,
                parent,
                fields,
                methods,
            })),
            span.start..self.last_end(),
        ))
    }

    /// `recipe Name { method(params) -> Type ... }`
    pub fn parse_recipe(&mut self) -> Result<(Stmt, Range<usize>), ParseError> {
        let Some((_, span)) = self.next() else {
            unreachable!()
        };
        let name = self.expect_identifier("a recipe name")?;
        self.expect(Token::LBrace, "`{` to open the recipe body")?;
        let mut methods = vec![];
        while !self.eat(&Token::RBrace) {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            methods.push(self.parse_method_signature()?);
        }
        Ok((
            Stmt::Recipe(Rc::new(Recipe { name, methods })),
            span.start..self.last_end(),
        ))
    }
}
