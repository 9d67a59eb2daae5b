use logos::{FilterResult, Lexer, Logos};
use thiserror::Error;

use crate::position::{LineIndex, Position, Span};

use std::fmt;

#[cfg(test)]
pub mod test;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexErrorKind {
    #[default]
    UnrecognizedCharacter,
    UnterminatedString,
    UnterminatedComment,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub span: Span,
    pub position: Position,
}

impl LexError {
    fn new(kind: LexErrorKind, span: Span, source: &str) -> Self {
        let message = match kind {
            LexErrorKind::UnrecognizedCharacter => format!(
                "unrecognized character '{}'",
                source.get(span.clone()).unwrap_or("?")
            ),
            LexErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            LexErrorKind::UnterminatedComment => "unterminated block comment".to_string(),
        };
        let position = LineIndex::new(source).position(span.start);
        LexError {
            kind,
            message,
            span,
            position,
        }
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \n\r\t\f]+")] // Ignore this regex pattern between tokens
#[logos(skip r"//[^\n]*")]
#[logos(skip r"🎀[^\n]*")]
#[derive(Clone)]
pub enum Token {
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[token("\"", |lex| lex_string(lex, '"'))]
    #[token("'", |lex| lex_string(lex, '\''))]
    String(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Variable(String),

    // never emitted, the callback always skips or fails
    #[token("/*", block_comment)]
    BlockComment,

    // operators, each with its symbol and its operator word
    #[token("+")]
    #[token("add")]
    Plus,

    #[token("-")]
    #[token("sip")]
    Minus,

    #[token("*")]
    #[token("brew_op")]
    Mul,

    #[token("/")]
    #[token("pour_op")]
    Div,

    #[token("%")]
    #[token("grounds")]
    Mod,

    #[token("==")]
    #[token("same_blend")]
    Eq,

    #[token("!=")]
    #[token("different_blend")]
    NotEq,

    #[token("<")]
    #[token("less_caffeine")]
    Less,

    #[token(">")]
    #[token("more_caffeine")]
    Greater,

    #[token("<=")]
    #[token("not_stronger")]
    LessEq,

    #[token(">=")]
    #[token("not_weaker")]
    GreaterEq,

    #[token("&&")]
    #[token("with")]
    And,

    #[token("||")]
    #[token("or")]
    Or,

    #[token("!")]
    #[token("no_foam")]
    Not,

    #[token("&")]
    #[token("blend_with")]
    BitAnd,

    #[token("|")]
    #[token("top_with")]
    BitOr,

    #[token("^")]
    #[token("spice")]
    BitXor,

    #[token("~")]
    #[token("invert")]
    BitNot,

    #[token("<<")]
    #[token("double_shot")]
    Shl,

    #[token(">>")]
    #[token("half_caf")]
    Shr,

    #[token("<-")]
    #[token("=")]
    #[token("pour_in")]
    #[token("refill_with")]
    Assign,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    // keywords
    #[token("beans")]
    #[token("let")]
    KeywordBeans,

    #[token("bean")]
    #[token("class")]
    KeywordBean,

    #[token("blend")]
    #[token("extends")]
    KeywordBlend,

    #[token("recipe")]
    #[token("interface")]
    KeywordRecipe,

    #[token("brew")]
    #[token("function")]
    #[token("fn")]
    KeywordBrew,

    #[token("taste")]
    #[token("if")]
    KeywordTaste,

    #[token("otherwise")]
    #[token("else")]
    KeywordOtherwise,

    #[token("steep")]
    #[token("while")]
    KeywordSteep,

    #[token("pour")]
    #[token("for")]
    KeywordPour,

    #[token("foreach")]
    KeywordForeach,

    #[token("in")]
    KeywordIn,

    #[token("roast")]
    #[token("switch")]
    KeywordRoast,

    #[token("case")]
    KeywordCase,

    #[token("default")]
    KeywordDefault,

    #[token("serve")]
    #[token("return")]
    KeywordServe,

    #[token("break")]
    KeywordBreak,

    #[token("continue")]
    KeywordContinue,

    #[token("this")]
    KeywordThis,

    #[token("super")]
    KeywordSuper,

    #[token("new")]
    KeywordNew,

    #[token("null")]
    KeywordNull,

    #[token("taste_carefully")]
    #[token("try")]
    KeywordTasteCarefully,

    #[token("if_spilled")]
    #[token("catch")]
    KeywordIfSpilled,

    #[token("grind")]
    #[token("import")]
    KeywordGrind,

    #[token("as")]
    KeywordAs,

    #[token("pourout")]
    KeywordPourout,

    #[token("brew_time")]
    KeywordBrewTime,

    #[token("public")]
    KeywordPublic,

    #[token("private")]
    KeywordPrivate,
}

fn lex_string(lex: &mut Lexer<Token>, quote: char) -> Result<String, LexErrorKind> {
    let mut value = String::new();
    let mut chars = lex.remainder().char_indices();
    while let Some((offset, c)) = chars.next() {
        if c == quote {
            lex.bump(offset + c.len_utf8());
            return Ok(value);
        }
        if c != '\\' {
            value.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            break;
        };
        value.push(match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        });
    }
    lex.bump(lex.remainder().len());
    Err(LexErrorKind::UnterminatedString)
}

/// Skips a (possibly nested) block comment whose opening `/*` was just matched.
fn block_comment(lex: &mut Lexer<Token>) -> FilterResult<(), LexErrorKind> {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1;
    let mut i = 0;
    while i + 1 < rest.len() {
        match (rest[i], rest[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return FilterResult::Skip;
                }
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    FilterResult::Error(LexErrorKind::UnterminatedComment)
}

pub type SpannedToken = (Token, Span);

/// Lexes a whole source unit. The first malformed token aborts.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut tokens = vec![];
    for (token, span) in Token::lexer(source).spanned() {
        match token {
            Ok(Token::BlockComment) => {}
            Ok(token) => tokens.push((token, span)),
            Err(kind) => return Err(LexError::new(kind, span, source)),
        }
    }
    Ok(tokens)
}

/// Like [`tokenize`], with every token tagged by its line and column.
pub fn tokenize_with_positions(source: &str) -> Result<Vec<(Token, Position)>, LexError> {
    let index = LineIndex::new(source);
    Ok(tokenize(source)?
        .into_iter()
        .map(|(token, span)| (token, index.position(span.start)))
        .collect())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Bool(b) => return write!(f, "boolean `{}`", b),
            Token::Number(n) => return write!(f, "number `{}`", n),
            Token::String(s) => return write!(f, "string \"{}\"", s),
            Token::Variable(name) => return write!(f, "identifier `{}`", name),
            Token::BlockComment => "comment",
            Token::Plus => "`+`",
            Token::Minus => "`-`",
            Token::Mul => "`*`",
            Token::Div => "`/`",
            Token::Mod => "`%`",
            Token::Eq => "`==`",
            Token::NotEq => "`!=`",
            Token::Less => "`<`",
            Token::Greater => "`>`",
            Token::LessEq => "`<=`",
            Token::GreaterEq => "`>=`",
            Token::And => "`&&`",
            Token::Or => "`||`",
            Token::Not => "`!`",
            Token::BitAnd => "`&`",
            Token::BitOr => "`|`",
            Token::BitXor => "`^`",
            Token::BitNot => "`~`",
            Token::Shl => "`<<`",
            Token::Shr => "`>>`",
            Token::Assign => "`<-`",
            Token::Arrow => "`->`",
            Token::LParen => "`(`",
            Token::RParen => "`)`",
            Token::LBrace => "`{`",
            Token::RBrace => "`}`",
            Token::LBracket => "`[`",
            Token::RBracket => "`]`",
            Token::Comma => "`,`",
            Token::Semicolon => "`;`",
            Token::Colon => "`:`",
            Token::Dot => "`.`",
            Token::KeywordBeans => "`beans`",
            Token::KeywordBean => "`bean`",
            Token::KeywordBlend => "`blend`",
            Token::KeywordRecipe => "`recipe`",
            Token::KeywordBrew => "`brew`",
            Token::KeywordTaste => "`taste`",
            Token::KeywordOtherwise => "`otherwise`",
            Token::KeywordSteep => "`steep`",
            Token::KeywordPour => "`pour`",
            Token::KeywordForeach => "`foreach`",
            Token::KeywordIn => "`in`",
            Token::KeywordRoast => "`roast`",
            Token::KeywordCase => "`case`",
            Token::KeywordDefault => "`default`",
            Token::KeywordServe => "`serve`",
            Token::KeywordBreak => "`break`",
            Token::KeywordContinue => "`continue`",
            Token::KeywordThis => "`this`",
            Token::KeywordSuper => "`super`",
            Token::KeywordNew => "`new`",
            Token::KeywordNull => "`null`",
            Token::KeywordTasteCarefully => "`taste_carefully`",
            Token::KeywordIfSpilled => "`if_spilled`",
            Token::KeywordGrind => "`grind`",
            Token::KeywordAs => "`as`",
            Token::KeywordPourout => "`pourout`",
            Token::KeywordBrewTime => "`brew_time`",
            Token::KeywordPublic => "`public`",
            Token::KeywordPrivate => "`private`",
        };
        f.write_str(text)
    }
}
