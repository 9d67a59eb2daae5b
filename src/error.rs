use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::position::{LineIndex, Position};

use ariadne::{Color, ColorGenerator, Config, Fmt, Label, Report, ReportKind, Source};
use yansi::Paint;
use thiserror::Error;

use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpillKind {
    UnboundName,
    TypeMismatch,
    DivisionByZero,
    IndexOutOfRange,
    UndefinedMethod,
    FileNotFound,
    CircularImport,
    IoFailure,
    ImportFailed,
    StackOverflow,
}

impl SpillKind {
    pub fn name(self) -> &'static str {
        match self {
            SpillKind::UnboundName => "UnboundName",
            SpillKind::TypeMismatch => "TypeMismatch",
            SpillKind::DivisionByZero => "DivisionByZero",
            SpillKind::IndexOutOfRange => "IndexOutOfRange",
            SpillKind::UndefinedMethod => "UndefinedMethod",
            SpillKind::FileNotFound => "FileNotFound",
            SpillKind::CircularImport => "CircularImport",
            SpillKind::IoFailure => "IoFailure",
            SpillKind::ImportFailed => "ImportFailed",
            SpillKind::StackOverflow => "StackOverflow",
        }
    }
}

impl fmt::Display for SpillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime error. Raised by the evaluator and by builtins, caught by
/// `taste_carefully`/`if_spilled`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message} at {position}")]
pub struct Spill {
    pub kind: SpillKind,
    pub message: String,
    pub span: Range<usize>,
    /// Zero until the spill is located in a source unit.
    pub position: Position,
    pub file: Option<String>,
}

impl Spill {
    pub fn new(kind: SpillKind, message: impl Into<String>) -> Self {
        Spill {
            kind,
            message: message.into(),
            span: 0..0,
            position: Position::default(),
            file: None,
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Spill::new(SpillKind::TypeMismatch, message)
    }

    pub fn is_located(&self) -> bool {
        self.position.line != 0
    }

    /// Attaches a source location unless an inner expression already did.
    pub fn locate(mut self, span: Range<usize>, index: &LineIndex, file: Option<&str>) -> Self {
        if !self.is_located() {
            self.position = index.position(span.start);
            self.span = span;
            self.file = file.map(str::to_string);
        }
        self
    }
}

impl From<std::io::Error> for Spill {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SpillKind::FileNotFound,
            _ => SpillKind::IoFailure,
        };
        Spill::new(kind, err.to_string())
    }
}

/// Everything that can stop a run, as seen by the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrewError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Spill(#[from] Spill),
}

impl BrewError {
    pub fn kind(&self) -> &'static str {
        match self {
            BrewError::Lex(_) => "LexError",
            BrewError::Parse(_) => "ParseError",
            BrewError::Spill(spill) => spill.kind.name(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            BrewError::Lex(err) => err.message.clone(),
            BrewError::Parse(err) => format!("expected {}, found {}", err.expected, err.found),
            BrewError::Spill(spill) => spill.message.clone(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            BrewError::Lex(err) => err.position,
            BrewError::Parse(err) => err.position,
            BrewError::Spill(spill) => spill.position,
        }
    }

    pub fn span(&self) -> Range<usize> {
        match self {
            BrewError::Lex(err) => err.span.clone(),
            BrewError::Parse(err) => err.span.clone(),
            BrewError::Spill(spill) => spill.span.clone(),
        }
    }

    /// Builds the ariadne report for this error. `file` names the unit the
    /// source text came from; spills raised in another unit carry their own.
    pub fn report(&self, file: &str) -> Report<'static, (String, Range<usize>)> {
        let file = match self {
            BrewError::Spill(Spill { file: Some(origin), .. }) => origin.clone(),
            _ => file.to_string(),
        };
        let span = self.span();
        let mut colors = ColorGenerator::new();

        let (code, label, title) = match self {
            BrewError::Lex(err) => ("LexError", err.message.clone(), "could not read this brew"),
            BrewError::Parse(err) => (
                "SyntaxError",
                format!(
                    "expected {}, found {}",
                    err.expected,
                    Fmt::fg(&err.found, Color::Red).bold()
                ),
                "unexpected token",
            ),
            BrewError::Spill(spill) => (
                spill.kind.name(),
                spill.message.clone(),
                "the brew spilled",
            ),
        };

        let mut report = Report::build(ReportKind::Error, (file.clone(), span.clone()))
            .with_config(Config::default().with_color(yansi::is_enabled()))
            .with_code(code)
            .with_message(title)
            .with_label(
                Label::new((file, span))
                    .with_message(label)
                    .with_color(colors.next()),
            );
        match self {
            BrewError::Parse(ParseError { note: Some(note), .. }) => {
                report = report.with_note(note);
            }
            BrewError::Spill(_) => {
                report = report.with_note(format!(
                    "wrap the code in {} to recover from spills",
                    Fmt::fg("taste_carefully { ... } if_spilled (e) { ... }", Color::Yellow).bold(),
                ));
            }
            _ => {}
        }
        report.finish()
    }

    /// Prints the diagnostic to stderr against the given source text.
    pub fn eprint(&self, file: &str, source: &str) -> std::io::Result<()> {
        let report = self.report(file);
        let origin = match self {
            BrewError::Spill(Spill { file: Some(origin), .. }) => origin.clone(),
            _ => file.to_string(),
        };
        // spills from imported units are rendered against that unit's text
        let text = if origin == file {
            source.to_string()
        } else {
            std::fs::read_to_string(&origin).unwrap_or_default()
        };
        report.eprint((origin, Source::from(text)))
    }
}
