pub mod class;
pub mod env;
pub mod expression;
pub mod module;
pub mod statement;
pub mod value;


use crate::ast::Program;
use crate::error::{BrewError, Spill, SpillKind};
use crate::parser::parse_program;
use crate::position::{LineIndex, Span};
use crate::stdlib::{Arity, NativeContext};

use class::ClassInfo;
use env::Env;
use module::ModuleCache;
use value::{Closure, Value};

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Brew calls nested deeper than this spill with `StackOverflow`.
pub const MAX_CALL_DEPTH: usize = 10_000;

const RED_ZONE: usize = 100 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first growing the native stack if less than `RED_ZONE` is left.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// How a statement finished.
#[derive(Debug)]
pub enum Signal {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// One piece of source text the interpreter has run, for error positions and
/// relative imports.
pub struct SourceUnit {
    pub name: Option<String>,
    pub dir: PathBuf,
    pub index: LineIndex,
}

impl SourceUnit {
    pub fn new(source: &str, path: Option<&Path>) -> Self {
        let dir = path
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        SourceUnit {
            name: path.map(|path| path.display().to_string()),
            dir,
            index: LineIndex::new(source),
        }
    }
}

pub struct Interpreter {
    globals: Rc<Env>,
    classes: Vec<ClassInfo>,
    units: Vec<SourceUnit>,
    current_unit: usize,
    modules: ModuleCache,
    output: Box<dyn Write>,
    input: Box<dyn BufRead>,
    call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_io(Box::new(io::stdout()), Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn with_output(output: Box<dyn Write>) -> Self {
        Interpreter::with_io(output, Box::new(io::empty()))
    }

    pub fn with_io(output: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        Interpreter {
            globals: Env::new(),
            classes: vec![],
            // unit 0 stands for code that never came from a file
            units: vec![SourceUnit::new("", None)],
            current_unit: 0,
            modules: ModuleCache::default(),
            output,
            input,
            call_depth: 0,
        }
    }

    pub fn globals(&self) -> &Rc<Env> {
        &self.globals
    }

    pub fn modules(&self) -> &ModuleCache {
        &self.modules
    }

    /// Forgets loaded modules so the next import runs them again.
    pub fn clear_module_cache(&mut self) {
        self.modules.clear();
    }

    /// Runs one unit in the global frame. Yields the value of the last
    /// top-level expression statement, or of a top-level `serve`.
    pub fn run_source(&mut self, source: &str, path: Option<&Path>) -> Result<Value, BrewError> {
        let program = parse_program(source)?;
        let path = match path {
            Some(path) => Some(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())),
            None => None,
        };
        let unit = self.add_unit(SourceUnit::new(source, path.as_deref()));
        if let Some(path) = &path {
            self.modules.enter(path.clone());
        }
        let globals = self.globals.clone();
        let result = self.in_unit(unit, |this| this.exec_program(&program, &globals));
        if path.is_some() {
            self.modules.leave();
        }
        self.output.flush().map_err(Spill::from)?;
        Ok(result?)
    }

    pub fn run_file(&mut self, path: &Path) -> Result<Value, BrewError> {
        let source = fs::read_to_string(path).map_err(|err| {
            let mut spill = Spill::from(err);
            spill.message = format!("Could not read '{}': {}", path.display(), spill.message);
            spill
        })?;
        self.run_source(&source, Some(path))
    }

    pub(crate) fn add_unit(&mut self, unit: SourceUnit) -> usize {
        self.units.push(unit);
        self.units.len() - 1
    }

    pub(crate) fn in_unit<R>(&mut self, unit: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.current_unit, unit);
        let result = f(self);
        self.current_unit = previous;
        result
    }

    pub(crate) fn exec_program(&mut self, program: &Program, env: &Rc<Env>) -> Result<Value, Spill> {
        let mut last = Value::Null;
        for stmt in program {
            if let Some(expr) = stmt.0.as_expression() {
                last = self.eval_expr(expr, env)?;
                continue;
            }
            match self.exec_stmt(stmt, env)? {
                Signal::Return(value) => return Ok(value),
                // the parser keeps `break`/`continue` inside loops
                Signal::Normal | Signal::Break | Signal::Continue => {}
            }
        }
        Ok(last)
    }

    /// Pins an unlocated spill to `span` in the running unit.
    pub(crate) fn locate(&self, spill: Spill, span: &Span) -> Spill {
        let unit = &self.units[self.current_unit];
        spill.locate(span.clone(), &unit.index, unit.name.as_deref())
    }

    pub(crate) fn native_context(&mut self) -> NativeContext<'_> {
        NativeContext {
            output: &mut *self.output,
            input: &mut *self.input,
        }
    }

    pub(crate) fn write_line(&mut self, line: &str) -> Result<(), Spill> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    pub fn call_value(&mut self, callee: Value, args: Vec<Value>) -> Result<Value, Spill> {
        match callee {
            Value::Function(closure) => self.call_closure(&closure, args),
            Value::Native(builtin) => {
                let mut ctx = self.native_context();
                builtin.call(&mut ctx, &args)
            }
            Value::Class(class) => self.instantiate(&class, args),
            other => Err(Spill::type_mismatch(format!(
                "This {} is not a brew you can call",
                other.type_name()
            ))),
        }
    }

    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> Result<Value, Spill> {
        let decl = &closure.decl;
        if args.len() != decl.args.len() {
            return Err(Spill::type_mismatch(format!(
                "{}() expects {}, but got {}",
                closure.name(),
                Arity::Exact(decl.args.len()),
                args.len()
            )));
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(Spill::new(
                SpillKind::StackOverflow,
                format!(
                    "Calls nested deeper than {} frames while brewing {}()",
                    MAX_CALL_DEPTH,
                    closure.name()
                ),
            ));
        }

        let env = match &closure.receiver {
            Some(receiver) => Env::for_method(&closure.env, receiver.clone()),
            None => Env::with_parent(&closure.env),
        };
        for (param, arg) in decl.args.iter().zip(args) {
            env.define(&param.name, arg);
        }

        self.call_depth += 1;
        tracing::trace!(brew = closure.name(), depth = self.call_depth, "call");
        let result = self.in_unit(closure.unit, |this| {
            ensure_sufficient_stack(|| this.exec_stmts(&decl.body, &env))
        });
        self.call_depth -= 1;

        match result? {
            Signal::Return(value) => Ok(value),
            _ => Ok(Value::Null),
        }
    }
}
