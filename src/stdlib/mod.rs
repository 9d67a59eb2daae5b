pub mod collections;
pub mod io;
pub mod math;
pub mod string;
pub mod types;
pub mod util;

#[cfg(test)]
pub mod test;

use crate::error::Spill;
use crate::interpreter::value::Value;

use rustc_hash::FxHashMap;

use std::cell::RefCell;
use std::fmt;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::sync::OnceLock;

pub type NativeFn = fn(&mut NativeContext, &[Value]) -> Result<Value, Spill>;

/// What a builtin can reach besides its arguments.
pub struct NativeContext<'a> {
    pub output: &'a mut dyn Write,
    pub input: &'a mut dyn BufRead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    Variadic(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::Variadic(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "1 argument"),
            Arity::Exact(n) => write!(f, "{} arguments", n),
            Arity::Range(min, max) => write!(f, "{} to {} arguments", min, max),
            Arity::Variadic(min) => write!(f, "at least {} arguments", min),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Math,
    String,
    Array,
    Type,
    Utility,
    File,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Math => "math",
            Category::String => "string",
            Category::Array => "array",
            Category::Type => "type",
            Category::Utility => "utility",
            Category::File => "file",
        };
        f.write_str(name)
    }
}

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub category: Category,
    pub summary: &'static str,
    pub func: NativeFn,
}

impl Builtin {
    pub fn call(&self, ctx: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
        if !self.arity.accepts(args.len()) {
            return Err(Spill::type_mismatch(format!(
                "{}() expects {}, but got {}",
                self.name,
                self.arity,
                args.len()
            )));
        }
        (self.func)(ctx, args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("category", &self.category)
            .finish()
    }
}

/// The native function table. Built once and shared by every interpreter.
#[derive(Default)]
pub struct Registry {
    rows: Vec<Builtin>,
    by_name: FxHashMap<&'static str, usize>,
}

impl Registry {
    pub fn insert(
        &mut self,
        category: Category,
        name: &'static str,
        arity: Arity,
        summary: &'static str,
        func: NativeFn,
    ) {
        self.by_name.insert(name, self.rows.len());
        self.rows.push(Builtin {
            name,
            arity,
            category,
            summary,
            func,
        });
    }

    /// Registers `alias` as another row for the already registered `name`.
    pub fn alias(&mut self, alias: &'static str, name: &str) {
        let Some(&index) = self.by_name.get(name) else {
            return;
        };
        let row = &self.rows[index];
        let (category, arity, summary, func) = (row.category, row.arity, row.summary, row.func);
        self.insert(category, alias, arity, summary, func);
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.by_name.get(name).map(|&index| &self.rows[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn add_stdlib(registry: &mut Registry) {
    math::add_math_functions(registry);
    string::add_string_functions(registry);
    collections::add_collections(registry);
    types::add_type_functions(registry);
    util::add_util_functions(registry);
    io::add_io_functions(registry);
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut registry = Registry::default();
        add_stdlib(&mut registry);
        registry
    })
}

/// Every builtin in registration order, aliases included. Read-only data for
/// completion and hover.
pub fn catalog() -> &'static [Builtin] {
    &registry().rows
}

pub(crate) fn number_arg(name: &str, args: &[Value], index: usize) -> Result<f64, Spill> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        other => Err(arg_mismatch(name, index, "a number", other)),
    }
}

pub(crate) fn string_arg<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a str, Spill> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        other => Err(arg_mismatch(name, index, "a string", other)),
    }
}

pub(crate) fn array_arg(name: &str, args: &[Value], index: usize) -> Result<Rc<RefCell<Vec<Value>>>, Spill> {
    match args.get(index) {
        Some(Value::Array(elements)) => Ok(elements.clone()),
        other => Err(arg_mismatch(name, index, "an array", other)),
    }
}

/// Non-negative whole number, for indices and lengths.
pub(crate) fn count_arg(name: &str, args: &[Value], index: usize) -> Result<usize, Spill> {
    let n = number_arg(name, args, index)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(Spill::type_mismatch(format!(
            "{}() expects a whole, non-negative number as argument {}, but got {}",
            name,
            index + 1,
            crate::interpreter::value::format_number(n)
        )));
    }
    Ok(n as usize)
}

fn arg_mismatch(name: &str, index: usize, expected: &str, found: Option<&Value>) -> Spill {
    let found = found.map(Value::type_name).unwrap_or("nothing");
    Spill::type_mismatch(format!(
        "{}() expects {} as argument {}, but got {}",
        name,
        expected,
        index + 1,
        found
    ))
}
