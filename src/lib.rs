pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod stdlib;
pub mod tables;

pub use error::{BrewError, Spill, SpillKind};
pub use interpreter::Interpreter;
pub use interpreter::value::Value;

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

/// What a finished run hands back to the host.
#[derive(Debug)]
pub struct ExecutionResult {
    pub output: String,
    /// Value of the last top-level expression statement, `null` if none.
    pub value: Value,
}

/// An output sink that can be read back after the interpreter wrote to it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs a program with a fresh interpreter and captures what it prints.
pub fn execute(source: &str) -> Result<ExecutionResult, BrewError> {
    execute_at(source, None)
}

/// Like [`execute`], resolving imports relative to `path`.
pub fn execute_at(source: &str, path: Option<&Path>) -> Result<ExecutionResult, BrewError> {
    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::with_output(Box::new(buffer.clone()));
    let value = interpreter.run_source(source, path)?;
    Ok(ExecutionResult {
        output: buffer.contents(),
        value,
    })
}
