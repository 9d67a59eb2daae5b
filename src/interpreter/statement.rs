use crate::ast::{Literal, Stmt};
use crate::error::Spill;
use crate::interpreter::env::Env;
use crate::interpreter::module::default_binding;
use crate::interpreter::value::{Closure, Value};
use crate::interpreter::{Interpreter, Signal, ensure_sufficient_stack};

use std::ops::Range;
use std::rc::Rc;
use std::time::Duration;

impl Interpreter {
    /// Runs statements in `env` until one of them leaves the normal flow.
    pub(crate) fn exec_stmts(&mut self, stmts: &[(Stmt, Range<usize>)], env: &Rc<Env>) -> Result<Signal, Spill> {
        for stmt in stmts {
            match self.exec_stmt(stmt, env)? {
                Signal::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    /// Runs a block in a fresh child frame.
    fn exec_block(&mut self, stmts: &[(Stmt, Range<usize>)], env: &Rc<Env>) -> Result<Signal, Spill> {
        self.exec_stmts(stmts, &Env::with_parent(env))
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &(Stmt, Range<usize>), env: &Rc<Env>) -> Result<Signal, Spill> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(&stmt.0, env))
            .map_err(|spill| self.locate(spill, &stmt.1))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt, env: &Rc<Env>) -> Result<Signal, Spill> {
        match stmt {
            Stmt::Let { name, value, .. } => {
                let value = self.eval_expr(value, env)?;
                env.define(name, value);
            }
            Stmt::Expr(expr) => {
                self.eval_expr(expr, env)?;
            }
            Stmt::Print(values) => {
                let mut parts = Vec::with_capacity(values.len());
                for value in values {
                    parts.push(self.eval_expr(value, env)?.to_string());
                }
                self.write_line(&parts.join(" "))?;
            }
            Stmt::Block(body) => return self.exec_block(body, env),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition, env)?.is_truthy() {
                    return self.exec_block(then_branch, env);
                }
                if let Some(else_branch) = else_branch {
                    return self.exec_stmt(else_branch, env);
                }
            }
            Stmt::While { condition, body } => {
                while self.eval_expr(condition, env)?.is_truthy() {
                    match self.exec_block(body, env)? {
                        Signal::Break => break,
                        Signal::Return(value) => return Ok(Signal::Return(value)),
                        Signal::Normal | Signal::Continue => {}
                    }
                }
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                let loop_env = Env::with_parent(env);
                if let Some(init) = init {
                    self.exec_stmt(init, &loop_env)?;
                }
                loop {
                    if let Some(condition) = condition {
                        if !self.eval_expr(condition, &loop_env)?.is_truthy() {
                            break;
                        }
                    }
                    match self.exec_block(body, &loop_env)? {
                        Signal::Break => break,
                        Signal::Return(value) => return Ok(Signal::Return(value)),
                        // `continue` still runs the update
                        Signal::Normal | Signal::Continue => {}
                    }
                    if let Some(update) = update {
                        self.eval_expr(update, &loop_env)?;
                    }
                }
            }
            Stmt::ForEach {
                var,
                iterable,
                body,
            } => {
                let iterable = self.eval_expr(iterable, env)?;
                for item in iteration_items(iterable)? {
                    let body_env = Env::with_parent(env);
                    body_env.define(var, item);
                    match self.exec_stmts(body, &body_env)? {
                        Signal::Break => break,
                        Signal::Return(value) => return Ok(Signal::Return(value)),
                        Signal::Normal | Signal::Continue => {}
                    }
                }
            }
            Stmt::Switch {
                scrutinee,
                cases,
                default,
            } => {
                let value = self.eval_expr(scrutinee, env)?;
                let case = cases
                    .iter()
                    .find(|case| literal_value(&case.label.0).equals(&value));
                match (case, default) {
                    (Some(case), _) => return self.exec_block(&case.body, env),
                    (None, Some(default)) => return self.exec_block(default, env),
                    (None, None) => {}
                }
            }
            Stmt::Try {
                body,
                binding,
                handler,
            } => match self.exec_block(body, env) {
                Ok(signal) => return Ok(signal),
                Err(spill) => {
                    tracing::debug!(kind = %spill.kind, message = %spill.message, "spill caught");
                    let handler_env = Env::with_parent(env);
                    if let Some(binding) = binding {
                        handler_env.define(binding, Value::String(spill.message));
                    }
                    return self.exec_stmts(handler, &handler_env);
                }
            },

            Stmt::Return(value) => {
                let value = match value {
                    Some(value) => self.eval_expr(value, env)?,
                    None => Value::Null,
                };
                return Ok(Signal::Return(value));
            }
            Stmt::Break => return Ok(Signal::Break),
            Stmt::Continue => return Ok(Signal::Continue),

            Stmt::Function(function) => {
                let closure = Closure {
                    decl: function.clone(),
                    env: env.clone(),
                    unit: self.current_unit,
                    receiver: None,
                };
                env.define(&function.name.0, Value::Function(Rc::new(closure)));
            }
            Stmt::Class(class) => self.declare_class(class, env)?,
            Stmt::Recipe(recipe) => env.define(&recipe.name.0, Value::Recipe(recipe.clone())),
            Stmt::Import { path, alias } => {
                let namespace = self.import(path)?;
                let name = alias.clone().unwrap_or_else(|| default_binding(path));
                env.define(&name, Value::Module(namespace));
            }
            Stmt::Sleep(seconds) => match self.eval_expr(seconds, env)? {
                Value::Number(n) if n >= 0.0 && n.is_finite() => {
                    std::thread::sleep(Duration::from_secs_f64(n));
                }
                other => {
                    return Err(Spill::type_mismatch(format!(
                        "brew_time expects a non-negative number of seconds, but got {}",
                        other
                    )));
                }
            },
        }
        Ok(Signal::Normal)
    }
}

/// What `pour x in value` walks: array elements (as of loop start),
/// characters of a string, or keys of an object.
fn iteration_items(value: Value) -> Result<Vec<Value>, Spill> {
    match value {
        Value::Array(elements) => Ok(elements.borrow().clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::String(c.to_string())).collect()),
        Value::Object(map) => Ok(map.borrow().keys().map(Value::string).collect()),
        other => Err(Spill::type_mismatch(format!(
            "Cannot pour over a {}",
            other.type_name()
        ))),
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Bool(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
    }
}
