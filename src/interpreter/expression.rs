use crate::ast::{BinOp, Expr, UnOp};
use crate::error::{Spill, SpillKind};
use crate::interpreter::env::Env;
use crate::interpreter::value::{ObjectMap, Value, format_number};
use crate::interpreter::{Interpreter, ensure_sufficient_stack};
use crate::stdlib::registry;

use std::cmp::Ordering;
use std::ops::Range;
use std::rc::Rc;

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, expr: &(Expr, Range<usize>), env: &Rc<Env>) -> Result<Value, Spill> {
        ensure_sufficient_stack(|| self.eval_expr_inner(&expr.0, env))
            .map_err(|spill| self.locate(spill, &expr.1))
    }

    fn eval_args(&mut self, args: &[(Expr, Range<usize>)], env: &Rc<Env>) -> Result<Vec<Value>, Spill> {
        args.iter().map(|arg| self.eval_expr(arg, env)).collect()
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Rc<Env>) -> Result<Value, Spill> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Bool(b) => Ok(Value::Boolean(*b)),
            Expr::Null => Ok(Value::Null),

            Expr::Variable(name) => lookup(name, env),

            Expr::Array { elements } => Ok(Value::array(self.eval_args(elements, env)?)),
            Expr::Object { entries } => {
                let mut map = ObjectMap::new();
                for (key, value) in entries {
                    let value = self.eval_expr(value, env)?;
                    map.insert(key.clone(), value);
                }
                Ok(Value::object(map))
            }

            Expr::BinOp {
                operator: BinOp::And,
                l_value,
                r_value,
            } => {
                if !self.eval_expr(l_value, env)?.is_truthy() {
                    return Ok(Value::Boolean(false));
                }
                Ok(Value::Boolean(self.eval_expr(r_value, env)?.is_truthy()))
            }
            Expr::BinOp {
                operator: BinOp::Or,
                l_value,
                r_value,
            } => {
                if self.eval_expr(l_value, env)?.is_truthy() {
                    return Ok(Value::Boolean(true));
                }
                Ok(Value::Boolean(self.eval_expr(r_value, env)?.is_truthy()))
            }
            Expr::BinOp {
                operator,
                l_value,
                r_value,
            } => {
                let left = self.eval_expr(l_value, env)?;
                let right = self.eval_expr(r_value, env)?;
                binary_op(*operator, &left, &right)
            }
            Expr::UnOp { unop, expression } => {
                let value = self.eval_expr(expression, env)?;
                unary_op(*unop, value)
            }
            Expr::Assign { l_value, r_value } => self.assign(l_value, r_value, env),

            Expr::Call { function, args } => {
                let callee = self.eval_expr(function, env)?;
                let args = self.eval_args(args, env)?;
                self.call_value(callee, args)
            }
            Expr::Member { object, field_name } => {
                let object = self.eval_expr(object, env)?;
                self.get_member(object, field_name)
            }
            Expr::Index { array, index } => {
                let container = self.eval_expr(array, env)?;
                let index = self.eval_expr(index, env)?;
                get_index(&container, &index)
            }

            Expr::New { class_name, args } => {
                let class = match env.get(class_name) {
                    Some(Value::Class(class)) => class,
                    Some(other) => {
                        return Err(Spill::type_mismatch(format!(
                            "`{}` is a {}, not a bean",
                            class_name,
                            other.type_name()
                        )));
                    }
                    None => {
                        return Err(Spill::new(
                            SpillKind::UnboundName,
                            format!("Bean {} not found", class_name),
                        ));
                    }
                };
                let args = self.eval_args(args, env)?;
                self.instantiate(&class, args)
            }
            Expr::This => match env.receiver() {
                Some(receiver) => Ok(receiver.this.clone()),
                None => Err(Spill::new(
                    SpillKind::UnboundName,
                    "Cannot use 'this' outside of a bean",
                )),
            },
            Expr::SuperCall { method, args } => {
                let args = self.eval_args(args, env)?;
                self.call_super(method.as_deref(), args, env)
            }
            Expr::Grind(path) => Ok(Value::Module(self.import(path)?)),
        }
    }

    fn assign(
        &mut self,
        target: &(Expr, Range<usize>),
        value: &(Expr, Range<usize>),
        env: &Rc<Env>,
    ) -> Result<Value, Spill> {
        match &target.0 {
            Expr::Variable(name) => {
                let value = self.eval_expr(value, env)?;
                if let Err(value) = env.assign(name, value.clone()) {
                    env.define(name, value);
                }
                Ok(value)
            }
            Expr::Member { object, field_name } => {
                let object = self.eval_expr(object, env)?;
                let value = self.eval_expr(value, env)?;
                match &object {
                    Value::Instance(instance) => {
                        instance
                            .borrow_mut()
                            .fields
                            .insert(field_name.clone(), value.clone());
                    }
                    Value::Object(map) => map.borrow_mut().insert(field_name.clone(), value.clone()),
                    Value::Module(module) => {
                        return Err(Spill::type_mismatch(format!(
                            "Module {} is read-only, cannot assign `{}`",
                            module.name, field_name
                        )));
                    }
                    other => {
                        return Err(Spill::type_mismatch(format!(
                            "Cannot set field `{}` on a {}",
                            field_name,
                            other.type_name()
                        )));
                    }
                }
                Ok(value)
            }
            Expr::Index { array, index } => {
                let container = self.eval_expr(array, env)?;
                let index = self.eval_expr(index, env)?;
                let value = self.eval_expr(value, env)?;
                match (&container, &index) {
                    (Value::Array(elements), Value::Number(n)) => {
                        let mut elements = elements.borrow_mut();
                        let len = elements.len();
                        let slot = array_index(*n, len).and_then(|i| elements.get_mut(i));
                        match slot {
                            Some(slot) => *slot = value.clone(),
                            None => return Err(out_of_bounds(*n, len)),
                        }
                    }
                    (Value::Object(map), Value::String(key)) => {
                        map.borrow_mut().insert(key.clone(), value.clone());
                    }
                    (container, index) => {
                        return Err(Spill::type_mismatch(format!(
                            "Cannot assign into a {} with a {} index",
                            container.type_name(),
                            index.type_name()
                        )));
                    }
                }
                Ok(value)
            }
            _ => Err(Spill::type_mismatch("Invalid assignment target")),
        }
    }

    pub(crate) fn get_member(&mut self, object: Value, name: &str) -> Result<Value, Spill> {
        match &object {
            Value::Instance(instance) => {
                let (field, class) = {
                    let instance = instance.borrow();
                    (instance.fields.get(name).cloned(), instance.class.clone())
                };
                if let Some(field) = field {
                    return Ok(field);
                }
                match self.find_method(class.id, name) {
                    Some((owner, method)) => Ok(self.bind_method(object.clone(), owner, method)),
                    None => Err(Spill::new(
                        SpillKind::UndefinedMethod,
                        format!("Bean {} has no field or method `{}`", class.name, name),
                    )),
                }
            }
            Value::Object(map) => map.borrow().get(name).cloned().ok_or_else(|| {
                Spill::new(
                    SpillKind::UndefinedMethod,
                    format!("Member '{}' not found on object", name),
                )
            }),
            Value::Module(module) => module.get(name).ok_or_else(|| {
                Spill::new(
                    SpillKind::UnboundName,
                    format!("Module {} has no binding `{}`", module.name, name),
                )
            }),
            Value::Array(elements) if name == "length" => Ok(Value::Number(elements.borrow().len() as f64)),
            Value::String(s) if name == "length" => Ok(Value::Number(s.chars().count() as f64)),
            Value::Array(_) | Value::String(_) => Err(Spill::new(
                SpillKind::UndefinedMethod,
                format!("A {} has no member `{}`", object.type_name(), name),
            )),
            other => Err(Spill::type_mismatch(format!(
                "Cannot read `.{}` from a {}",
                name,
                other.type_name()
            ))),
        }
    }
}

/// Frames first, then builtins.
fn lookup(name: &str, env: &Rc<Env>) -> Result<Value, Spill> {
    if let Some(value) = env.get(name) {
        return Ok(value);
    }
    if let Some(builtin) = registry().get(name) {
        return Ok(Value::Native(builtin));
    }
    Err(Spill::new(
        SpillKind::UnboundName,
        format!("Variable {} not found", name),
    ))
}

fn array_index(n: f64, len: usize) -> Option<usize> {
    (n >= 0.0 && n.fract() == 0.0 && n < len as f64).then_some(n as usize)
}

fn out_of_bounds(n: f64, len: usize) -> Spill {
    Spill::new(
        SpillKind::IndexOutOfRange,
        format!("Index {} out of bounds for length {}", format_number(n), len),
    )
}

fn get_index(container: &Value, index: &Value) -> Result<Value, Spill> {
    match (container, index) {
        (Value::Array(elements), Value::Number(n)) => {
            let elements = elements.borrow();
            array_index(*n, elements.len())
                .and_then(|i| elements.get(i).cloned())
                .ok_or_else(|| out_of_bounds(*n, elements.len()))
        }
        (Value::String(s), Value::Number(n)) => {
            let len = s.chars().count();
            array_index(*n, len)
                .and_then(|i| s.chars().nth(i))
                .map(|c| Value::String(c.to_string()))
                .ok_or_else(|| out_of_bounds(*n, len))
        }
        (Value::Object(map), Value::String(key)) => map.borrow().get(key).cloned().ok_or_else(|| {
            Spill::new(
                SpillKind::IndexOutOfRange,
                format!("No key \"{}\" in object", key),
            )
        }),
        (container, index) => Err(Spill::type_mismatch(format!(
            "Cannot index a {} with a {}",
            container.type_name(),
            index.type_name()
        ))),
    }
}

fn binary_op(operator: BinOp, left: &Value, right: &Value) -> Result<Value, Spill> {
    use Value::{Number, String};

    match (operator, left, right) {
        (BinOp::Add, Number(a), Number(b)) => Ok(Number(a + b)),
        (BinOp::Add, String(_), _) | (BinOp::Add, _, String(_)) => {
            Ok(String(format!("{}{}", left, right)))
        }
        (BinOp::Sub, Number(a), Number(b)) => Ok(Number(a - b)),
        (BinOp::Mul, Number(a), Number(b)) => Ok(Number(a * b)),
        (BinOp::Div | BinOp::Mod, Number(_), Number(b)) if *b == 0.0 => {
            Err(Spill::new(SpillKind::DivisionByZero, "Division by zero!"))
        }
        (BinOp::Div, Number(a), Number(b)) => Ok(Number(a / b)),
        (BinOp::Mod, Number(a), Number(b)) => Ok(Number(a % b)),

        (BinOp::Eq, _, _) => Ok(Value::Boolean(left.equals(right))),
        (BinOp::NotEq, _, _) => Ok(Value::Boolean(!left.equals(right))),
        (BinOp::Less | BinOp::Greater | BinOp::LessEq | BinOp::GreaterEq, _, _) => {
            let ordering = compare(left, right)?;
            let result = match operator {
                BinOp::Less => ordering == Ordering::Less,
                BinOp::Greater => ordering == Ordering::Greater,
                BinOp::LessEq => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Boolean(result))
        }

        (BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr, Number(a), Number(b)) => {
            let (a, b) = (*a as i64, *b as i64);
            let result = match operator {
                BinOp::BitAnd => a & b,
                BinOp::BitOr => a | b,
                BinOp::BitXor => a ^ b,
                // shift amounts wrap at 64 bits
                BinOp::Shl => a.wrapping_shl(b as u32),
                _ => a.wrapping_shr(b as u32),
            };
            Ok(Number(result as f64))
        }

        _ => Err(Spill::type_mismatch(format!(
            "Cannot apply `{}` to a {} and a {}",
            operator.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Numbers by value, strings lexicographically.
fn compare(left: &Value, right: &Value) -> Result<Ordering, Spill> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => {
            return Err(Spill::type_mismatch(format!(
                "Cannot compare a {} with a {}",
                left.type_name(),
                right.type_name()
            )));
        }
    };
    ordering.ok_or_else(|| Spill::type_mismatch("Cannot order NaN"))
}

fn unary_op(unop: UnOp, value: Value) -> Result<Value, Spill> {
    match (unop, value) {
        (UnOp::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnOp::Minus, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnOp::Not, value) => Ok(Value::Boolean(!value.is_truthy())),
        (UnOp::BitNot, Value::Number(n)) => Ok(Value::Number(!(n as i64) as f64)),
        (unop, value) => {
            let symbol = match unop {
                UnOp::Minus => "-",
                UnOp::Not => "!",
                UnOp::BitNot => "~",
            };
            Err(Spill::type_mismatch(format!(
                "Operand of `{}` must be a number, not a {}",
                symbol,
                value.type_name()
            )))
        }
    }
}
