use crate::error::Spill;
use crate::interpreter::value::Value;
use crate::stdlib::{Arity, Category, NativeContext, NativeFn, Registry};

pub fn add_type_functions(registry: &mut Registry) {
    let mut add = |name: &'static str, arity: Arity, summary: &'static str, func: NativeFn| {
        registry.insert(Category::Type, name, arity, summary, func)
    };

    // is_number(x: any) -> boolean
    add("is_number", Arity::Exact(1), "true for numbers", is_number);
    // is_string(x: any) -> boolean
    add("is_string", Arity::Exact(1), "true for strings", is_string);
    // is_cup(x: any) -> boolean
    add("is_cup", Arity::Exact(1), "true for arrays", is_cup);
    // is_boolean_bean(x: any) -> boolean
    add("is_boolean_bean", Arity::Exact(1), "true for booleans", is_boolean_bean);
    // is_brew(x: any) -> boolean
    add("is_brew", Arity::Exact(1), "true for anything callable", is_brew);
    // type_of_bean(x: any) -> string
    add("type_of_bean", Arity::Exact(1), "name of the value's type", type_of_bean);
    // to_string(x: any) -> string
    add("to_string", Arity::Exact(1), "display form of a value", to_string);
    // to_number(x: number | string | boolean) -> number
    add("to_number", Arity::Exact(1), "parse a string as a number", to_number);

    registry.alias("is_array", "is_cup");
    registry.alias("is_boolean", "is_boolean_bean");
    registry.alias("is_function", "is_brew");
    registry.alias("type_of", "type_of_bean");
}

fn is_number(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Boolean(matches!(args[0], Value::Number(_))))
}

fn is_string(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Boolean(matches!(args[0], Value::String(_))))
}

fn is_cup(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Boolean(matches!(args[0], Value::Array(_))))
}

fn is_boolean_bean(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Boolean(matches!(args[0], Value::Boolean(_))))
}

fn is_brew(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Boolean(args[0].is_callable()))
}

fn type_of_bean(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::string(args[0].type_name()))
}

fn to_string(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::String(args[0].to_string()))
}

fn to_number(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    match &args[0] {
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::Boolean(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s.trim().parse::<f64>().map(Value::Number).map_err(|_| {
            Spill::type_mismatch(format!("to_number() cannot read {:?} as a number", s))
        }),
        other => Err(Spill::type_mismatch(format!(
            "to_number() expects a number, string or boolean, but got {}",
            other.type_name()
        ))),
    }
}
