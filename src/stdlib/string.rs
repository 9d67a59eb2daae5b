use crate::error::Spill;
use crate::interpreter::value::Value;
use crate::stdlib::{Arity, Category, NativeContext, NativeFn, Registry, array_arg, count_arg, string_arg};

pub fn add_string_functions(registry: &mut Registry) {
    let mut add = |name: &'static str, arity: Arity, summary: &'static str, func: NativeFn| {
        registry.insert(Category::String, name, arity, summary, func)
    };

    // string_length(s: string) -> number
    add("string_length", Arity::Exact(1), "number of characters in a string", string_length);
    // brew_blend(a: string, b: string) -> string
    add("brew_blend", Arity::Exact(2), "two strings joined end to end", brew_blend);
    // foam_up(s: string) -> string
    add("foam_up", Arity::Exact(1), "upper-case copy", foam_up);
    // settle_down(s: string) -> string
    add("settle_down", Arity::Exact(1), "lower-case copy", settle_down);
    // grind_to_pieces(s: string, delimiter: string) -> [string]
    add("grind_to_pieces", Arity::Exact(2), "split a string on a delimiter", grind_to_pieces);
    // join(parts: [any], separator: string) -> string
    add("join", Arity::Exact(2), "display forms of the elements joined by a separator", join);
    // filter_grounds(s: string, start: number) -> string
    add("filter_grounds", Arity::Exact(2), "the rest of a string from a character index", filter_grounds);
    // first_sip(s: string, length: number) -> string
    add("first_sip", Arity::Exact(2), "the first characters of a string", first_sip);
    // trim(s: string) -> string
    add("trim", Arity::Exact(1), "copy without surrounding whitespace", trim);

    registry.alias("concat", "brew_blend");
    registry.alias("upper", "foam_up");
    registry.alias("lower", "settle_down");
    registry.alias("split", "grind_to_pieces");
}

fn string_length(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let s = string_arg("string_length", args, 0)?;
    Ok(Value::Number(s.chars().count() as f64))
}

fn brew_blend(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let a = string_arg("brew_blend", args, 0)?;
    let b = string_arg("brew_blend", args, 1)?;
    Ok(Value::String(format!("{}{}", a, b)))
}

fn foam_up(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::string(string_arg("foam_up", args, 0)?.to_uppercase()))
}

fn settle_down(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::string(string_arg("settle_down", args, 0)?.to_lowercase()))
}

fn grind_to_pieces(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let text = string_arg("grind_to_pieces", args, 0)?;
    let delimiter = string_arg("grind_to_pieces", args, 1)?;
    let pieces = if delimiter.is_empty() {
        text.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        text.split(delimiter).map(Value::string).collect()
    };
    Ok(Value::array(pieces))
}

fn join(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let parts = array_arg("join", args, 0)?;
    let separator = string_arg("join", args, 1)?;
    let joined = parts
        .borrow()
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(separator);
    Ok(Value::String(joined))
}

fn filter_grounds(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let text = string_arg("filter_grounds", args, 0)?;
    let start = count_arg("filter_grounds", args, 1)?;
    Ok(Value::String(text.chars().skip(start).collect()))
}

fn first_sip(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let text = string_arg("first_sip", args, 0)?;
    let length = count_arg("first_sip", args, 1)?;
    Ok(Value::String(text.chars().take(length).collect()))
}

fn trim(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::string(string_arg("trim", args, 0)?.trim()))
}
