use crate::error::{Spill, SpillKind};
use crate::interpreter::value::Value;
use crate::stdlib::{Arity, Category, NativeContext, NativeFn, Registry, array_arg, count_arg};

pub fn add_collections(registry: &mut Registry) {
    let mut add = |name: &'static str, arity: Arity, summary: &'static str, func: NativeFn| {
        registry.insert(Category::Array, name, arity, summary, func)
    };

    // cup_size(cup: [any] | string | object) -> number
    add("cup_size", Arity::Exact(1), "number of elements", cup_size);
    // add_to_cup(cup: [any], value: any) -> [any]
    add("add_to_cup", Arity::Exact(2), "append a value in place and return the array", add_to_cup);
    // pour_together(a: [any], b: [any]) -> [any]
    add("pour_together", Arity::Exact(2), "new array holding both arrays' elements", pour_together);
    // extract_brew(cup: [any], index: number) -> any
    add("extract_brew", Arity::Exact(2), "element at an index", extract_brew);
    // reverse_pour(cup: [any]) -> [any]
    add("reverse_pour", Arity::Exact(1), "new array in reverse order", reverse_pour);

    registry.alias("length", "cup_size");
    registry.alias("append", "add_to_cup");
    registry.alias("reverse", "reverse_pour");
}

fn cup_size(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let size = match &args[0] {
        Value::Array(elements) => elements.borrow().len(),
        Value::String(s) => s.chars().count(),
        Value::Object(map) => map.borrow().len(),
        other => {
            return Err(Spill::type_mismatch(format!(
                "cup_size() expects an array, string or object, but got {}",
                other.type_name()
            )));
        }
    };
    Ok(Value::Number(size as f64))
}

fn add_to_cup(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let cup = array_arg("add_to_cup", args, 0)?;
    cup.borrow_mut().push(args[1].clone());
    Ok(Value::Array(cup))
}

fn pour_together(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let first = array_arg("pour_together", args, 0)?;
    let second = array_arg("pour_together", args, 1)?;
    let mut combined = first.borrow().clone();
    combined.extend(second.borrow().iter().cloned());
    Ok(Value::array(combined))
}

fn extract_brew(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let cup = array_arg("extract_brew", args, 0)?;
    let index = count_arg("extract_brew", args, 1)?;
    let cup = cup.borrow();
    cup.get(index).cloned().ok_or_else(|| {
        Spill::new(
            SpillKind::IndexOutOfRange,
            format!("extract_brew() index {} out of bounds for a cup of {}", index, cup.len()),
        )
    })
}

fn reverse_pour(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let cup = array_arg("reverse_pour", args, 0)?;
    let reversed = cup.borrow().iter().rev().cloned().collect();
    Ok(Value::array(reversed))
}
