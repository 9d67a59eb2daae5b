use crate::error::Spill;
use crate::interpreter::value::Value;
use crate::stdlib::{Arity, Category, NativeContext, NativeFn, Registry, number_arg};

pub fn add_math_functions(registry: &mut Registry) {
    let mut add = |name: &'static str, arity: Arity, summary: &'static str, func: NativeFn| {
        registry.insert(Category::Math, name, arity, summary, func)
    };

    // root_drip(x: number) -> number
    add("root_drip", Arity::Exact(1), "square root of a non-negative number", root_drip);
    // absolute_aroma(x: number) -> number
    add("absolute_aroma", Arity::Exact(1), "absolute value", absolute_aroma);
    // round_up_the_grounds(x: number) -> number
    add("round_up_the_grounds", Arity::Exact(1), "smallest whole number not below x", round_up);
    // settle_the_grounds(x: number) -> number
    add("settle_the_grounds", Arity::Exact(1), "largest whole number not above x", settle);
    // perfect_temperature(x: number) -> number
    add("perfect_temperature", Arity::Exact(1), "nearest whole number", perfect_temperature);
    // extra_shot(base: number, exponent: number) -> number
    add("extra_shot", Arity::Exact(2), "base raised to exponent", extra_shot);
    // brew_minimum(a: number, b: number) -> number
    add("brew_minimum", Arity::Exact(2), "smaller of two numbers", brew_minimum);
    // brew_maximum(a: number, b: number) -> number
    add("brew_maximum", Arity::Exact(2), "larger of two numbers", brew_maximum);

    registry.alias("sqrt", "root_drip");
    registry.alias("abs", "absolute_aroma");
    registry.alias("ceil", "round_up_the_grounds");
    registry.alias("floor", "settle_the_grounds");
    registry.alias("round", "perfect_temperature");
    registry.alias("pow", "extra_shot");
    registry.alias("min", "brew_minimum");
    registry.alias("max", "brew_maximum");
}

fn root_drip(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let n = number_arg("root_drip", args, 0)?;
    if n < 0.0 {
        return Err(Spill::type_mismatch(
            "Cannot take the square root of a negative number",
        ));
    }
    Ok(Value::Number(n.sqrt()))
}

fn absolute_aroma(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Number(number_arg("absolute_aroma", args, 0)?.abs()))
}

fn round_up(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Number(number_arg("round_up_the_grounds", args, 0)?.ceil()))
}

fn settle(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Number(number_arg("settle_the_grounds", args, 0)?.floor()))
}

fn perfect_temperature(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    Ok(Value::Number(number_arg("perfect_temperature", args, 0)?.round()))
}

fn extra_shot(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let base = number_arg("extra_shot", args, 0)?;
    let exponent = number_arg("extra_shot", args, 1)?;
    Ok(Value::Number(base.powf(exponent)))
}

fn brew_minimum(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let a = number_arg("brew_minimum", args, 0)?;
    let b = number_arg("brew_minimum", args, 1)?;
    Ok(Value::Number(a.min(b)))
}

fn brew_maximum(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let a = number_arg("brew_maximum", args, 0)?;
    let b = number_arg("brew_maximum", args, 1)?;
    Ok(Value::Number(a.max(b)))
}
