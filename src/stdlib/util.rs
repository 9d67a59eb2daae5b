use crate::error::{Spill, SpillKind};
use crate::interpreter::value::Value;
use crate::stdlib::{Arity, Category, NativeContext, NativeFn, Registry, number_arg};

use rand::Rng;

use std::time::{SystemTime, UNIX_EPOCH};

pub fn add_util_functions(registry: &mut Registry) {
    let mut add = |name: &'static str, arity: Arity, summary: &'static str, func: NativeFn| {
        registry.insert(Category::Utility, name, arity, summary, func)
    };

    // print(values: any...) -> null
    add("print", Arity::Variadic(0), "write values separated by spaces, then a newline", print);
    // random_bean() -> number
    add("random_bean", Arity::Exact(0), "pseudo-random number in [0, 1)", random_bean);
    // brewing_time() -> number
    add("brewing_time", Arity::Exact(0), "seconds since the unix epoch", brewing_time);
    // coffee_strength_check(shots: number) -> string
    add("coffee_strength_check", Arity::Exact(1), "\"weak\", \"medium\" or \"strong\"", coffee_strength_check);
    // whats_the_gossip(prompt?: any) -> string
    add("whats_the_gossip", Arity::Range(0, 1), "read one line of input", whats_the_gossip);

    registry.alias("random", "random_bean");
    registry.alias("now", "brewing_time");
    registry.alias("input", "whats_the_gossip");
}

fn print(ctx: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let line = args.iter().map(Value::to_string).collect::<Vec<_>>().join(" ");
    writeln!(ctx.output, "{}", line)?;
    Ok(Value::Null)
}

fn random_bean(_: &mut NativeContext, _: &[Value]) -> Result<Value, Spill> {
    let mut rng = rand::thread_rng();
    Ok(Value::Number(rng.r#gen::<f64>()))
}

fn brewing_time(_: &mut NativeContext, _: &[Value]) -> Result<Value, Spill> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| Spill::new(SpillKind::IoFailure, err.to_string()))?;
    Ok(Value::Number(elapsed.as_secs() as f64))
}

fn coffee_strength_check(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let shots = number_arg("coffee_strength_check", args, 0)?;
    let strength = if shots < 3.0 {
        "weak"
    } else if shots < 7.0 {
        "medium"
    } else {
        "strong"
    };
    Ok(Value::string(strength))
}

fn whats_the_gossip(ctx: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    if let Some(prompt) = args.first() {
        write!(ctx.output, "{}", prompt)?;
        ctx.output.flush()?;
    }
    let mut line = String::new();
    ctx.input.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Value::String(line))
}
