use super::*;
use crate::error::SpillKind;
use pretty_assertions::assert_eq;

fn call_with_input(name: &str, args: Vec<Value>, input: &str) -> (Result<Value, Spill>, String) {
    let builtin = registry()
        .get(name)
        .unwrap_or_else(|| panic!("builtin `{}` should be registered", name));
    let mut output = Vec::new();
    let mut input = input.as_bytes();
    let result = {
        let mut ctx = NativeContext {
            output: &mut output,
            input: &mut input,
        };
        builtin.call(&mut ctx, &args)
    };
    (result, String::from_utf8(output).expect("output should be utf-8"))
}

fn call(name: &str, args: Vec<Value>) -> Result<Value, Spill> {
    call_with_input(name, args, "").0
}

fn ok(name: &str, args: Vec<Value>) -> Value {
    call(name, args).unwrap_or_else(|spill| panic!("{} spilled: {}", name, spill))
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_aliases_share_behaviour() {
    for (coffee, alias) in [
        ("root_drip", "sqrt"),
        ("absolute_aroma", "abs"),
        ("settle_the_grounds", "floor"),
        ("round_up_the_grounds", "ceil"),
        ("perfect_temperature", "round"),
    ] {
        assert_eq!(ok(coffee, vec![num(2.25)]), ok(alias, vec![num(2.25)]));
    }
    assert_eq!(ok("min", vec![num(3.0), num(-1.0)]), num(-1.0));
    assert_eq!(ok("brew_maximum", vec![num(3.0), num(-1.0)]), num(3.0));
    assert_eq!(ok("extra_shot", vec![num(2.0), num(10.0)]), num(1024.0));
}

#[test]
fn test_math_errors() {
    let spill = call("root_drip", vec![num(-4.0)]).unwrap_err();
    assert_eq!(spill.kind, SpillKind::TypeMismatch);

    let spill = call("abs", vec![Value::string("x")]).unwrap_err();
    assert_eq!(
        spill.message,
        "absolute_aroma() expects a number as argument 1, but got string"
    );
}

#[test]
fn test_arity_is_checked() {
    let spill = call("sqrt", vec![num(1.0), num(2.0)]).unwrap_err();
    assert_eq!(spill.kind, SpillKind::TypeMismatch);
    assert_eq!(spill.message, "sqrt() expects 1 argument, but got 2");
}

#[test]
fn test_string_functions() {
    let latte = || Value::string("Latte");
    assert_eq!(ok("string_length", vec![latte()]), num(5.0));
    assert_eq!(ok("upper", vec![latte()]), Value::string("LATTE"));
    assert_eq!(ok("settle_down", vec![latte()]), Value::string("latte"));
    assert_eq!(ok("filter_grounds", vec![latte(), num(2.0)]), Value::string("tte"));
    assert_eq!(ok("filter_grounds", vec![latte(), num(99.0)]), Value::string(""));
    assert_eq!(ok("first_sip", vec![latte(), num(3.0)]), Value::string("Lat"));
    assert_eq!(ok("first_sip", vec![latte(), num(99.0)]), latte());
    assert_eq!(
        ok("brew_blend", vec![Value::string("oat "), latte()]),
        Value::string("oat Latte")
    );
    assert_eq!(ok("trim", vec![Value::string("  mocha\n")]), Value::string("mocha"));
}

#[test]
fn test_split_and_join() {
    let pieces = ok("grind_to_pieces", vec![Value::string("a,b,,c"), Value::string(",")]);
    assert_eq!(pieces.to_string(), "[\"a\", \"b\", \"\", \"c\"]");

    let joined = ok(
        "join",
        vec![Value::array(vec![num(1.0), Value::string("two")]), Value::string("-")],
    );
    assert_eq!(joined, Value::string("1-two"));
}

#[test]
fn test_append_mutates_in_place() {
    let cup = Value::array(vec![num(1.0)]);
    let returned = ok("add_to_cup", vec![cup.clone(), num(2.0)]);
    assert_eq!(cup.to_string(), "[1, 2]");
    let (Value::Array(a), Value::Array(b)) = (&cup, &returned) else {
        panic!("expected arrays");
    };
    assert!(Rc::ptr_eq(a, b));
}

#[test]
fn test_array_functions() {
    let cup = Value::array(vec![num(1.0), num(2.0), num(3.0)]);
    assert_eq!(ok("length", vec![cup.clone()]), num(3.0));
    assert_eq!(ok("reverse", vec![cup.clone()]).to_string(), "[3, 2, 1]");
    assert_eq!(cup.to_string(), "[1, 2, 3]");
    assert_eq!(
        ok("pour_together", vec![cup.clone(), Value::array(vec![num(4.0)])]).to_string(),
        "[1, 2, 3, 4]"
    );
    assert_eq!(ok("extract_brew", vec![cup.clone(), num(1.0)]), num(2.0));

    let spill = call("extract_brew", vec![cup, num(3.0)]).unwrap_err();
    assert_eq!(spill.kind, SpillKind::IndexOutOfRange);
}

#[test]
fn test_type_functions() {
    assert_eq!(ok("is_number", vec![num(1.0)]), Value::Boolean(true));
    assert_eq!(ok("is_string", vec![num(1.0)]), Value::Boolean(false));
    assert_eq!(ok("is_cup", vec![Value::array(vec![])]), Value::Boolean(true));
    assert_eq!(ok("is_boolean", vec![Value::Boolean(false)]), Value::Boolean(true));
    let sqrt = Value::Native(registry().get("sqrt").expect("sqrt is registered"));
    assert_eq!(ok("is_brew", vec![sqrt]), Value::Boolean(true));
    assert_eq!(ok("type_of", vec![Value::Null]), Value::string("null"));
    assert_eq!(ok("to_string", vec![num(4.0)]), Value::string("4"));
    assert_eq!(ok("to_number", vec![Value::string(" 2.5 ")]), num(2.5));
    assert!(call("to_number", vec![Value::string("espresso")]).is_err());
}

#[test]
fn test_coffee_strength_check() {
    let strength = |shots| ok("coffee_strength_check", vec![num(shots)]);
    assert_eq!(strength(1.0), Value::string("weak"));
    assert_eq!(strength(3.0), Value::string("medium"));
    assert_eq!(strength(7.0), Value::string("strong"));
}

#[test]
fn test_random_and_time() {
    for _ in 0..100 {
        let Value::Number(n) = ok("random_bean", vec![]) else {
            panic!("expected a number");
        };
        assert!((0.0..1.0).contains(&n));
    }
    let Value::Number(now) = ok("now", vec![]) else {
        panic!("expected a number");
    };
    assert!(now > 1_600_000_000.0);
}

#[test]
fn test_print_and_input() {
    let (result, output) = call_with_input("print", vec![Value::string("a"), num(1.0)], "");
    assert_eq!(result, Ok(Value::Null));
    assert_eq!(output, "a 1\n");

    let (result, output) = call_with_input("input", vec![Value::string("name? ")], "Ada\nrest\n");
    assert_eq!(result, Ok(Value::string("Ada")));
    assert_eq!(output, "name? ");
}

#[test]
fn test_file_functions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("order.txt");
    let file_name = file.to_string_lossy().to_string();

    assert_eq!(ok("file_exists", vec![Value::string(file_name.clone())]), Value::Boolean(false));
    assert_eq!(
        ok("pour_to_file", vec![Value::string(file_name.clone()), Value::string("flat white")]),
        Value::Boolean(true)
    );
    assert_eq!(ok("recipe_exists", vec![Value::string(file_name.clone())]), Value::Boolean(true));
    assert_eq!(ok("sip_file", vec![Value::string(file_name)]), Value::string("flat white"));

    let missing = dir.path().join("missing.txt").to_string_lossy().to_string();
    let spill = call("read_file", vec![Value::string(missing)]).unwrap_err();
    assert_eq!(spill.kind, SpillKind::FileNotFound);
}

#[test]
fn test_scan_pantry_lists_sources_sorted() {
    let dir = tempfile::tempdir().expect("temp dir");
    for name in ["mocha.coffee", "latte.brewco", "notes.txt"] {
        std::fs::write(dir.path().join(name), "").expect("write fixture");
    }
    let listed = ok("scan_pantry", vec![Value::string(dir.path().to_string_lossy())]);
    assert_eq!(listed.to_string(), "[\"latte.brewco\", \"mocha.coffee\"]");
}

#[test]
fn test_catalog_has_every_category() {
    let catalog = catalog();
    for category in [
        Category::Math,
        Category::String,
        Category::Array,
        Category::Type,
        Category::Utility,
        Category::File,
    ] {
        assert!(catalog.iter().any(|builtin| builtin.category == category));
    }
    assert!(catalog.len() >= 30);
    assert!(registry().contains("scan_directory"));
}
