use super::*;
use crate::ast::{BinOp, Expr, Literal, Stmt, UnOp, Visibility};
use pretty_assertions::assert_eq;

// Helper function to parse input without file I/O
fn parse_str(input: &str) -> Program {
    let tokens = tokenize(input).expect("input should lex");
    let mut parser = Parser::new(tokens, input);
    match parser.parse_program() {
        Ok(ast) => ast,
        Err(err) => panic!("unexpected parse error: {}", err),
    }
}

fn parse_err(input: &str) -> ParseError {
    let tokens = tokenize(input).expect("input should lex");
    let mut parser = Parser::new(tokens, input);
    parser.parse_program().expect_err("input should not parse")
}

fn expr(input: &str) -> Expr {
    let mut ast = parse_str(input);
    assert_eq!(ast.len(), 1);
    match ast.remove(0).0 {
        Stmt::Expr((expr, _)) => expr,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_basic_expressions() {
    let ast = parse_str("5 true 3.14 \"hello\" null");
    assert_eq!(ast.len(), 5);

    assert!(matches!(ast[0].0, Stmt::Expr((Expr::Number(n), _)) if n == 5.0));
    assert!(matches!(ast[1].0, Stmt::Expr((Expr::Bool(true), _))));
    assert!(matches!(ast[2].0, Stmt::Expr((Expr::Number(n), _)) if n == 3.14));
    assert!(matches!(&ast[3].0, Stmt::Expr((Expr::String(s), _)) if s == "hello"));
    assert!(matches!(ast[4].0, Stmt::Expr((Expr::Null, _))));
}

#[test]
fn test_parse_declaration_spellings() {
    for input in ["beans a <- 5", "let a = 5", "beans a pour_in 5", "beans a: Number refill_with 5"] {
        let ast = parse_str(input);
        let Stmt::Let { name, value, .. } = &ast[0].0 else {
            panic!("expected a declaration for {}", input);
        };
        assert_eq!(name, "a");
        assert!(matches!(value.0, Expr::Number(n) if n == 5.0));
    }
}

#[test]
fn test_parse_precedence() {
    // 1 + 2 * 3 == 7 && x
    let Expr::BinOp { operator, l_value, .. } = expr("1 + 2 * 3 == 7 && x") else {
        panic!("expected a binary operation");
    };
    assert_eq!(operator, BinOp::And);
    let Expr::BinOp { operator, l_value, .. } = l_value.0 else {
        panic!("expected a comparison");
    };
    assert_eq!(operator, BinOp::Eq);
    let Expr::BinOp { operator, r_value, .. } = l_value.0 else {
        panic!("expected an addition");
    };
    assert_eq!(operator, BinOp::Add);
    assert!(matches!(r_value.0, Expr::BinOp { operator: BinOp::Mul, .. }));
}

#[test]
fn test_parse_left_associative() {
    // (10 - 4) - 3
    let Expr::BinOp { l_value, r_value, .. } = expr("10 sip 4 sip 3") else {
        panic!("expected a binary operation");
    };
    assert!(matches!(l_value.0, Expr::BinOp { operator: BinOp::Sub, .. }));
    assert!(matches!(r_value.0, Expr::Number(n) if n == 3.0));
}

#[test]
fn test_parse_or_binds_looser_than_and() {
    let Expr::BinOp { operator, r_value, .. } = expr("a or b with c") else {
        panic!("expected a binary operation");
    };
    assert_eq!(operator, BinOp::Or);
    assert!(matches!(r_value.0, Expr::BinOp { operator: BinOp::And, .. }));
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let Expr::Assign { l_value, r_value } = expr("a <- b <- 3") else {
        panic!("expected an assignment");
    };
    assert!(matches!(&l_value.0, Expr::Variable(name) if name == "a"));
    assert!(matches!(r_value.0, Expr::Assign { .. }));
}

#[test]
fn test_parse_indexed_assignment() {
    let Expr::Assign { l_value, .. } = expr("cups[0] <- 9") else {
        panic!("expected an assignment");
    };
    assert!(matches!(l_value.0, Expr::Index { .. }));
}

#[test]
fn test_parse_unary() {
    let Expr::UnOp { unop, expression } = expr("-x") else {
        panic!("expected a unary operation");
    };
    assert_eq!(unop, UnOp::Minus);
    assert!(matches!(&expression.0, Expr::Variable(name) if name == "x"));
    assert!(matches!(expr("no_foam done"), Expr::UnOp { unop: UnOp::Not, .. }));
}

#[test]
fn test_parse_function_call() {
    let Expr::Call { function, args } = expr("foo(1, 2, 3)") else {
        panic!("expected function call");
    };
    assert!(matches!(&function.0, Expr::Variable(name) if name == "foo"));
    assert_eq!(args.len(), 3);
    assert_eq!(args[0].1, 4..5);
    assert_eq!(args[1].1, 7..8);
    assert_eq!(args[2].1, 10..11);
}

#[test]
fn test_parse_member_and_index_chain() {
    let Expr::Call { function, .. } = expr("shop.menu[2].describe()") else {
        panic!("expected a method call");
    };
    let Expr::Member { object, field_name } = &function.0 else {
        panic!("expected member access");
    };
    assert_eq!(field_name, "describe");
    assert!(matches!(object.0, Expr::Index { .. }));
}

#[test]
fn test_parse_literals() {
    let Expr::Array { elements } = expr("[1, \"two\", [3],]") else {
        panic!("expected an array");
    };
    assert_eq!(elements.len(), 3);

    let ast = parse_str("beans order <- { size: \"large\", \"shots\": 2 }");
    let Stmt::Let { value, .. } = &ast[0].0 else {
        panic!("expected a declaration");
    };
    let Expr::Object { entries } = &value.0 else {
        panic!("expected an object literal");
    };
    let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, vec!["size", "shots"]);
}

#[test]
fn test_parse_new_and_member() {
    let Expr::Member { object, field_name } = expr("new Espresso().strength") else {
        panic!("expected member access");
    };
    assert_eq!(field_name, "strength");
    assert!(matches!(&object.0, Expr::New { class_name, args } if class_name == "Espresso" && args.is_empty()));
}

#[test]
fn test_parse_if_else_chain() {
    let ast = parse_str("taste x > 1 { a } otherwise taste x > 0 { b } otherwise { c }");
    let Stmt::If { else_branch, .. } = &ast[0].0 else {
        panic!("expected an if");
    };
    let Some(else_branch) = else_branch else {
        panic!("expected an else branch");
    };
    let Stmt::If { else_branch, .. } = &else_branch.0 else {
        panic!("expected a chained if");
    };
    assert!(matches!(else_branch.as_deref(), Some((Stmt::Block(_), _))));
}

#[test]
fn test_parse_for_loops() {
    let ast = parse_str("pour beans i <- 0; i < 3; i <- i + 1 { pourout i }");
    assert!(matches!(
        &ast[0].0,
        Stmt::For { init: Some(_), condition: Some(_), update: Some(_), .. }
    ));

    let ast = parse_str("for (let i = 0; i < 3; i = i + 1) { print(i) }");
    assert!(matches!(&ast[0].0, Stmt::For { .. }));

    let ast = parse_str("pour cup in cups { pourout cup }");
    assert!(matches!(&ast[0].0, Stmt::ForEach { var, .. } if var == "cup"));

    let ast = parse_str("foreach (cup in cups) { pourout cup }");
    assert!(matches!(&ast[0].0, Stmt::ForEach { var, .. } if var == "cup"));
}

#[test]
fn test_parse_switch() {
    let ast = parse_str(
        "roast size {
            1: pourout \"small\"
            case \"big\": { pourout \"big\" }
            -1: pourout \"negative\"
            otherwise: pourout \"other\"
        }",
    );
    let Stmt::Switch { cases, default, .. } = &ast[0].0 else {
        panic!("expected a switch");
    };
    let labels: Vec<Literal> = cases.iter().map(|case| case.label.0.clone()).collect();
    assert_eq!(
        labels,
        vec![
            Literal::Number(1.0),
            Literal::String("big".to_string()),
            Literal::Number(-1.0),
        ]
    );
    assert!(default.is_some());

    let ast = parse_str("switch x { default: y }");
    assert!(matches!(&ast[0].0, Stmt::Switch { default: Some(_), .. }));
}

#[test]
fn test_parse_switch_rejects_two_defaults() {
    let err = parse_err("roast x { otherwise: a default: b }");
    assert_eq!(err.expected, "a single catch-all label");
}

#[test]
fn test_parse_try() {
    let ast = parse_str("taste_carefully { 1 / 0 } if_spilled (e) { pourout e }");
    assert!(matches!(&ast[0].0, Stmt::Try { binding: Some(name), .. } if name == "e"));

    let ast = parse_str("try { risky() } catch { recover() }");
    assert!(matches!(&ast[0].0, Stmt::Try { binding: None, .. }));
}

#[test]
fn test_parse_function() {
    let ast = parse_str("brew add_shots(a: Number, b) -> Number { serve a + b }");
    let Stmt::Function(function) = &ast[0].0 else {
        panic!("expected a function");
    };
    assert_eq!(function.name.0, "add_shots");
    assert_eq!(function.args.len(), 2);
    assert!(function.return_type.is_some());
    assert!(matches!(function.body[0].0, Stmt::Return(Some(_))));
}

#[test]
fn test_parse_class() {
    let ast = parse_str(
        "bean Latte blend Coffee {
            beans milk <- \"oat\"
            private shots: Number <- 2
            init(milk) { this.milk <- milk }
            brew describe() { serve super.describe() + milk }
        }",
    );
    let Stmt::Class(class) = &ast[0].0 else {
        panic!("expected a class");
    };
    assert_eq!(class.name.0, "Latte");
    assert_eq!(class.parent.as_ref().map(|(name, _)| name.as_str()), Some("Coffee"));
    assert_eq!(class.fields.len(), 2);
    assert_eq!(class.fields[1].visibility, Visibility::Private);
    let names: Vec<&str> = class
        .methods
        .iter()
        .map(|(_, method)| method.name.0.as_str())
        .collect();
    assert_eq!(names, vec!["init", "describe"]);
}

#[test]
fn test_parse_recipe() {
    let ast = parse_str("recipe Drinkable { drink(amount: Number) -> Number; brew finish() }");
    let Stmt::Recipe(recipe) = &ast[0].0 else {
        panic!("expected a recipe");
    };
    assert_eq!(recipe.methods.len(), 2);
    assert_eq!(recipe.methods[1].name, "finish");
}

#[test]
fn test_parse_import() {
    let ast = parse_str("grind \"lib/milk.brewco\" as milk");
    assert!(matches!(
        &ast[0].0,
        Stmt::Import { path, alias: Some(alias) } if path == "lib/milk.brewco" && alias == "milk"
    ));
    assert!(matches!(expr("grind \"x.brewco\""), Expr::Grind(path) if path == "x.brewco"));
}

#[test]
fn test_parse_break_outside_loop() {
    let err = parse_err("break");
    assert!(err.found.contains("outside of a loop"));

    // a function body does not inherit the enclosing loop
    let err = parse_err("steep true { brew f() { continue } }");
    assert!(err.found.contains("outside of a loop"));

    parse_str("steep true { taste x { break } }");
}

#[test]
fn test_parse_error_position() {
    let err = parse_err("beans x <- 1\nbeans <- 2");
    assert_eq!(err.position, Position::new(2, 7));
    assert_eq!(err.found, "`<-`");
}

#[test]
fn test_parse_error_end_of_file() {
    let err = parse_err("foo(1, 2");
    assert_eq!(err.found, "end of file");
    assert!(err.note.is_some());
}

#[test]
fn test_parse_invalid_assignment_target() {
    let err = parse_err("1 + 2 <- 3");
    assert_eq!(err.expected, "an assignable target");
}

#[test]
fn test_parse_program_reports_lex_errors() {
    let err = parse_program("beans x <- @").unwrap_err();
    assert_eq!(err.kind(), "LexError");
}
