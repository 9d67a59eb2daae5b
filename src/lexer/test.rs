use super::*;
use logos::Logos;
use pretty_assertions::assert_eq;

fn kinds(input: &str) -> Vec<Token> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

#[test]
fn test_basic_tokens() {
    let input = "
    beans x <- 5
    bean Latte blend Coffee { }
    ";
    let mut lexer = Token::lexer(input);

    assert_eq!(lexer.next(), Some(Ok(Token::KeywordBeans)));
    assert_eq!(lexer.next(), Some(Ok(Token::Variable("x".to_string()))));
    assert_eq!(lexer.next(), Some(Ok(Token::Assign)));
    assert_eq!(lexer.next(), Some(Ok(Token::Number(5.0))));
    assert_eq!(lexer.next(), Some(Ok(Token::KeywordBean)));
    assert_eq!(lexer.next(), Some(Ok(Token::Variable("Latte".to_string()))));
    assert_eq!(lexer.next(), Some(Ok(Token::KeywordBlend)));
}

#[test]
fn test_keyword_aliases_share_tokens() {
    assert_eq!(kinds("let"), kinds("beans"));
    assert_eq!(kinds("class extends"), kinds("bean blend"));
    assert_eq!(kinds("fn function"), kinds("brew brew"));
    assert_eq!(kinds("if else"), kinds("taste otherwise"));
    assert_eq!(kinds("try catch"), kinds("taste_carefully if_spilled"));
    assert_eq!(kinds("return while for"), kinds("serve steep pour"));
}

#[test]
fn test_operator_words_are_whole_words() {
    assert_eq!(kinds("a add b"), kinds("a + b"));
    assert_eq!(kinds("a same_blend b"), kinds("a == b"));
    assert_eq!(kinds("x pour_in 1"), kinds("x <- 1"));
    assert_eq!(kinds("x refill_with 1"), kinds("x = 1"));
    // longer identifiers that merely start with an operator word
    assert_eq!(
        kinds("addition without sipping"),
        vec![
            Token::Variable("addition".to_string()),
            Token::Variable("without".to_string()),
            Token::Variable("sipping".to_string()),
        ]
    );
}

#[test]
fn test_string_token() {
    let input = r#""hello\nworld" 'it\'s'"#;
    assert_eq!(
        kinds(input),
        vec![
            Token::String("hello\nworld".to_string()),
            Token::String("it's".to_string()),
        ]
    );
}

#[test]
fn test_comments_are_discarded() {
    let input = "🎀 decorative\n// plain\n/** @author /* nested */ */ 42";
    assert_eq!(kinds(input), vec![Token::Number(42.0)]);
}

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("3 3.25 10"),
        vec![Token::Number(3.0), Token::Number(3.25), Token::Number(10.0)]
    );
}

#[test]
fn test_symbols() {
    assert_eq!(
        kinds("<= << <- -> >= >> != !"),
        vec![
            Token::LessEq,
            Token::Shl,
            Token::Assign,
            Token::Arrow,
            Token::GreaterEq,
            Token::Shr,
            Token::NotEq,
            Token::Not,
        ]
    );
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("beans s <- \"open").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.position, Position::new(1, 12));
}

#[test]
fn test_unterminated_comment() {
    let err = tokenize("1 /* /* */").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
}

#[test]
fn test_unrecognized_character_position() {
    let err = tokenize("beans x <- 1\nbeans @ <- 2").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter);
    assert_eq!(err.position, Position::new(2, 7));
    assert!(err.message.contains('@'));
}

#[test]
fn test_error_recovery() {
    let input = "beans @ x <- 5;";
    let mut lexer = Token::lexer(input);

    assert_eq!(lexer.next(), Some(Ok(Token::KeywordBeans)));
    assert!(lexer.next().unwrap().is_err()); // Invalid token '@'
    assert_eq!(lexer.next(), Some(Ok(Token::Variable("x".to_string()))));
}

#[test]
fn test_positions() {
    let tokens = tokenize_with_positions("a\n  b").unwrap();
    assert_eq!(tokens[1].1, Position::new(2, 3));
}
