//! Static keyword and operator tables for editor tooling (completion, hover).
//! They describe the lexer's vocabulary and hold no interpreter state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    /// What the user writes.
    pub spelling: &'static str,
    /// The spelling every alias lexes to the same token as.
    pub canonical: &'static str,
    pub description: &'static str,
}

const fn entry(spelling: &'static str, canonical: &'static str, description: &'static str) -> TableEntry {
    TableEntry {
        spelling,
        canonical,
        description,
    }
}

pub static KEYWORDS: &[TableEntry] = &[
    entry("beans", "beans", "declare a variable in the current scope"),
    entry("let", "beans", "declare a variable in the current scope"),
    entry("bean", "bean", "declare a bean (class)"),
    entry("class", "bean", "declare a bean (class)"),
    entry("blend", "blend", "inherit from a parent bean or follow a recipe"),
    entry("extends", "blend", "inherit from a parent bean or follow a recipe"),
    entry("recipe", "recipe", "declare an advisory list of method signatures"),
    entry("interface", "recipe", "declare an advisory list of method signatures"),
    entry("brew", "brew", "declare a function or method"),
    entry("function", "brew", "declare a function or method"),
    entry("fn", "brew", "declare a function or method"),
    entry("taste", "taste", "run a block when a condition is truthy"),
    entry("if", "taste", "run a block when a condition is truthy"),
    entry("otherwise", "otherwise", "alternative branch, or the catch-all label of a roast"),
    entry("else", "otherwise", "alternative branch, or the catch-all label of a roast"),
    entry("default", "default", "catch-all label of a roast"),
    entry("steep", "steep", "loop while a condition is truthy"),
    entry("while", "steep", "loop while a condition is truthy"),
    entry("pour", "pour", "three-clause loop, or `pour x in items`"),
    entry("for", "pour", "three-clause loop, or `pour x in items`"),
    entry("foreach", "foreach", "loop over the items of an array, string or object"),
    entry("in", "in", "separates the loop variable from the items"),
    entry("roast", "roast", "pick the case whose label equals a value"),
    entry("switch", "roast", "pick the case whose label equals a value"),
    entry("case", "case", "optional marker before a roast label"),
    entry("serve", "serve", "return a value from a brew"),
    entry("return", "serve", "return a value from a brew"),
    entry("break", "break", "leave the nearest loop"),
    entry("continue", "continue", "skip to the next iteration of the nearest loop"),
    entry("taste_carefully", "taste_carefully", "run a block and catch any spill"),
    entry("try", "taste_carefully", "run a block and catch any spill"),
    entry("if_spilled", "if_spilled", "handler for a spill, optionally binding its message"),
    entry("catch", "if_spilled", "handler for a spill, optionally binding its message"),
    entry("grind", "grind", "import another source file as a module"),
    entry("import", "grind", "import another source file as a module"),
    entry("as", "as", "name the imported module"),
    entry("pourout", "pourout", "print values separated by spaces"),
    entry("brew_time", "brew_time", "pause for a number of seconds"),
    entry("this", "this", "the instance a method runs against"),
    entry("super", "super", "call the parent bean's init or method"),
    entry("new", "new", "create an instance of a bean"),
    entry("public", "public", "advisory visibility marker"),
    entry("private", "private", "advisory visibility marker"),
    entry("true", "true", "boolean literal"),
    entry("false", "false", "boolean literal"),
    entry("null", "null", "the empty value"),
];

pub static OPERATOR_WORDS: &[TableEntry] = &[
    entry("add", "+", "addition, or concatenation when either side is a string"),
    entry("sip", "-", "subtraction"),
    entry("brew_op", "*", "multiplication"),
    entry("pour_op", "/", "division"),
    entry("grounds", "%", "remainder"),
    entry("same_blend", "==", "structural equality"),
    entry("different_blend", "!=", "structural inequality"),
    entry("less_caffeine", "<", "less than"),
    entry("more_caffeine", ">", "greater than"),
    entry("not_stronger", "<=", "less than or equal"),
    entry("not_weaker", ">=", "greater than or equal"),
    entry("with", "&&", "logical and, short-circuiting"),
    entry("or", "||", "logical or, short-circuiting"),
    entry("no_foam", "!", "logical not"),
    entry("blend_with", "&", "bitwise and"),
    entry("top_with", "|", "bitwise or"),
    entry("spice", "^", "bitwise xor"),
    entry("invert", "~", "bitwise not"),
    entry("double_shot", "<<", "shift left"),
    entry("half_caf", ">>", "shift right"),
    entry("pour_in", "<-", "assignment"),
    entry("refill_with", "<-", "assignment"),
    entry("=", "<-", "assignment"),
];

pub fn keyword(spelling: &str) -> Option<&'static TableEntry> {
    KEYWORDS.iter().find(|entry| entry.spelling == spelling)
}

pub fn operator_word(spelling: &str) -> Option<&'static TableEntry> {
    OPERATOR_WORDS.iter().find(|entry| entry.spelling == spelling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Token, tokenize};
    use pretty_assertions::assert_eq;

    fn single_token(source: &str) -> Token {
        let tokens = tokenize(source).expect("table spellings should lex");
        assert_eq!(tokens.len(), 1, "`{}` should be one token", source);
        tokens[0].0.clone()
    }

    #[test]
    fn test_keywords_are_never_identifiers() {
        for entry in KEYWORDS {
            assert!(
                !matches!(single_token(entry.spelling), Token::Variable(_)),
                "`{}` lexed as an identifier",
                entry.spelling
            );
        }
    }

    #[test]
    fn test_aliases_lex_like_their_canonical_spelling() {
        for entry in KEYWORDS.iter().chain(OPERATOR_WORDS) {
            assert_eq!(single_token(entry.spelling), single_token(entry.canonical));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(keyword("steep").map(|entry| entry.canonical), Some("steep"));
        assert_eq!(operator_word("half_caf").map(|entry| entry.canonical), Some(">>"));
        assert_eq!(operator_word("latte"), None);
    }
}
