// Parser module: Converts a list of tokens into a PROGRAM tree
//
// Module organization:
// - parser.rs: Core Parser struct, cursor helpers and the program rule
// - statements.rs: Statement parsing (assignment, if, while, print, function)
// - expressions.rs: Conditions, expressions, terms and factors

mod parser;
mod expressions;
mod statements;

use model::{Node, Token, TokenKind};
use parser::Parser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token {found}, expected {}", one_of(.expected))]
    UnexpectedToken { found: TokenKind, expected: Vec<TokenKind> },
    #[error("unexpected end of input, expected {}", one_of(.expected))]
    UnexpectedEof { expected: Vec<TokenKind> },
    #[error("program nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Maximum nesting of statements and factors. Every later stage walks the
/// tree recursively, so this bounds their stack use as well.
pub const MAX_NESTING_DEPTH: usize = 512;

fn one_of(kinds: &[TokenKind]) -> String {
    let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
    match names.as_slice() {
        [single] => single.to_string(),
        _ => format!("one of {}", names.join(", ")),
    }
}

/// Parse a list of tokens into a tree rooted at `PROGRAM`
///
/// # Arguments
/// * `tokens` - Slice of tokens from the lexer
///
/// # Returns
/// * `Ok(Node)` - PROGRAM node whose children are the top-level statements
/// * `Err(ParseError)` - the first unexpected token, a premature end of input,
///   or nesting deeper than [`MAX_NESTING_DEPTH`]
#[tracing::instrument(level = "trace", skip_all, fields(tokens = tokens.len()))]
pub fn parse_tokens(tokens: &[Token]) -> Result<Node, ParseError> {
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexer::lex;
    use model::NodeKind;

    fn parse(src: &str) -> Result<Node, ParseError> {
        let tokens = lex(src).unwrap();
        parse_tokens(&tokens)
    }

    fn parse_ok(src: &str) -> Node {
        let program = parse(src).unwrap();
        program.check_shape().expect("parsed tree should be well formed");
        program
    }

    #[test]
    fn parse_empty_program() {
        let program = parse_ok("");
        assert_eq!(program.kind, NodeKind::Program);
        assert!(program.children.is_empty());
    }

    #[test]
    fn parse_simple_assignment() {
        let program = parse_ok("x = 1;");
        assert_eq!(program.to_string(), "PROGRAM(ASSIGN(ID(x), NUM(1)))");
    }

    // ─── Expression parsing tests ───────────────────────────────
    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let program = parse_ok("x = 1 + 2 * 3;");
        assert_eq!(
            program.children[0].to_string(),
            "ASSIGN(ID(x), BIN_OP(PLUS, NUM(1), BIN_OP(MULT, NUM(2), NUM(3))))"
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        let program = parse_ok("x = 1 - 2 - 3;");
        assert_eq!(
            program.children[0].children[1].to_string(),
            "BIN_OP(MINUS, BIN_OP(MINUS, NUM(1), NUM(2)), NUM(3))"
        );
    }

    #[test]
    fn division_is_left_associative() {
        let program = parse_ok("x = 8 / 4 / 2;");
        assert_eq!(
            program.children[0].children[1].to_string(),
            "BIN_OP(DIV, BIN_OP(DIV, NUM(8), NUM(4)), NUM(2))"
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        let program = parse_ok("x = (1 + 2) * 3;");
        assert_eq!(
            program.children[0].children[1].to_string(),
            "BIN_OP(MULT, BIN_OP(PLUS, NUM(1), NUM(2)), NUM(3))"
        );
    }

    #[test]
    fn call_with_arguments_in_source_order() {
        let program = parse_ok("print(add(1, x * 2, f()));");
        assert_eq!(
            program.children[0].to_string(),
            "PRINT(CALL(ID(add), NUM(1), BIN_OP(MULT, ID(x), NUM(2)), CALL(ID(f))))"
        );
    }

    #[test]
    fn identifier_without_paren_is_variable() {
        let program = parse_ok("y = x;");
        assert_eq!(program.children[0].children[1].kind, NodeKind::Id);
    }

    #[test]
    fn missing_operand_fails_at_semicolon() {
        assert_eq!(
            parse("x = ;"),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::Semi,
                expected: vec![TokenKind::Num, TokenKind::Id, TokenKind::LParen],
            })
        );
    }

    #[test]
    fn trailing_comma_in_call_fails() {
        assert!(matches!(
            parse("print(f(1,));"),
            Err(ParseError::UnexpectedToken { found: TokenKind::RParen, .. })
        ));
    }

    #[test]
    fn comparison_outside_condition_fails() {
        assert_eq!(
            parse("x = 1 < 2;"),
            Err(ParseError::UnexpectedToken { found: TokenKind::Lt, expected: vec![TokenKind::Semi] })
        );
    }

    // ─── Statement parsing tests ────────────────────────────────
    #[test]
    fn if_without_else_has_two_children() {
        let program = parse_ok("if (x < 10) print(x);");
        let stmt = &program.children[0];
        assert_eq!(stmt.kind, NodeKind::If);
        assert_eq!(stmt.children.len(), 2);
        assert_eq!(stmt.to_string(), "IF(BIN_OP(LT, ID(x), NUM(10)), PRINT(ID(x)))");
    }

    #[test]
    fn if_with_else_has_three_children() {
        let program = parse_ok("if (x) y = 1; else y = 2;");
        let stmt = &program.children[0];
        assert_eq!(stmt.children.len(), 3);
        assert_eq!(stmt.children[2].to_string(), "ASSIGN(ID(y), NUM(2))");
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let program = parse_ok("if (a) if (b) print(1); else print(2);");
        let outer = &program.children[0];
        assert_eq!(outer.children.len(), 2);
        assert_eq!(outer.children[1].children.len(), 3);
    }

    #[test]
    fn while_loop_shape() {
        let program = parse_ok("while (x <= 3) x = x + 1;");
        assert_eq!(
            program.children[0].to_string(),
            "WHILE(BIN_OP(LE, ID(x), NUM(3)), ASSIGN(ID(x), BIN_OP(PLUS, ID(x), NUM(1))))"
        );
    }

    #[test]
    fn all_relational_operators_in_conditions() {
        for (src, op) in [
            ("==", TokenKind::Eq),
            ("!=", TokenKind::Ne),
            ("<", TokenKind::Lt),
            ("<=", TokenKind::Le),
            (">", TokenKind::Gt),
            (">=", TokenKind::Ge),
        ] {
            let program = parse_ok(&format!("while (a {src} b + 1) a = a + 1;"));
            let cond = &program.children[0].children[0];
            assert_eq!(cond.operator(), Some(op));
            assert_eq!(cond.children[1].operator(), Some(TokenKind::Plus));
        }
    }

    #[test]
    fn chained_comparison_fails() {
        assert!(matches!(
            parse("if (a < b < c) print(a);"),
            Err(ParseError::UnexpectedToken { found: TokenKind::Lt, .. })
        ));
    }

    #[test]
    fn function_declaration_shape() {
        let program = parse_ok("function add(a, b) print(a + b);");
        assert_eq!(
            program.children[0].to_string(),
            "FUNCTION(ID(add), PARAM(a), PARAM(b), PRINT(BIN_OP(PLUS, ID(a), ID(b))))"
        );
    }

    #[test]
    fn function_without_parameters() {
        let program = parse_ok("function tick() n = n + 1;");
        let f = &program.children[0];
        assert_eq!(f.children.len(), 2);
        assert!(f.function_params().is_empty());
    }

    #[test]
    fn function_missing_name_fails() {
        assert_eq!(
            parse("function (a) print(a);"),
            Err(ParseError::UnexpectedToken { found: TokenKind::LParen, expected: vec![TokenKind::Id] })
        );
    }

    #[test]
    fn function_bad_parameter_list_fails() {
        assert_eq!(
            parse("function f(1) print(1);"),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::Num,
                expected: vec![TokenKind::Id, TokenKind::RParen],
            })
        );
        assert_eq!(
            parse("function f(a b) print(1);"),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::Id,
                expected: vec![TokenKind::Comma, TokenKind::RParen],
            })
        );
    }

    #[test]
    fn statements_keep_source_order() {
        let program = parse_ok("a = 1; print(a); b = 2;");
        let kinds: Vec<_> = program.children.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![NodeKind::Assign, NodeKind::Print, NodeKind::Assign]);
    }

    // ─── Lookahead and error tests ──────────────────────────────
    #[test]
    fn identifier_not_followed_by_assign_fails_at_second_token() {
        assert_eq!(
            parse("x + 1;"),
            Err(ParseError::UnexpectedToken { found: TokenKind::Plus, expected: vec![TokenKind::Assign] })
        );
    }

    #[test]
    fn bare_call_statement_is_not_a_statement() {
        assert_eq!(
            parse("f(1);"),
            Err(ParseError::UnexpectedToken { found: TokenKind::LParen, expected: vec![TokenKind::Assign] })
        );
    }

    #[test]
    fn lone_identifier_is_unexpected_end() {
        assert_eq!(parse("x"), Err(ParseError::UnexpectedEof { expected: vec![TokenKind::Assign] }));
    }

    #[test]
    fn missing_semicolon_is_unexpected_end() {
        assert_eq!(parse("x = 1"), Err(ParseError::UnexpectedEof { expected: vec![TokenKind::Semi] }));
    }

    #[test]
    fn if_without_body_is_unexpected_end() {
        assert!(matches!(parse("if (x)"), Err(ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn stray_keyword_fails() {
        assert!(matches!(
            parse("else x = 1;"),
            Err(ParseError::UnexpectedToken { found: TokenKind::Else, .. })
        ));
    }

    #[test]
    fn error_message_names_expected_kinds() {
        let err = parse("x = ;").unwrap_err();
        assert_eq!(err.to_string(), "unexpected token SEMI, expected one of NUM, ID, LPAREN");
    }

    // ─── Brace regression tests ─────────────────────────────────
    // Braces are scanned but no production consumes them: every body is a
    // single statement.
    #[test]
    fn braced_while_body_fails_at_brace() {
        let err = parse("while (x < 10) { x = x + 1; }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { found: TokenKind::LBrace, .. }));
    }

    #[test]
    fn braced_if_body_fails_at_brace() {
        let err = parse("if (x > 0) { y = 2; } else { y = 3; }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { found: TokenKind::LBrace, .. }));
    }

    #[test]
    fn braced_function_body_fails_at_brace() {
        let err = parse("function add(x, y) { print(x + y); }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { found: TokenKind::LBrace, .. }));
    }

    #[test]
    fn top_level_brace_fails() {
        let err = parse("{ x = 1; }").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::LBrace,
                expected: vec![
                    TokenKind::Id,
                    TokenKind::If,
                    TokenKind::While,
                    TokenKind::Print,
                    TokenKind::Function,
                ],
            }
        );
    }

    // ─── Nesting limit ──────────────────────────────────────────
    #[test]
    fn deeply_parenthesized_expression_is_rejected() {
        let src = format!("x = {}1{};", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(parse(&src), Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH }));
    }

    #[test]
    fn long_if_chain_is_rejected() {
        let src = format!("{}print(1);", "if (1) ".repeat(50_000));
        assert_eq!(parse(&src), Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH }));
    }

    #[test]
    fn deeply_nested_calls_are_rejected() {
        let src = format!("x = {}1{};", "f(".repeat(5000), ")".repeat(5000));
        assert_eq!(parse(&src), Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH }));
    }

    #[test]
    fn nesting_below_limit_parses() {
        let depth = MAX_NESTING_DEPTH / 4;
        let src = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_ok(&src).to_string(), "PROGRAM(ASSIGN(ID(x), NUM(1)))");

        let src = format!("{}print(1);", "while (0) ".repeat(depth));
        assert_eq!(parse_ok(&src).children.len(), 1);
    }

    #[test]
    fn long_flat_programs_are_not_nesting() {
        let src = "x = x + 1;\n".repeat(10_000);
        assert_eq!(parse_ok(&src).children.len(), 10_000);

        let short = format!("x = 0{};", " + 1".repeat(MAX_NESTING_DEPTH / 2));
        assert!(parse(&short).is_ok());
    }

    #[test]
    fn long_operator_chain_is_rejected() {
        // A left fold nests one level per operator.
        let sum = format!("x = 0{};", " + 1".repeat(10_000));
        assert_eq!(parse(&sum), Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH }));

        let product = format!("x = 1{};", " * 2".repeat(10_000));
        assert_eq!(parse(&product), Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH }));
    }

    // ─── Hand-built token streams ───────────────────────────────
    #[test]
    fn parse_from_raw_tokens() {
        let tokens = vec![
            Token::new(TokenKind::Print),
            Token::new(TokenKind::LParen),
            Token::num("7"),
            Token::new(TokenKind::RParen),
            Token::new(TokenKind::Semi),
        ];
        let program = parse_tokens(&tokens).unwrap();
        assert_eq!(program.to_string(), "PROGRAM(PRINT(NUM(7)))");
    }
}
