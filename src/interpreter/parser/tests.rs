//! Parser tests - verify parsing and AST structure
//!
//! These tests do NOT execute anything - that's covered by the executor tests.

use super::Parser;
use crate::interpreter::errors::{SyntaxError, UnexpectedToken};
use crate::interpreter::lexer::tokenize;
use crate::interpreter::token::{Token, TokenKind};
use crate::interpreter::types::{CompareOp, Expr, Stmt};
use crate::interpreter::{parse_program, Error, MAX_NESTING};

fn parse(source: &str) -> Vec<Stmt> {
    parse_program(source).expect("Should parse")
}

fn ident(name: &str) -> Expr {
    Expr::Ident {
        name: name.to_string(),
    }
}

/* ===================== Basic Statements ===================== */

#[test]
fn test_parse_load_and_save() {
    let program = parse(r#"load("data.csv") save("output.csv")"#);

    assert_eq!(
        program,
        vec![
            Stmt::Load {
                file: "data.csv".to_string()
            },
            Stmt::Save {
                file: "output.csv".to_string()
            },
        ]
    );
}

#[test]
fn test_parse_from_hand_built_tokens() {
    let tokens = vec![
        Token::new(TokenKind::Load, "load", 0),
        Token::new(TokenKind::LParen, "(", 4),
        Token::new(TokenKind::String, "data.csv", 5),
        Token::new(TokenKind::RParen, ")", 15),
        Token::new(TokenKind::Eof, "", 16),
    ];

    let program = Parser::new(tokens).parse().expect("Should parse");
    assert_eq!(
        program,
        vec![Stmt::Load {
            file: "data.csv".to_string()
        }]
    );
}

#[test]
fn test_parse_tokens_without_eof() {
    let tokens = vec![
        Token::new(TokenKind::Save, "save", 0),
        Token::new(TokenKind::LParen, "(", 4),
        Token::new(TokenKind::String, "x.csv", 5),
        Token::new(TokenKind::RParen, ")", 12),
    ];

    let program = Parser::new(tokens).parse().expect("Should parse");
    assert_eq!(program.len(), 1);
}

#[test]
fn test_parse_empty_program() {
    assert!(parse("").is_empty());
    assert!(parse("  // nothing here\n").is_empty());
}

#[test]
fn test_parse_train() {
    let program = parse("train(model1, features1, target1)");

    assert_eq!(
        program,
        vec![Stmt::Train {
            model: "model1".to_string(),
            features: "features1".to_string(),
            target: "target1".to_string(),
        }]
    );
}

#[test]
fn test_parse_predict() {
    let program = parse("predict(model1, [1, 2.5, 30])");

    assert_eq!(
        program,
        vec![Stmt::Predict {
            model: "model1".to_string(),
            input: vec![1.0, 2.5, 30.0],
        }]
    );
}

#[test]
fn test_parse_predict_single_value() {
    let program = parse("predict(m, [7])");

    match &program[0] {
        Stmt::Predict { input, .. } => assert_eq!(input, &vec![7.0]),
        other => panic!("Expected Predict, got {:?}", other),
    }
}

#[test]
fn test_parse_let_number() {
    let program = parse("let x = 5 ;");

    assert_eq!(
        program,
        vec![Stmt::Let {
            name: "x".to_string(),
            value: Expr::LitNum { v: 5.0 },
        }]
    );
}

#[test]
fn test_parse_let_string_and_identifier() {
    let program = parse(r#"let model = "linear_regression"; let alias = model;"#);

    assert_eq!(
        program[0],
        Stmt::Let {
            name: "model".to_string(),
            value: Expr::LitStr {
                v: "linear_regression".to_string()
            },
        }
    );
    assert_eq!(
        program[1],
        Stmt::Let {
            name: "alias".to_string(),
            value: ident("model"),
        }
    );
}

#[test]
fn test_parse_set() {
    let program = parse("set(count, 3)");

    assert_eq!(
        program,
        vec![Stmt::Set {
            name: "count".to_string(),
            value: Expr::LitNum { v: 3.0 },
        }]
    );
}

/* ===================== Control Flow ===================== */

#[test]
fn test_parse_if() {
    let program = parse(r#"if (x > 3) { save("yes.csv") }"#);

    assert_eq!(
        program,
        vec![Stmt::If {
            left: ident("x"),
            op: CompareOp::Gt,
            right: Expr::LitNum { v: 3.0 },
            body: vec![Stmt::Save {
                file: "yes.csv".to_string()
            }],
        }]
    );
}

#[test]
fn test_parse_if_all_operators() {
    let cases = [
        ("==", CompareOp::Eq),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
        (">=", CompareOp::Gte),
        ("<=", CompareOp::Lte),
    ];

    for (symbol, expected) in cases {
        let program = parse(&format!("if (a {} b) {{ }}", symbol));
        match &program[0] {
            Stmt::If { op, body, .. } => {
                assert_eq!(*op, expected);
                assert!(body.is_empty());
            }
            other => panic!("Expected If, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_loop() {
    let program = parse(r#"loop(3) { save("a.csv") load("b.csv") }"#);

    assert_eq!(
        program,
        vec![Stmt::Loop {
            count: Expr::LitNum { v: 3.0 },
            body: vec![
                Stmt::Save {
                    file: "a.csv".to_string()
                },
                Stmt::Load {
                    file: "b.csv".to_string()
                },
            ],
        }]
    );
}

#[test]
fn test_parse_nested_blocks() {
    let source = r#"
        loop(n) {
            let i = 1;
            loop(2) {
                if (i == 1) {
                    set(flag, 1)
                    predict(m, [1])
                }
            }
        }
    "#;
    let program = parse(source);

    let Stmt::Loop { body: outer, .. } = &program[0] else {
        panic!("Expected Loop, got {:?}", program[0]);
    };
    assert!(matches!(outer[0], Stmt::Let { .. }));
    let Stmt::Loop { body: inner, .. } = &outer[1] else {
        panic!("Expected nested Loop, got {:?}", outer[1]);
    };
    let Stmt::If { body, .. } = &inner[0] else {
        panic!("Expected If, got {:?}", inner[0]);
    };
    assert_eq!(body.len(), 2);
}

/* ===================== Properties ===================== */

#[test]
fn test_parse_is_deterministic() {
    let source = r#"
        let x = 5;
        loop(x) { if (x >= 2) { train(m, f, t) } }
        predict(m, [1, 2])
    "#;
    let tokens = tokenize(source).expect("Should lex");

    let first = Parser::new(tokens.clone()).parse().expect("Should parse");
    let second = Parser::new(tokens).parse().expect("Should parse");
    assert_eq!(first, second);
}

#[test]
fn test_ast_json_round_trip() {
    let program = parse(r#"let x = 2; loop(x) { if (x < 3) { save("o.csv") } }"#);

    let json = serde_json::to_string(&program).expect("Should serialize");
    let restored: Vec<Stmt> = serde_json::from_str(&json).expect("Should deserialize");
    assert_eq!(program, restored);
}

#[test]
fn test_ast_json_shape() {
    let program = parse("if (x >= 1) { }");
    let json = serde_json::to_value(&program).expect("Should serialize");

    assert_eq!(json[0]["type"], "If");
    assert_eq!(json[0]["op"], ">=");
    assert_eq!(json[0]["left"]["type"], "Ident");
    assert_eq!(json[0]["right"]["v"], 1.0);
}

/* ===================== Errors ===================== */

fn syntax_error(source: &str) -> UnexpectedToken {
    match parse_program(source) {
        Err(Error::Syntax(SyntaxError::Unexpected(e))) => e,
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_load_without_quotes() {
    let err = syntax_error("load(data.csv)");

    assert_eq!(err.expected, vec![TokenKind::String]);
    assert_eq!(err.found, TokenKind::Identifier);
    assert_eq!(err.literal, "data");
    assert_eq!(err.position, 5);
    assert_eq!(
        err.to_string(),
        "Syntax error: expected STRING, got IDENTIFIER at position 5"
    );
}

#[test]
fn test_train_with_string_argument() {
    let err = syntax_error(r#"train("linear_regression", data, price)"#);
    assert_eq!(err.expected, vec![TokenKind::Identifier]);
    assert_eq!(err.found, TokenKind::String);
}

#[test]
fn test_unexpected_statement_start() {
    let err = syntax_error("x = 5");
    assert_eq!(err.found, TokenKind::Identifier);
    assert!(err.expected.contains(&TokenKind::Load));
    assert!(err.expected.contains(&TokenKind::If));
    assert!(err.to_string().contains("expected one of ["));
}

#[test]
fn test_let_missing_semicolon() {
    let err = syntax_error("let x = 5 load(\"a\")");
    assert_eq!(err.expected, vec![TokenKind::Semicolon]);
    assert_eq!(err.found, TokenKind::Load);
}

#[test]
fn test_if_missing_operator() {
    let err = syntax_error("if (x 3) { }");
    assert_eq!(err.found, TokenKind::Number);
    assert_eq!(err.expected.len(), 5);
}

#[test]
fn test_if_assignment_is_not_comparison() {
    let err = syntax_error("if (x = 3) { }");
    assert_eq!(err.found, TokenKind::Assign);
}

#[test]
fn test_unclosed_block() {
    let err = syntax_error(r#"loop(2) { save("a.csv")"#);
    assert_eq!(err.found, TokenKind::Eof);
    assert!(err.expected.contains(&TokenKind::RBrace));
}

#[test]
fn test_block_required_after_loop() {
    let err = syntax_error(r#"loop(2) save("a.csv")"#);
    assert_eq!(err.expected, vec![TokenKind::LBrace]);
    assert_eq!(err.found, TokenKind::Save);
}

#[test]
fn test_predict_empty_array() {
    let err = syntax_error("predict(m, [])");
    assert_eq!(err.expected, vec![TokenKind::Number]);
    assert_eq!(err.found, TokenKind::RBracket);
}

#[test]
fn test_predict_identifier_in_array() {
    let err = syntax_error("predict(m, [1, x])");
    assert_eq!(err.found, TokenKind::Identifier);
}

#[test]
fn test_stray_closing_brace() {
    let err = syntax_error("}");
    assert_eq!(err.found, TokenKind::RBrace);
}

#[test]
fn test_lex_error_surfaces_through_parse_program() {
    let result = parse_program("load(\"unterminated)");
    assert!(matches!(result, Err(Error::Lex(_))));
}

/* ===================== Nesting ===================== */

fn nested_ifs(depth: usize) -> String {
    format!(
        "{}save(\"a.csv\"){}",
        "if (1 == 1) { ".repeat(depth),
        " }".repeat(depth)
    )
}

#[test]
fn test_nesting_at_limit_parses() {
    let program = parse(&nested_ifs(MAX_NESTING));
    assert_eq!(program.len(), 1);
}

#[test]
fn test_nesting_past_limit_is_syntax_error() {
    let source = nested_ifs(MAX_NESTING + 1);

    match parse_program(&source) {
        Err(Error::Syntax(SyntaxError::TooDeep { limit, position })) => {
            assert_eq!(limit, MAX_NESTING);
            // The offending `{` belongs to the innermost `if`
            assert_eq!(position, MAX_NESTING * "if (1 == 1) { ".len() + 12);
        }
        other => panic!("Expected nesting error, got {:?}", other),
    }
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let result = parse_program(&nested_ifs(5_000));
    assert!(matches!(
        result,
        Err(Error::Syntax(SyntaxError::TooDeep { .. }))
    ));
}
