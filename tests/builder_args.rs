//! Integration tests for the call-tree builder's argument grammar

use rstest::rstest;

use notedown::notedown::lexing::{lex, LexError};
use notedown::notedown::parsing::{build, BuilderOptions, ParseError};
use notedown::notedown::token::{CallNode, Token, Value};

fn build_source(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    build(lex(source).unwrap(), &BuilderOptions::default())
}

fn single_call(source: &str) -> CallNode {
    let tokens = build_source(source).unwrap();
    match tokens.into_iter().next() {
        Some((Token::Call(node), _)) => node,
        other => panic!("expected a call token, got {:?}", other),
    }
}

#[test]
fn test_header_call_from_the_format_reference() {
    let node = single_call(r#"Header(a="1", b=["c","d"], obj={a:"a", b:"b"})"#);

    assert_eq!(node.name, "Header");
    assert!(node.args.is_empty());
    assert_eq!(node.kwargs.len(), 3);
    assert_eq!(node.kwarg("a"), Some(&Value::QuotedString("1".to_string())));
    assert_eq!(
        node.kwarg("b"),
        Some(&Value::List(vec![
            Value::QuotedString("c".to_string()),
            Value::QuotedString("d".to_string()),
        ]))
    );
    match node.kwarg("obj") {
        Some(Value::Object(entries)) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(
                entries.get("a"),
                Some(&Value::QuotedString("a".to_string()))
            );
            assert_eq!(
                entries.get("b"),
                Some(&Value::QuotedString("b".to_string()))
            );
        }
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn test_deeply_nested_values() {
    let node = single_call(r#"Outer(a=[{k: Inner("x")}, [b]])"#);
    match node.kwarg("a") {
        Some(Value::List(items)) => {
            assert_eq!(items.len(), 2);
            match &items[0] {
                Value::Object(entries) => match entries.get("k") {
                    Some(Value::Call(inner)) => {
                        assert_eq!(inner.name, "Inner");
                        assert_eq!(inner.args, vec![Value::QuotedString("x".to_string())]);
                    }
                    other => panic!("expected nested call, got {:?}", other),
                },
                other => panic!("expected object, got {:?}", other),
            }
            assert_eq!(items[1], Value::List(vec![Value::Word("b".to_string())]));
        }
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn test_keyword_with_no_value_points_at_the_assignment() {
    let err = build_source("line one\nFoo(a=)").unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingValue {
            key: "a".to_string(),
            line: 2,
            call: "Foo".to_string(),
        }
    );
}

#[test]
fn test_comments_and_newlines_are_insignificant_in_arguments() {
    let node = single_call("Foo(\n  % leading note\n  a,\n  b = c  % trailing note\n  ,\n)");
    assert_eq!(node.args, vec![Value::Word("a".to_string())]);
    assert_eq!(node.kwarg("b"), Some(&Value::Word("c".to_string())));
}

#[rstest]
#[case("Foo(a: 1)", ':')]
#[case("Foo([a: 1])", ':')]
#[case("Foo({a = 1})", '=')]
#[case("Foo([x = y])", '=')]
fn test_wrong_delimiter_for_context_fails_at_lex_time(
    #[case] source: &str,
    #[case] expected: char,
) {
    match lex(source) {
        Err(LexError::InvalidDelimiter { found, .. }) => assert_eq!(found, expected),
        other => panic!("expected invalid delimiter error, got {:?}", other),
    }
}

#[rstest]
#[case("Foo(a=1, a=2)")]
#[case("Foo(x={k: 1, k: 2})")]
fn test_duplicate_keys_in_strict_mode(#[case] source: &str) {
    let tokens = lex(source).unwrap();
    assert!(build(tokens.clone(), &BuilderOptions::default()).is_ok());
    let err = build(tokens, &BuilderOptions { strict_keys: true }).unwrap_err();
    match err {
        ParseError::DuplicateKey { key, .. } => assert!(key == "a" || key == "k"),
        other => panic!("expected duplicate key error, got {:?}", other),
    }
}

#[test]
fn test_quoted_keys_are_strings_too() {
    let node = single_call(r#"Foo("spaced key"=1, obj={"another key": 2})"#);
    assert_eq!(
        node.kwarg("spaced key"),
        Some(&Value::Word("1".to_string()))
    );
    match node.kwarg("obj") {
        Some(Value::Object(entries)) => {
            assert_eq!(entries.get("another key"), Some(&Value::Word("2".to_string())));
        }
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn test_object_key_must_be_a_string() {
    let err = build_source("Foo(x={[a]: 1})").unwrap_err();
    assert!(matches!(err, ParseError::NonStringKey { .. }));
}

#[test]
fn test_keyword_key_must_be_a_string() {
    let err = build_source("Foo([a]=1)").unwrap_err();
    assert!(matches!(err, ParseError::NonStringKey { .. }));
}

#[test]
fn test_truncated_stream_names_the_open_call() {
    let tokens = vec![
        (Token::FunctionName("Header".to_string()), 3),
        (Token::StartCall, 3),
        (Token::Word("a".to_string()), 3),
        (Token::KeywordAssign, 3),
    ];
    let err = build(tokens, &BuilderOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedEnd {
            name: "Header".to_string(),
            line: 3,
        }
    );
}

#[test]
fn test_calls_inside_closures_are_folded_recursively() {
    let tokens = build_source("Outer(1) {\nInner(2)\n}").unwrap();
    let calls: Vec<String> = tokens
        .into_iter()
        .filter_map(|(token, _)| match token {
            Token::Call(node) => Some(node.name),
            _ => None,
        })
        .collect();
    assert_eq!(calls, vec!["Outer".to_string(), "Inner".to_string()]);
}
