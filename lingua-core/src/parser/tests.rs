use std::{cell::Cell, rc::Rc};

use crate::{
    lexer::prelude::{tokenize, Token},
    parser::prelude::{parse_tokens, Node, NodeKind, ParseError, ParseErrorType, MAX_NESTING_DEPTH},
    resolver::prelude::{Lexicon, Operator, ResolutionError, Resolver},
    utils::prelude::{Event, EventEmitter, Position, SrcSpan, VectorEventEmitterIO},
};

fn parse_with(input: &str, resolver: &dyn Resolver) -> Result<Node, ParseError> {
    let tokens = tokenize(input).expect("test input lexes");

    parse_tokens(tokens, resolver, EventEmitter::null())
}

fn parse(input: &str) -> Result<Node, ParseError> {
    parse_with(input, &Lexicon::standard())
}

fn parse_err(input: &str) -> ParseError {
    parse(input).expect_err("input should not parse")
}

#[test]
fn test_precedence() -> Result<(), ParseError> {
    let cases = [
        ("2 + 3 * 4", "{(+ 2 (* 3 4))}"),
        ("10 - 5 - 2", "{(- (- 10 5) 2)}"),
        ("(1 + 2) * 3", "{(* (+ 1 2) 3)}"),
        ("5 + + 3", "{(+ 5 (+ 3))}"),
        ("--2.5", "{(- (- 2.5))}"),
        ("8 / 2 / 2", "{(/ (/ 8 2) 2)}"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input)?.to_string(), expected, "input `{input}`");
    }

    Ok(())
}

#[test]
fn test_operation_words() -> Result<(), ParseError> {
    let cases = [
        ("5 add 3", "{(+ 5 3)}"),
        ("2 plus 3 times 4", "{(+ 2 (* 3 4))}"),
        ("2 times 3 plus 4", "{(+ (* 2 3) 4)}"),
        ("x MINUS y divide z", "{(- x (/ y z))}"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input)?.to_string(), expected, "input `{input}`");
    }

    Ok(())
}

#[test]
fn test_terminal_forms() -> Result<(), ParseError> {
    let cases = [
        ("sum these numbers: [5, 3, 7]", "{(+ [5, 3, 7])}"),
        ("product these numbers: [2, 2.5,]", "{(* [2, 2.5])}"),
        ("subtract these numbers: []", "{(- [])}"),
        ("sum of 5 and 3", "{(+ 5 3)}"),
        ("create x as product of 10 and 2.5", "{(create x (* 10 2.5))}"),
        ("(sum of 1 and 2) * 3", "{(* (+ 1 2) 3)}"),
        ("2 * sum of 5 and 3", "{(* 2 (+ 5 3))}"),
        ("1 + sum these numbers: [1, 2]", "{(+ 1 (+ [1, 2]))}"),
        ("-sum of 1 and 2", "{(- (+ 1 2))}"),
        ("find f sum of 1 and 2", "{(find f (+ 1 2))}"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input)?.to_string(), expected, "input `{input}`");
    }

    Ok(())
}

#[test]
fn test_terminal_forms_do_not_chain() {
    let err = parse_err("sum of 1 and 2 + 3");

    assert_eq!(err.error, ParseErrorType::UnexpectedToken { token: Token::Plus });

    let err = parse_err("sum these numbers: [1] * 2");
    assert_eq!(err.error, ParseErrorType::UnexpectedToken { token: Token::Star });
}

#[test]
fn test_nesting_limit() {
    let limit_span = SrcSpan::from(
        Position::new(MAX_NESTING_DEPTH as u32, 0, MAX_NESTING_DEPTH as u32),
        Position::new(MAX_NESTING_DEPTH as u32 + 1, 0, MAX_NESTING_DEPTH as u32 + 1)
    );

    let parens = format!("{}1{}", "(".repeat(200), ")".repeat(200));
    let err = parse_err(&parens);
    assert_eq!(err.error, ParseErrorType::NestingLimit { limit: MAX_NESTING_DEPTH });
    assert_eq!(err.span, limit_span);
    assert_eq!(err.details().1, "Maximum nesting depth of 128 exceeded");

    let negations = format!("{}1", "-".repeat(200));
    let err = parse_err(&negations);
    assert_eq!(err.error, ParseErrorType::NestingLimit { limit: MAX_NESTING_DEPTH });
    assert_eq!(err.span, limit_span);

    let bodies = format!("{}1{}", "create f taking do\n".repeat(200), "\nend".repeat(200));
    assert_eq!(parse_err(&bodies).error, ParseErrorType::NestingLimit { limit: MAX_NESTING_DEPTH });

    let deepest = format!("{}1{}", "(".repeat(MAX_NESTING_DEPTH), ")".repeat(MAX_NESTING_DEPTH));
    assert!(parse(&deepest).is_ok());
}

#[test]
fn test_statements() -> Result<(), ParseError> {
    let input = "\n\ncreate x as 10;create f taking a b do\n a + b\nend\n\nfind f x 2\n";

    assert_eq!(
        parse(input)?.to_string(),
        "{(create x 10); (create f [a b] {(+ a b)}); (find f x 2)}"
    );

    assert_eq!(parse("")?.to_string(), "{}");
    assert_eq!(parse(";;\n")?.to_string(), "{}");
    assert_eq!(
        parse("create f taking do end")?.to_string(),
        "{(create f [] {})}"
    );
    assert_eq!(parse("find f (1 + 2) -3")?.to_string(), "{(find f (+ 1 2) (- 3))}");

    Ok(())
}

#[test]
fn test_rejected_word_falls_back_to_variable() -> Result<(), ParseError> {
    let node = parse("create foo as 3\nfoo * 2")?;

    assert_eq!(node.to_string(), "{(create foo 3); (* foo 2)}");

    // `foo` in operator position is refused, so the statement ends there
    let err = parse_err("5 foo");
    assert_eq!(err.error, ParseErrorType::UnexpectedToken { token: Token::Ident("foo".into()) });

    Ok(())
}

#[test]
fn test_syntax_errors() {
    let cases = [
        ("create 5 as 1", "Expected identifier"),
        ("create x 1", "Expected 'as' or 'taking'"),
        ("create f taking a b a + b end", "Expected 'do'"),
        ("create f taking a do a + b", "Expected 'end'"),
        ("find 5", "Expected Function Name"),
        ("(1 + 2", "Expected ')'"),
        ("sum these numbers: [1 2]", "Expected ']'"),
        ("sum these things: [1]", "Expected 'numbers'"),
        ("sum these numbers [1]", "Expected ':'"),
        ("sum of 1 or 2", "Expected 'and'"),
        ("sum of x and 2", "Expected number"),
        ("1 + *", "Expected int, float, identifier, or '('"),
        ("1 2", "Unexpected token"),
        ("end", "Unexpected token"),
        ("foo these numbers: [1]", "Unknown operation word: 'foo'"),
    ];

    for (input, expected) in cases {
        let err = parse_err(input);

        assert_eq!(err.details(), ("Invalid Syntax", expected.to_string()), "input `{input}`");
    }
}

#[test]
fn test_error_spans() {
    let err = parse_err("create x as (1 + 2\n");

    // anchored at the separator where `)` was expected
    assert_eq!(
        err.span,
        SrcSpan::from(Position::new(18, 0, 18), Position::new(19, 0, 19))
    );

    let err = parse_err("foo of 1 and 2");
    assert_eq!(err.span, SrcSpan::from(Position::new(0, 0, 0), Position::new(3, 0, 3)));
    assert!(matches!(err.error, ParseErrorType::Unresolved { ref word, .. } if word == "foo"));
}

#[test]
fn test_node_spans() -> Result<(), ParseError> {
    let node = parse("create x as 1 + 22")?;

    let NodeKind::Block(block) = &node.kind else {
        panic!("program should be a block");
    };

    let assign = &block.statements[0];
    assert_eq!(assign.location, SrcSpan::from(Position::new(0, 0, 0), Position::new(18, 0, 18)));

    let NodeKind::VarAssign { value, .. } = &assign.kind else {
        panic!("expected an assignment");
    };
    assert_eq!(value.location, SrcSpan::from(Position::new(12, 0, 12), Position::new(18, 0, 18)));

    Ok(())
}

#[test]
fn test_each_word_resolved_once() -> Result<(), ParseError> {
    let calls = Cell::new(0);

    let resolver = |word: &str| -> Result<Operator, ResolutionError> {
        calls.set(calls.get() + 1);
        Lexicon::standard().resolve(word)
    };

    // the product tier sees `plus` first and the sum tier reuses the answer
    parse_with("2 times 3 plus 4", &resolver)?;
    assert_eq!(calls.get(), 2);

    Ok(())
}

#[test]
fn test_resolution_events() -> Result<(), ParseError> {
    let events = VectorEventEmitterIO::new();
    let emitter = EventEmitter::new(Rc::new(events.clone()));

    let tokens = tokenize("create foo as 1\nfoo add 2\nfoo bar").expect("lexes");
    let err = parse_tokens(tokens, &Lexicon::standard(), emitter.clone()).unwrap_err();

    assert_eq!(err.error, ParseErrorType::UnexpectedToken { token: Token::Ident("bar".into()) });
    assert_eq!(emitter.count(), 2);

    let events = events.take();
    assert!(matches!(&events[0], Event::Resolved { word, operator: Operator::Add, .. } if word == "add"));
    assert!(matches!(&events[1], Event::Rejected { word, .. } if word == "bar"));

    Ok(())
}
