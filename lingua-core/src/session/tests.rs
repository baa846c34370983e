use std::{cell::Cell, path::PathBuf, rc::Rc};

use crate::{
    parser::prelude::Number,
    resolver::prelude::{CachingResolver, Lexicon, NullResolver, Operator, ResolutionError, Resolver},
    utils::prelude::{string_with_arrows, Error, Event, EventEmitter, Position, SrcSpan, VectorEventEmitterIO},
};
use super::{Session, STDIN};

fn number(session: &Session, input: &str) -> Number {
    session.run(STDIN, input)
        .expect("run succeeds")
        .as_number()
        .expect("result is a number")
}

fn rendered(input: &str) -> String {
    Session::default().run(STDIN, input).expect_err("run fails").render()
}

#[test]
fn test_session_persists_globals() {
    let session = Session::default();

    assert_eq!(number(&session, "create x as 10"), Number::Int(10));
    assert_eq!(number(&session, "x + 5"), Number::Int(15));
    assert!(session.get("x").is_some());

    // a failing run keeps what it bound before failing
    assert!(session.run(STDIN, "create y as 2\ny / 0").is_err());
    assert_eq!(number(&session, "y times x"), Number::Int(20));
}

#[test]
fn test_rejected_word_used_as_variable() {
    let session = Session::default();

    assert_eq!(number(&session, "create foo as 3\nfoo * 2"), Number::Int(6));
    assert_eq!(number(&session, "create g taking foo do foo minus 1 end\nfind g foo"), Number::Int(2));
}

#[test]
fn test_render_lexical_error() {
    assert_eq!(
        rendered("5 @ 3"),
        "Illegal Character: '@'\nFile <stdin>, line 1\n\n5 @ 3\n  ^"
    );
}

#[test]
fn test_render_syntax_error() {
    assert_eq!(
        rendered("create x as 1\n(1 + 2"),
        "Invalid Syntax: Expected ')'\nFile <stdin>, line 2\n\n(1 + 2\n      ^"
    );
    assert_eq!(
        rendered("foo of 1 and 2"),
        "Invalid Syntax: Unknown operation word: 'foo'\nFile <stdin>, line 1\n\nfoo of 1 and 2\n^^^"
    );
}

#[test]
fn test_render_runtime_error() {
    assert_eq!(
        rendered("10 / 0"),
        "Traceback (most recent call last):\n  File <stdin>, line 1, in <program>\nRuntime Error: Division by zero\nFile <stdin>, line 1\n\n10 / 0\n     ^"
    );
    assert_eq!(
        rendered("create x as 1\nmissing + x"),
        "Traceback (most recent call last):\n  File <stdin>, line 2, in <program>\nRuntime Error: 'missing' is not defined\nFile <stdin>, line 2\n\nmissing + x\n^^^^^^^"
    );
}

#[test]
fn test_render_traceback_through_nested_calls() {
    let src = "create f taking a do\n  a / 0\nend\ncreate g taking a do\n  find f a\nend\nfind g 1";

    let err = Session::default().run("test.lf", src).expect_err("run fails");

    assert_eq!(
        err.render(),
        "Traceback (most recent call last):\n\
        \x20 File test.lf, line 7, in <program>\n\
        \x20 File test.lf, line 5, in g\n\
        \x20 File test.lf, line 2, in f\n\
        Runtime Error: Division by zero\n\
        File test.lf, line 2\n\
        \n\
        \x20 a / 0\n\
        \x20     ^"
    );
}

#[test]
fn test_arity_error_reported_at_call_site() {
    assert_eq!(
        rendered("create f taking a b do a end\nfind f 1"),
        "Traceback (most recent call last):\n  File <stdin>, line 2, in <program>\nRuntime Error: 1 args passed, 2 expected\nFile <stdin>, line 2\n\nfind f 1\n^^^^^^^^"
    );
}

#[test]
fn test_long_and_deep_programs() {
    let session = Session::default();

    let chain = vec!["1"; 50_000].join(" plus ");
    assert_eq!(number(&session, &chain), Number::Int(50_000));

    let parens = format!("{}1{}", "(".repeat(300), ")".repeat(300));
    assert_eq!(
        rendered(&parens),
        format!(
            "Invalid Syntax: Maximum nesting depth of 128 exceeded\nFile <stdin>, line 1\n\n{parens}\n{}^",
            " ".repeat(128)
        )
    );
}

#[test]
fn test_pretty_string() {
    let err = Session::default().run("calc.lf", "create a as 1\na + (2 / 0)").expect_err("run fails");
    let pretty = err.pretty_string();

    assert!(pretty.contains("Runtime Error"), "{pretty}");
    assert!(pretty.contains("Division by zero"), "{pretty}");
    assert!(pretty.contains("calc.lf"), "{pretty}");

    // the end-of-input marker lies past the source and must not break rendering
    let err = Session::default().run("calc.lf", "(1").expect_err("run fails");
    assert!(err.pretty_string().contains("Expected ')'"));
}

#[test]
fn test_string_with_arrows_spanning_lines() {
    let span = SrcSpan::from(Position::new(1, 0, 1), Position::new(4, 1, 1));

    assert_eq!(string_with_arrows("ab\ncd", span), "ab\n ^\ncd\n^");
    assert_eq!(
        string_with_arrows("\tx + y", SrcSpan::from(Position::new(1, 0, 1), Position::new(2, 0, 2))),
        "x + y\n ^"
    );
}

#[test]
fn test_null_resolver_only_understands_symbols() {
    let session = Session::new(Rc::new(NullResolver));

    assert_eq!(number(&session, "2 * 3 + 1"), Number::Int(7));

    let err = session.run(STDIN, "sum of 1 and 2").expect_err("no words");
    assert_eq!(
        err.details(),
        ("Invalid Syntax", "Cannot resolve operation word 'sum' without a resolver".to_string())
    );
}

#[test]
fn test_caching_resolver_consults_backend_once_per_word() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();

    let backend = move |word: &str| -> Result<Operator, ResolutionError> {
        counter.set(counter.get() + 1);
        Lexicon::standard().resolve(word)
    };

    let session = Session::new(Rc::new(CachingResolver::new(backend)));

    assert_eq!(number(&session, "1 add 2"), Number::Int(3));
    assert_eq!(number(&session, "3 ADD 4"), Number::Int(7));
    assert_eq!(number(&session, "sum of 1 and 1"), Number::Int(2));
    assert_eq!(number(&session, "sum these numbers: [1, 2]"), Number::Int(3));

    assert_eq!(calls.get(), 2);
}

#[test]
fn test_session_reports_resolution_events() {
    let events = VectorEventEmitterIO::new();
    let session = Session::default()
        .with_events(EventEmitter::new(Rc::new(events.clone())));

    assert_eq!(number(&session, "6 divide 3"), Number::Float(2.0));

    assert_eq!(session.events().count(), 1);
    assert_eq!(events.take(), vec![Event::Resolved {
        word: "divide".into(),
        operator: Operator::Divide,
        location: SrcSpan::from(Position::new(2, 0, 2), Position::new(8, 0, 8)),
    }]);
}

#[test]
fn test_run_file() -> Result<(), Error> {
    let path = std::env::temp_dir().join(format!("lingua-session-{}.lf", std::process::id()));
    std::fs::write(&path, "create r as 2\nproduct of 10 and 2.5 ; r")?;

    let session = Session::default();
    let value = session.run_file(path.clone());
    std::fs::remove_file(&path)?;

    assert_eq!(value?.as_number(), Some(Number::Int(2)));
    assert!(session.get("r").is_some());

    Ok(())
}

#[test]
fn test_run_missing_file() {
    let err = Session::default()
        .run_file(PathBuf::from("/definitely/not/here.lf"))
        .expect_err("file is missing");

    assert_eq!(err, Error::StdIo { err: std::io::ErrorKind::NotFound });
}
