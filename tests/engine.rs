mod helpers;

use std::env;
use std::fs;
use std::thread;

use vtl::{vars, Engine, ErrorKind, Syntax, Value, Variables};

use crate::helpers::Writer;

#[test]
fn engine_debug() {
    format!("{:?}", Engine::new());
}

#[test]
fn engine_send_and_sync() {
    let engine = Engine::new();
    thread::spawn(move || {
        let result = engine
            .parse("$lorem", &mut vars! { lorem: "ipsum" })
            .unwrap();
        assert_eq!(result, "ipsum");
    })
    .join()
    .unwrap();
}

#[test]
fn engine_parse_non_static_source() -> vtl::Result<()> {
    let engine = Engine::new();
    let source = String::from("$lorem");
    let result = engine.parse(&source, &mut vars! { lorem: "ipsum" })?;
    assert_eq!(result, "ipsum");
    Ok(())
}

#[test]
fn engine_syntax_default() {
    let engine = Engine::default();
    assert_eq!(engine.syntax().prefix(), '$');
    assert_eq!(engine.syntax().newline(), None);
}

#[test]
fn engine_syntax_custom() {
    let syntax = Syntax::builder().prefix('@').newline("\r\n").build();
    let engine = Engine::with_syntax(syntax);
    assert_eq!(engine.syntax().prefix(), '@');
    assert_eq!(engine.syntax().newline(), Some("\r\n"));

    let result = engine
        .parse("@a\n#if ( @{a} == 1 )\nyes\n#end\n", &mut vars! { a: 1 })
        .unwrap();
    assert_eq!(result, "1\r\nyes\r\n");
}

#[test]
fn engine_syntax_empty_newline() {
    let syntax = Syntax::builder().newline("").build();
    assert_eq!(syntax.newline(), Some(""));
    let result = Engine::with_syntax(syntax)
        .parse("lorem\r\n#if ( true )\nipsum $x\n#end\ndolor", &mut vars! { x: 1 })
        .unwrap();
    assert_eq!(result, "loremipsum 1dolor");
}

#[test]
fn engine_custom_evaluator_receives_substituted_condition() {
    let mut engine = Engine::new();
    engine.set_evaluator(|expr: &str| Ok(Value::Bool(expr == "John is admin")));
    let result = engine
        .parse(
            "#if ( $name is admin )\nwelcome\n#else\ngo away\n#end\n",
            &mut vars! { name: "John" },
        )
        .unwrap();
    assert_eq!(result, "welcome\n");
}

#[test]
fn engine_custom_evaluator_non_bool() {
    let mut engine = Engine::new();
    engine.set_evaluator(|_: &str| Ok(Value::from("yes")));
    let err = engine
        .parse("#if ( x )\n#end\n", &mut Variables::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Condition);
    assert_eq!(
        err.message(),
        "condition does not evaluate as a boolean, found string"
    );
}

#[test]
fn engine_try_parse() {
    let engine = Engine::new();

    let (ok, output) = engine.try_parse("Hello $name\n", &mut vars! { name: "John" });
    assert!(ok);
    assert_eq!(output, "Hello John\n");

    let (ok, output) = engine.try_parse("Hello $name\n#end\n", &mut vars! { name: "John" });
    assert!(!ok);
    assert_eq!(output, "");
}

#[test]
fn engine_parse_file() {
    let path = env::temp_dir().join(format!("vtl-parse-file-{}.vm", std::process::id()));
    fs::write(&path, "#set ($x = \"file\")\r\nfrom $x\r\n").unwrap();

    let mut vars = Variables::new();
    let result = Engine::new().parse_file(&path, &mut vars);
    fs::remove_file(&path).unwrap();

    assert_eq!(result.unwrap(), "from file\r\n");
    assert_eq!(vars["x"], "file");
}

#[test]
fn engine_parse_file_missing() {
    let path = env::temp_dir().join("vtl-this-file-does-not-exist.vm");
    let err = Engine::new()
        .parse_file(&path, &mut Variables::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().starts_with("io error: "));
}

#[test]
fn engine_parse_to_writer() {
    let mut w = Writer::new();
    Engine::new()
        .parse_to_writer("lorem $x\nipsum\n", &mut vars! { x: 1 }, &mut w)
        .unwrap();
    assert_eq!(w.into_string(), "lorem 1\nipsum\n");
}

#[test]
fn engine_parse_to_writer_io_error() {
    let mut w = Writer::failing();
    let err = Engine::new()
        .parse_to_writer("lorem\n", &mut Variables::new(), &mut w)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.to_string(), "io error: pipe closed");
}

#[test]
fn engine_parse_to_writer_nothing_written_on_failure() {
    let mut w = Writer::new();
    let err = Engine::new()
        .parse_to_writer("lorem\n#else\n", &mut Variables::new(), &mut w)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Directive);
    assert_eq!(w.writes(), 0);
    assert_eq!(w.into_string(), "");
}

#[test]
fn engine_error_is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
    let err = Engine::new()
        .parse("#end\n", &mut Variables::new())
        .unwrap_err();
    assert_error(&err);
    assert!(std::error::Error::source(&err).is_none());
}
