#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    source: &'a str,
    vars: Vec<(String, Value)>,
    prefix: Option<char>,
    newline: Option<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    let mut builder = vtl::Syntax::builder();
    if let Some(prefix) = input.prefix {
        builder.prefix(prefix);
    }
    if let Some(newline) = input.newline {
        builder.newline(newline);
    }
    let engine = vtl::Engine::with_syntax(builder.build());

    let mut vars: vtl::Variables = input
        .vars
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::Bool(b) => vtl::Value::from(b),
                Value::Integer(n) => vtl::Value::from(n),
                Value::Float(n) => vtl::Value::from(n),
                Value::String(s) => vtl::Value::from(s),
            };
            (k, v)
        })
        .collect();

    let (ok, output) = engine.try_parse(input.source, &mut vars);
    if !ok {
        assert!(output.is_empty());
    }
});
