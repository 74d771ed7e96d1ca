use vtl::{vars, Engine, ErrorKind, Syntax, Value, Variables};

#[test]
fn parse_set() {
    let mut vars = Variables::new();
    let result = Engine::new()
        .parse("#set ($message = \"Hello World\")\n", &mut vars)
        .unwrap();
    assert_eq!(result, "");
    assert!(vars.contains_key("message"));
    assert_eq!(vars["message"], "Hello World");
}

#[test]
fn parse_set_then_substitute() {
    let mut vars = Variables::new();
    let result = Engine::new()
        .parse(
            "#set ($x = \"v\")\nbare $x braced ${x}\n",
            &mut vars,
        )
        .unwrap();
    assert_eq!(result, "bare v braced v\n");
    assert_eq!(vars["x"], "v");
}

#[test]
fn parse_set_overwrites_existing() {
    let mut vars = vars! { a: 1, b: 2 };
    Engine::new().parse("#set ($a = 3)", &mut vars).unwrap();
    assert_eq!(vars["a"], Value::String("3".into()));
    assert_eq!(vars.keys().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn parse_set_value_is_string() {
    let mut vars = Variables::new();
    let result = Engine::new()
        .parse("#set ($n = 5)\n#if ( $n + 1 == 6 )\nsix\n#end\n", &mut vars)
        .unwrap();
    assert_eq!(result, "six\n");
    assert_eq!(vars["n"], Value::String("5".into()));
}

#[test]
fn parse_set_without_prefix_or_quotes() {
    let mut vars = Variables::new();
    Engine::new()
        .parse("#set (name = John Smith)", &mut vars)
        .unwrap();
    assert_eq!(vars["name"], "John Smith");
}

#[test]
fn parse_set_strips_one_layer_of_quotes() {
    let mut vars = Variables::new();
    Engine::new()
        .parse("#set ($q = \"\"quoted\"\")", &mut vars)
        .unwrap();
    assert_eq!(vars["q"], "\"quoted\"");
}

#[test]
fn parse_set_value_is_not_substituted() {
    let mut vars = vars! { a: "x" };
    Engine::new().parse("#set ($b = \"$a\")", &mut vars).unwrap();
    assert_eq!(vars["b"], "$a");
}

#[test]
fn parse_set_custom_prefix() {
    let syntax = Syntax::builder().prefix('+').build();
    let mut vars = Variables::new();
    let result = Engine::with_syntax(syntax)
        .parse("#set (+x = \"y\")\n+x ${x}\n", &mut vars)
        .unwrap();
    assert_eq!(result, "y ${x}\n");
    assert_eq!(vars["x"], "y");
}

#[test]
fn parse_set_in_suppressed_block_still_applies() {
    let mut vars = Variables::new();
    let result = Engine::new()
        .parse(
            "#if ( false )\n#set ($hidden = \"yes\")\n#end\n$hidden\n",
            &mut vars,
        )
        .unwrap();
    assert_eq!(result, "yes\n");
    assert_eq!(vars["hidden"], "yes");
}

#[test]
fn parse_set_used_in_later_condition() {
    let mut vars = Variables::new();
    let result = Engine::new()
        .parse(
            "#set ($mode = \"debug\")\n#if ( '$mode' == 'debug' )\nverbose\n#end\n",
            &mut vars,
        )
        .unwrap();
    assert_eq!(result, "verbose\n");
}

#[test]
fn parse_set_partial_assignments_kept_on_failure() {
    let mut vars = Variables::new();
    let (ok, output) = Engine::new().try_parse("#set ($a = 1)\n#end\n", &mut vars);
    assert!(!ok);
    assert_eq!(output, "");
    assert_eq!(vars["a"], "1");
}

#[test]
fn parse_set_err_no_equals() {
    let err = Engine::new()
        .parse("#set ($message)\n", &mut Variables::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Directive);
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | #set ($message)
   |       ^^^^^^^^ expected `#set` to contain exactly one `=`
"
    );
}

#[test]
fn parse_set_err_two_equals() {
    let err = Engine::new()
        .parse("lorem\n#set ($a = $b = 1)\n", &mut Variables::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected `#set` to contain exactly one `=` on line 2"
    );
}

#[test]
fn parse_set_empty_name() {
    let mut vars = Variables::new();
    let result = Engine::new()
        .parse("#set ($ = 1)\n#set ( = \"x\")\nlorem\n", &mut vars)
        .unwrap();
    assert_eq!(result, "lorem\n");
    assert_eq!(vars.keys().collect::<Vec<_>>(), [""]);
    assert_eq!(vars[""], "x");
}

#[test]
fn parse_set_unterminated_is_content() {
    let result = Engine::new()
        .parse("#set ($a = 1\n", &mut Variables::new())
        .unwrap();
    assert_eq!(result, "#set ($a = 1\n");
}
