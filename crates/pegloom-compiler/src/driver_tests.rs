use indoc::indoc;
use pegloom_core::{Expr, Grammar, Item, Rule};

use crate::{Config, Error, generate_source_code};

fn generate(items: Vec<Item>) -> String {
    generate_source_code(&Config::default(), Grammar::new(items)).unwrap()
}

#[test]
fn output_layout() {
    let out = generate(vec![Rule::new("Digits", Expr::regex("[0-9]+")).into()]);

    assert!(out.starts_with("// Generated by pegloom. Do not edit.\n"));
    assert!(out.contains("#[allow(dead_code)]\npub mod runtime {\n"));
    assert!(out.contains(
        "pub use runtime::{Node, ParseError, PartialParseError, Position, PositionInfo, SourceError, Value, transform, visit};"
    ));
    assert!(out.contains(
        "pub fn parse(text: &str, pos: usize, fullparse: bool) -> Result<runtime::Value, runtime::SourceError> {\n    runtime::run(text, pos, runtime::ParseFn::rule(\"_cont_Digits\", _cont_Digits), fullparse)\n}"
    ));
    assert!(out.contains("fn _cont_Digits(ctx: runtime::Ctx"));
    assert!(out.contains("pub mod Digits {"));
    assert!(out.contains("fn _raise_error2(text: &str, pos: usize) -> runtime::ParseError {"));

    // Runtime first, then the entry point, then the rules.
    let runtime = out.find("pub mod runtime").unwrap();
    let parse = out.find("pub fn parse(text").unwrap();
    let rule = out.find("fn _cont_Digits").unwrap();
    assert!(runtime < parse && parse < rule);
}

#[test]
fn output_has_no_inner_attributes() {
    let out = generate(vec![Rule::new("Digits", Expr::regex("[0-9]+")).into()]);
    assert!(!out.lines().any(|line| line.trim_start().starts_with("#![")));
    assert!(!out.lines().any(|line| line.trim_start().starts_with("//!")));
}

#[test]
fn header_comes_first() {
    let config = Config::new().header("Calculator grammar.\n\nDo not edit by hand.");
    let grammar = Grammar::new(vec![Rule::new("A", Expr::string("a")).into()]);
    let out = generate_source_code(&config, grammar).unwrap();
    assert!(out.starts_with(indoc! {"
        // Calculator grammar.
        //
        // Do not edit by hand.

        // Generated by pegloom. Do not edit.
    "}));
}

#[test]
fn start_rule_is_named_start() {
    let out = generate(vec![
        Rule::new("Item", Expr::string("i")).into(),
        Rule::new("Start", Expr::reference("Item")).into(),
    ]);
    assert!(out.contains("runtime::run(text, pos, runtime::ParseFn::rule(\"_cont_Start\", _cont_Start), fullparse)"));
}

#[test]
fn ignored_rules_are_skipped_between_tokens() {
    let out = generate(vec![
        Rule::new("Start", Expr::seq([Expr::string("a"), Expr::string("b")])).into(),
        Rule::new("Space", Expr::regex(r"\s+")).ignored().into(),
    ]);
    assert!(out.contains("fn _cont__ignored("));
    assert!(out.contains("pub mod _ignored {"));
    assert!(out.contains("// _ignored = Skip(Space)"));
    // After each of the two strings, but not after the ignored regex.
    assert_eq!(out.matches(".await.2;").count(), 2);
    // Before the first token of the start rule.
    assert!(out.contains("// Start = _ignored >> [\"a\", \"b\"]"));
}

#[test]
fn class_start_rule_skips_before_first_field() {
    let out = generate(vec![
        Rule::class("Pair", [("key", Expr::regex("[a-z]+")), ("value", Expr::regex("[0-9]+"))])
            .into(),
        Rule::new("Space", Expr::regex(" +")).ignored().into(),
    ]);
    assert!(out.contains("//     key: _ignored >> /[a-z]+/"));
    assert!(out.contains("//     value: /[0-9]+/"));
}

#[test]
fn anonymous_rules_get_names() {
    let out = generate(vec![
        Rule::new("Start", Expr::string("s")).into(),
        Rule::anonymous(Expr::string("x")).into(),
        Rule::anonymous(Expr::string("y")).into(),
    ]);
    assert!(out.contains("pub mod _anonymous_1 {"));
    assert!(out.contains("pub mod _anonymous_2 {"));
}

#[test]
fn code_items_are_copied_verbatim() {
    let out = generate(vec![
        Item::Code("fn answer() -> i64 {\n    42\n}".to_string()),
        Rule::new("Start", Expr::code("answer()")).into(),
    ]);
    assert!(out.contains("fn answer() -> i64 {\n    42\n}\n"));
    assert!(out.contains("_result = runtime::Value::from(answer());"));
}

#[test]
fn error_functions_cover_every_fallible_expression() {
    let out = generate(vec![
        Rule::new(
            "Start",
            Expr::seq([
                Expr::choice([Expr::string("a"), Expr::string("b")]),
                Expr::expect_not(Expr::string("c")),
            ]),
        )
        .into(),
    ]);
    // choice, "a", "b", not-"c", "c"
    assert_eq!(out.matches("fn _raise_error").count(), 5);
    assert!(out.contains(r#"Did not expect to match: \"c\""#));
}

#[test]
fn regex_imports_only_when_needed() {
    let out = generate(vec![Rule::new("A", Expr::string("a")).into()]);
    assert!(!out.contains("regex_automata"));

    let out = generate(vec![Rule::new("A", Expr::regex("a+")).into()]);
    assert!(out.contains("use regex_automata::{Anchored as _Anchored, Input as _Input};"));
}

#[test]
fn build_errors_are_reported() {
    let err = generate_source_code(
        &Config::default(),
        Grammar::new(vec![Rule::new("A", Expr::reference("Nope")).into()]),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UndefinedReference { .. }));

    let err = generate_source_code(&Config::default(), Grammar::default()).unwrap_err();
    assert!(matches!(err, Error::NoRules));

    let err = generate_source_code(
        &Config::default(),
        Grammar::new(vec![Rule::new("A", Expr::regex("(")).into()]),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidRegex { .. }));
}

#[test]
fn nested_block_budget_is_configurable() {
    let grammar = || {
        Grammar::new(vec![
            Rule::new(
                "A",
                Expr::seq([Expr::choice([Expr::string("a"), Expr::many(Expr::string("b"))])]),
            )
            .into(),
        ])
    };
    let roomy = generate_source_code(&Config::default(), grammar()).unwrap();
    assert!(!roomy.contains("fn _parse_function_"));

    let tight = generate_source_code(&Config::new().max_nested_blocks(2), grammar()).unwrap();
    assert!(tight.contains("fn _parse_function_"));
}
