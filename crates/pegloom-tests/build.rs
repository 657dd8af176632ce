//! Generates the parsers under test into `OUT_DIR`.

use pegloom_compiler::{Config, Result, write_to_out_dir};
use pegloom_core::{Expr, Grammar, Item, Rule, TierSpec};

fn main() -> Result<()> {
    println!("cargo::rerun-if-changed=build.rs");

    let config = Config::default();
    write_to_out_dir("sum.rs", &config.clone().header("Sum of digits"), sum())?;
    write_to_out_dir("operators.rs", &config, operators())?;
    write_to_out_dir("calc.rs", &config, calc())?;
    write_to_out_dir("lists.rs", &config, lists())?;
    write_to_out_dir("choice.rs", &config, choice())?;
    write_to_out_dir("records.rs", &config, records())?;
    write_to_out_dir("bindings.rs", &config, bindings())?;
    write_to_out_dir("memo.rs", &config, memo())?;
    write_to_out_dir("nested.rs", &config.max_nested_blocks(3), nested())?;
    Ok(())
}

fn letter() -> Rule {
    Rule::new("Letter", Expr::regex("[a-z]"))
}

fn sum() -> Grammar {
    Grammar::new(vec![
        Rule::new(
            "Sum",
            Expr::operator_precedence(
                Expr::reference("Digits"),
                [TierSpec::left_assoc(Expr::string("+"))],
            ),
        )
        .into(),
        Rule::new("Digits", Expr::regex("[0-9]+")).into(),
    ])
}

fn operators() -> Grammar {
    let tier = |make: fn(Expr) -> TierSpec| {
        Expr::operator_precedence(Expr::reference("Atom"), [make(Expr::string("+"))])
    };
    Grammar::new(vec![
        Rule::new("Left", tier(TierSpec::left_assoc)).into(),
        Rule::new("Right", tier(TierSpec::right_assoc)).into(),
        Rule::new("NonAssoc", tier(TierSpec::non_assoc)).into(),
        Rule::new("Atom", Expr::regex("[a-z]")).into(),
    ])
}

fn calc() -> Grammar {
    let either = |a: &str, b: &str| Expr::choice([Expr::string(a), Expr::string(b)]);
    Grammar::new(vec![
        Rule::new(
            "Expr",
            Expr::operator_precedence(
                Expr::reference("Term"),
                [
                    TierSpec::prefix(Expr::string("-")),
                    TierSpec::postfix(Expr::string("!")),
                    TierSpec::left_assoc(either("*", "/")),
                    TierSpec::left_assoc(either("+", "-")),
                ],
            ),
        )
        .into(),
        Rule::new(
            "Term",
            Expr::choice([
                Expr::reference("Number"),
                Expr::right(
                    Expr::string("("),
                    Expr::left(Expr::reference("Expr"), Expr::string(")")),
                ),
            ]),
        )
        .into(),
        Rule::new("Number", Expr::regex("[0-9]+")).into(),
        Rule::new("Space", Expr::regex(r"\s+")).ignored().into(),
        Rule::new("Comment", Expr::regex(r"#[^\n]*")).ignored().into(),
    ])
}

fn lists() -> Grammar {
    let letter_ref = || Expr::reference("Letter");
    Grammar::new(vec![
        Rule::new("Letters", Expr::many(letter_ref())).into(),
        Rule::new("AtLeastTwo", Expr::list(letter_ref(), 2, None)).into(),
        Rule::new("AtMostTwo", Expr::list(letter_ref(), 0, Some(2))).into(),
        Rule::new(
            "Trailing",
            Expr::sep_with(letter_ref(), Expr::string(","), |s| s.allow_trailer = true),
        )
        .into(),
        Rule::new(
            "Strict",
            Expr::seq([Expr::sep(letter_ref(), Expr::string(",")), Expr::string(",")]),
        )
        .into(),
        Rule::new(
            "Kept",
            Expr::seq([
                Expr::sep_with(letter_ref(), Expr::string(","), |s| {
                    s.discard_separators = false
                }),
                Expr::string(","),
            ]),
        )
        .into(),
        Rule::new(
            "NonEmpty",
            Expr::sep_with(letter_ref(), Expr::string(","), |s| s.allow_empty = false),
        )
        .into(),
        Rule::new(
            "Spaced",
            Expr::skip([Expr::string(" "), Expr::string("\t")]),
        )
        .into(),
        letter().into(),
    ])
}

fn strings(parts: &[&str]) -> Expr {
    Expr::seq(parts.iter().map(|p| Expr::string(*p)))
}

fn choice() -> Grammar {
    Grammar::new(vec![
        Rule::new("First", Expr::choice([Expr::string("a"), Expr::string("ab")])).into(),
        Rule::new("Farthest", Expr::choice([strings(&["a", "b", "c"]), strings(&["a", "x"])])).into(),
        Rule::new(
            "Tie",
            Expr::choice([
                Expr::seq([Expr::string("a"), Expr::fail(Some("expected the letter b"))]),
                strings(&["a", "b", "c"]),
            ]),
        )
        .into(),
        Rule::new(
            "Peek",
            Expr::seq([Expr::expect(strings(&["a", "b"])), Expr::regex("[a-z]+")]),
        )
        .into(),
        Rule::new(
            "NotX",
            Expr::seq([Expr::expect_not(Expr::string("x")), Expr::regex("[a-z]")]),
        )
        .into(),
        Rule::new("Maybe", Expr::seq([Expr::opt(Expr::string("-")), Expr::regex("[0-9]")])).into(),
    ])
}

fn records() -> Grammar {
    Grammar::new(vec![
        Rule::class(
            "Document",
            [("pairs", Expr::sep(Expr::reference("Pair"), Expr::string("\n")))],
        )
        .into(),
        Rule::class(
            "Pair",
            [
                ("key", Expr::reference("Key")),
                ("eq", Expr::string("=")),
                ("value", Expr::reference("Key")),
            ],
        )
        .into(),
        Rule::new("Key", Expr::regex("[a-z]+")).into(),
    ])
}

fn bindings() -> Grammar {
    Grammar::new(vec![
        Rule::new(
            "Items",
            Expr::call("Delimited", [Expr::reference("Word"), Expr::string(";")]),
        )
        .into(),
        Rule::new("Delimited", Expr::sep(Expr::reference("item"), Expr::reference("separator")))
            .with_params(["item", "separator"])
            .into(),
        Rule::new(
            "Echo",
            Expr::let_in(
                "word",
                Expr::reference("Word"),
                Expr::seq([Expr::reference("word"), Expr::reference("word")]),
            ),
        )
        .into(),
        Rule::new(
            "Even",
            Expr::where_(
                Expr::regex("[0-9]+"),
                Expr::code(
                    "runtime::Value::func(|v| runtime::Value::from(v.as_text().is_some_and(|t| t.len() % 2 == 0)))",
                ),
            ),
        )
        .into(),
        Rule::new(
            "Length",
            Expr::apply(
                Expr::code(
                    "runtime::Value::func(|v| runtime::Value::from(v.as_text().map_or(0, str::len) as i64))",
                ),
                Expr::reference("Word"),
                true,
            ),
        )
        .into(),
        Rule::new(
            "Shout",
            Expr::apply(
                Expr::reference("Word"),
                Expr::code(
                    "runtime::Value::func(|v| runtime::Value::from(v.as_text().map(str::to_uppercase).unwrap_or_default()))",
                ),
                false,
            ),
        )
        .into(),
        Rule::new("Word", Expr::regex("[a-z]+")).into(),
    ])
}

fn memo() -> Grammar {
    let counted_then = |s: &str| Expr::seq([Expr::reference("Counted"), Expr::string(s)]);
    Grammar::new(vec![
        Item::Code(
            "thread_local! {\n    pub static COUNTED_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };\n}"
                .to_string(),
        ),
        Rule::new("Start", Expr::choice([counted_then("x"), counted_then("y")])).into(),
        Rule::new(
            "Counted",
            Expr::right(
                Expr::code("COUNTED_CALLS.with(|c| c.set(c.get() + 1))"),
                Expr::regex("[a-z]"),
            ),
        )
        .into(),
    ])
}

fn nested() -> Grammar {
    Grammar::new(vec![
        Rule::new(
            "Nested",
            Expr::choice([
                Expr::right(
                    Expr::string("("),
                    Expr::left(Expr::reference("Nested"), Expr::string(")")),
                ),
                Expr::string(""),
            ]),
        )
        .into(),
    ])
}
