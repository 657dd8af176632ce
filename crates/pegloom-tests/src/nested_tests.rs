use crate::nested::{self, Value};

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 100_000;
    let text = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(nested::parse(&text, 0, true).unwrap(), Value::text(""));
}

#[test]
fn unbalanced_input_backs_off() {
    assert_eq!(nested::parse("(()", 0, false).unwrap(), Value::text(""));

    let err = nested::parse("(()", 0, true).unwrap_err();
    assert_eq!(err.position().index, 0);
}

#[test]
fn small_block_budget_splits_functions() {
    let source = include_str!(concat!(env!("OUT_DIR"), "/nested.rs"));
    assert!(source.contains("fn _parse_function_"));
}
