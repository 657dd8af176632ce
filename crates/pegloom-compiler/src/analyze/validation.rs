//! Grammar-build checks.
//!
//! `validate` runs on the grammar as written, before the driver adds its
//! own rules; `check_references` runs on the finished analysis.

use std::collections::HashSet;

use pegloom_core::utils::{is_identifier, is_keyword};
use pegloom_core::{Expr, ExprKind, Grammar, Rule};
use regex_automata::meta::Regex;
use regex_automata::util::syntax;

use super::Analysis;
use super::refs::Binding;
use crate::{Error, Result, runtime};

/// Top-level names of the generated file besides the rule modules and the
/// runtime re-exports, plus paths the generated code relies on.
const RESERVED_NAMES: &[&str] = &[
    "parse",
    "runtime",
    "Box",
    "Result",
    "Vec",
    "alloc",
    "bool",
    "core",
    "regex_automata",
    "std",
    "str",
    "usize",
];

pub fn validate(grammar: &Grammar) -> Result<()> {
    if let Some(start) = grammar.start_rule() {
        let name = start.name.clone().unwrap_or_default();
        if start.ignored {
            return Err(Error::IgnoredStartRule(name));
        }
        if !start.params.is_empty() {
            return Err(Error::ParameterizedStartRule(name));
        }
    } else {
        return Err(Error::NoRules);
    }

    let mut seen = HashSet::new();
    for rule in grammar.rules() {
        if let Some(name) = rule.name.as_deref() {
            check_rule_name(name)?;
            if !seen.insert(name) {
                return Err(Error::DuplicateRule(name.to_string()));
            }
        }
        for param in &rule.params {
            check_binder(param)?;
        }
        for expr in rule.exprs() {
            check_expr(expr)?;
        }
    }
    Ok(())
}

fn check_rule_name(name: &str) -> Result<()> {
    if name.starts_with('_') {
        return Err(Error::ReservedRuleName(name.to_string()));
    }
    if !is_identifier(name)
        || is_keyword(name)
        || RESERVED_NAMES.contains(&name)
        || runtime::EXPORTS.contains(&name)
    {
        return Err(Error::InvalidName(name.to_string(), "rule"));
    }
    Ok(())
}

/// Binders become Rust locals next to the generated `ctx` and `_`-prefixed
/// temporaries. Prelude variants would turn `let` into a refutable pattern.
const RESERVED_BINDERS: &[&str] = &["ctx", "None", "Some", "Ok", "Err"];

fn check_binder(name: &str) -> Result<()> {
    if !is_identifier(name)
        || is_keyword(name)
        || name.starts_with('_')
        || RESERVED_BINDERS.contains(&name)
    {
        return Err(Error::InvalidName(name.to_string(), "binding"));
    }
    Ok(())
}

fn check_expr(expr: &Expr) -> Result<()> {
    match &expr.kind {
        ExprKind::Let { name, .. } => check_binder(name)?,
        ExprKind::Regex {
            pattern,
            ignore_case,
            ..
        } => check_regex(pattern, *ignore_case)?,
        _ => {}
    }
    for child in expr.children() {
        check_expr(child)?;
    }
    Ok(())
}

/// Compile `pattern` the way generated parsers do.
pub fn check_regex(pattern: &str, ignore_case: bool) -> Result<()> {
    Regex::builder()
        .syntax(syntax::Config::new().case_insensitive(ignore_case))
        .build(pattern)
        .map(drop)
        .map_err(|e| Error::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Every rule reference must name a rule without parameters, and every call
/// must name a rule and pass one argument per parameter.
pub fn check_references(grammar: &Grammar, analysis: &Analysis) -> Result<()> {
    for rule in grammar.rules() {
        for expr in rule.exprs() {
            check_expr_references(rule, expr, analysis)?;
        }
    }
    Ok(())
}

fn check_expr_references(rule: &Rule, expr: &Expr, analysis: &Analysis) -> Result<()> {
    match &expr.kind {
        ExprKind::Ref(name) if analysis.resolution.binding(expr.id) == Some(Binding::Rule) => {
            let target = lookup(rule, name, analysis)?;
            if !target.params.is_empty() {
                return Err(Error::InvalidCall(format!(
                    "rule `{name}` takes {} parameters and must be called with arguments",
                    target.params.len()
                )));
            }
        }
        ExprKind::Call { func, args } => {
            let target = lookup(rule, func, analysis)?;
            if target.params.len() != args.len() {
                return Err(Error::ArityMismatch {
                    func: func.clone(),
                    expected: target.params.len(),
                    found: args.len(),
                });
            }
        }
        _ => {}
    }
    for child in expr.children() {
        check_expr_references(rule, child, analysis)?;
    }
    Ok(())
}

fn lookup<'g>(rule: &Rule, name: &str, analysis: &Analysis<'g>) -> Result<&'g Rule> {
    analysis
        .rule(name)
        .ok_or_else(|| Error::UndefinedReference {
            rule: rule.name.clone().unwrap_or_default(),
            name: name.to_string(),
        })
}
