//! Pass orchestration: from a grammar to the source of its parser.

use std::collections::HashSet;

use pegloom_core::{Expr, ExprKind, Grammar, Item, Rule, RuleBody};

use crate::analyze::validation::{check_references, validate};
use crate::analyze::{Analysis, assign_ids};
use crate::compile::Compiler;
use crate::emit::Emitter;
use crate::{Config, Result, runtime};

/// Name of the synthetic rule skipping everything the ignored rules match.
const IGNORED_RULE: &str = "_ignored";

/// Generate the Rust source of a standalone parser for `grammar`.
pub fn generate_source_code(config: &Config, mut grammar: Grammar) -> Result<String> {
    validate(&grammar)?;
    name_anonymous_rules(&mut grammar);
    wire_ignored_rules(&mut grammar);
    assign_ids(&mut grammar);
    log::debug!("validated grammar with {} rules", grammar.rules().count());

    let analysis = Analysis::new(&grammar);
    check_references(&grammar, &analysis)?;
    log::debug!(
        "resolved references; {} error delegates",
        analysis.delegates.len()
    );

    let mut emit = Emitter::new(config.max_nested_blocks);
    if let Some(header) = &config.header {
        emit.set_header(header);
    }
    emit_runtime(&mut emit);
    emit_code_sections(&mut emit, &grammar);

    let mut compiler = Compiler::new(&mut emit, &analysis);
    if let Some(start) = grammar.start_rule() {
        compiler.compile_start_entry(start);
    }
    for rule in grammar.rules() {
        compiler.compile_rule(rule);
    }
    let mut emitted = HashSet::new();
    for rule in grammar.rules() {
        compiler.compile_error_functions(rule, &mut emitted);
    }
    log::debug!(
        "compiled {} rules, {} error functions",
        grammar.rules().count(),
        emitted.len()
    );

    Ok(emit.finish())
}

fn name_anonymous_rules(grammar: &mut Grammar) {
    let mut count = 0;
    for rule in grammar.rules_mut().filter(|r| r.name.is_none()) {
        count += 1;
        rule.name = Some(format!("_anonymous_{count}"));
    }
}

/// Strings and regexes outside the ignored rules skip ignored content after
/// a match, and the start rule skips it before its first token.
fn wire_ignored_rules(grammar: &mut Grammar) {
    let ignored: Vec<String> = grammar
        .rules()
        .filter(|r| r.ignored)
        .map(|r| r.name().to_string())
        .collect();
    if ignored.is_empty() {
        return;
    }
    log::debug!("skipping ignored rules: {}", ignored.join(", "));

    for rule in grammar.rules_mut().filter(|r| !r.ignored) {
        for expr in rule.exprs_mut() {
            expr.walk_mut(&mut |e| {
                if let ExprKind::Str { skip_ignored, .. } | ExprKind::Regex { skip_ignored, .. } =
                    &mut e.kind
                {
                    *skip_ignored = true;
                }
            });
        }
    }

    let start = grammar.start_rule().map(|r| r.name().to_string());
    if let Some(start) = start
        && let Some(rule) = grammar.rules_mut().find(|r| r.name() == start)
    {
        let first = match &mut rule.body {
            RuleBody::Expr(body) => Some(body),
            RuleBody::Class(fields) => fields.first_mut().map(|f| &mut f.expr),
        };
        if let Some(first) = first {
            let body = std::mem::replace(first, Expr::seq([]));
            *first = Expr::right(Expr::reference(IGNORED_RULE), body);
        }
    }

    let skip = Expr::skip(ignored.into_iter().map(Expr::reference));
    grammar.items.push(Item::Rule(Rule::new(IGNORED_RULE, skip)));
}

fn emit_runtime(emit: &mut Emitter) {
    emit.open_global_section("runtime");
    emit.line("#[allow(dead_code)]");
    emit.open("pub mod runtime");
    for line in runtime::TEMPLATE.lines() {
        emit.line(line);
    }
    emit.close();
    emit.close_global_section();

    emit.open_global_section("_exports");
    emit.line(&format!(
        "pub use runtime::{{{}}};",
        runtime::EXPORTS.join(", ")
    ));
    emit.close_global_section();
}

fn emit_code_sections(emit: &mut Emitter, grammar: &Grammar) {
    for (i, item) in grammar.items.iter().enumerate() {
        if let Item::Code(source) = item {
            emit.open_global_section(&format!("_code_{i}"));
            for line in source.lines() {
                emit.line(line);
            }
            emit.close_global_section();
        }
    }
}
