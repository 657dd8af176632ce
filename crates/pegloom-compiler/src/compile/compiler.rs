//! Compiler context and dispatch.

use std::collections::HashMap;

use pegloom_core::{Assoc, Expr, ExprKind, ProgramId};

use crate::analyze::Analysis;
use crate::emit::Emitter;

/// Name of the generated parse function of a rule.
pub fn cont_name(rule: &str) -> String {
    format!("_cont_{rule}")
}

/// Name of the generated error function of an expression.
pub fn error_fn_name(id: ProgramId) -> String {
    format!("_raise_error{id}")
}

/// Generated value holding the error thunk of an expression.
pub(super) fn error_value(id: ProgramId) -> String {
    format!("runtime::Value::Error({})", error_fn_name(id))
}

/// Nested blocks the inline code of `expr` opens, not counting its children.
pub fn num_blocks(expr: &Expr) -> usize {
    match &expr.kind {
        ExprKind::Ref(_)
        | ExprKind::Call { .. }
        | ExprKind::Fail(_)
        | ExprKind::Expect(_)
        | ExprKind::Code(_) => 0,
        ExprKind::Str { value, .. } => usize::from(!value.is_empty()),
        ExprKind::Regex { .. } | ExprKind::Opt(_) | ExprKind::Let { .. } | ExprKind::ExpectNot(_) => 1,
        ExprKind::Seq(_)
        | ExprKind::Choice(_)
        | ExprKind::Discard { .. }
        | ExprKind::Apply { .. }
        | ExprKind::List { .. }
        | ExprKind::Sep(_)
        | ExprKind::Skip(_) => 2,
        ExprKind::Where { .. } => 3,
        ExprKind::Operators(tier) => match tier.assoc {
            Assoc::Prefix | Assoc::LeftAssoc | Assoc::NonAssoc | Assoc::RightAssoc => 2,
            Assoc::Postfix => 3,
        },
        ExprKind::OperatorPrecedence(prec) => num_blocks(&prec.top),
    }
}

/// Code generation state for one grammar.
///
/// Every compile operation leaves `_status`, `_result` and `_pos` of the
/// generated function describing the outcome of the compiled expression.
pub struct Compiler<'a, 'g> {
    pub(super) emit: &'a mut Emitter,
    pub(super) analysis: &'a Analysis<'g>,
    /// Static matcher name per `(pattern, ignore_case)`.
    pub(super) matchers: HashMap<(String, bool), String>,
}

impl<'a, 'g> Compiler<'a, 'g> {
    pub fn new(emit: &'a mut Emitter, analysis: &'a Analysis<'g>) -> Self {
        Self {
            emit,
            analysis,
            matchers: HashMap::new(),
        }
    }

    /// Compile `expr` inline, or through a function of its own when the
    /// current function has too few nested blocks left.
    pub fn compile(&mut self, expr: &Expr) {
        if self.emit.has_available_blocks(num_blocks(expr)) {
            self.compile_node(expr);
        } else {
            let (name, params) = self.functionalize(expr);
            self.emit.line(&format!(
                "(_status, _result, _pos) = {name}(ctx.clone(), _pos, runtime::args(vec![{}])).await;",
                clone_all(&params)
            ));
        }
    }

    fn compile_node(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Seq(exprs) => {
                let exprs: Vec<&Expr> = exprs.iter().collect();
                self.compile_seq(&exprs, None);
            }
            ExprKind::Choice(exprs) => self.compile_choice(expr, exprs),
            ExprKind::Discard {
                left,
                right,
                keep_left,
            } => self.compile_discard(left, right, *keep_left),
            ExprKind::Apply {
                left,
                right,
                apply_left,
            } => self.compile_apply(left, right, *apply_left),
            ExprKind::Where { expr: value, predicate } => {
                self.compile_where(expr.id, value, predicate)
            }
            ExprKind::Let { name, expr: value, body } => self.compile_let(name, value, body),
            ExprKind::List {
                expr: item,
                min,
                max,
            } => self.compile_list(item, *min, *max),
            ExprKind::Sep(sep) => self.compile_sep(sep),
            ExprKind::Skip(exprs) => self.compile_skip(exprs),
            ExprKind::Opt(inner) => self.compile_opt(inner),
            ExprKind::Expect(inner) => self.compile_expect(inner),
            ExprKind::ExpectNot(inner) => self.compile_expect_not(expr.id, inner),
            ExprKind::Fail(_) => self.compile_fail(expr.id),
            ExprKind::Ref(name) => self.compile_ref(expr.id, name),
            ExprKind::Call { func, args } => self.compile_call(func, args),
            ExprKind::Str {
                value,
                skip_ignored,
            } => self.compile_str(expr.id, value, *skip_ignored),
            ExprKind::Regex {
                pattern,
                ignore_case,
                skip_ignored,
            } => self.compile_regex(expr.id, pattern, *ignore_case, *skip_ignored),
            ExprKind::Code(source) => self.compile_code(source),
            ExprKind::Operators(tier) => self.compile_operators(tier),
            ExprKind::OperatorPrecedence(prec) => self.compile(&prec.top),
        }
    }

    /// Emit `expr` as the parse function `_parse_function_{id}`, taking its
    /// free variables as arguments. Returns the function name and the
    /// argument names.
    pub(super) fn functionalize(&mut self, expr: &Expr) -> (String, Vec<String>) {
        let name = format!("_parse_function_{}", expr.id);
        let params = self.analysis.free_vars(expr.id).to_vec();
        if !self.emit.is_defined(&name) {
            log::trace!(
                "moving expression #{} into {name} at depth {}",
                expr.id,
                self.emit.depth()
            );
            self.emit.open_parse_function(&name, &params);
            self.emit.comment(&expr.to_string());
            self.compile_node(expr);
            self.emit.close_parse_function();
        }
        (name, params)
    }

    /// Compile `expr`, then run `body` when it succeeded.
    pub(super) fn if_succeeds(&mut self, expr: &Expr, body: impl FnOnce(&mut Self)) {
        self.compile(expr);
        if expr.always_succeeds() {
            body(self);
        } else {
            self.emit.open_if("_status");
            body(self);
            self.emit.close();
        }
    }

    /// Compile `expr`, then run `body` when it failed. The failure branch of
    /// an expression that cannot fail is generated into a sandbox.
    pub(super) fn if_fails(&mut self, expr: &Expr, body: impl FnOnce(&mut Self)) {
        self.compile(expr);
        if expr.always_succeeds() {
            self.emit.open_sandbox();
            body(self);
            self.emit.close_sandbox();
        } else {
            self.emit.open_if("!_status");
            body(self);
            self.emit.close();
        }
    }
}

/// `a.clone(), b.clone()` for argument lists.
pub(super) fn clone_all(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("{name}.clone()"))
        .collect::<Vec<_>>()
        .join(", ")
}
