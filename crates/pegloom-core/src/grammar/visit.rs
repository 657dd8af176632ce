//! Tree traversal and structural properties of expressions.

use super::types::{Expr, ExprKind, Grammar, Item, Rule, RuleBody};

impl Expr {
    /// Direct sub-expressions, in evaluation order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Seq(exprs) | ExprKind::Choice(exprs) | ExprKind::Skip(exprs) => {
                exprs.iter().collect()
            }
            ExprKind::Discard { left, right, .. } | ExprKind::Apply { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            ExprKind::Where { expr, predicate } => vec![expr.as_ref(), predicate.as_ref()],
            ExprKind::Let { expr, body, .. } => vec![expr.as_ref(), body.as_ref()],
            ExprKind::List { expr, .. }
            | ExprKind::Opt(expr)
            | ExprKind::Expect(expr)
            | ExprKind::ExpectNot(expr) => vec![expr.as_ref()],
            ExprKind::Sep(sep) => vec![sep.expr.as_ref(), sep.separator.as_ref()],
            ExprKind::Call { args, .. } => args.iter().collect(),
            ExprKind::Operators(tier) => vec![tier.operand.as_ref(), tier.operators.as_ref()],
            ExprKind::OperatorPrecedence(prec) => vec![prec.top.as_ref()],
            ExprKind::Fail(_)
            | ExprKind::Ref(_)
            | ExprKind::Str { .. }
            | ExprKind::Regex { .. }
            | ExprKind::Code(_) => Vec::new(),
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match &mut self.kind {
            ExprKind::Seq(exprs) | ExprKind::Choice(exprs) | ExprKind::Skip(exprs) => {
                exprs.iter_mut().collect()
            }
            ExprKind::Discard { left, right, .. } | ExprKind::Apply { left, right, .. } => {
                vec![left.as_mut(), right.as_mut()]
            }
            ExprKind::Where { expr, predicate } => vec![expr.as_mut(), predicate.as_mut()],
            ExprKind::Let { expr, body, .. } => vec![expr.as_mut(), body.as_mut()],
            ExprKind::List { expr, .. }
            | ExprKind::Opt(expr)
            | ExprKind::Expect(expr)
            | ExprKind::ExpectNot(expr) => vec![expr.as_mut()],
            ExprKind::Sep(sep) => vec![sep.expr.as_mut(), sep.separator.as_mut()],
            ExprKind::Call { args, .. } => args.iter_mut().collect(),
            ExprKind::Operators(tier) => vec![tier.operand.as_mut(), tier.operators.as_mut()],
            ExprKind::OperatorPrecedence(prec) => vec![prec.top.as_mut()],
            ExprKind::Fail(_)
            | ExprKind::Ref(_)
            | ExprKind::Str { .. }
            | ExprKind::Regex { .. }
            | ExprKind::Code(_) => Vec::new(),
        }
    }

    /// Pre-order traversal.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Pre-order traversal with mutable access.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Expr)) {
        f(self);
        for child in self.children_mut() {
            child.walk_mut(f);
        }
    }

    /// True when the expression cannot fail on any input.
    pub fn always_succeeds(&self) -> bool {
        match &self.kind {
            ExprKind::Seq(exprs) => exprs.iter().all(Expr::always_succeeds),
            ExprKind::Choice(exprs) => exprs.iter().any(Expr::always_succeeds),
            ExprKind::Discard { left, right, .. } | ExprKind::Apply { left, right, .. } => {
                left.always_succeeds() && right.always_succeeds()
            }
            ExprKind::Let { expr, body, .. } => expr.always_succeeds() && body.always_succeeds(),
            ExprKind::Expect(expr) => expr.always_succeeds(),
            ExprKind::List { min, .. } => *min == 0,
            ExprKind::Sep(sep) => sep.allow_empty,
            ExprKind::Skip(_) | ExprKind::Opt(_) | ExprKind::Code(_) => true,
            ExprKind::Str { value, .. } => value.is_empty(),
            ExprKind::OperatorPrecedence(prec) => prec.top.always_succeeds(),
            ExprKind::Where { .. }
            | ExprKind::ExpectNot(_)
            | ExprKind::Fail(_)
            | ExprKind::Ref(_)
            | ExprKind::Call { .. }
            | ExprKind::Regex { .. }
            | ExprKind::Operators(_) => false,
        }
    }

    /// Binary combinators are parenthesized when nested in another one.
    pub(crate) fn is_binary(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Sep(_)
                | ExprKind::Apply { .. }
                | ExprKind::Discard { .. }
                | ExprKind::Where { .. }
        )
    }
}

impl Rule {
    /// Top-level expressions of the rule body.
    pub fn exprs(&self) -> Vec<&Expr> {
        match &self.body {
            RuleBody::Expr(expr) => vec![expr],
            RuleBody::Class(fields) => fields.iter().map(|f| &f.expr).collect(),
        }
    }

    pub fn exprs_mut(&mut self) -> Vec<&mut Expr> {
        match &mut self.body {
            RuleBody::Expr(expr) => vec![expr],
            RuleBody::Class(fields) => fields.iter_mut().map(|f| &mut f.expr).collect(),
        }
    }
}

impl Grammar {
    /// Visit every expression of every rule in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        for item in &self.items {
            if let Item::Rule(rule) = item {
                for expr in rule.exprs() {
                    expr.walk(f);
                }
            }
        }
    }
}
