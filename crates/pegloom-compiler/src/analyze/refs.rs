//! Reference resolution and free-variable capture.
//!
//! A reference is local when an enclosing binder (a rule parameter or a
//! `let`) introduces its name; otherwise it names a rule. Free variables of
//! an expression are the locals it reads but does not bind itself, including
//! binder names mentioned by host-code snippets. They become the explicit
//! parameters of functions generated for that expression.

use std::collections::{BTreeSet, HashMap};

use pegloom_core::utils::identifiers;
use pegloom_core::{Expr, ExprKind, Grammar, ProgramId};

/// What a reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Local,
    Rule,
}

/// Counts enclosing binders per name.
#[derive(Debug, Default)]
pub struct SymbolCounter {
    counts: HashMap<String, usize>,
}

impl SymbolCounter {
    pub fn bind(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_default() += 1;
    }

    pub fn unbind(&mut self, name: &str) {
        if let Some(count) = self.counts.get_mut(name) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.counts.get(name).is_some_and(|&count| count > 0)
    }
}

/// Result of resolving every reference in a grammar.
#[derive(Debug, Default)]
pub struct Resolution {
    bindings: HashMap<ProgramId, Binding>,
    free_vars: HashMap<ProgramId, Vec<String>>,
}

impl Resolution {
    pub fn binding(&self, id: ProgramId) -> Option<Binding> {
        self.bindings.get(&id).copied()
    }

    /// Sorted free variables of the expression with this id.
    pub fn free_vars(&self, id: ProgramId) -> &[String] {
        self.free_vars.get(&id).map_or(&[], Vec::as_slice)
    }

    fn visit(&mut self, expr: &Expr, scope: &mut SymbolCounter) -> BTreeSet<String> {
        let free = match &expr.kind {
            ExprKind::Ref(name) => {
                if scope.is_bound(name) {
                    self.bindings.insert(expr.id, Binding::Local);
                    BTreeSet::from([name.clone()])
                } else {
                    self.bindings.insert(expr.id, Binding::Rule);
                    BTreeSet::new()
                }
            }
            ExprKind::Let { name, expr: value, body } => {
                let mut free = self.visit(value, scope);
                scope.bind(name);
                let mut inner = self.visit(body, scope);
                scope.unbind(name);
                inner.remove(name);
                free.append(&mut inner);
                free
            }
            ExprKind::Code(source) => identifiers(source)
                .into_iter()
                .filter(|word| scope.is_bound(word))
                .map(str::to_string)
                .collect(),
            _ => {
                let mut free = BTreeSet::new();
                for child in expr.children() {
                    free.append(&mut self.visit(child, scope));
                }
                free
            }
        };
        if !free.is_empty() {
            self.free_vars
                .insert(expr.id, free.iter().cloned().collect());
        }
        free
    }
}

/// Resolve every reference of `grammar`; ids must already be assigned.
pub fn resolve(grammar: &Grammar) -> Resolution {
    let mut resolution = Resolution::default();
    for rule in grammar.rules() {
        let mut scope = SymbolCounter::default();
        for param in &rule.params {
            scope.bind(param);
        }
        for expr in rule.exprs() {
            resolution.visit(expr, &mut scope);
        }
    }
    resolution
}
