//! Sequences, ordered choice and the binary combinators.

use pegloom_core::{Expr, ExprKind, ProgramId};

use super::compiler::{Compiler, error_value};

impl Compiler<'_, '_> {
    /// Children in order. With `record`, the values become the fields of a
    /// record of that rule; otherwise they form a list.
    pub(super) fn compile_seq(&mut self, exprs: &[&Expr], record: Option<&str>) {
        let start = record.map(|_| self.emit.var("start", "_pos"));
        let items = self.emit.var(
            "items",
            &format!("Vec::<runtime::Value>::with_capacity({})", exprs.len()),
        );

        self.emit.open_breakable();
        for expr in exprs {
            self.if_fails(expr, |c| c.emit.break_());
            self.emit.line(&format!("{items}.push(_result.clone());"));
        }
        let value = match (record, &start) {
            (Some(name), Some(start)) => format!(
                "runtime::Value::record({name:?}, {name}::FIELDS, {items}, Some(({start}, _pos)))"
            ),
            _ => format!("runtime::Value::list({items})"),
        };
        self.emit.line(&format!("_result = {value};"));
        self.emit.line("_status = true;");
        self.emit.close();
    }

    /// Alternatives in order; the first success wins. On total failure the
    /// position and error are those of the alternative that got farthest.
    pub(super) fn compile_choice(&mut self, choice: &Expr, exprs: &[Expr]) {
        let backtrack = self.emit.var("backtrack", "_pos");
        let farthest = if choice.always_succeeds() {
            None
        } else {
            let pos = self.emit.var("farthest_pos", "_pos");
            let err = self.emit.var("farthest_err", &error_value(choice.id));
            Some((pos, err))
        };

        self.emit.open_breakable();
        for (i, expr) in exprs.iter().enumerate() {
            self.emit.comment(&format!("Option {}:", i + 1));
            self.if_succeeds(expr, |c| c.emit.break_());

            if let Some((pos, err)) = &farthest {
                // An explicit failure wins ties so its message is reported.
                let op = if matches!(expr.kind, ExprKind::Fail(_)) {
                    "<="
                } else {
                    "<"
                };
                self.emit.open_if(&format!("{pos} {op} _pos"));
                self.emit.line(&format!("{pos} = _pos;"));
                self.emit.line(&format!("{err} = _result.clone();"));
                self.emit.close();
            }

            if i + 1 < exprs.len() {
                self.emit.line(&format!("_pos = {backtrack};"));
            }
        }
        if let Some((pos, err)) = &farthest {
            self.emit.line("_status = false;");
            self.emit.line(&format!("_pos = {pos};"));
            self.emit.line(&format!("_result = {err};"));
        }
        self.emit.close();
    }

    pub(super) fn compile_discard(&mut self, left: &Expr, right: &Expr, keep_left: bool) {
        self.emit.open_breakable();
        self.if_fails(left, |c| c.emit.break_());
        if keep_left {
            let kept = self.emit.var("kept", "_result.clone()");
            self.if_succeeds(right, |c| c.emit.line(&format!("_result = {kept};")));
        } else {
            self.compile(right);
        }
        self.emit.close();
    }

    /// With `apply_left`, the left value is the function.
    pub(super) fn compile_apply(&mut self, left: &Expr, right: &Expr, apply_left: bool) {
        self.if_succeeds(left, |c| {
            let first = c
                .emit
                .var(if apply_left { "func" } else { "arg" }, "_result.clone()");
            c.if_succeeds(right, |c| {
                let call = if apply_left {
                    format!("{first}.call(_result.clone())")
                } else {
                    format!("_result.call({first}.clone())")
                };
                c.emit.line(&format!("_result = {call};"));
            });
        });
    }

    pub(super) fn compile_where(&mut self, id: ProgramId, expr: &Expr, predicate: &Expr) {
        self.if_succeeds(expr, |c| {
            let arg = c.emit.var("arg", "_result.clone()");
            c.if_succeeds(predicate, |c| {
                c.emit
                    .open_if(&format!("_result.call({arg}.clone()).is_truthy()"));
                c.emit.line(&format!("_result = {arg};"));
                c.emit.open_else();
                c.emit.line("_status = false;");
                c.emit.line(&format!("_result = {};", error_value(id)));
                c.emit.close();
            });
        });
    }

    /// The binding is a Rust local scoped to the body's block.
    pub(super) fn compile_let(&mut self, name: &str, value: &Expr, body: &Expr) {
        self.compile(value);
        self.emit.open_if("_status");
        self.emit.line(&format!("let {name} = _result.clone();"));
        self.compile(body);
        self.emit.close();
    }
}
