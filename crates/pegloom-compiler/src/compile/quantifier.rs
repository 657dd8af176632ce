//! Repetition: lists, separated lists, skips and optionals.
//!
//! Every loop stops on an iteration that succeeds without consuming input.

use pegloom_core::{Expr, SepList};

use super::compiler::Compiler;

impl Compiler<'_, '_> {
    pub(super) fn compile_list(&mut self, expr: &Expr, min: usize, max: Option<usize>) {
        let staging = self.emit.var("staging", "Vec::<runtime::Value>::new()");

        self.emit.open_loop();
        if let Some(max) = max {
            self.emit.open_if(&format!("{staging}.len() >= {max}"));
            self.emit.break_();
            self.emit.close();
        }
        let checkpoint = self.emit.var("checkpoint", "_pos");
        self.if_fails(expr, |c| {
            c.emit.line(&format!("_pos = {checkpoint};"));
            c.emit.break_();
        });
        self.emit.line(&format!("{staging}.push(_result.clone());"));
        self.emit.open_if(&format!("_pos == {checkpoint}"));
        self.emit.break_();
        self.emit.close();
        self.emit.close();

        if min == 0 {
            self.emit
                .line(&format!("_result = runtime::Value::list({staging});"));
            self.emit.line("_status = true;");
        } else {
            self.emit.open_if(&format!("{staging}.len() >= {min}"));
            self.emit
                .line(&format!("_result = runtime::Value::list({staging});"));
            self.emit.line("_status = true;");
            self.emit.open_else();
            self.emit.line("_status = false;");
            self.emit.close();
        }
    }

    pub(super) fn compile_sep(&mut self, sep: &SepList) {
        let staging = self.emit.var("staging", "Vec::<runtime::Value>::new()");
        let checkpoint = self.emit.var("checkpoint", "_pos");
        let drop_dangling = !sep.discard_separators && !sep.allow_trailer;

        self.emit.open_loop();
        let round = self.emit.var("round", "_pos");
        self.if_fails(&sep.expr, |c| {
            if drop_dangling {
                c.emit.line(&format!("let _ = {staging}.pop();"));
            }
            c.emit.break_();
        });
        self.emit.line(&format!("{staging}.push(_result.clone());"));
        self.emit.line(&format!("{checkpoint} = _pos;"));

        self.if_fails(&sep.separator, |c| c.emit.break_());
        self.emit.open_if(&format!("_pos == {round}"));
        self.emit.break_();
        self.emit.close();
        if !sep.discard_separators {
            self.emit.line(&format!("{staging}.push(_result.clone());"));
        }
        if sep.allow_trailer {
            self.emit.line(&format!("{checkpoint} = _pos;"));
        }
        self.emit.close();

        let guarded = !sep.allow_empty;
        if guarded {
            self.emit.open_if(&format!("!{staging}.is_empty()"));
        }
        self.emit
            .line(&format!("_result = runtime::Value::list({staging});"));
        self.emit.line("_status = true;");
        self.emit.line(&format!("_pos = {checkpoint};"));
        if guarded {
            self.emit.close();
        }
    }

    /// Each pass tries the expressions in order from the pass start; a match
    /// that advances starts a new pass, anything else restores the position
    /// for the next expression. A pass without such a match ends the skip.
    pub(super) fn compile_skip(&mut self, exprs: &[Expr]) {
        self.emit.open_loop();
        let checkpoint = self.emit.var("checkpoint", "_pos");
        for expr in exprs {
            self.compile(expr);
            self.emit.open_if(&format!("_status && _pos > {checkpoint}"));
            self.emit.continue_();
            self.emit.close();
            self.emit.line(&format!("_pos = {checkpoint};"));
        }
        self.emit.break_();
        self.emit.close();
        self.emit.line("_status = true;");
        self.emit.line("_result = runtime::Value::Null;");
    }

    pub(super) fn compile_opt(&mut self, expr: &Expr) {
        let backtrack = self.emit.var("backtrack", "_pos");
        self.if_fails(expr, |c| {
            c.emit.line("_status = true;");
            c.emit.line(&format!("_pos = {backtrack};"));
            c.emit.line("_result = runtime::Value::Null;");
        });
    }
}
