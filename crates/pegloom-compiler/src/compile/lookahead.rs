//! Lookahead and explicit failure.

use pegloom_core::{Expr, ProgramId};

use super::compiler::{Compiler, error_value};

impl Compiler<'_, '_> {
    /// Positive lookahead: never consumes input, whatever the outcome.
    pub(super) fn compile_expect(&mut self, expr: &Expr) {
        let backtrack = self.emit.var("backtrack", "_pos");
        self.compile(expr);
        self.emit.line(&format!("_pos = {backtrack};"));
    }

    pub(super) fn compile_expect_not(&mut self, id: ProgramId, expr: &Expr) {
        let backtrack = self.emit.var("backtrack", "_pos");
        self.compile(expr);
        self.emit.line(&format!("_pos = {backtrack};"));
        self.emit.open_if("_status");
        self.emit.line("_status = false;");
        self.emit.line(&format!("_result = {};", error_value(id)));
        self.emit.open_else();
        self.emit.line("_status = true;");
        self.emit.line("_result = runtime::Value::Null;");
        self.emit.close();
    }

    pub(super) fn compile_fail(&mut self, id: ProgramId) {
        self.emit.line("_status = false;");
        self.emit.line(&format!("_result = {};", error_value(id)));
    }
}
