//! Operator-precedence tiers.
//!
//! A cascade is a chain of tiers, each parsing its operands with the tier
//! below. Folded results are `Infix`, `Prefix` and `Postfix` nodes.

use pegloom_core::{Assoc, OperatorTier};

use super::compiler::Compiler;

impl Compiler<'_, '_> {
    pub(super) fn compile_operators(&mut self, tier: &OperatorTier) {
        match tier.assoc {
            Assoc::LeftAssoc => self.compile_left_assoc(tier, false),
            Assoc::NonAssoc => self.compile_left_assoc(tier, true),
            Assoc::RightAssoc => self.compile_right_assoc(tier),
            Assoc::Prefix => self.compile_prefix(tier),
            Assoc::Postfix => self.compile_postfix(tier),
        }
    }

    /// `a op b op c` folds to `((a op b) op c)`. A non-associative tier
    /// stops after the first operator; a dangling operator is not consumed.
    fn compile_left_assoc(&mut self, tier: &OperatorTier, non_assoc: bool) {
        let is_first = self.emit.var("is_first", "true");
        let staging = self.emit.var("staging", "runtime::Value::Null");
        let operator = self.emit.var("operator", "runtime::Value::Null");
        let checkpoint = self.emit.var("checkpoint", "_pos");

        self.emit.open_loop();
        self.if_fails(&tier.operand, |c| c.emit.break_());
        self.emit.line(&format!("{checkpoint} = _pos;"));
        self.emit.open_if(&is_first.to_string());
        self.emit.line(&format!("{is_first} = false;"));
        self.emit.line(&format!("{staging} = _result.clone();"));
        self.emit.open_else();
        self.emit.line(&format!(
            "{staging} = runtime::Value::infix({staging}, {operator}.clone(), _result.clone());"
        ));
        if non_assoc {
            self.emit.break_();
        }
        self.emit.close();
        self.if_fails(&tier.operators, |c| c.emit.break_());
        self.emit.line(&format!("{operator} = _result.clone();"));
        self.emit.close();

        self.emit.open_if(&format!("!{is_first}"));
        self.emit.line("_status = true;");
        self.emit.line(&format!("_result = {staging};"));
        self.emit.line(&format!("_pos = {checkpoint};"));
        self.emit.close();
    }

    /// `a op b op c` folds to `(a op (b op c))`.
    fn compile_right_assoc(&mut self, tier: &OperatorTier) {
        let operands = self.emit.var("operands", "Vec::<runtime::Value>::new()");
        let operators = self.emit.var("operators", "Vec::<runtime::Value>::new()");
        let checkpoint = self.emit.var("checkpoint", "_pos");

        self.emit.open_loop();
        self.if_fails(&tier.operand, |c| c.emit.break_());
        self.emit.line(&format!("{operands}.push(_result.clone());"));
        self.emit.line(&format!("{checkpoint} = _pos;"));
        self.if_fails(&tier.operators, |c| c.emit.break_());
        self.emit.line(&format!("{operators}.push(_result.clone());"));
        self.emit.close();

        self.emit.open_if(&format!("!{operands}.is_empty()"));
        self.emit
            .line(&format!("{operators}.truncate({operands}.len() - 1);"));
        let folded = self
            .emit
            .var("folded", &format!("{operands}.pop().unwrap_or_default()"));
        let op = self.emit.fresh("op");
        let left = self.emit.fresh("left");
        self.emit.open(&format!(
            "while let (Some({op}), Some({left})) = ({operators}.pop(), {operands}.pop())"
        ));
        self.emit.line(&format!(
            "{folded} = runtime::Value::infix({left}, {op}, {folded});"
        ));
        self.emit.close();
        self.emit.line("_status = true;");
        self.emit.line(&format!("_result = {folded};"));
        self.emit.line(&format!("_pos = {checkpoint};"));
        self.emit.close();
    }

    /// Any number of operators, then one operand. The innermost operator
    /// binds first.
    fn compile_prefix(&mut self, tier: &OperatorTier) {
        let operators = self.emit.var("operators", "Vec::<runtime::Value>::new()");
        let checkpoint = self.emit.var("checkpoint", "_pos");

        self.emit.open_loop();
        self.compile(&tier.operators);
        self.emit
            .open_if(&format!("!_status || _pos == {checkpoint}"));
        self.emit.line(&format!("_pos = {checkpoint};"));
        self.emit.break_();
        self.emit.close();
        self.emit.line(&format!("{checkpoint} = _pos;"));
        self.emit.line(&format!("{operators}.push(_result.clone());"));
        self.emit.close();

        self.compile(&tier.operand);
        self.emit.open_if("_status");
        let op = self.emit.fresh("op");
        self.emit
            .open(&format!("while let Some({op}) = {operators}.pop()"));
        self.emit
            .line(&format!("_result = runtime::Value::prefix({op}, _result);"));
        self.emit.close();
        self.emit.close();
    }

    /// One operand, then any number of operators applied left to right.
    fn compile_postfix(&mut self, tier: &OperatorTier) {
        self.if_succeeds(&tier.operand, |c| {
            let staging = c.emit.var("staging", "_result.clone()");
            let checkpoint = c.emit.var("checkpoint", "_pos");
            c.emit.open_loop();
            c.compile(&tier.operators);
            c.emit
                .open_if(&format!("_status && _pos > {checkpoint}"));
            c.emit.line(&format!(
                "{staging} = runtime::Value::postfix({staging}, _result.clone());"
            ));
            c.emit.line(&format!("{checkpoint} = _pos;"));
            c.emit.open_else();
            c.emit.line("_status = true;");
            c.emit.line(&format!("_result = {staging};"));
            c.emit.line(&format!("_pos = {checkpoint};"));
            c.emit.break_();
            c.emit.close();
            c.emit.close();
        });
    }
}
