//! Rules, references, calls and the public entry points of a parser.

use pegloom_core::{Expr, ExprKind, ProgramId, Rule, RuleBody};

use super::compiler::{Compiler, clone_all, cont_name};

/// `runtime::ParseFn` literal for the rule `name`.
fn rule_parser(prefix: &str, name: &str) -> String {
    let func = cont_name(name);
    format!("{prefix}runtime::ParseFn::rule({func:?}, {prefix}{func})")
}

impl Compiler<'_, '_> {
    /// Emit the parse function of `rule` and its entry module.
    pub fn compile_rule(&mut self, rule: &Rule) {
        let name = rule.name();
        log::trace!("compiling rule {name} (#{})", rule.id);

        self.emit.open_parse_function(&cont_name(name), &rule.params);
        self.emit.comment(&rule.to_string());
        match &rule.body {
            RuleBody::Expr(expr) => self.compile(expr),
            RuleBody::Class(fields) => {
                log::trace!("class {name}: record parse #{}", rule.extra_id);
                let exprs: Vec<&Expr> = fields.iter().map(|f| &f.expr).collect();
                self.compile_seq(&exprs, Some(name));
            }
        }
        self.emit.close_parse_function();

        self.compile_entry_module(rule);
    }

    /// `pub mod Name` holding the rule's name, its definition and a
    /// `parse` function starting at that rule. Parameterized rules get
    /// `parse_with` instead, taking the argument values.
    fn compile_entry_module(&mut self, rule: &Rule) {
        let name = rule.name();
        self.emit.open_global_section(name);
        if rule.is_class() {
            self.emit.open_record(name, &rule.field_names());
        } else {
            self.emit.open_module(name);
        }
        self.emit
            .line(&format!("pub const NAME: &str = {name:?};"));
        self.emit
            .line(&format!("pub const DEFINITION: &str = {:?};", rule.to_string()));

        let ret = "Result<super::runtime::Value, super::runtime::SourceError>";
        if rule.params.is_empty() {
            self.emit.open(&format!(
                "pub fn parse(text: &str, pos: usize, fullparse: bool) -> {ret}"
            ));
            self.emit.line(&format!(
                "super::runtime::run(text, pos, {}, fullparse)",
                rule_parser("super::", name)
            ));
        } else {
            let func = cont_name(name);
            self.emit.open(&format!(
                "pub fn parse_with(text: &str, pos: usize, fullparse: bool, args: Vec<super::runtime::Value>) -> {ret}"
            ));
            self.emit.line(&format!(
                "super::runtime::run(text, pos, super::runtime::ParseFn::new({func:?}, super::{func}, args), fullparse)"
            ));
        }
        self.emit.close();
        self.emit.close_module();
        self.emit.close_global_section();
    }

    /// The top-level `parse` function, starting at the start rule.
    pub fn compile_start_entry(&mut self, rule: &Rule) {
        self.emit.open_global_section("parse");
        self.emit.line(&format!(
            "/// Parse `text` from `pos` with the `{}` rule. With `fullparse`, the",
            rule.name()
        ));
        self.emit
            .line("/// whole input must be consumed.");
        self.emit.open(
            "pub fn parse(text: &str, pos: usize, fullparse: bool) -> Result<runtime::Value, runtime::SourceError>",
        );
        self.emit.line(&format!(
            "runtime::run(text, pos, {}, fullparse)",
            rule_parser("", rule.name())
        ));
        self.emit.close();
        self.emit.close_global_section();
    }

    /// A reference to a local binding looks the bound value up (a parser
    /// is run, anything else is the result); a rule reference calls the rule.
    pub(super) fn compile_ref(&mut self, id: ProgramId, name: &str) {
        if self.analysis.is_local(id) {
            self.emit.line(&format!(
                "(_status, _result, _pos) = ctx.lookup({name}.clone(), _pos).await;"
            ));
        } else {
            self.emit.line(&format!(
                "(_status, _result, _pos) = ctx.call({}, _pos).await;",
                rule_parser("", name)
            ));
        }
    }

    pub(super) fn compile_call(&mut self, func: &str, args: &[Expr]) {
        let values: Vec<String> = args.iter().map(|arg| self.argument(arg)).collect();
        let name = cont_name(func);
        let callee = self.emit.var(
            "func",
            &format!(
                "runtime::ParseFn::new({name:?}, {name}, vec![{}])",
                values.join(", ")
            ),
        );
        self.emit.line(&format!(
            "(_status, _result, _pos) = ctx.call({callee}, _pos).await;"
        ));
    }

    /// Value passed for one call argument. Anything other than a reference
    /// or host code becomes a parser closing over its free variables.
    fn argument(&mut self, arg: &Expr) -> String {
        match &arg.kind {
            ExprKind::Ref(name) if self.analysis.is_local(arg.id) => format!("{name}.clone()"),
            ExprKind::Ref(name) => format!("runtime::Value::Parser({})", rule_parser("", name)),
            ExprKind::Code(source) => format!("runtime::Value::from({source})"),
            _ => {
                let (name, params) = self.functionalize(arg);
                format!(
                    "runtime::Value::Parser(runtime::ParseFn::new({name:?}, {name}, vec![{}]))",
                    clone_all(&params)
                )
            }
        }
    }
}
