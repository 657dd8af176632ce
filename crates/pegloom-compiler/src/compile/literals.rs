//! Terminals: strings, regular expressions and host code.

use pegloom_core::ProgramId;

use super::compiler::{Compiler, cont_name, error_value};

const REGEX_IMPORTS: &[&str] = &[
    "use regex_automata::meta::Regex as _Regex;",
    "use regex_automata::util::syntax::Config as _SyntaxConfig;",
    "use regex_automata::{Anchored as _Anchored, Input as _Input};",
    "use std::sync::LazyLock as _LazyLock;",
];

impl Compiler<'_, '_> {
    pub(super) fn compile_str(&mut self, id: ProgramId, value: &str, skip_ignored: bool) {
        if value.is_empty() {
            self.emit.line("_status = true;");
            self.emit.line("_result = runtime::Value::text(\"\");");
            return;
        }
        self.emit
            .open_if(&format!("_text[_pos..].starts_with({value:?})"));
        self.emit.line(&format!("_pos += {};", value.len()));
        if skip_ignored {
            self.skip_ignored();
        }
        self.emit.line("_status = true;");
        self.emit
            .line(&format!("_result = runtime::Value::text({value:?});"));
        self.emit.open_else();
        self.emit.line("_status = false;");
        self.emit.line(&format!("_result = {};", error_value(id)));
        self.emit.close();
    }

    pub(super) fn compile_regex(
        &mut self,
        id: ProgramId,
        pattern: &str,
        ignore_case: bool,
        skip_ignored: bool,
    ) {
        let matcher = self.matcher(id, pattern, ignore_case);
        let found = self.emit.fresh("match");
        self.emit.open_if(&format!(
            "let Some({found}) = {matcher}.search(&_Input::new(_text).range(_pos..).anchored(_Anchored::Yes))"
        ));
        self.emit
            .line(&format!("_result = runtime::Value::text(&_text[{found}.range()]);"));
        self.emit.line(&format!("_pos = {found}.end();"));
        if skip_ignored {
            self.skip_ignored();
        }
        self.emit.line("_status = true;");
        self.emit.open_else();
        self.emit.line("_status = false;");
        self.emit.line(&format!("_result = {};", error_value(id)));
        self.emit.close();
    }

    pub(super) fn compile_code(&mut self, source: &str) {
        self.emit
            .line(&format!("_result = runtime::Value::from({source});"));
        self.emit.line("_status = true;");
    }

    fn skip_ignored(&mut self) {
        let func = cont_name("_ignored");
        self.emit.line(&format!(
            "_pos = ctx.call(runtime::ParseFn::rule({func:?}, {func}), _pos).await.2;"
        ));
    }

    /// Static matcher for a pattern, shared by every regex with the same
    /// pattern and case sensitivity.
    fn matcher(&mut self, id: ProgramId, pattern: &str, ignore_case: bool) -> String {
        let key = (pattern.to_string(), ignore_case);
        if let Some(name) = self.matchers.get(&key) {
            return name.clone();
        }

        let name = format!("_MATCHER_{id}");
        for import in REGEX_IMPORTS {
            self.emit.add_import(import);
        }
        self.emit.open_global_section(&name);
        self.emit.line(&format!(
            "static {name}: _LazyLock<_Regex> = _LazyLock::new(|| {{"
        ));
        self.emit.line("    _Regex::builder()");
        self.emit.line(&format!(
            "        .syntax(_SyntaxConfig::new().case_insensitive({ignore_case}))"
        ));
        self.emit.line(&format!("        .build({pattern:?})"));
        self.emit
            .line("        .expect(\"pattern was validated when the parser was generated\")");
        self.emit.line("});");
        self.emit.close_global_section();

        self.matchers.insert(key, name.clone());
        name
    }
}
