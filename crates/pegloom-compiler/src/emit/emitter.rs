//! Indentation-aware writer for generated Rust source.

use std::fmt;

use indexmap::IndexSet;

const INDENT: &str = "    ";

/// Lints silenced on every generated function.
const GENERATED_FN_LINTS: &str = "#[allow(unused_mut, unused_variables, unused_assignments, unused_labels, \
     unreachable_code, non_snake_case, dead_code, clippy::all)]";

/// Handle to a generated local variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var(String);

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a labelled loop or block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label(String);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
enum Block {
    Plain,
    Loop(Label),
    Breakable(Label),
}

/// A top-level item under construction.
#[derive(Debug)]
struct Section {
    name: String,
    lines: Vec<String>,
    indent: usize,
    blocks: Vec<Block>,
    /// Blocks opened by the function wrapper, not counted against the budget.
    base: usize,
    /// Open sandboxes; lines written inside one are dropped.
    sandbox: usize,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: Vec::new(),
            indent: 0,
            blocks: Vec::new(),
            base: 0,
            sandbox: 0,
        }
    }
}

/// Rust source emitter.
///
/// Sections nest: a function can be opened while another one is being
/// written, and each finished section becomes one top-level item.
#[derive(Debug)]
pub struct Emitter {
    max_blocks: usize,
    header: Option<String>,
    imports: IndexSet<String>,
    items: Vec<String>,
    defined: IndexSet<String>,
    sections: Vec<Section>,
    next_var: usize,
    next_label: usize,
}

impl Emitter {
    pub fn new(max_blocks: usize) -> Self {
        Self {
            max_blocks,
            header: None,
            imports: IndexSet::new(),
            items: Vec::new(),
            defined: IndexSet::new(),
            sections: Vec::new(),
            next_var: 1,
            next_label: 1,
        }
    }

    /// Text emitted as `//` comments at the top of the output.
    pub fn set_header(&mut self, header: &str) {
        self.header = Some(header.to_string());
    }

    /// Register a module-level `use` statement.
    pub fn add_import(&mut self, import: &str) {
        self.imports.insert(import.to_string());
    }

    /// True when a top-level item with this name was emitted or is open.
    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name) || self.sections.iter().any(|s| s.name == name)
    }

    fn current(&mut self) -> &mut Section {
        self.sections
            .last_mut()
            .expect("emitter has no open section")
    }

    // ------------------------------------------------------------------
    // Top-level items
    // ------------------------------------------------------------------

    pub fn open_global_section(&mut self, name: &str) {
        self.sections.push(Section::new(name));
    }

    pub fn close_global_section(&mut self) {
        let section = self.sections.pop().expect("no open section to close");
        assert!(
            section.blocks.is_empty(),
            "section `{}` closed with {} open blocks",
            section.name,
            section.blocks.len()
        );
        if self.defined.insert(section.name) {
            let mut text = section.lines.join("\n");
            text.push('\n');
            self.items.push(text);
        }
    }

    /// Open a plain function: `fn name(params) -> ret`.
    pub fn open_function(&mut self, name: &str, params: &str, ret: &str) {
        self.open_global_section(name);
        self.line(GENERATED_FN_LINTS);
        self.open(&format!("fn {name}({params}) -> {ret}"));
        let section = self.current();
        section.base = section.blocks.len();
    }

    pub fn close_function(&mut self) {
        self.close();
        self.close_global_section();
    }

    /// Open a parse function. The body runs inside an `async` block with
    /// `ctx`, `_text`, `_pos`, `_status` and `_result` in scope, and with
    /// each of `params` bound from the captured arguments.
    pub fn open_parse_function(&mut self, name: &str, params: &[String]) {
        self.open_global_section(name);
        self.line(GENERATED_FN_LINTS);
        self.open(&format!(
            "fn {name}(ctx: runtime::Ctx, _pos: usize, _args: runtime::Args) -> runtime::Frame"
        ));
        self.open("Box::pin(async move");
        self.line("let _source = ctx.text();");
        self.line("let _text: &str = &_source;");
        self.line("let mut _pos = _pos;");
        self.line("let mut _status = false;");
        self.line("let mut _result = runtime::Value::Null;");
        for (i, param) in params.iter().enumerate() {
            self.line(&format!("let {param} = _args[{i}].clone();"));
        }
        let section = self.current();
        section.base = section.blocks.len();
    }

    pub fn close_parse_function(&mut self) {
        self.line("(_status, _result, _pos)");
        self.close_with("})");
        self.close_function();
    }

    pub fn open_module(&mut self, name: &str) {
        self.line("#[allow(dead_code, non_snake_case)]");
        self.open(&format!("pub mod {name}"));
    }

    /// Open the module of a record type, declaring its field names.
    pub fn open_record(&mut self, name: &str, fields: &[&str]) {
        self.open_module(name);
        let fields: Vec<String> = fields.iter().map(|f| format!("{f:?}")).collect();
        self.line(&format!(
            "pub const FIELDS: &[&str] = &[{}];",
            fields.join(", ")
        ));
    }

    pub fn close_module(&mut self) {
        self.close();
    }

    // ------------------------------------------------------------------
    // Statements and blocks
    // ------------------------------------------------------------------

    /// Write a raw line at the current indentation.
    pub fn line(&mut self, code: &str) {
        let section = self.current();
        if section.sandbox > 0 {
            return;
        }
        if code.is_empty() {
            section.lines.push(String::new());
        } else {
            let line = format!("{}{code}", INDENT.repeat(section.indent));
            section.lines.push(line);
        }
    }

    /// Write `text` as `//` comment lines.
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.line("//");
            } else {
                self.line(&format!("// {line}"));
            }
        }
    }

    /// Open a block: `head {`.
    pub fn open(&mut self, head: &str) {
        self.open_block(head, Block::Plain);
    }

    fn open_block(&mut self, head: &str, block: Block) {
        self.line(&format!("{head} {{"));
        let section = self.current();
        section.indent += 1;
        section.blocks.push(block);
    }

    pub fn open_if(&mut self, condition: &str) {
        self.open(&format!("if {condition}"));
    }

    /// Switch the innermost `if` block to its `else` branch.
    pub fn open_else(&mut self) {
        let section = self.current();
        section.indent -= 1;
        self.line("} else {");
        self.current().indent += 1;
    }

    /// Open a labelled `loop`.
    pub fn open_loop(&mut self) -> Label {
        let label = self.fresh_label();
        self.open_block(&format!("{label}: loop"), Block::Loop(label.clone()));
        label
    }

    /// Open a labelled block that `break_` leaves.
    pub fn open_breakable(&mut self) -> Label {
        let label = self.fresh_label();
        self.open_block(&format!("{label}:"), Block::Breakable(label.clone()));
        label
    }

    pub fn close(&mut self) {
        self.close_with("}");
    }

    fn close_with(&mut self, closing: &str) {
        let section = self.current();
        section
            .blocks
            .pop()
            .expect("close() without a matching open");
        section.indent -= 1;
        self.line(closing);
    }

    fn innermost(&mut self, loops_only: bool) -> Label {
        self.current()
            .blocks
            .iter()
            .rev()
            .find_map(|block| match block {
                Block::Loop(label) => Some(label.clone()),
                Block::Breakable(label) if !loops_only => Some(label.clone()),
                _ => None,
            })
            .expect("break or continue outside of a loop")
    }

    /// Leave the innermost loop or breakable block.
    pub fn break_(&mut self) {
        let label = self.innermost(false);
        self.line(&format!("break {label};"));
    }

    /// Restart the innermost loop.
    pub fn continue_(&mut self) {
        let label = self.innermost(true);
        self.line(&format!("continue {label};"));
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    /// A unique variable name derived from `name`, without declaring it.
    pub fn fresh(&mut self, name: &str) -> Var {
        let var = Var(format!("_{name}{}", self.next_var));
        self.next_var += 1;
        var
    }

    /// Declare a mutable local initialised with `init`.
    pub fn var(&mut self, name: &str, init: &str) -> Var {
        let var = self.fresh(name);
        self.line(&format!("let mut {var} = {init};"));
        var
    }

    fn fresh_label(&mut self) -> Label {
        let label = Label(format!("'l{}", self.next_label));
        self.next_label += 1;
        label
    }

    // ------------------------------------------------------------------
    // Budget and sandboxing
    // ------------------------------------------------------------------

    /// Blocks currently open in the innermost function body.
    pub fn depth(&self) -> usize {
        self.sections
            .last()
            .map_or(0, |s| s.blocks.len().saturating_sub(s.base))
    }

    pub fn has_available_blocks(&self, blocks: usize) -> bool {
        self.depth() + blocks <= self.max_blocks
    }

    /// Start discarding output; blocks still have to be balanced.
    pub fn open_sandbox(&mut self) {
        self.current().sandbox += 1;
    }

    pub fn close_sandbox(&mut self) {
        let section = self.current();
        section.sandbox = section
            .sandbox
            .checked_sub(1)
            .expect("close_sandbox() without a matching open");
    }

    /// Assemble the output file.
    pub fn finish(self) -> String {
        assert!(
            self.sections.is_empty(),
            "finish() with open sections: {:?}",
            self.sections.iter().map(|s| &s.name).collect::<Vec<_>>()
        );
        let mut out = String::new();
        if let Some(header) = &self.header {
            for line in header.lines() {
                if line.trim().is_empty() {
                    out.push_str("//\n");
                } else {
                    out.push_str(&format!("// {line}\n"));
                }
            }
            out.push('\n');
        }
        out.push_str("// Generated by pegloom. Do not edit.\n");
        if !self.imports.is_empty() {
            out.push('\n');
            for import in &self.imports {
                out.push_str(import);
                out.push('\n');
            }
        }
        for item in &self.items {
            out.push('\n');
            out.push_str(item);
        }
        out
    }
}
