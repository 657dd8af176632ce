// Runtime support embedded in every generated parser.
//
// Generated parse functions are futures: a function that needs a sub-parse
// awaits `Ctx::call`, which suspends with a call request instead of
// recursing. `run` drives the suspended functions with an explicit frame
// stack and memoizes every completed call by `(function, position)`.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Status, value and next position of a parse step.
pub type Outcome = (bool, Value, usize);

/// A suspended parse function.
pub type Frame = Pin<Box<dyn Future<Output = Outcome>>>;

/// Arguments bound to a parse function.
pub type Args = Rc<[Value]>;

/// Signature shared by all generated parse functions.
pub type RuleFn = fn(Ctx, usize, Args) -> Frame;

/// Builds the error of a failed expression at a position.
pub type ErrorFn = fn(&str, usize) -> ParseError;

const INFIX_FIELDS: &[&str] = &["left", "operator", "right"];
const PREFIX_FIELDS: &[&str] = &["operator", "right"];
const POSTFIX_FIELDS: &[&str] = &["left", "operator"];

pub fn args(values: Vec<Value>) -> Args {
    values.into()
}

// ============================================================================
// Values
// ============================================================================

/// A parsed value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(Rc<str>),
    List(Rc<[Value]>),
    Node(Rc<Node>),
    /// A parse function with bound arguments.
    Parser(ParseFn),
    /// A host function, as used by apply and where expressions.
    Func(HostFn),
    /// Error thunk of a failed parse step.
    Error(ErrorFn),
}

/// Host function wrapped as a value; compared by identity.
#[derive(Clone)]
pub struct HostFn(Rc<dyn Fn(Value) -> Value>);

impl Value {
    pub fn text(text: &str) -> Self {
        Value::Text(text.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }

    pub fn func(f: impl Fn(Value) -> Value + 'static) -> Self {
        Value::Func(HostFn(Rc::new(f)))
    }

    /// Build a record. `span` holds the start and end offsets when the
    /// record tracks where it was parsed.
    pub fn record(
        kind: &'static str,
        fields: &'static [&'static str],
        values: Vec<Value>,
        span: Option<(usize, usize)>,
    ) -> Self {
        Value::Node(Rc::new(Node {
            kind,
            fields,
            values,
            span,
            position: Cell::new(None),
        }))
    }

    pub fn infix(left: Value, operator: Value, right: Value) -> Self {
        Self::record("Infix", INFIX_FIELDS, vec![left, operator, right], None)
    }

    pub fn prefix(operator: Value, right: Value) -> Self {
        Self::record("Prefix", PREFIX_FIELDS, vec![operator, right], None)
    }

    pub fn postfix(left: Value, operator: Value) -> Self {
        Self::record("Postfix", POSTFIX_FIELDS, vec![left, operator], None)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Text(text) => !text.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Node(_) | Value::Parser(_) | Value::Func(_) | Value::Error(_) => true,
        }
    }

    /// Apply a host function value; anything else yields `Null`.
    pub fn call(&self, arg: Value) -> Value {
        match self {
            Value::Func(f) => (f.0)(arg),
            _ => Value::Null,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::text(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

// Results can nest as deep as the input is long, so comparing, hashing and
// dropping values walk an explicit stack instead of recursing.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            let same = match pair {
                (Value::Null, Value::Null) => true,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Int(a), Value::Int(b)) => a == b,
                (Value::Text(a), Value::Text(b)) => a == b,
                (Value::List(a), Value::List(b)) => {
                    Rc::ptr_eq(a, b) || a.len() == b.len() && {
                        pending.extend(a.iter().zip(b.iter()));
                        true
                    }
                }
                (Value::Node(a), Value::Node(b)) => {
                    Rc::ptr_eq(a, b)
                        || a.kind == b.kind && a.values.len() == b.values.len() && {
                            pending.extend(a.values.iter().zip(&b.values));
                            true
                        }
                }
                (Value::Parser(a), Value::Parser(b)) => a == b,
                (Value::Func(a), Value::Func(b)) => Rc::ptr_eq(&a.0, &b.0),
                (Value::Error(a), Value::Error(b)) => *a as usize == *b as usize,
                _ => false,
            };
            if !same {
                return false;
            }
        }
        true
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pending = vec![self];
        while let Some(value) = pending.pop() {
            std::mem::discriminant(value).hash(state);
            match value {
                Value::Null => {}
                Value::Bool(b) => b.hash(state),
                Value::Int(n) => n.hash(state),
                Value::Text(text) => text.hash(state),
                Value::List(items) => {
                    items.len().hash(state);
                    pending.extend(items.iter().rev());
                }
                Value::Node(node) => {
                    node.kind.hash(state);
                    node.values.len().hash(state);
                    pending.extend(node.values.iter().rev());
                }
                Value::Parser(parser) => parser.hash(state),
                Value::Func(f) => (Rc::as_ptr(&f.0) as *const () as usize).hash(state),
                Value::Error(f) => (*f as usize).hash(state),
            }
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        let mut orphans = Vec::new();
        detach_children(self, &mut orphans);
        while let Some(mut value) = orphans.pop() {
            detach_children(&mut value, &mut orphans);
        }
    }
}

/// Move the children of a list or record out into `orphans`, if `value` is
/// the last reference to it.
fn detach_children(value: &mut Value, orphans: &mut Vec<Value>) {
    match value {
        Value::List(items) => {
            if let Some(items) = Rc::get_mut(items) {
                orphans.extend(items.iter_mut().map(std::mem::take));
            }
        }
        Value::Node(node) => {
            if let Some(node) = Rc::get_mut(node) {
                orphans.append(&mut node.values);
            }
        }
        _ => {}
    }
}

/// Recurses once per nesting level.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(text) => write!(f, "{:?}", &**text),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Node(node) => fmt::Debug::fmt(&**node, f),
            Value::Parser(parser) => write!(f, "<parser {}>", parser.name),
            Value::Func(_) => f.write_str("<function>"),
            Value::Error(_) => f.write_str("<error>"),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// A constructed record: a class instance or an operator node.
pub struct Node {
    kind: &'static str,
    fields: &'static [&'static str],
    values: Vec<Value>,
    span: Option<(usize, usize)>,
    position: Cell<Option<PositionInfo>>,
}

impl Node {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        let index = self.fields.iter().position(|f| *f == field)?;
        self.values.get(index)
    }

    /// Start and end offsets, for records that track where they were parsed.
    pub fn span(&self) -> Option<(usize, usize)> {
        self.span
    }

    /// Line and column information, filled in when parsing completes.
    pub fn position(&self) -> Option<PositionInfo> {
        self.position.get()
    }

    /// Copy of this record with different field values.
    pub fn with_values(&self, values: Vec<Value>) -> Node {
        Node {
            kind: self.kind,
            fields: self.fields,
            values,
            span: self.span,
            position: Cell::new(self.position.get()),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.values == other.values
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.values.len().hash(state);
        for value in &self.values {
            value.hash(state);
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.kind);
        for (field, value) in self.fields.iter().zip(&self.values) {
            out.field(field, value);
        }
        out.finish()
    }
}

/// Offset with its 1-based line and column (columns count characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    fn locate(text: &str, index: usize) -> Self {
        let before = &text[..index.min(text.len())];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Self {
            index,
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

/// Where a record starts and where its last character is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionInfo {
    pub start: Position,
    pub end: Position,
}

/// Maps every byte offset to its line and column in one pass.
struct LineIndex {
    entries: Vec<(usize, usize)>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut entries = Vec::with_capacity(text.len() + 1);
        let (mut line, mut column) = (1, 1);
        for c in text.chars() {
            for _ in 0..c.len_utf8() {
                entries.push((line, column));
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        entries.push((line, column));
        Self { entries }
    }

    fn position(&self, index: usize) -> Position {
        let (line, column) = self.entries[index.min(self.entries.len() - 1)];
        Position {
            index,
            line,
            column,
        }
    }
}

// ============================================================================
// Trampoline
// ============================================================================

/// A parse function together with its bound arguments.
///
/// Two values are the same callee when they name the same function and
/// carry equal arguments; this is the function half of a memo key.
#[derive(Clone)]
pub struct ParseFn {
    name: &'static str,
    func: RuleFn,
    args: Args,
}

impl ParseFn {
    pub fn new(name: &'static str, func: RuleFn, args: Vec<Value>) -> Self {
        Self {
            name,
            func,
            args: args.into(),
        }
    }

    pub fn rule(name: &'static str, func: RuleFn) -> Self {
        Self::new(name, func, Vec::new())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn invoke(&self, ctx: &Ctx, pos: usize) -> Frame {
        (self.func)(ctx.clone(), pos, self.args.clone())
    }
}

impl PartialEq for ParseFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Eq for ParseFn {}

impl Hash for ParseFn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.args.hash(state);
    }
}

struct Shared {
    text: Rc<str>,
    request: RefCell<Option<(ParseFn, usize)>>,
    reply: RefCell<Option<Outcome>>,
}

/// Handle through which parse functions reach the driver loop.
#[derive(Clone)]
pub struct Ctx(Rc<Shared>);

impl Ctx {
    fn new(text: &str) -> Self {
        Ctx(Rc::new(Shared {
            text: text.into(),
            request: RefCell::new(None),
            reply: RefCell::new(None),
        }))
    }

    pub fn text(&self) -> Rc<str> {
        self.0.text.clone()
    }

    /// Suspend until the driver has parsed `callee` at `pos`.
    pub fn call(&self, callee: ParseFn, pos: usize) -> Call {
        Call {
            ctx: self.clone(),
            request: Some((callee, pos)),
        }
    }

    /// Evaluate a local binding: parsers are invoked, other values are
    /// returned without consuming input.
    pub async fn lookup(&self, value: Value, pos: usize) -> Outcome {
        if let Value::Parser(callee) = &value {
            let callee = callee.clone();
            return self.call(callee, pos).await;
        }
        (true, value, pos)
    }

    fn take_request(&self) -> Option<(ParseFn, usize)> {
        self.0.request.take()
    }

    fn reply(&self, outcome: Outcome) {
        self.0.reply.replace(Some(outcome));
    }
}

/// Future returned by [`Ctx::call`].
///
/// The first poll posts the call request and yields; the driver resolves
/// the request and leaves the outcome in the reply slot for the next poll.
pub struct Call {
    ctx: Ctx,
    request: Option<(ParseFn, usize)>,
}

impl Future for Call {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Outcome> {
        if let Some(request) = self.request.take() {
            self.ctx.0.request.replace(Some(request));
            return Poll::Pending;
        }
        match self.ctx.0.reply.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => Poll::Pending,
        }
    }
}

/// Parse `text` from `pos` with `start` as the root parse function.
///
/// With `fullparse`, input left over after a successful parse is an error.
pub fn run(text: &str, pos: usize, start: ParseFn, fullparse: bool) -> Result<Value, SourceError> {
    if pos > text.len() || !text.is_char_boundary(pos) {
        return Err(ParseError {
            message: format!("Invalid start position {pos} for an input of {} bytes.", text.len()),
            position: Position::locate(text, text.len()),
        }
        .into());
    }

    let ctx = Ctx::new(text);
    let mut memo: HashMap<(ParseFn, usize), Outcome> = HashMap::new();
    let mut farthest: Option<(usize, Value)> = None;
    let mut cx = Context::from_waker(Waker::noop());
    let root = start.invoke(&ctx, pos);
    let mut stack: Vec<((ParseFn, usize), Frame)> = vec![((start, pos), root)];
    let mut last = None;

    while let Some((_, frame)) = stack.last_mut() {
        match frame.as_mut().poll(&mut cx) {
            Poll::Ready(outcome) => {
                let Some((key, _)) = stack.pop() else {
                    break;
                };
                if !outcome.0 && farthest.as_ref().is_none_or(|(at, _)| outcome.2 > *at) {
                    farthest = Some((outcome.2, outcome.1.clone()));
                }
                memo.insert(key, outcome.clone());
                ctx.reply(outcome.clone());
                last = Some(outcome);
            }
            Poll::Pending => {
                let key = ctx
                    .take_request()
                    .expect("a suspended parse function always posts a call request");
                match memo.get(&key) {
                    Some(outcome) => ctx.reply(outcome.clone()),
                    None => {
                        let frame = key.0.invoke(&ctx, key.1);
                        stack.push((key, frame));
                    }
                }
            }
        }
    }

    let (status, result, end) = last.expect("the root frame always completes");
    if !status {
        return Err(error_at(text, end, &result).into());
    }
    finalize(text, result, end, fullparse, farthest)
}

fn error_at(text: &str, pos: usize, result: &Value) -> ParseError {
    match result {
        Value::Error(error) => error(text, pos),
        _ => ParseError::new(text, pos, "Failed to parse the input."),
    }
}

fn finalize(
    text: &str,
    value: Value,
    end: usize,
    fullparse: bool,
    farthest: Option<(usize, Value)>,
) -> Result<Value, SourceError> {
    let nodes: Vec<Rc<Node>> = visit(&value).filter(|n| n.span.is_some()).collect();
    let incomplete = fullparse && end < text.len();
    if nodes.is_empty() && !incomplete {
        return Ok(value);
    }

    let index = LineIndex::new(text);
    for node in &nodes {
        if let Some((start, stop)) = node.span {
            let last = if stop > start { stop - 1 } else { start };
            node.position.set(Some(PositionInfo {
                start: index.position(start),
                end: index.position(last),
            }));
        }
    }

    if incomplete {
        let last_position = index.position(end);
        let excerpt = extract_excerpt(text, end, last_position.column);
        let farthest_failure = farthest
            .filter(|(at, _)| *at > end)
            .map(|(at, error)| error_at(text, at, &error));
        return Err(PartialParseError {
            partial_result: value,
            last_position,
            excerpt,
            farthest_failure,
        }
        .into());
    }
    Ok(value)
}

// ============================================================================
// Tree utilities
// ============================================================================

/// Iterate over every record reachable from `value`, each one once.
pub fn visit(value: &Value) -> Visit {
    Visit {
        stack: vec![value.clone()],
        seen: HashSet::new(),
    }
}

pub struct Visit {
    stack: Vec<Value>,
    seen: HashSet<*const Node>,
}

impl Iterator for Visit {
    type Item = Rc<Node>;

    fn next(&mut self) -> Option<Rc<Node>> {
        while let Some(value) = self.stack.pop() {
            match &value {
                Value::List(items) => self.stack.extend(items.iter().rev().cloned()),
                Value::Node(node) => {
                    if !self.seen.insert(Rc::as_ptr(node)) {
                        continue;
                    }
                    self.stack.extend(node.values.iter().rev().cloned());
                    return Some(node.clone());
                }
                _ => {}
            }
        }
        None
    }
}

/// Rebuild `value` bottom-up, passing every record to `callback` after its
/// fields have been transformed.
pub fn transform(value: &Value, callback: &mut impl FnMut(Value) -> Value) -> Value {
    enum Step<'a> {
        Enter(&'a Value),
        List(usize),
        Node(&'a Node),
    }

    let mut steps = vec![Step::Enter(value)];
    let mut built: Vec<Value> = Vec::new();
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(Value::List(items)) => {
                steps.push(Step::List(items.len()));
                steps.extend(items.iter().rev().map(Step::Enter));
            }
            Step::Enter(Value::Node(node)) => {
                steps.push(Step::Node(&**node));
                steps.extend(node.values.iter().rev().map(Step::Enter));
            }
            Step::Enter(other) => built.push(other.clone()),
            Step::List(len) => {
                let items = built.split_off(built.len() - len);
                built.push(Value::list(items));
            }
            Step::Node(node) => {
                let values = built.split_off(built.len() - node.values.len());
                built.push(callback(Value::Node(Rc::new(node.with_values(values)))));
            }
        }
    }
    built.pop().unwrap_or_default()
}

// ============================================================================
// Errors
// ============================================================================

/// The root rule failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    /// Error at `pos`, titled with the line and an excerpt of the input.
    pub fn new(text: &str, pos: usize, details: &str) -> Self {
        let position = Position::locate(text, pos);
        let title = if pos >= text.len() {
            "Unexpected end of input.\n".to_string()
        } else {
            format!(
                "Error on line {}, column {}:\n{}\n",
                position.line,
                position.column,
                extract_excerpt(text, pos, position.column)
            )
        };
        Self {
            message: format!("{title}{details}"),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parsing succeeded without consuming the whole input.
#[derive(Debug, Clone)]
pub struct PartialParseError {
    pub partial_result: Value,
    pub last_position: Position,
    pub excerpt: String,
    /// The failure farthest into the input, when it lies past `last_position`.
    pub farthest_failure: Option<ParseError>,
}

impl fmt::Display for PartialParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Incomplete parse. Unexpected input on line {}, column {}:\n{}",
            self.last_position.line, self.last_position.column, self.excerpt
        )?;
        if let Some(failure) = &self.farthest_failure {
            write!(f, "\n\n{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PartialParseError {}

/// Any error raised while parsing.
#[derive(Debug, Clone)]
pub enum SourceError {
    Parse(ParseError),
    Partial(PartialParseError),
}

impl SourceError {
    /// The most informative position: where parsing failed, or the farthest
    /// failure behind an incomplete parse.
    pub fn position(&self) -> Position {
        match self {
            SourceError::Parse(e) => e.position,
            SourceError::Partial(e) => e
                .farthest_failure
                .as_ref()
                .map_or(e.last_position, |failure| failure.position),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Parse(e) => e.fmt(f),
            SourceError::Partial(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Parse(e) => Some(e),
            SourceError::Partial(e) => Some(e),
        }
    }
}

impl From<ParseError> for SourceError {
    fn from(e: ParseError) -> Self {
        SourceError::Parse(e)
    }
}

impl From<PartialParseError> for SourceError {
    fn from(e: PartialParseError) -> Self {
        SourceError::Partial(e)
    }
}

/// The line containing `pos`, cut to a bounded width, with a caret under
/// `column` on the following line.
fn extract_excerpt(text: &str, pos: usize, column: usize) -> String {
    let start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
    let line: Vec<char> = text[start..end].chars().collect();
    let caret = column - 1;
    let span = |from: usize, to: usize| -> String { line[from..to.min(line.len())].iter().collect() };

    let (snippet, at) = if line.len() < 96 {
        (span(0, line.len()), caret)
    } else if caret < 59 {
        (format!("{} ...", span(0, 90)), caret)
    } else if line.len() - caret < 40 {
        let from = line.len() - 90;
        (format!("... {}", span(from, line.len())), caret - from + 4)
    } else {
        (format!("... {} ...", span(caret - 42, caret + 42)), 46)
    };
    format!("{snippet}\n{}^", " ".repeat(at))
}
