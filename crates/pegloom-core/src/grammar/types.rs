//! Combinator tree definitions.

use serde::Deserialize;

/// Identifier assigned to every expression before compilation.
///
/// Zero means "not assigned yet".
pub type ProgramId = u32;

/// A grammar expression: a combinator plus its program id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ExprKind")]
pub struct Expr {
    pub id: ProgramId,
    pub kind: ExprKind,
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Self { id: 0, kind }
    }
}

/// Combinator variants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum ExprKind {
    /// Children in order; the result is the list of their values.
    Seq(Vec<Expr>),
    /// Ordered choice; the first successful alternative wins.
    Choice(Vec<Expr>),
    /// Both sides must match; only one side's value is kept.
    Discard {
        left: Box<Expr>,
        right: Box<Expr>,
        keep_left: bool,
    },
    /// Both sides must match; one side's value is applied to the other's.
    Apply {
        left: Box<Expr>,
        right: Box<Expr>,
        apply_left: bool,
    },
    /// `expr` must match and `predicate` must hold for its value.
    Where {
        expr: Box<Expr>,
        predicate: Box<Expr>,
    },
    /// Binds the value of `expr` to `name` while parsing `body`.
    Let {
        name: String,
        expr: Box<Expr>,
        body: Box<Expr>,
    },
    /// Greedy repetition.
    List {
        expr: Box<Expr>,
        #[serde(default)]
        min: usize,
        #[serde(default)]
        max: Option<usize>,
    },
    /// Repetition with separators.
    Sep(SepList),
    /// Skips as much content matched by any of the expressions as possible.
    Skip(Vec<Expr>),
    Opt(Box<Expr>),
    /// Positive lookahead.
    Expect(Box<Expr>),
    /// Negative lookahead.
    ExpectNot(Box<Expr>),
    /// Unconditional failure with an optional message.
    Fail(Option<String>),
    /// Reference to a rule or to a local binding.
    Ref(String),
    /// Invocation of a parameterized rule.
    Call { func: String, args: Vec<Expr> },
    /// Exact string match.
    Str {
        value: String,
        #[serde(skip)]
        skip_ignored: bool,
    },
    /// Anchored regular expression match.
    Regex {
        pattern: String,
        #[serde(default)]
        ignore_case: bool,
        #[serde(skip)]
        skip_ignored: bool,
    },
    /// Host (Rust) expression evaluated for its value.
    Code(String),
    /// One tier of an operator-precedence cascade.
    Operators(OperatorTier),
    /// Operator-precedence cascade, holding its outermost tier.
    OperatorPrecedence(Precedence),
}

/// Options of a separated repetition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SepList {
    pub expr: Box<Expr>,
    pub separator: Box<Expr>,
    #[serde(default = "default_true")]
    pub discard_separators: bool,
    #[serde(default)]
    pub allow_trailer: bool,
    #[serde(default = "default_true")]
    pub allow_empty: bool,
}

fn default_true() -> bool {
    true
}

/// Operator associativity (and fixity) of a precedence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Assoc {
    Prefix,
    Postfix,
    LeftAssoc,
    NonAssoc,
    RightAssoc,
}

impl Assoc {
    pub fn as_str(self) -> &'static str {
        match self {
            Assoc::Prefix => "Prefix",
            Assoc::Postfix => "Postfix",
            Assoc::LeftAssoc => "LeftAssoc",
            Assoc::NonAssoc => "NonAssoc",
            Assoc::RightAssoc => "RightAssoc",
        }
    }
}

/// A precedence tier wrapping the next-lower tier (or the atom).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OperatorTier {
    pub assoc: Assoc,
    pub operand: Box<Expr>,
    pub operators: Box<Expr>,
}

/// Linked chain of precedence tiers.
///
/// Deserializes from `{ "atom": .., "tiers": [{ "assoc": .., "operators": .. }] }`
/// and links the tiers in declaration order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PrecedenceSpec")]
pub struct Precedence {
    pub top: Box<Expr>,
}

/// Unlinked tier as written by grammar authors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierSpec {
    pub assoc: Assoc,
    pub operators: Expr,
}

#[derive(Debug, Clone, Deserialize)]
struct PrecedenceSpec {
    atom: Expr,
    #[serde(default)]
    tiers: Vec<TierSpec>,
}

impl From<PrecedenceSpec> for Precedence {
    fn from(spec: PrecedenceSpec) -> Self {
        Precedence::link(spec.atom, spec.tiers)
    }
}

impl Precedence {
    /// Link tiers so each one's operand is the previous tier.
    pub fn link(atom: Expr, tiers: Vec<TierSpec>) -> Self {
        let top = tiers.into_iter().fold(atom, |operand, tier| {
            ExprKind::Operators(OperatorTier {
                assoc: tier.assoc,
                operand: Box::new(operand),
                operators: Box::new(tier.operators),
            })
            .into()
        });
        Self { top: Box::new(top) }
    }

    /// Tiers from the innermost outward, plus the atom.
    pub fn unlink(&self) -> (&Expr, Vec<&OperatorTier>) {
        let mut tiers = Vec::new();
        let mut current = self.top.as_ref();
        while let ExprKind::Operators(tier) = &current.kind {
            tiers.push(tier);
            current = &tier.operand;
        }
        tiers.reverse();
        (current, tiers)
    }
}

/// A named production.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub params: Vec<String>,
    pub body: RuleBody,
    /// Skipped implicitly between the tokens of other rules.
    #[serde(default)]
    pub ignored: bool,
    #[serde(skip)]
    pub id: ProgramId,
    /// Id of the record sub-parse of a class rule.
    #[serde(skip)]
    pub extra_id: ProgramId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum RuleBody {
    /// A plain rule.
    Expr(Expr),
    /// A record production with named fields.
    Class(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
    pub name: String,
    pub expr: Expr,
}

impl Rule {
    pub fn is_class(&self) -> bool {
        matches!(self.body, RuleBody::Class(_))
    }

    /// Rule name; panics for anonymous rules that were never named.
    pub fn name(&self) -> &str {
        self.name
            .as_deref()
            .expect("anonymous rules are named before compilation")
    }

    /// Field names of a class rule.
    pub fn field_names(&self) -> Vec<&str> {
        match &self.body {
            RuleBody::Expr(_) => Vec::new(),
            RuleBody::Class(fields) => fields.iter().map(|f| f.name.as_str()).collect(),
        }
    }

    pub fn always_succeeds(&self) -> bool {
        match &self.body {
            RuleBody::Expr(expr) => expr.always_succeeds(),
            RuleBody::Class(fields) => fields.iter().all(|f| f.expr.always_succeeds()),
        }
    }
}

/// Top-level grammar item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Item {
    Rule(Rule),
    /// Host code copied verbatim into the generated parser.
    Code(String),
}

/// A complete grammar: rules and host-code sections in definition order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Grammar {
    pub items: Vec<Item>,
}

impl Grammar {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(|item| match item {
            Item::Rule(rule) => Some(rule),
            Item::Code(_) => None,
        })
    }

    pub fn rules_mut(&mut self) -> impl Iterator<Item = &mut Rule> {
        self.items.iter_mut().filter_map(|item| match item {
            Item::Rule(rule) => Some(rule),
            Item::Code(_) => None,
        })
    }

    /// The rule named `start` (case-insensitive), else the first rule.
    pub fn start_rule(&self) -> Option<&Rule> {
        self.rules()
            .find(|r| r.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case("start")))
            .or_else(|| self.rules().next())
    }
}
