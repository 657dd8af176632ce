//! Constructors for building combinator trees in code.
//!
//! ```
//! use pegloom_core::{Expr, Grammar, Rule};
//!
//! let grammar = Grammar::new(vec![
//!     Rule::new("Pair", Expr::seq([Expr::reference("Digit"), Expr::string(","), Expr::reference("Digit")])).into(),
//!     Rule::new("Digit", Expr::regex("[0-9]")).into(),
//! ]);
//! assert_eq!(grammar.rules().count(), 2);
//! ```

use super::types::{
    Assoc, Expr, ExprKind, Field, Item, Precedence, Rule, RuleBody, SepList, TierSpec,
};

impl Expr {
    pub fn seq(exprs: impl IntoIterator<Item = Expr>) -> Self {
        ExprKind::Seq(exprs.into_iter().collect()).into()
    }

    pub fn choice(exprs: impl IntoIterator<Item = Expr>) -> Self {
        ExprKind::Choice(exprs.into_iter().collect()).into()
    }

    /// Match both, keep the left value.
    pub fn left(left: Expr, right: Expr) -> Self {
        ExprKind::Discard {
            left: Box::new(left),
            right: Box::new(right),
            keep_left: true,
        }
        .into()
    }

    /// Match both, keep the right value.
    pub fn right(left: Expr, right: Expr) -> Self {
        ExprKind::Discard {
            left: Box::new(left),
            right: Box::new(right),
            keep_left: false,
        }
        .into()
    }

    /// Match both; `apply_left` selects which side holds the function.
    pub fn apply(left: Expr, right: Expr, apply_left: bool) -> Self {
        ExprKind::Apply {
            left: Box::new(left),
            right: Box::new(right),
            apply_left,
        }
        .into()
    }

    pub fn where_(expr: Expr, predicate: Expr) -> Self {
        ExprKind::Where {
            expr: Box::new(expr),
            predicate: Box::new(predicate),
        }
        .into()
    }

    pub fn let_in(name: impl Into<String>, expr: Expr, body: Expr) -> Self {
        ExprKind::Let {
            name: name.into(),
            expr: Box::new(expr),
            body: Box::new(body),
        }
        .into()
    }

    pub fn list(expr: Expr, min: usize, max: Option<usize>) -> Self {
        ExprKind::List {
            expr: Box::new(expr),
            min,
            max,
        }
        .into()
    }

    /// Zero or more.
    pub fn many(expr: Expr) -> Self {
        Self::list(expr, 0, None)
    }

    /// One or more.
    pub fn some(expr: Expr) -> Self {
        Self::list(expr, 1, None)
    }

    /// Separated list with default options (separators discarded,
    /// no trailing separator, empty list allowed).
    pub fn sep(expr: Expr, separator: Expr) -> Self {
        ExprKind::Sep(SepList {
            expr: Box::new(expr),
            separator: Box::new(separator),
            discard_separators: true,
            allow_trailer: false,
            allow_empty: true,
        })
        .into()
    }

    pub fn sep_with(
        expr: Expr,
        separator: Expr,
        configure: impl FnOnce(&mut SepList),
    ) -> Self {
        let mut sep = SepList {
            expr: Box::new(expr),
            separator: Box::new(separator),
            discard_separators: true,
            allow_trailer: false,
            allow_empty: true,
        };
        configure(&mut sep);
        ExprKind::Sep(sep).into()
    }

    pub fn skip(exprs: impl IntoIterator<Item = Expr>) -> Self {
        ExprKind::Skip(exprs.into_iter().collect()).into()
    }

    pub fn opt(expr: Expr) -> Self {
        ExprKind::Opt(Box::new(expr)).into()
    }

    pub fn expect(expr: Expr) -> Self {
        ExprKind::Expect(Box::new(expr)).into()
    }

    pub fn expect_not(expr: Expr) -> Self {
        ExprKind::ExpectNot(Box::new(expr)).into()
    }

    pub fn fail(message: Option<&str>) -> Self {
        ExprKind::Fail(message.map(str::to_owned)).into()
    }

    pub fn reference(name: impl Into<String>) -> Self {
        ExprKind::Ref(name.into()).into()
    }

    pub fn call(func: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        ExprKind::Call {
            func: func.into(),
            args: args.into_iter().collect(),
        }
        .into()
    }

    pub fn string(value: impl Into<String>) -> Self {
        ExprKind::Str {
            value: value.into(),
            skip_ignored: false,
        }
        .into()
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        ExprKind::Regex {
            pattern: pattern.into(),
            ignore_case: false,
            skip_ignored: false,
        }
        .into()
    }

    pub fn regex_nocase(pattern: impl Into<String>) -> Self {
        ExprKind::Regex {
            pattern: pattern.into(),
            ignore_case: true,
            skip_ignored: false,
        }
        .into()
    }

    pub fn code(source: impl Into<String>) -> Self {
        ExprKind::Code(source.into()).into()
    }

    /// Operator-precedence cascade; `tiers` are listed from the tightest
    /// binding tier outward.
    pub fn operator_precedence(atom: Expr, tiers: impl IntoIterator<Item = TierSpec>) -> Self {
        ExprKind::OperatorPrecedence(Precedence::link(atom, tiers.into_iter().collect())).into()
    }
}

impl TierSpec {
    pub fn new(assoc: Assoc, operators: Expr) -> Self {
        Self { assoc, operators }
    }

    pub fn prefix(operators: Expr) -> Self {
        Self::new(Assoc::Prefix, operators)
    }

    pub fn postfix(operators: Expr) -> Self {
        Self::new(Assoc::Postfix, operators)
    }

    pub fn left_assoc(operators: Expr) -> Self {
        Self::new(Assoc::LeftAssoc, operators)
    }

    pub fn non_assoc(operators: Expr) -> Self {
        Self::new(Assoc::NonAssoc, operators)
    }

    pub fn right_assoc(operators: Expr) -> Self {
        Self::new(Assoc::RightAssoc, operators)
    }
}

impl Rule {
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: Some(name.into()),
            params: Vec::new(),
            body: RuleBody::Expr(expr),
            ignored: false,
            id: 0,
            extra_id: 0,
        }
    }

    pub fn anonymous(expr: Expr) -> Self {
        Self {
            name: None,
            ..Self::new("", expr)
        }
    }

    /// Record production; `fields` are `(name, expr)` pairs.
    pub fn class<N: Into<String>>(name: N, fields: impl IntoIterator<Item = (N, Expr)>) -> Self {
        Self {
            name: Some(name.into()),
            params: Vec::new(),
            body: RuleBody::Class(
                fields
                    .into_iter()
                    .map(|(name, expr)| Field {
                        name: name.into(),
                        expr,
                    })
                    .collect(),
            ),
            ignored: false,
            id: 0,
            extra_id: 0,
        }
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }
}

impl From<Rule> for Item {
    fn from(rule: Rule) -> Self {
        Item::Rule(rule)
    }
}
