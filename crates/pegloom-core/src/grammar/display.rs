//! Grammar notation for expressions and rules.
//!
//! Used for comments in generated parsers and in parse error messages.

use std::fmt;

use super::types::{Assoc, Expr, ExprKind, Rule, RuleBody};

struct Wrapped<'a>(&'a Expr);

impl fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_binary() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, exprs: &[Expr], sep: &str) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{expr}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Seq(exprs) => {
                f.write_str("[")?;
                join(f, exprs, ", ")?;
                f.write_str("]")
            }
            ExprKind::Choice(exprs) => join(f, exprs, " | "),
            ExprKind::Discard {
                left,
                right,
                keep_left,
            } => {
                let op = if *keep_left { "<<" } else { ">>" };
                write!(f, "{} {op} {}", Wrapped(left), Wrapped(right))
            }
            ExprKind::Apply {
                left,
                right,
                apply_left,
            } => {
                let op = if *apply_left { "<|" } else { "|>" };
                write!(f, "{} {op} {}", Wrapped(left), Wrapped(right))
            }
            ExprKind::Where { expr, predicate } => {
                write!(f, "{} where {}", Wrapped(expr), Wrapped(predicate))
            }
            ExprKind::Let { name, expr, body } => write!(f, "let {name} = {expr} in {body}"),
            ExprKind::List { expr, min, max } => {
                if expr.is_binary() || matches!(expr.kind, ExprKind::Let { .. }) {
                    write!(f, "({expr})")?;
                } else {
                    write!(f, "{expr}")?;
                }
                match (min, max) {
                    (0, None) => f.write_str("*"),
                    (1, None) => f.write_str("+"),
                    (min, None) => write!(f, "{{{min},}}"),
                    (min, Some(max)) if min == max => write!(f, "{{{min}}}"),
                    (min, Some(max)) => write!(f, "{{{min},{max}}}"),
                }
            }
            ExprKind::Sep(sep) => {
                let op = if sep.allow_trailer { "/?" } else { "//" };
                write!(f, "{} {op} {}", Wrapped(&sep.expr), Wrapped(&sep.separator))
            }
            ExprKind::Skip(exprs) => {
                f.write_str("Skip(")?;
                join(f, exprs, ", ")?;
                f.write_str(")")
            }
            ExprKind::Opt(expr) => write!(f, "Opt({expr})"),
            ExprKind::Expect(expr) => write!(f, "Expect({expr})"),
            ExprKind::ExpectNot(expr) => write!(f, "ExpectNot({expr})"),
            ExprKind::Fail(None) => f.write_str("Fail()"),
            ExprKind::Fail(Some(message)) => write!(f, "Fail({message:?})"),
            ExprKind::Ref(name) => f.write_str(name),
            ExprKind::Call { func, args } => {
                write!(f, "{func}(")?;
                join(f, args, ", ")?;
                f.write_str(")")
            }
            ExprKind::Str { value, .. } => write!(f, "{value:?}"),
            ExprKind::Regex {
                pattern,
                ignore_case,
                ..
            } => {
                let flag = if *ignore_case { "i" } else { "" };
                write!(f, "/{pattern}/{flag}")
            }
            ExprKind::Code(source) => write!(f, "`{source}`"),
            ExprKind::Operators(tier) => write!(f, "{}({})", tier.assoc, tier.operators),
            ExprKind::OperatorPrecedence(prec) => {
                let (atom, tiers) = prec.unlink();
                write!(f, "OperatorPrecedence(\n    {atom}")?;
                for tier in tiers {
                    write!(f, ",\n    {}({})", tier.assoc, tier.operators)?;
                }
                f.write_str("\n)")
            }
        }
    }
}

impl fmt::Display for Assoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("_");
        let params = if self.params.is_empty() {
            String::new()
        } else {
            format!("({})", self.params.join(", "))
        };
        if self.ignored {
            f.write_str("ignored ")?;
        }
        match &self.body {
            RuleBody::Expr(expr) => write!(f, "{name}{params} = {expr}"),
            RuleBody::Class(fields) => {
                writeln!(f, "class {name}{params} {{")?;
                for field in fields {
                    writeln!(f, "    {}: {}", field.name, field.expr)?;
                }
                f.write_str("}")
            }
        }
    }
}
