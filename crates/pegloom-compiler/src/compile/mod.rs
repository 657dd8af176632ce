//! Code generation from analyzed grammars.
//!
//! Every rule becomes an `async` parse function driven by the runtime's
//! trampoline: a rule call suspends the caller and is answered from the memo
//! table or by running the callee. Expressions are compiled inline until the
//! nesting budget of the current function runs out; the rest moves into
//! functions of its own.
//!
//! - `compiler` - context, dispatch, inline/function decision
//! - `sequences` - seq, choice, discard, apply, where, let
//! - `quantifier` - list, sep, skip, opt
//! - `lookahead` - expect, expect-not, fail
//! - `literals` - strings, regexes, host code
//! - `rules` - rules, references, calls, entry points
//! - `precedence` - operator tiers
//! - `errors` - error functions

mod compiler;
mod errors;
mod literals;
mod lookahead;
mod precedence;
mod quantifier;
mod rules;
mod sequences;


pub use compiler::{Compiler, cont_name, error_fn_name, num_blocks};
pub use errors::complaint;
