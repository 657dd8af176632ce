//! Source emission for generated parsers.
//!
//! The [`Emitter`] writes indented Rust text, hands out collision-free
//! local names, tracks how deeply blocks are nested inside the current
//! function, and collects top-level items (functions, modules, statics)
//! in definition order.

mod emitter;


pub use emitter::{Emitter, Label, Var};
