//! Parsers generated by the build script from the grammars in `build.rs`.
//!
//! Each module holds one generated file.

macro_rules! generated {
    ($($name:ident),* $(,)?) => {
        $(
            pub mod $name {
                include!(concat!(env!("OUT_DIR"), "/", stringify!($name), ".rs"));
            }
        )*
    };
}

generated!(
    sum, operators, calc, lists, choice, records, bindings, memo, nested,
);

#[cfg(test)]
mod nested_tests;
