/// Rust keywords, strict and reserved, in every edition.
const KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Check whether `name` is a Rust keyword.
///
/// # Examples
/// ```
/// use pegloom_core::utils::is_keyword;
/// assert!(is_keyword("match"));
/// assert!(!is_keyword("Match"));
/// ```
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Check whether `name` is a plain ASCII identifier: a letter or underscore
/// followed by letters, digits, or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split host code into the identifiers it mentions, in order of appearance.
///
/// String and character literals are not skipped; callers only use this to
/// over-approximate which bindings a snippet may read.
///
/// # Examples
/// ```
/// use pegloom_core::utils::identifiers;
/// assert_eq!(identifiers("f(x, 2) + y_1"), vec!["f", "x", "y_1"]);
/// ```
pub fn identifiers(source: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in source.char_indices() {
        let word = c.is_ascii_alphanumeric() || c == '_';
        match (word, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push(&source[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(&source[s..]);
    }
    out.retain(|w| is_identifier(w));
    out
}
