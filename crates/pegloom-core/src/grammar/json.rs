//! JSON loading for combinator trees.
//!
//! The format is serde's externally tagged representation of [`Grammar`]:
//!
//! ```json
//! { "items": [
//!     { "Rule": { "name": "Digits", "body": { "Expr": { "Regex": { "pattern": "[0-9]+" } } } } }
//! ] }
//! ```

use indexmap::IndexMap;

use super::types::{Grammar, Rule};

/// Error while loading a grammar.
#[derive(Debug)]
pub enum LoadError {
    Json(serde_json::Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
        }
    }
}

impl Grammar {
    /// Parse a grammar from JSON text.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(LoadError::Json)
    }

    /// Named rules keyed by name, in definition order.
    ///
    /// Later duplicates do not replace earlier entries.
    pub fn rule_index(&self) -> IndexMap<&str, &Rule> {
        let mut index = IndexMap::new();
        for rule in self.rules() {
            if let Some(name) = rule.name.as_deref() {
                index.entry(name).or_insert(rule);
            }
        }
        index
    }
}
