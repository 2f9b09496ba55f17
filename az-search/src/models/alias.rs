use serde::{Deserialize, Serialize};

/// An index alias. Aliases let callers address an index by a stable
/// name while the underlying index is swapped out during rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAlias {
    pub name: String,
    pub indexes: Vec<String>,
}

impl SearchAlias {
    pub fn new(name: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: vec![index_name.into()],
        }
    }

    /// The index the alias currently points at. The service only
    /// supports a single target per alias today.
    pub fn target(&self) -> Option<&str> {
        self.indexes.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListAliasesResult {
    pub value: Vec<SearchAlias>,
}
