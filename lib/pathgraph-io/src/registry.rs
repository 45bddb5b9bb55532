use std::collections::HashMap;
use std::sync::OnceLock;

use pathgraph_model::Value;
use pathgraph_store::MemoryStore;

/// A query-language session factory: consumes a store and an optional
/// result-count limit and produces a streaming sequence of result values.
/// Mirrors [`pathgraph_store::registry::BackendFactory`]'s shape for the
/// language side of the same pluggable-registry, immutable-thereafter
/// contract.
pub type QueryLanguageFactory =
    fn(&MemoryStore, Option<u64>) -> Box<dyn Iterator<Item = Value>>;

fn registry() -> &'static HashMap<&'static str, QueryLanguageFactory> {
    static REGISTRY: OnceLock<HashMap<&'static str, QueryLanguageFactory>> = OnceLock::new();
    REGISTRY.get_or_init(HashMap::new)
}

/// Looks up a query-language session factory by name. Empty by construction:
/// concrete query languages are external collaborators that register
/// themselves into a table shaped like this one, not something this crate
/// implements.
pub fn language(name: &str) -> Option<QueryLanguageFactory> {
    registry().get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_language_is_registered_by_this_crate() {
        assert!(language("sparql-like").is_none());
    }
}
