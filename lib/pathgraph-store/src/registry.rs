use std::collections::HashMap;
use std::sync::OnceLock;

use crate::memory::MemoryStore;

/// A startup-initialized, immutable factory table of pluggable store
/// backends. No runtime registration is provided; a disk-backed backend
/// adds itself here at compile time by extending this table, not by calling
/// into it at runtime.
pub type BackendFactory = fn() -> MemoryStore;

fn registry() -> &'static HashMap<&'static str, BackendFactory> {
    static REGISTRY: OnceLock<HashMap<&'static str, BackendFactory>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map: HashMap<&'static str, BackendFactory> = HashMap::new();
        map.insert("memstore", MemoryStore::new as BackendFactory);
        map
    })
}

/// Looks up a backend factory by its well-known name (e.g. `"memstore"`).
pub fn backend(name: &str) -> Option<BackendFactory> {
    registry().get(name).copied()
}
