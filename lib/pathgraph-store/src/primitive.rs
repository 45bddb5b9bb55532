use pathgraph_model::Value;

/// The interned storage record: either a value with a reference count, or a
/// quad's four direction ids (0 = absent, matching label-less quads).
#[derive(Debug, Clone)]
pub(crate) enum Primitive {
    Value { value: Value, refcount: i64 },
    Quad { dirs: [i64; 4] },
}
