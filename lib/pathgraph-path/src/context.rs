use pathgraph_model::Value;

/// The small per-`Path` context: the active label-set restricting every
/// traversal that follows. Context changes are local to
/// the clone that made them — a forked sub-path (`follow`, `and`, `or`, …)
/// starts from a copy and can shadow it without mutating the caller's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub(crate) labels: Option<Vec<Value>>,
}

impl Context {
    pub fn label_set(&self) -> Option<&[Value]> {
        self.labels.as_deref()
    }
}
