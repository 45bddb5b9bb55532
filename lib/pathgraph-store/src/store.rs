use pathgraph_model::{Direction, Quad, Value};

use crate::delta::{ApplyOptions, Delta};
use crate::error::StoreError;

/// A compact statistics report: exact node/quad counts plus the store's
/// horizon (batch) counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub node_count: i64,
    pub quad_count: i64,
    pub horizon: i64,
}

/// The contract every backend — in-memory or otherwise — implements to sit
/// underneath the iterator algebra in `pathgraph-iter`.
/// [`crate::MemoryStore`] is the reference implementation.
pub trait QuadStore {
    type NodeIds: Iterator<Item = i64>;
    type QuadIds: Iterator<Item = i64>;
    type DirectionIds: Iterator<Item = i64>;

    fn add_value(&self, value: Value) -> (i64, bool);
    fn lookup_value(&self, id: i64) -> Value;
    fn add_quad(&self, quad: Quad) -> (i64, bool);
    fn delete_quad(&self, id: i64) -> bool;
    fn apply_deltas(&self, deltas: &[Delta], options: ApplyOptions) -> Result<(), StoreError>;
    fn quad_iterator(&self, direction: Direction, value_id: i64) -> Self::DirectionIds;
    fn all_nodes_iterator(&self) -> Self::NodeIds;
    fn all_quads_iterator(&self) -> Self::QuadIds;
    fn name_of(&self, id: i64) -> Value;
    fn value_of(&self, value: &Value) -> i64;
    fn quad(&self, id: i64) -> Option<Quad>;
    fn quad_direction(&self, id: i64, direction: Direction) -> i64;
    fn stats(&self) -> StoreStats;

    /// Whether `id` names a live value primitive. Used by the `All` iterator
    /// of `pathgraph-iter` to implement random-access membership.
    fn contains_node(&self, id: i64) -> bool;
    /// Whether `id` names a live quad primitive.
    fn contains_quad(&self, id: i64) -> bool;
    /// Exact size of the per-direction index bucket for `value_id` — used
    /// for iterator size estimates.
    fn direction_count(&self, direction: Direction, value_id: i64) -> u64;
}
