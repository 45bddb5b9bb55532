use pathgraph_model::{Direction, Value};
use pathgraph_iter::combinator::Comparator;

/// The declarative, store-independent query plan a [`crate::Path`] lowers
/// into before execution. Named `PlanNode` rather than `Shape` to avoid
/// colliding with the [`pathgraph_iter::QueryIter`] trait, which also
/// exposes a Shape-style surface.
///
/// Every node here is a plain owned recursive enum, `Box`ed at each
/// recursive edge.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    AllNodes,
    AllQuads,
    Fixed(Vec<Value>),
    And(Vec<PlanNode>),
    Or(Vec<PlanNode>),
    Except(Box<PlanNode>, Box<PlanNode>),
    Unique(Box<PlanNode>),
    Limit(Box<PlanNode>, u64),
    Skip(Box<PlanNode>, u64),
    LinksTo(Box<PlanNode>, Direction),
    HasA(Box<PlanNode>, Direction),
    Recursive {
        start: Box<PlanNode>,
        predicate: Value,
        reverse: bool,
        max_depth: Option<u32>,
        depth_tag: Option<String>,
    },
    Save {
        sub: Box<PlanNode>,
        predicate: Option<Value>,
        anchor: Direction,
        project: Direction,
        tag: String,
        optional: bool,
    },
    Tag {
        sub: Box<PlanNode>,
        names: Vec<String>,
    },
    Filter {
        sub: Box<PlanNode>,
        spec: FilterSpec,
    },
    Back {
        sub: Box<PlanNode>,
        tag: String,
    },
}

/// A `filter(comparator|regex)` morphism's payload. The regex pattern is
/// validated once, at `Path` construction, so lowering it never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Regex(String),
    Compare(Comparator, Value),
}

impl PlanNode {
    /// Structural children, for traversal/rewrite.
    pub fn sub_shapes(&self) -> Vec<&PlanNode> {
        match self {
            Self::AllNodes | Self::AllQuads | Self::Fixed(_) => Vec::new(),
            Self::And(subs) | Self::Or(subs) => subs.iter().collect(),
            Self::Except(a, b) => vec![a, b],
            Self::Unique(sub)
            | Self::Limit(sub, _)
            | Self::Skip(sub, _)
            | Self::LinksTo(sub, _)
            | Self::HasA(sub, _)
            | Self::Tag { sub, .. }
            | Self::Filter { sub, .. }
            | Self::Back { sub, .. }
            | Self::Save { sub, .. } => vec![sub],
            Self::Recursive { start, .. } => vec![start],
        }
    }
}
