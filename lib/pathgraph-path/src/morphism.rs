use pathgraph_model::Value;

use crate::plan::FilterSpec;
use crate::path::Path;

/// A single step recorded by a [`Path`]: a transformation `Shape → Shape`
/// with a reversal. `Path::plan` folds a sequence of these into a
/// [`crate::plan::PlanNode`]; `Morphism::reverse` lets a whole `Path` be
/// walked backwards without re-deriving it from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Morphism {
    Is(Vec<Value>),
    Tag(Vec<String>),
    Out {
        predicate: Value,
        tag: Option<String>,
    },
    In {
        predicate: Value,
        tag: Option<String>,
    },
    Both {
        predicate: Value,
    },
    Has {
        predicate: Value,
        value: Value,
    },
    HasReverse {
        predicate: Value,
        value: Value,
    },
    Save {
        predicate: Value,
        tag: String,
        reverse: bool,
        optional: bool,
    },
    Follow(Box<Path>),
    FollowReverse(Box<Path>),
    FollowRecursive {
        predicate: Value,
        reverse: bool,
        max_depth: Option<u32>,
        tag: Option<String>,
    },
    And(Box<Path>),
    Or(Box<Path>),
    Except(Box<Path>),
    Unique,
    Limit(u64),
    Skip(u64),
    Back(String),
    Filter(FilterSpec),
    LabelContext(Vec<Value>),
    InPredicates,
    OutPredicates,
    Labels,
    SavePredicates {
        tag: String,
        reverse: bool,
    },
}

impl Morphism {
    /// Mirrors a morphism for traversal in the opposite direction.
    ///
    /// Directional steps swap `out`/`in` and `has`/`has_reverse`, flip the
    /// `reverse` flag on `save`/`follow_recursive`/`save_predicates`, and
    /// swap `in_predicates`/`out_predicates`. Structural and terminal steps
    /// (`is`, `tag`, `unique`, `limit`, `skip`, `filter`, `back`,
    /// `label_context`, `labels`, `and`/`or`/`except`) pass through
    /// unchanged — reversing the outer `Path` does not re-derive the
    /// sub-paths those steps carry.
    pub fn reverse(&self) -> Morphism {
        match self {
            Morphism::Out { predicate, tag } => Morphism::In {
                predicate: predicate.clone(),
                tag: tag.clone(),
            },
            Morphism::In { predicate, tag } => Morphism::Out {
                predicate: predicate.clone(),
                tag: tag.clone(),
            },
            Morphism::Both { predicate } => Morphism::Both {
                predicate: predicate.clone(),
            },
            Morphism::Has { predicate, value } => Morphism::HasReverse {
                predicate: predicate.clone(),
                value: value.clone(),
            },
            Morphism::HasReverse { predicate, value } => Morphism::Has {
                predicate: predicate.clone(),
                value: value.clone(),
            },
            Morphism::Save {
                predicate,
                tag,
                reverse,
                optional,
            } => Morphism::Save {
                predicate: predicate.clone(),
                tag: tag.clone(),
                reverse: !reverse,
                optional: *optional,
            },
            Morphism::Follow(other) => Morphism::FollowReverse(Box::new(other.reverse())),
            Morphism::FollowReverse(other) => Morphism::Follow(Box::new(other.reverse())),
            Morphism::FollowRecursive {
                predicate,
                reverse,
                max_depth,
                tag,
            } => Morphism::FollowRecursive {
                predicate: predicate.clone(),
                reverse: !reverse,
                max_depth: *max_depth,
                tag: tag.clone(),
            },
            Morphism::InPredicates => Morphism::OutPredicates,
            Morphism::OutPredicates => Morphism::InPredicates,
            Morphism::SavePredicates { tag, reverse } => Morphism::SavePredicates {
                tag: tag.clone(),
                reverse: !reverse,
            },
            same => same.clone(),
        }
    }
}
