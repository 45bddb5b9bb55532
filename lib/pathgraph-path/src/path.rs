use pathgraph_model::{CancellationToken, Direction, Value};
use pathgraph_iter::combinator::Comparator;
use pathgraph_iter::{QueryIter, Ref};
use pathgraph_store::MemoryStore;

use crate::context::Context;
use crate::error::PathError;
use crate::lower::lower;
use crate::morphism::Morphism;
use crate::optimizer::optimize;
use crate::plan::{FilterSpec, PlanNode};

/// Where a fresh [`Path`] begins.
#[derive(Debug, Clone, PartialEq)]
pub enum StartNode {
    AllNodes,
    AllQuads,
    Fixed(Vec<Value>),
}

/// An immutable-ish builder recording a traversal as an ordered list of
/// [`Morphism`]s. Cloning a `Path` is O(depth): it copies a small
/// `Vec` of steps, never the store or any materialized result.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    start: StartNode,
    steps: Vec<Morphism>,
}

impl Path {
    pub fn start_nodes() -> Self {
        Path {
            start: StartNode::AllNodes,
            steps: Vec::new(),
        }
    }

    pub fn start_quads() -> Self {
        Path {
            start: StartNode::AllQuads,
            steps: Vec::new(),
        }
    }

    pub fn start_fixed(values: impl IntoIterator<Item = Value>) -> Self {
        Path {
            start: StartNode::Fixed(values.into_iter().collect()),
            steps: Vec::new(),
        }
    }

    fn push(mut self, morphism: Morphism) -> Self {
        self.steps.push(morphism);
        self
    }

    #[must_use]
    pub fn is(self, values: impl IntoIterator<Item = Value>) -> Self {
        self.push(Morphism::Is(values.into_iter().collect()))
    }

    #[must_use]
    pub fn tag(self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.push(Morphism::Tag(names.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub fn out(self, predicate: Value) -> Self {
        self.push(Morphism::Out {
            predicate,
            tag: None,
        })
    }

    #[must_use]
    pub fn out_tagged(self, predicate: Value, tag: impl Into<String>) -> Self {
        self.push(Morphism::Out {
            predicate,
            tag: Some(tag.into()),
        })
    }

    #[must_use]
    pub fn r#in(self, predicate: Value) -> Self {
        self.push(Morphism::In {
            predicate,
            tag: None,
        })
    }

    #[must_use]
    pub fn in_tagged(self, predicate: Value, tag: impl Into<String>) -> Self {
        self.push(Morphism::In {
            predicate,
            tag: Some(tag.into()),
        })
    }

    #[must_use]
    pub fn both(self, predicate: Value) -> Self {
        self.push(Morphism::Both { predicate })
    }

    #[must_use]
    pub fn has(self, predicate: Value, value: Value) -> Self {
        self.push(Morphism::Has { predicate, value })
    }

    #[must_use]
    pub fn has_reverse(self, predicate: Value, value: Value) -> Self {
        self.push(Morphism::HasReverse { predicate, value })
    }

    #[must_use]
    pub fn save(self, predicate: Value, tag: impl Into<String>) -> Self {
        self.push(Morphism::Save {
            predicate,
            tag: tag.into(),
            reverse: false,
            optional: false,
        })
    }

    #[must_use]
    pub fn save_reverse(self, predicate: Value, tag: impl Into<String>) -> Self {
        self.push(Morphism::Save {
            predicate,
            tag: tag.into(),
            reverse: true,
            optional: false,
        })
    }

    #[must_use]
    pub fn save_optional(self, predicate: Value, tag: impl Into<String>) -> Self {
        self.push(Morphism::Save {
            predicate,
            tag: tag.into(),
            reverse: false,
            optional: true,
        })
    }

    #[must_use]
    pub fn save_reverse_optional(self, predicate: Value, tag: impl Into<String>) -> Self {
        self.push(Morphism::Save {
            predicate,
            tag: tag.into(),
            reverse: true,
            optional: true,
        })
    }

    #[must_use]
    pub fn follow(self, other: Path) -> Self {
        self.push(Morphism::Follow(Box::new(other)))
    }

    #[must_use]
    pub fn follow_reverse(self, other: Path) -> Self {
        self.push(Morphism::FollowReverse(Box::new(other)))
    }

    #[must_use]
    pub fn follow_recursive(self, predicate: Value, max_depth: Option<u32>) -> Self {
        self.push(Morphism::FollowRecursive {
            predicate,
            reverse: false,
            max_depth,
            tag: None,
        })
    }

    #[must_use]
    pub fn follow_recursive_tagged(
        self,
        predicate: Value,
        max_depth: Option<u32>,
        tag: impl Into<String>,
    ) -> Self {
        self.push(Morphism::FollowRecursive {
            predicate,
            reverse: false,
            max_depth,
            tag: Some(tag.into()),
        })
    }

    #[must_use]
    pub fn and(self, other: Path) -> Self {
        self.push(Morphism::And(Box::new(other)))
    }

    #[must_use]
    pub fn or(self, other: Path) -> Self {
        self.push(Morphism::Or(Box::new(other)))
    }

    #[must_use]
    pub fn except(self, other: Path) -> Self {
        self.push(Morphism::Except(Box::new(other)))
    }

    #[must_use]
    pub fn unique(self) -> Self {
        self.push(Morphism::Unique)
    }

    #[must_use]
    pub fn limit(self, n: u64) -> Self {
        self.push(Morphism::Limit(n))
    }

    #[must_use]
    pub fn skip(self, n: u64) -> Self {
        self.push(Morphism::Skip(n))
    }

    #[must_use]
    pub fn back(self, tag: impl Into<String>) -> Self {
        self.push(Morphism::Back(tag.into()))
    }

    /// Restricts to results matching `pattern` (string-like values only).
    /// The pattern is validated immediately, so lowering a bound `Path`
    /// never fails on a bad regex.
    pub fn filter_regex(self, pattern: impl AsRef<str>) -> Result<Self, PathError> {
        let pattern = pattern.as_ref();
        regex::Regex::new(pattern)?;
        Ok(self.push(Morphism::Filter(FilterSpec::Regex(pattern.to_string()))))
    }

    #[must_use]
    pub fn filter_compare(self, comparator: Comparator, reference: Value) -> Self {
        self.push(Morphism::Filter(FilterSpec::Compare(comparator, reference)))
    }

    #[must_use]
    pub fn label_context(self, labels: impl IntoIterator<Item = Value>) -> Self {
        self.push(Morphism::LabelContext(labels.into_iter().collect()))
    }

    #[must_use]
    pub fn in_predicates(self) -> Self {
        self.push(Morphism::InPredicates)
    }

    #[must_use]
    pub fn out_predicates(self) -> Self {
        self.push(Morphism::OutPredicates)
    }

    #[must_use]
    pub fn labels(self) -> Self {
        self.push(Morphism::Labels)
    }

    #[must_use]
    pub fn save_predicates(self, tag: impl Into<String>) -> Self {
        self.push(Morphism::SavePredicates {
            tag: tag.into(),
            reverse: false,
        })
    }

    #[must_use]
    pub fn save_predicates_reverse(self, tag: impl Into<String>) -> Self {
        self.push(Morphism::SavePredicates {
            tag: tag.into(),
            reverse: true,
        })
    }

    /// Mirrors the whole path: start becomes the mirrored context's end,
    /// every step is reversed, and step order is flipped so re-running the
    /// result undoes the original traversal.
    #[must_use]
    pub fn reverse(&self) -> Path {
        Path {
            start: self.start.clone(),
            steps: self.steps.iter().rev().map(Morphism::reverse).collect(),
        }
    }

    /// Folds this path's steps into a store-independent [`PlanNode`],
    /// threading a [`Context`] that `label_context` steps mutate locally.
    pub fn plan(&self) -> PlanNode {
        let mut node = match &self.start {
            StartNode::AllNodes => PlanNode::AllNodes,
            StartNode::AllQuads => PlanNode::AllQuads,
            StartNode::Fixed(values) => PlanNode::Fixed(values.clone()),
        };
        let mut ctx = Context::default();
        for step in &self.steps {
            node = apply_morphism(node, step, &mut ctx);
        }
        node
    }

    /// Optimizes and lowers this path into an executable iterator.
    pub fn bind(&self, store: &MemoryStore) -> Box<dyn QueryIter> {
        self.bind_opt(store, &CancellationToken::default())
    }

    /// Like [`Path::bind`], but shares `cancellation` with every scanner the
    /// lowered tree constructs: calling `cancellation.cancel()` from another
    /// thread stops the scan at its next checkpoint and latches
    /// `IterError::Cancelled` into `result.err()`.
    pub fn bind_opt(
        &self,
        store: &MemoryStore,
        cancellation: &CancellationToken,
    ) -> Box<dyn QueryIter> {
        let (optimized, _changed) = optimize(&self.plan());
        lower(store, &optimized, cancellation)
    }

    /// Executes this path and materializes every result.
    pub fn drain(&self, store: &MemoryStore) -> Result<Vec<Ref>, PathError> {
        self.drain_opt(store, &CancellationToken::default())
    }

    /// Like [`Path::drain`], with a cancellation handle threaded through the
    /// bound iterator.
    pub fn drain_opt(
        &self,
        store: &MemoryStore,
        cancellation: &CancellationToken,
    ) -> Result<Vec<Ref>, PathError> {
        let mut iter = self.bind_opt(store, cancellation);
        let mut out = Vec::new();
        while iter.next() {
            if let Some(r) = iter.result() {
                out.push(r);
            }
        }
        if let Some(err) = iter.err() {
            return Err(PathError::Iter(err.clone()));
        }
        Ok(out)
    }

    /// Drains and returns the result count (the `count` terminal).
    pub fn count(&self, store: &MemoryStore) -> Result<u64, PathError> {
        Ok(self.drain(store)?.len() as u64)
    }

    /// Like [`Path::count`], with a cancellation handle threaded through.
    pub fn count_opt(
        &self,
        store: &MemoryStore,
        cancellation: &CancellationToken,
    ) -> Result<u64, PathError> {
        Ok(self.drain_opt(store, cancellation)?.len() as u64)
    }
}

fn apply_morphism(node: PlanNode, step: &Morphism, ctx: &mut Context) -> PlanNode {
    match step {
        Morphism::Is(values) => PlanNode::And(vec![node, PlanNode::Fixed(values.clone())]),
        Morphism::Tag(names) => PlanNode::Tag {
            sub: Box::new(node),
            names: names.clone(),
        },
        Morphism::Out { predicate, tag } => {
            let projected = project(node, Direction::Subject, Direction::Object, predicate, ctx);
            tag_if(projected, tag)
        }
        Morphism::In { predicate, tag } => {
            let projected = project(node, Direction::Object, Direction::Subject, predicate, ctx);
            tag_if(projected, tag)
        }
        Morphism::Both { predicate } => PlanNode::Or(vec![
            project(node.clone(), Direction::Subject, Direction::Object, predicate, ctx),
            project(node, Direction::Object, Direction::Subject, predicate, ctx),
        ]),
        Morphism::Has { predicate, value } => {
            let qualifying = qualifying_nodes(Direction::Subject, Direction::Object, predicate, value, ctx);
            PlanNode::And(vec![node, qualifying])
        }
        Morphism::HasReverse { predicate, value } => {
            let qualifying = qualifying_nodes(Direction::Object, Direction::Subject, predicate, value, ctx);
            PlanNode::And(vec![node, qualifying])
        }
        Morphism::Save {
            predicate,
            tag,
            reverse,
            optional,
        } => {
            let (anchor, project_dir) = if *reverse {
                (Direction::Object, Direction::Subject)
            } else {
                (Direction::Subject, Direction::Object)
            };
            PlanNode::Save {
                sub: Box::new(node),
                predicate: Some(predicate.clone()),
                anchor,
                project: project_dir,
                tag: tag.clone(),
                optional: *optional,
            }
        }
        Morphism::Follow(other) => fold_sub_path(node, other, ctx.clone()),
        Morphism::FollowReverse(other) => fold_sub_path(node, &other.reverse(), ctx.clone()),
        Morphism::FollowRecursive {
            predicate,
            reverse,
            max_depth,
            tag,
        } => PlanNode::Recursive {
            start: Box::new(node),
            predicate: predicate.clone(),
            reverse: *reverse,
            max_depth: *max_depth,
            depth_tag: tag.clone(),
        },
        Morphism::And(other) => PlanNode::And(vec![node, other.plan()]),
        Morphism::Or(other) => PlanNode::Or(vec![node, other.plan()]),
        Morphism::Except(other) => PlanNode::Except(Box::new(node), Box::new(other.plan())),
        Morphism::Unique => PlanNode::Unique(Box::new(node)),
        Morphism::Limit(n) => PlanNode::Limit(Box::new(node), *n),
        Morphism::Skip(n) => PlanNode::Skip(Box::new(node), *n),
        Morphism::Back(tag) => PlanNode::Back {
            sub: Box::new(node),
            tag: tag.clone(),
        },
        Morphism::Filter(spec) => PlanNode::Filter {
            sub: Box::new(node),
            spec: spec.clone(),
        },
        Morphism::LabelContext(labels) => {
            ctx.labels = Some(labels.clone());
            node
        }
        Morphism::InPredicates => PlanNode::HasA(
            Box::new(PlanNode::LinksTo(Box::new(node), Direction::Object)),
            Direction::Predicate,
        ),
        Morphism::OutPredicates => PlanNode::HasA(
            Box::new(PlanNode::LinksTo(Box::new(node), Direction::Subject)),
            Direction::Predicate,
        ),
        Morphism::Labels => PlanNode::HasA(
            Box::new(PlanNode::LinksTo(Box::new(node), Direction::Subject)),
            Direction::Label,
        ),
        Morphism::SavePredicates { tag, reverse } => {
            let (anchor, project_dir) = if *reverse {
                (Direction::Object, Direction::Predicate)
            } else {
                (Direction::Subject, Direction::Predicate)
            };
            PlanNode::Save {
                sub: Box::new(node),
                predicate: None,
                anchor,
                project: project_dir,
                tag: tag.clone(),
                optional: false,
            }
        }
    }
}

/// Builds the quad-shape for `node --predicate--> *` (or its mirror),
/// restricted to the active label context if one is set, and projects to
/// `project` (the `LinksTo`/`HasA` pair).
fn project(
    node: PlanNode,
    anchor: Direction,
    project_dir: Direction,
    predicate: &Value,
    ctx: &Context,
) -> PlanNode {
    let quads = quad_constraint(node, anchor, predicate, ctx);
    PlanNode::HasA(Box::new(quads), project_dir)
}

fn quad_constraint(node: PlanNode, anchor: Direction, predicate: &Value, ctx: &Context) -> PlanNode {
    let mut subs = vec![
        PlanNode::LinksTo(Box::new(node), anchor),
        PlanNode::LinksTo(Box::new(PlanNode::Fixed(vec![predicate.clone()])), Direction::Predicate),
    ];
    if let Some(labels) = ctx.label_set() {
        subs.push(PlanNode::LinksTo(
            Box::new(PlanNode::Fixed(labels.to_vec())),
            Direction::Label,
        ));
    }
    PlanNode::And(subs)
}

/// The set of nodes at `anchor` for which a quad `anchor--predicate-->value`
/// (projected at the opposite end) exists — used by `has`/`has_reverse`.
fn qualifying_nodes(
    anchor: Direction,
    value_dir: Direction,
    predicate: &Value,
    value: &Value,
    ctx: &Context,
) -> PlanNode {
    let pinned = PlanNode::Fixed(vec![value.clone()]);
    let quads = quad_constraint(pinned, value_dir, predicate, ctx);
    PlanNode::HasA(Box::new(quads), anchor)
}

fn tag_if(node: PlanNode, tag: &Option<String>) -> PlanNode {
    match tag {
        Some(name) => PlanNode::Tag {
            sub: Box::new(node),
            names: vec![name.clone()],
        },
        None => node,
    }
}

fn fold_sub_path(node: PlanNode, other: &Path, mut ctx: Context) -> PlanNode {
    let mut current = node;
    for step in &other.steps {
        current = apply_morphism(current, step, &mut ctx);
    }
    current
}
