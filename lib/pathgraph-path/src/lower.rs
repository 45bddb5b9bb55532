use pathgraph_model::{CancellationToken, Direction};
use pathgraph_iter::combinator::{
    AndIterator, BackIterator, ExceptIterator, FilterIterator, HasAIterator, LinksToIterator,
    OrIterator, RecursiveIterator, SaveIterator, StepFn, TagIterator, UniqueIterator,
    LimitIterator, SkipIterator,
};
use pathgraph_iter::primitive::{AllIterator, FixedIterator, IndexScanIterator, NullIterator};
use pathgraph_iter::{QueryIter, Ref, Tagger};
use pathgraph_store::MemoryStore;

use crate::plan::{FilterSpec, PlanNode};

/// Maps an optimized [`PlanNode`] onto its `pathgraph-iter` iterator tree.
/// Always operates on an already-optimized tree, never the reverse. A
/// `Value` that never made it into the store (`store.value_of` returns `0`)
/// lowers to an empty
/// source rather than failing — matching a store lookup miss at every other
/// layer of this crate.
///
/// `cancellation` is cloned into every `AllIterator`/`RecursiveIterator` the
/// tree contains; a combinator built on top observes cancellation indirectly,
/// once the scanner beneath it latches an error and starts returning `false`.
pub fn lower(
    store: &MemoryStore,
    node: &PlanNode,
    cancellation: &CancellationToken,
) -> Box<dyn QueryIter> {
    match node {
        PlanNode::AllNodes => {
            Box::new(AllIterator::nodes(store).with_cancellation(cancellation.clone()))
        }
        PlanNode::AllQuads => {
            Box::new(AllIterator::quads(store).with_cancellation(cancellation.clone()))
        }
        PlanNode::Fixed(values) => Box::new(FixedIterator::new(fixed_refs(store, values))),
        PlanNode::And(subs) => {
            AndIterator::new(subs.iter().map(|s| lower(store, s, cancellation)).collect())
        }
        PlanNode::Or(subs) => {
            OrIterator::new(subs.iter().map(|s| lower(store, s, cancellation)).collect())
        }
        PlanNode::Except(universe, exclude) => Box::new(ExceptIterator::new(
            lower(store, universe, cancellation),
            lower(store, exclude, cancellation),
        )),
        PlanNode::Unique(sub) => Box::new(UniqueIterator::new(lower(store, sub, cancellation))),
        PlanNode::Limit(sub, n) => {
            Box::new(LimitIterator::new(lower(store, sub, cancellation), *n))
        }
        PlanNode::Skip(sub, n) => {
            Box::new(SkipIterator::new(lower(store, sub, cancellation), *n))
        }
        PlanNode::LinksTo(sub, dir) => {
            Box::new(LinksToIterator::new(store, lower(store, sub, cancellation), *dir))
        }
        PlanNode::HasA(sub, dir) => {
            Box::new(HasAIterator::new(store, lower(store, sub, cancellation), *dir))
        }
        PlanNode::Recursive {
            start,
            predicate,
            reverse,
            max_depth,
            depth_tag,
        } => {
            let start_iter = lower(store, start, cancellation);
            let step = predicate_step(store, predicate, *reverse);
            Box::new(RecursiveIterator::new(
                start_iter,
                step,
                *max_depth,
                depth_tag.clone(),
                cancellation.clone(),
            ))
        }
        PlanNode::Save {
            sub,
            predicate,
            anchor,
            project,
            tag,
            optional,
        } => {
            let predicate_id = predicate.as_ref().map(|p| store.value_of(p));
            Box::new(SaveIterator::new(
                store,
                lower(store, sub, cancellation),
                predicate_id,
                *anchor,
                *project,
                tag.clone(),
                *optional,
            ))
        }
        PlanNode::Tag { sub, names } => Box::new(TagIterator::new(
            lower(store, sub, cancellation),
            Tagger::new(names.clone()),
        )),
        PlanNode::Filter { sub, spec } => match spec {
            FilterSpec::Regex(pattern) => Box::new(
                FilterIterator::regex(store, lower(store, sub, cancellation), pattern)
                    .expect("pattern validated at Path::filter_regex"),
            ),
            FilterSpec::Compare(comparator, reference) => Box::new(FilterIterator::compare(
                store,
                lower(store, sub, cancellation),
                *comparator,
                reference.clone(),
            )),
        },
        PlanNode::Back { sub, tag } => {
            Box::new(BackIterator::new(lower(store, sub, cancellation), tag.clone()))
        }
    }
}

fn fixed_refs(store: &MemoryStore, values: &[pathgraph_model::Value]) -> Vec<Ref> {
    values
        .iter()
        .filter_map(|v| {
            let id = store.value_of(v);
            (id != 0).then_some(Ref::Node(id))
        })
        .collect()
}

/// Builds the `StepFn` a recursive closure uses to find a node's neighbors
/// across one `predicate` edge, reusing the same `And`/`LinksTo`/`HasA`
/// composition `out`/`in` lower to rather than a dedicated step iterator.
fn predicate_step(store: &MemoryStore, predicate: &pathgraph_model::Value, reverse: bool) -> StepFn {
    let store = store.clone();
    let predicate_id = store.value_of(predicate);
    let (anchor, project) = if reverse {
        (Direction::Object, Direction::Subject)
    } else {
        (Direction::Subject, Direction::Object)
    };
    Box::new(move |r: Ref| -> Box<dyn QueryIter> {
        let Ref::Node(node_id) = r else {
            return Box::new(NullIterator::new());
        };
        let anchored = LinksToIterator::new(
            &store,
            Box::new(FixedIterator::singleton(Ref::Node(node_id))),
            anchor,
        );
        let matching_predicate = IndexScanIterator::new(&store, Direction::Predicate, predicate_id);
        let filtered = AndIterator::new(vec![Box::new(anchored), Box::new(matching_predicate)]);
        Box::new(HasAIterator::new(&store, filtered, project))
    })
}
