use crate::plan::PlanNode;

/// A local, rule-based rewrite over [`PlanNode`]s.
///
/// Runs bottom-up, repeating passes until a round makes no change or
/// [`MAX_PASSES`] is reached. Rewriting never changes observable semantics,
/// only the shape (and so the cost) of the tree that gets lowered.
const MAX_PASSES: u32 = 8;

/// Optimizes `node`, returning the rewritten tree and whether anything
/// changed.
pub fn optimize(node: &PlanNode) -> (PlanNode, bool) {
    let mut current = node.clone();
    let mut changed_overall = false;
    for _ in 0..MAX_PASSES {
        let (next, changed) = pass(&current);
        current = next;
        if !changed {
            break;
        }
        changed_overall = true;
    }
    (current, changed_overall)
}

fn pass(node: &PlanNode) -> (PlanNode, bool) {
    let (node, children_changed) = rewrite_children(node);
    let (node, rule_changed) = apply_rules(node);
    (node, children_changed || rule_changed)
}

fn rewrite_children(node: &PlanNode) -> (PlanNode, bool) {
    let mut changed = false;
    let rewritten = match node.clone() {
        PlanNode::And(subs) => PlanNode::And(rewrite_all(subs, &mut changed)),
        PlanNode::Or(subs) => PlanNode::Or(rewrite_all(subs, &mut changed)),
        PlanNode::Except(universe, exclude) => {
            let (u, c1) = pass(&universe);
            let (e, c2) = pass(&exclude);
            changed |= c1 || c2;
            PlanNode::Except(Box::new(u), Box::new(e))
        }
        PlanNode::Unique(sub) => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::Unique(Box::new(s))
        }
        PlanNode::Limit(sub, n) => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::Limit(Box::new(s), n)
        }
        PlanNode::Skip(sub, n) => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::Skip(Box::new(s), n)
        }
        PlanNode::LinksTo(sub, dir) => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::LinksTo(Box::new(s), dir)
        }
        PlanNode::HasA(sub, dir) => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::HasA(Box::new(s), dir)
        }
        PlanNode::Tag { sub, names } => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::Tag {
                sub: Box::new(s),
                names,
            }
        }
        PlanNode::Filter { sub, spec } => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::Filter {
                sub: Box::new(s),
                spec,
            }
        }
        PlanNode::Back { sub, tag } => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::Back {
                sub: Box::new(s),
                tag,
            }
        }
        PlanNode::Save {
            sub,
            predicate,
            anchor,
            project,
            tag,
            optional,
        } => {
            let (s, c) = pass(&sub);
            changed |= c;
            PlanNode::Save {
                sub: Box::new(s),
                predicate,
                anchor,
                project,
                tag,
                optional,
            }
        }
        PlanNode::Recursive {
            start,
            predicate,
            reverse,
            max_depth,
            depth_tag,
        } => {
            let (s, c) = pass(&start);
            changed |= c;
            PlanNode::Recursive {
                start: Box::new(s),
                predicate,
                reverse,
                max_depth,
                depth_tag,
            }
        }
        leaf => leaf,
    };
    (rewritten, changed)
}

fn rewrite_all(subs: Vec<PlanNode>, changed: &mut bool) -> Vec<PlanNode> {
    subs.into_iter()
        .map(|s| {
            let (rewritten, c) = pass(&s);
            *changed |= c;
            rewritten
        })
        .collect()
}

fn apply_rules(node: PlanNode) -> (PlanNode, bool) {
    match node {
        // `And(..., AllNodes, ...)` drops the AllNodes child — an
        // unconstrained universe never narrows an intersection.
        PlanNode::And(subs) if subs.len() > 1 && subs.iter().any(|s| *s == PlanNode::AllNodes) => {
            let filtered: Vec<_> = subs.into_iter().filter(|s| *s != PlanNode::AllNodes).collect();
            if filtered.is_empty() {
                (PlanNode::AllNodes, true)
            } else {
                (collapse_and(filtered), true)
            }
        }
        // `And(S) ≡ S`; `Or(S) ≡ S`.
        PlanNode::And(subs) if subs.len() == 1 => {
            (subs.into_iter().next().expect("len checked above"), true)
        }
        PlanNode::Or(subs) if subs.len() == 1 => {
            (subs.into_iter().next().expect("len checked above"), true)
        }
        // `HasA(LinksTo(x, d), d)` is a no-op round-trip.
        PlanNode::HasA(sub, dir) => match *sub {
            PlanNode::LinksTo(inner, links_dir) if links_dir == dir => (*inner, true),
            other => (PlanNode::HasA(Box::new(other), dir), false),
        },
        // `Unique(Unique(x)) ≡ Unique(x)`; `Unique` over an already-unique
        // primitive source is a no-op.
        PlanNode::Unique(sub) => match *sub {
            PlanNode::Unique(inner) => (PlanNode::Unique(inner), true),
            PlanNode::AllNodes => (PlanNode::AllNodes, true),
            PlanNode::AllQuads => (PlanNode::AllQuads, true),
            other => (PlanNode::Unique(Box::new(other)), false),
        },
        other => (other, false),
    }
}

fn collapse_and(mut subs: Vec<PlanNode>) -> PlanNode {
    if subs.len() == 1 {
        subs.pop().expect("len checked above")
    } else {
        PlanNode::And(subs)
    }
}
