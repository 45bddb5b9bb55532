//! End-to-end scenarios over the canonical social-graph fixture:
//!
//! ```text
//! <alice> <follows> <bob>
//! <charlie> <follows> <bob>
//! <charlie> <follows> <dani>
//! <dani> <follows> <bob>
//! <bob> <follows> <fred>
//! <fred> <follows> <greg>
//! <dani> <follows> <greg>
//! <emily> <follows> <fred>
//! <bob> <status> "cool" <status_graph>
//! <dani> <status> "cool" <status_graph>
//! <greg> <status> "cool" <status_graph>
//! ```

use pathgraph_model::{CancellationToken, Quad, Value};
use pathgraph_path::Path;
use pathgraph_store::{MemoryStore, QuadStore};

fn iri(name: &str) -> Value {
    Value::iri(format!("http://example.test/{name}"))
}

struct Fixture {
    store: MemoryStore,
    emily_follows_fred: i64,
}

fn seed() -> Fixture {
    let store = MemoryStore::new();
    let follows = iri("follows");
    let status = iri("status");
    let status_graph = iri("status_graph");

    store.add_quad(Quad::triple(iri("alice"), follows.clone(), iri("bob")));
    store.add_quad(Quad::triple(iri("charlie"), follows.clone(), iri("bob")));
    store.add_quad(Quad::triple(iri("charlie"), follows.clone(), iri("dani")));
    store.add_quad(Quad::triple(iri("dani"), follows.clone(), iri("bob")));
    store.add_quad(Quad::triple(iri("bob"), follows.clone(), iri("fred")));
    store.add_quad(Quad::triple(iri("fred"), follows.clone(), iri("greg")));
    store.add_quad(Quad::triple(iri("dani"), follows.clone(), iri("greg")));
    let (emily_follows_fred, _) =
        store.add_quad(Quad::triple(iri("emily"), follows.clone(), iri("fred")));

    store.add_quad(Quad::new(
        iri("bob"),
        status.clone(),
        Value::plain("cool"),
        Some(status_graph.clone()),
    ));
    store.add_quad(Quad::new(
        iri("dani"),
        status.clone(),
        Value::plain("cool"),
        Some(status_graph.clone()),
    ));
    store.add_quad(Quad::new(
        iri("greg"),
        status,
        Value::plain("cool"),
        Some(status_graph),
    ));

    Fixture {
        store,
        emily_follows_fred,
    }
}

fn node_results(store: &MemoryStore, path: &Path) -> Vec<Value> {
    let mut values: Vec<Value> = path
        .drain(store)
        .expect("drain")
        .into_iter()
        .filter(|r| r.is_node())
        .map(|r| store.name_of(r.id()))
        .collect();
    values.sort();
    values
}

fn sorted(mut values: Vec<Value>) -> Vec<Value> {
    values.sort();
    values
}

#[test]
fn scenario_1_out_follows() {
    let Fixture { store, .. } = seed();
    let path = Path::start_fixed([iri("alice")]).out(iri("follows"));
    assert_eq!(node_results(&store, &path), vec![iri("bob")]);
}

#[test]
fn scenario_2_in_follows() {
    let Fixture { store, .. } = seed();
    let path = Path::start_fixed([iri("bob")]).r#in(iri("follows"));
    assert_eq!(
        node_results(&store, &path),
        sorted(vec![iri("alice"), iri("charlie"), iri("dani")])
    );
}

#[test]
fn scenario_3_has_status_cool() {
    let Fixture { store, .. } = seed();
    let path = Path::start_nodes().has(iri("status"), Value::plain("cool"));
    assert_eq!(
        node_results(&store, &path),
        sorted(vec![iri("bob"), iri("dani"), iri("greg")])
    );
}

#[test]
fn scenario_4_follow_two_hop_morphism() {
    let Fixture { store, .. } = seed();
    let two_hops = Path::start_nodes()
        .out(iri("follows"))
        .out(iri("follows"));
    let path = Path::start_fixed([iri("charlie")]).follow(two_hops);
    assert_eq!(
        node_results(&store, &path),
        sorted(vec![iri("bob"), iri("fred"), iri("greg")])
    );
}

#[test]
fn scenario_5_except() {
    let Fixture { store, .. } = seed();
    let path = Path::start_fixed([iri("alice"), iri("bob")])
        .except(Path::start_fixed([iri("alice")]));
    assert_eq!(node_results(&store, &path), vec![iri("bob")]);
}

#[test]
fn scenario_6_back_through_tag() {
    let Fixture { store, .. } = seed();
    let path = Path::start_fixed([iri("bob")])
        .r#in(iri("follows"))
        .tag(["foo"])
        .out(iri("status"))
        .is([Value::plain("cool")])
        .back("foo");
    assert_eq!(node_results(&store, &path), vec![iri("dani")]);
}

#[test]
fn scenario_7_deleted_edge_yields_nothing() {
    let Fixture {
        store,
        emily_follows_fred,
    } = seed();
    assert!(store.delete_quad(emily_follows_fred));
    let path = Path::start_fixed([iri("emily")]).out(iri("follows"));
    assert!(node_results(&store, &path).is_empty());
}

#[test]
fn limit_zero_yields_nothing() {
    let Fixture { store, .. } = seed();
    let path = Path::start_nodes().out(iri("follows")).limit(0);
    assert!(node_results(&store, &path).is_empty());
}

#[test]
fn skip_zero_is_identity() {
    let Fixture { store, .. } = seed();
    let without_skip = node_results(&store, &Path::start_fixed([iri("alice")]).out(iri("follows")));
    let with_skip = node_results(
        &store,
        &Path::start_fixed([iri("alice")]).out(iri("follows")).skip(0),
    );
    assert_eq!(without_skip, with_skip);
}

#[test]
fn unique_over_unique_is_idempotent() {
    let Fixture { store, .. } = seed();
    let once = node_results(&store, &Path::start_nodes().out(iri("follows")).unique());
    let twice = node_results(
        &store,
        &Path::start_nodes().out(iri("follows")).unique().unique(),
    );
    assert_eq!(once, twice);
}

#[test]
fn follow_recursive_reaches_transitive_followers() {
    let Fixture { store, .. } = seed();
    let path = Path::start_fixed([iri("charlie")]).follow_recursive(iri("follows"), None);
    let results = node_results(&store, &path);
    assert!(results.contains(&iri("bob")));
    assert!(results.contains(&iri("dani")));
    assert!(results.contains(&iri("fred")));
    assert!(results.contains(&iri("greg")));
    // the start node itself is depth 0 of its own fixed-point closure.
    assert!(results.contains(&iri("charlie")));
}

#[test]
fn empty_store_yields_no_results_and_no_errors() {
    let store = MemoryStore::new();
    let path = Path::start_nodes().out(iri("follows"));
    assert!(path.drain(&store).expect("drain").is_empty());
}

#[test]
fn precancelled_token_yields_a_cancelled_error() {
    let Fixture { store, .. } = seed();
    let path = Path::start_fixed([iri("charlie")]).follow_recursive(iri("follows"), None);
    let token = CancellationToken::new();
    token.cancel();
    let err = path
        .drain_opt(&store, &token)
        .expect_err("a precancelled token must abort the scan");
    assert!(matches!(
        err,
        pathgraph_path::PathError::Iter(pathgraph_iter::IterError::Cancelled)
    ));
}
