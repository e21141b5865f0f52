use crossmatch::config::MatchConfig;
use crossmatch::construct::Constraint;
use crossmatch::engine::MatchEngine;
use crossmatch::memory::MemoryCollection;

fn setup() -> (Vec<MemoryCollection>, Vec<MemoryCollection>) {
    // log output is handy when a pass misbehaves: RUST_LOG=debug cargo test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let inputs = vec![MemoryCollection::new(
        "cmip",
        vec![
            Constraint::new("variable", ["tas", "pr"]),
            Constraint::new("model", ["A", "B"]),
        ],
    )
    .with_record([("variable", "tas"), ("model", "A")], "tas_A.nc")
    .with_record([("variable", "tas"), ("model", "B")], "tas_B.nc")
    .with_record([("variable", "pr"), ("model", "A")], "pr_A.nc")];
    let outputs = vec![MemoryCollection::new(
        "processed",
        vec![Constraint::placeholder("variable"), Constraint::placeholder("model")],
    )];
    (inputs, outputs)
}

#[test]
fn a_second_pass_starts_from_a_clean_seen_set() {
    let (inputs, outputs) = setup();
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    let first: Vec<_> = engine.pass().collect();
    let second: Vec<_> = engine.pass().collect();
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
}

#[test]
fn interleaved_passes_do_not_interfere() {
    let (inputs, outputs) = setup();
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    let mut one = engine.pass();
    let mut two = engine.pass();
    let mut from_one = Vec::new();
    let mut from_two = Vec::new();
    loop {
        let a = one.next();
        let b = two.next();
        if a.is_none() && b.is_none() {
            break;
        }
        from_one.extend(a);
        from_two.extend(b);
    }
    assert_eq!(from_one.len(), 3);
    assert_eq!(from_two.len(), 3);
}

#[test]
fn an_abandoned_pass_leaves_the_engine_usable() {
    let (inputs, outputs) = setup();
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    {
        let mut partial = engine.pass();
        let _ = partial.next();
        // dropped mid-pass
    }
    assert_eq!(engine.pass().count(), 3);
}

#[test]
fn results_are_deterministic_across_passes() {
    let (inputs, outputs) = setup();
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    let first: Vec<String> = engine.pass().map(|r| r.resolved.to_string()).collect();
    let second: Vec<String> = engine.pass().map(|r| r.resolved.to_string()).collect();
    assert_eq!(first, second);
}
