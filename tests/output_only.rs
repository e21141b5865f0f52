use crossmatch::config::MatchConfig;
use crossmatch::construct::Constraint;
use crossmatch::engine::MatchEngine;
use crossmatch::memory::MemoryCollection;

fn seasonal_input() -> MemoryCollection {
    MemoryCollection::new(
        "cmip",
        vec![
            Constraint::new("variable", ["tasmax"]),
            Constraint::new("model", ["ACCESS1-0", "MIROC5"]),
            Constraint::new("region", ["AUS"]),
        ],
    )
    .with_record(
        [("variable", "tasmax"), ("model", "ACCESS1-0"), ("region", "AUS")],
        "tasmax_ACCESS1-0.nc",
    )
    .with_record(
        [("variable", "tasmax"), ("model", "MIROC5"), ("region", "AUS")],
        "tasmax_MIROC5.nc",
    )
}

fn threshold_output() -> MemoryCollection {
    MemoryCollection::new(
        "exceedance",
        vec![
            Constraint::placeholder("variable"),
            Constraint::placeholder("model"),
            Constraint::new("threshold", ["10", "20"]),
        ],
    )
}

#[test]
fn output_only_values_are_enumerated() {
    let inputs = vec![seasonal_input()];
    let outputs = vec![threshold_output()];
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    let results: Vec<_> = engine.pass().collect();
    // two models crossed with two thresholds
    assert_eq!(results.len(), 4);

    let mut pairs: Vec<(String, String)> = results
        .iter()
        .map(|r| {
            (
                r.resolved.get("model").unwrap().clone(),
                r.resolved.get("threshold").unwrap().clone(),
            )
        })
        .collect();
    pairs.sort_unstable();
    assert_eq!(
        pairs,
        [
            ("ACCESS1-0".to_owned(), "10".to_owned()),
            ("ACCESS1-0".to_owned(), "20".to_owned()),
            ("MIROC5".to_owned(), "10".to_owned()),
            ("MIROC5".to_owned(), "20".to_owned()),
        ]
    );
}

#[test]
fn every_result_binds_every_output_only_key() {
    let inputs = vec![seasonal_input()];
    let outputs = vec![threshold_output()];
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    let threshold = Constraint::new("threshold", ["10", "20"]);
    for result in engine.pass() {
        let value = result.resolved.get("threshold").expect("threshold must be bound");
        assert!(threshold.allows(value));
        // the input-only attribute rides along in every result
        assert_eq!(result.resolved.get("region").map(String::as_str), Some("AUS"));
    }
}

#[test]
fn output_only_values_reach_the_resolved_file_reference() {
    let inputs = vec![seasonal_input()];
    let outputs = vec![threshold_output()];
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    let mut references: Vec<String> =
        engine.pass().flat_map(|r| r.outputs.into_iter().flatten()).collect();
    references.sort_unstable();
    assert_eq!(references.len(), 4);
    assert!(references[0].starts_with("exceedance/"));
    assert!(references.iter().any(|r| r.contains("threshold-10")));
    assert!(references.iter().any(|r| r.contains("threshold-20")));
}

#[test]
fn results_differing_only_by_threshold_share_their_input_group() {
    let inputs = vec![seasonal_input()];
    let outputs = vec![threshold_output()];
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    let results: Vec<_> = engine.pass().collect();
    let mut miroc: Vec<_> = results
        .iter()
        .filter(|r| r.resolved.get("model").map(String::as_str) == Some("MIROC5"))
        .collect();
    assert_eq!(miroc.len(), 2);
    let first = miroc.pop().unwrap();
    let second = miroc.pop().unwrap();
    assert_eq!(first.inputs, second.inputs);
}
