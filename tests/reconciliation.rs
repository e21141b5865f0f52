use crossmatch::config::{AmbiguityPolicy, MatchConfig};
use crossmatch::construct::Constraint;
use crossmatch::engine::MatchEngine;
use crossmatch::error::MatchError;
use crossmatch::memory::MemoryCollection;

fn input(name: &str, constraints: Vec<Constraint>) -> MemoryCollection {
    MemoryCollection::new(name, constraints)
}

#[test]
fn constraints_are_reconciled_across_input_collections() {
    let inputs = vec![
        input("cmip5", vec![Constraint::new("model", ["A", "B"])]),
        input("cordex", vec![Constraint::new("model", ["B", "C"])]),
    ];
    let outputs = vec![input("out", vec![Constraint::placeholder("model")])];
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    assert_eq!(
        engine.input_constraints().get("model").unwrap(),
        &Constraint::new("model", ["B"])
    );
    assert_eq!(
        engine.output_constraints().get("model").unwrap(),
        &Constraint::new("model", ["B"])
    );
}

#[test]
fn disjoint_input_domains_fail_construction() {
    let inputs = vec![
        input("cmip5", vec![Constraint::new("model", ["A"])]),
        input("cordex", vec![Constraint::new("model", ["B"])]),
    ];
    let outputs = vec![input("out", vec![Constraint::placeholder("model")])];
    let err = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap_err();
    assert!(matches!(err, MatchError::EmptyConstraint(key) if key == "model"));
}

#[test]
fn declared_empty_input_constraint_fails_construction() {
    let inputs = vec![input("cmip5", vec![Constraint::new("model", Vec::<String>::new())])];
    let outputs: Vec<MemoryCollection> = vec![input("out", Vec::new())];
    let err = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap_err();
    assert!(matches!(err, MatchError::EmptyConstraint(_)));
}

#[test]
fn placeholder_without_matching_input_fails_construction() {
    let inputs = vec![input("cmip5", vec![Constraint::new("model", ["A"])])];
    let outputs = vec![input("out", vec![Constraint::placeholder("threshold")])];
    let err = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap_err();
    assert!(matches!(err, MatchError::UnresolvedOutputConstraint(key) if key == "threshold"));
}

#[test]
fn ambiguous_input_only_attribute_fails_by_default() {
    let inputs = vec![input(
        "cmip5",
        vec![
            Constraint::new("model", ["A"]),
            Constraint::new("region", ["AUS", "NZ"]),
        ],
    )];
    let outputs = vec![input("out", vec![Constraint::placeholder("model")])];
    let err = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        MatchError::AmbiguousInputOnly { ref key, candidates: 2 } if key == "region"
    ));

    // the smallest-value tie-break accepts the same declarations
    let config = MatchConfig::new().with_ambiguity(AmbiguityPolicy::SmallestValue);
    let engine = MatchEngine::new(&inputs, &outputs, config).unwrap();
    assert_eq!(engine.input_only().get("region").map(String::as_str), Some("AUS"));
}

#[test]
fn classification_is_exposed_on_the_engine() {
    let inputs = vec![input(
        "cmip5",
        vec![
            Constraint::new("model", ["A", "B"]),
            Constraint::new("region", ["AUS"]),
        ],
    )];
    let outputs = vec![input(
        "out",
        vec![
            Constraint::placeholder("model"),
            Constraint::new("threshold", ["10", "20"]),
        ],
    )];
    let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
    assert!(engine.shared_constraints().contains_key("model"));
    assert!(engine.shared_constraints().contains_key("threshold"));
    assert!(engine.output_only().contains_key("threshold"));
    assert_eq!(engine.input_only().get("region").map(String::as_str), Some("AUS"));
    assert!(!engine.shared_constraints().contains_key("region"));
}
