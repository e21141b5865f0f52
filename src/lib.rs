//! Crossmatch – a constraint-matching engine for file-based data
//! pipelines.
//!
//! A pipeline stage declares "for every combination of these attributes,
//! transform these input files into this output file". Crossmatch turns
//! that declaration into concrete work items:
//! * A [`construct::Constraint`] is a named attribute restricted to a set
//!   of allowed values (e.g. `model={ACCESS1-0,MIROC5}`).
//! * A [`construct::Combination`] is a duplicate-key-free set of
//!   constraints, one concrete point in the attribute space.
//! * A [`collection::FileCollection`] describes its files through
//!   constraints and answers file queries; it is the only thing the
//!   engine knows about storage.
//! * The [`engine::MatchEngine`] reconciles the constraint declarations
//!   of all input and output collections once, classifies every attribute
//!   as shared, input-only or output-only, and then enumerates matching
//!   results lazily through [`engine::MatchPass`].
//!
//! ## Modules
//! * [`construct`] – Constraint, combination, constraint set and
//!   assignment value types.
//! * [`collection`] – The [`collection::FileCollection`] trait and the
//!   attribute name mapping.
//! * [`reconcile`] – One-time reconciliation and classification of
//!   constraint declarations.
//! * [`engine`] – The matching engine and its pass iterator.
//! * [`config`] – Engine configuration (name mapping, ambiguity policy).
//! * [`memory`] – An in-memory collection for tests and small catalogs.
//! * [`error`] – The error taxonomy; only construction can fail.
//!
//! ## Matching model
//! Each pass walks the union of the input collections' valid
//! combinations, extended with every value of each output-only attribute.
//! A candidate combination is projected onto the shared attribute keys,
//! deduplicated against the pass's seen-set, gated on every input
//! collection holding matching files, and finally resolved against the
//! output collections. Results pair the input file groups with the
//! output file groups and carry the resolved attribute values, including
//! the fixed input-only ones.
//!
//! ## Quick Start
//! ```
//! use crossmatch::config::MatchConfig;
//! use crossmatch::construct::Constraint;
//! use crossmatch::engine::MatchEngine;
//! use crossmatch::memory::MemoryCollection;
//!
//! let inputs = vec![MemoryCollection::new(
//!     "cmip",
//!     vec![
//!         Constraint::new("variable", ["tas"]),
//!         Constraint::new("model", ["ACCESS1-0", "MIROC5"]),
//!     ],
//! )
//! .with_record([("variable", "tas"), ("model", "ACCESS1-0")], "tas_ACCESS1-0.nc")
//! .with_record([("variable", "tas"), ("model", "MIROC5")], "tas_MIROC5.nc")];
//!
//! let outputs = vec![MemoryCollection::new(
//!     "processed",
//!     vec![
//!         // placeholders inherit their domain from the input side
//!         Constraint::placeholder("variable"),
//!         Constraint::placeholder("model"),
//!     ],
//! )];
//!
//! let engine = MatchEngine::new(&inputs, &outputs, MatchConfig::default()).unwrap();
//! let results: Vec<_> = engine.pass().collect();
//! assert_eq!(results.len(), 2);
//! for result in &results {
//!     assert_eq!(result.inputs.len(), 1);
//!     assert_eq!(result.outputs.len(), 1);
//!     assert!(result.resolved.contains_key("model"));
//! }
//! ```
//!
//! ## Scope
//! The engine performs no file I/O and never decides whether a file
//! exists; both are the collections' concern. Scheduling and executing
//! the transformations a result describes belongs to the surrounding
//! pipeline tool.

pub mod collection;
pub mod config;
pub mod construct;
pub mod engine;
pub mod error;
pub mod memory;
pub mod reconcile;
