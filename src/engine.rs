//! The matching engine: pairs input file groups with output file groups
//! for every valid attribute combination.
//!
//! Construction reconciles and classifies the constraint declarations of
//! all collections once; afterwards the engine is immutable. Results are
//! pulled from an explicit pass object, so several independent passes can
//! walk the same engine without interfering with each other.

use std::collections::HashSet;

// already-processed assignment signatures are u64 hashes, kept in a
// roaring bitmap per pass
use roaring::RoaringTreemap;
use tracing::debug;

use crate::collection::FileCollection;
use crate::config::MatchConfig;
use crate::construct::{Assignment, AttributeName, Combination, Constraint, ConstraintSet, KeyHasher, Value};
use crate::error::Result;
use crate::reconcile::{classify, reconcile, Classification};

/// One matched result: the per-input-collection file groups, the
/// per-output-collection file groups, and the fully resolved
/// `attribute -> value` mapping they correspond to.
#[derive(Clone, Debug, PartialEq)]
pub struct Match<F> {
    pub inputs: Vec<Vec<F>>,
    pub outputs: Vec<Vec<F>>,
    pub resolved: Assignment,
}

// ------------- MatchEngine -------------
/// Compares one or more input collections with one or more output
/// collections and enumerates, lazily, every pairing of input files and
/// output files that shares a valid attribute combination.
#[derive(Debug)]
pub struct MatchEngine<'c, I, O>
where
    I: FileCollection,
    O: FileCollection<File = I::File>,
{
    inputs: &'c [I],
    outputs: &'c [O],
    config: MatchConfig,
    input_constraints: ConstraintSet,
    output_constraints: ConstraintSet,
    classification: Classification,
}

impl<'c, I, O> MatchEngine<'c, I, O>
where
    I: FileCollection,
    O: FileCollection<File = I::File>,
{
    /// Gathers the constraint declarations of every collection,
    /// reconciles them and classifies the attribute keys. Misconfigured
    /// constraint sets are rejected here, before any combination is
    /// enumerated.
    pub fn new(inputs: &'c [I], outputs: &'c [O], config: MatchConfig) -> Result<Self> {
        let raw_inputs: Vec<Constraint> =
            inputs.iter().flat_map(|collection| collection.constraints()).collect();
        let raw_outputs: Vec<Constraint> =
            outputs.iter().flat_map(|collection| collection.constraints()).collect();
        debug!(
            inputs = raw_inputs.len(),
            outputs = raw_outputs.len(),
            "collected raw constraint declarations"
        );

        let (input_constraints, output_constraints) = reconcile(raw_inputs, raw_outputs)?;
        let classification = classify(
            &input_constraints,
            &output_constraints,
            &config.name_map,
            config.ambiguity,
        )?;

        Ok(Self {
            inputs,
            outputs,
            config,
            input_constraints,
            output_constraints,
            classification,
        })
    }

    pub fn input_constraints(&self) -> &ConstraintSet {
        &self.input_constraints
    }
    pub fn output_constraints(&self) -> &ConstraintSet {
        &self.output_constraints
    }
    /// Attributes present on both sides, including the promoted
    /// output-only attributes and the mapped input attributes.
    pub fn shared_constraints(&self) -> &ConstraintSet {
        &self.classification.shared
    }
    /// The fixed values of the attributes only the input side knows.
    pub fn input_only(&self) -> &Assignment {
        &self.classification.input_only
    }
    pub fn output_only(&self) -> &ConstraintSet {
        &self.classification.output_only
    }
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Begins a fresh pass over the combination space.
    ///
    /// The pass owns its own cursor and seen-set; dropping it, or running
    /// several at once, leaves the engine untouched. The base sequence is
    /// the deduplicating union of every input collection's valid
    /// combinations, re-derived at the start of each pass.
    pub fn pass(&self) -> MatchPass<'_, 'c, I, O> {
        let mut seen: HashSet<Combination, KeyHasher> = HashSet::default();
        let mut base = Vec::new();
        for collection in self.inputs {
            for combination in collection.valid_combinations() {
                if seen.insert(combination.clone()) {
                    base.push(combination);
                }
            }
        }
        debug!(combinations = base.len(), "starting a new matching pass");
        MatchPass {
            engine: self,
            cursor: CombinationCursor::new(base, &self.classification.output_only),
            done: RoaringTreemap::new(),
        }
    }

    /// Projects a candidate combination onto the shared attribute keys,
    /// narrowing each constraint to its single deterministic value.
    fn project(&self, combination: &Combination) -> Assignment {
        let mut assignment = Assignment::new();
        for constraint in combination.constraints() {
            if !self.classification.shared.contains_key(constraint.key()) {
                continue;
            }
            let Some(value) = constraint.smallest() else {
                continue;
            };
            if constraint.cardinality() > 1 {
                // valid combinations are expected to be attribute-singular
                debug!(
                    key = constraint.key(),
                    "combination constraint carries several values, taking the smallest"
                );
            }
            assignment.insert(constraint.key().to_owned(), value.clone());
        }
        assignment
    }
}

// ------------- CombinationCursor -------------
/// Walks the candidate combinations of one pass: every base combination,
/// crossed with one singleton constraint per output-only attribute when
/// any exist. Odometer-style, lazy and finite.
struct CombinationCursor {
    base: Vec<Combination>,
    extras: Vec<(AttributeName, Vec<Value>)>,
    base_idx: usize,
    odometer: Vec<usize>,
    exhausted: bool,
}

impl CombinationCursor {
    fn new(base: Vec<Combination>, output_only: &ConstraintSet) -> Self {
        let mut extras: Vec<(AttributeName, Vec<Value>)> = output_only
            .iter()
            .map(|c| (c.key().to_owned(), c.values().iter().cloned().collect()))
            .collect();
        // sorted by key so that enumeration order is stable
        extras.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        let exhausted = base.is_empty() || extras.iter().any(|(_, values)| values.is_empty());
        let odometer = vec![0; extras.len()];
        Self { base, extras, base_idx: 0, odometer, exhausted }
    }

    fn advance(&mut self) {
        for i in (0..self.extras.len()).rev() {
            self.odometer[i] += 1;
            if self.odometer[i] < self.extras[i].1.len() {
                return;
            }
            self.odometer[i] = 0;
        }
        // every extra wheel wrapped around (or there are none)
        self.base_idx += 1;
        if self.base_idx >= self.base.len() {
            self.exhausted = true;
        }
    }
}

impl Iterator for CombinationCursor {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        loop {
            if self.exhausted {
                return None;
            }
            let singles: Vec<Constraint> = self
                .extras
                .iter()
                .zip(&self.odometer)
                .map(|((key, values), &i)| Constraint::single(key.clone(), values[i].clone()))
                .collect();
            let candidate = self.base[self.base_idx].merge(singles);
            self.advance();
            match candidate {
                Some(combination) => return Some(combination),
                None => {
                    // a base combination already claiming an output-only
                    // key cannot be extended; skip it
                    debug!("skipping a combination that collides with an output-only key");
                }
            }
        }
    }
}

// ------------- MatchPass -------------
/// One iteration pass over the combination space. Each `next` advances
/// until a fully resolved result is produced or the candidates run out.
pub struct MatchPass<'e, 'c, I, O>
where
    I: FileCollection,
    O: FileCollection<File = I::File>,
{
    engine: &'e MatchEngine<'c, I, O>,
    cursor: CombinationCursor,
    done: RoaringTreemap,
}

impl<'e, 'c, I, O> Iterator for MatchPass<'e, 'c, I, O>
where
    I: FileCollection,
    O: FileCollection<File = I::File>,
{
    type Item = Match<I::File>;

    fn next(&mut self) -> Option<Match<I::File>> {
        while let Some(combination) = self.cursor.next() {
            let assignment = self.engine.project(&combination);
            let signature = assignment.signature();
            if self.done.contains(signature) {
                debug!(assignment = %assignment, "assignment already processed in this pass");
                continue;
            }

            // every input collection must hold files for the assignment
            // before any output is sought
            let mut input_groups = Vec::with_capacity(self.engine.inputs.len());
            let mut all_inputs_present = true;
            for collection in self.engine.inputs {
                let files = collection.matching_files(&assignment);
                if files.is_empty() {
                    all_inputs_present = false;
                    break;
                }
                input_groups.push(files);
            }
            self.done.insert(signature);
            if !all_inputs_present {
                debug!(assignment = %assignment, "no matching input files, skipping");
                continue;
            }

            let mut output_groups = Vec::new();
            for collection in self.engine.outputs {
                match collection.resolve_files(&assignment, &self.engine.config.name_map) {
                    Some(files) if !files.is_empty() => output_groups.push(files),
                    _ => (),
                }
            }
            if output_groups.is_empty() {
                debug!(assignment = %assignment, "no output files resolved, skipping");
                continue;
            }

            let resolved = assignment.merged(&self.engine.classification.input_only);
            return Some(Match { inputs: input_groups, outputs: output_groups, resolved });
        }
        None
    }
}
