//! Reconciliation of raw input/output constraint declarations and the
//! classification of the reconciled attribute keys.
//!
//! Reconciliation happens once, when a [`crate::engine::MatchEngine`] is
//! built. Everything it produces is immutable for the life of the engine.

use tracing::debug;

use crate::collection::NameMap;
use crate::config::AmbiguityPolicy;
use crate::construct::{Assignment, Constraint, ConstraintSet};
use crate::error::{MatchError, Result};

/// Cleans up the raw constraint declarations gathered from the input and
/// output collections:
///
/// * a key declared by several input collections keeps the intersection
///   of the declared value sets;
/// * an input constraint whose values intersect to nothing is fatal;
/// * an output constraint declared without values is a placeholder and
///   inherits the reconciled input constraint with the same key;
/// * output constraints with explicit values are authoritative and kept,
///   repeated output keys intersecting like the input side.
pub fn reconcile<I, O>(inputs: I, outputs: O) -> Result<(ConstraintSet, ConstraintSet)>
where
    I: IntoIterator<Item = Constraint>,
    O: IntoIterator<Item = Constraint>,
{
    let mut reconciled_inputs = ConstraintSet::new();
    for constraint in inputs {
        reconciled_inputs.insert_intersect(constraint);
    }
    for constraint in reconciled_inputs.iter() {
        if constraint.is_empty() {
            return Err(MatchError::EmptyConstraint(constraint.key().to_owned()));
        }
    }

    let mut reconciled_outputs = ConstraintSet::new();
    for constraint in outputs {
        if constraint.is_empty() {
            // placeholder: the input side owns this attribute's domain
            match reconciled_inputs.get(constraint.key()) {
                Some(input_constraint) => {
                    reconciled_outputs.insert_intersect(input_constraint.clone());
                }
                None => {
                    return Err(MatchError::UnresolvedOutputConstraint(
                        constraint.key().to_owned(),
                    ));
                }
            }
        } else {
            reconciled_outputs.insert_intersect(constraint);
        }
    }
    for constraint in reconciled_outputs.iter() {
        if constraint.is_empty() {
            return Err(MatchError::EmptyConstraint(constraint.key().to_owned()));
        }
    }

    debug!(
        inputs = %reconciled_inputs,
        outputs = %reconciled_outputs,
        "reconciled constraint sets"
    );
    Ok((reconciled_inputs, reconciled_outputs))
}

/// The reconciled attribute keys sorted into the three kinds the engine
/// cares about.
///
/// Invariant: every reconciled key lands in `shared` or `input_only`, the
/// two are disjoint, and `output_only` is a subset of `shared`.
#[derive(Clone, Debug, Default)]
pub struct Classification {
    /// Attributes meaningful to both sides, including the promoted
    /// output-only ones and the mapped input attributes.
    pub shared: ConstraintSet,
    /// Fixed `key -> value` entries for attributes only the input side
    /// knows about; merged into every result.
    pub input_only: Assignment,
    /// Attributes only the output side knows about; their values have to
    /// be enumerated explicitly during a pass.
    pub output_only: ConstraintSet,
}

/// Sorts every reconciled key into shared, input-only or output-only.
///
/// An output-side key whose name maps back to an existing input attribute
/// is not output-only: its value is found through the name mapping at
/// resolution time instead of being enumerated.
pub fn classify(
    input: &ConstraintSet,
    output: &ConstraintSet,
    name_map: &NameMap,
    policy: AmbiguityPolicy,
) -> Result<Classification> {
    let mut shared = input.intersection(output);
    for constraint in input.iter() {
        if name_map.contains_left(constraint.key()) {
            shared.insert(constraint.clone());
        }
    }

    let mut output_only = ConstraintSet::new();
    for constraint in output.difference(input).iter() {
        let mapped_to_input = name_map
            .get_by_right(constraint.key())
            .is_some_and(|input_key| input.contains_key(input_key));
        if mapped_to_input {
            continue;
        }
        output_only.insert(constraint.clone());
        // output-only attributes must appear in every assignment handed
        // downstream, which makes them shared by construction
        shared.insert(constraint.clone());
    }

    let mut input_only = Assignment::new();
    for constraint in input.iter() {
        if shared.contains_key(constraint.key()) {
            continue;
        }
        let value = match constraint.single_value() {
            Some(value) => value.clone(),
            None => match policy {
                AmbiguityPolicy::Strict => {
                    return Err(MatchError::AmbiguousInputOnly {
                        key: constraint.key().to_owned(),
                        candidates: constraint.cardinality(),
                    });
                }
                AmbiguityPolicy::SmallestValue => match constraint.smallest() {
                    Some(value) => value.clone(),
                    None => {
                        return Err(MatchError::EmptyConstraint(
                            constraint.key().to_owned(),
                        ));
                    }
                },
            },
        };
        input_only.insert(constraint.key().to_owned(), value);
    }

    debug!(
        shared = %shared,
        input_only = %input_only,
        output_only = %output_only,
        "classified reconciled attributes"
    );
    Ok(Classification { shared, input_only, output_only })
}
