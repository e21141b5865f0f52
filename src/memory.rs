//! An in-memory [`FileCollection`] for tests, examples and small
//! pipelines that keep their file catalog in code.

use std::collections::HashSet;

use crate::collection::{FileCollection, NameMap};
use crate::construct::{Assignment, Combination, Constraint, KeyHasher};

/// A file collection backed by a plain record store.
///
/// Each record is an `attribute -> value` assignment plus a file
/// reference. Used as an input, the records answer membership queries;
/// used as an output, a deterministic reference is constructed from the
/// collection's own constraint keys.
#[derive(Clone, Debug, Default)]
pub struct MemoryCollection {
    name: String,
    constraints: Vec<Constraint>,
    records: Vec<(Assignment, String)>,
}

impl MemoryCollection {
    pub fn new<N: Into<String>>(name: N, constraints: Vec<Constraint>) -> Self {
        Self { name: name.into(), constraints, records: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_record<F: Into<String>>(&mut self, attributes: Assignment, file: F) {
        self.records.push((attributes, file.into()));
    }

    /// Builder form of [`MemoryCollection::add_record`].
    pub fn with_record<'a, A, F>(mut self, attributes: A, file: F) -> Self
    where
        A: IntoIterator<Item = (&'a str, &'a str)>,
        F: Into<String>,
    {
        self.add_record(attributes.into_iter().collect(), file);
        self
    }

    fn agrees(record: &Assignment, assignment: &Assignment) -> bool {
        // only the attributes the record actually carries constrain it
        assignment.iter().all(|(key, value)| match record.get(key) {
            Some(recorded) => recorded == value,
            None => true,
        })
    }
}

impl FileCollection for MemoryCollection {
    type File = String;

    fn constraints(&self) -> Vec<Constraint> {
        self.constraints.clone()
    }

    fn valid_combinations(&self) -> Vec<Combination> {
        let mut seen: HashSet<Combination, KeyHasher> = HashSet::default();
        let mut combinations = Vec::new();
        for (attributes, _) in &self.records {
            let singles = attributes
                .iter()
                .map(|(key, value)| Constraint::single(key.clone(), value.clone()))
                .collect();
            if let Some(combination) = Combination::new(singles) {
                if seen.insert(combination.clone()) {
                    combinations.push(combination);
                }
            }
        }
        combinations
    }

    fn matching_files(&self, assignment: &Assignment) -> Vec<String> {
        self.records
            .iter()
            .filter(|(attributes, _)| Self::agrees(attributes, assignment))
            .map(|(_, file)| file.clone())
            .collect()
    }

    fn resolve_files(&self, assignment: &Assignment, name_map: &NameMap) -> Option<Vec<String>> {
        let mut ordered = self.constraints.clone();
        ordered.sort_unstable();
        let mut parts = Vec::with_capacity(ordered.len());
        for constraint in &ordered {
            // the assignment carries input-side names; an output-side
            // name is translated back through the mapping
            let value = assignment.get(constraint.key()).or_else(|| {
                name_map
                    .get_by_right(constraint.key())
                    .and_then(|input_key| assignment.get(input_key))
            })?;
            if !constraint.is_empty() && !constraint.allows(value) {
                return None;
            }
            parts.push(format!("{}-{}", constraint.key(), value));
        }
        Some(vec![format!("{}/{}", self.name, parts.join("_"))])
    }
}
