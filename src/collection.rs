//! The collaborator seam between the matching engine and the file
//! collections it pairs up.
//!
//! The engine never touches storage itself: which files exist for an
//! assignment, and how an output file reference is constructed, are both
//! answered by the collection behind this trait. The engine only consumes
//! the answers.

use bimap::BiMap;

use crate::construct::{Assignment, AttributeName, Combination, Constraint};

/// Bidirectional mapping between an input-side attribute name and the
/// differently-named output-side attribute it should be treated as.
///
/// Left is the input name, right is the output name. Output collections
/// resolve a right-side name back to the left-side one to look up the
/// value recorded in an assignment.
pub type NameMap = BiMap<AttributeName, AttributeName>;

/// A collection of files described by named attribute constraints.
///
/// Input collections answer "which files do you already hold for this
/// assignment"; output collections answer "which file reference do you
/// resolve or construct for it". One type may play both parts.
pub trait FileCollection {
    /// Opaque file reference type owned by the collection.
    type File;

    /// The attribute universe of this collection: every constraint it
    /// declares, one per attribute key it knows about.
    fn constraints(&self) -> Vec<Constraint>;

    /// The attribute combinations actually present in the collection's
    /// recorded data. Each combination carries one constraint per key and
    /// is expected to be attribute-singular (one value per constraint).
    fn valid_combinations(&self) -> Vec<Combination>;

    /// Files already present for the assignment. An empty answer means
    /// the assignment has no presence in this collection.
    fn matching_files(&self, assignment: &Assignment) -> Vec<Self::File>;

    /// Resolves or lazily constructs the file references for the
    /// assignment, translating attribute names through `name_map` where
    /// the collection's own naming differs from the input side. `None`
    /// when no valid reference can be produced.
    fn resolve_files(
        &self,
        assignment: &Assignment,
        name_map: &NameMap,
    ) -> Option<Vec<Self::File>>;
}
