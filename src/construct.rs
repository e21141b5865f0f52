// fast non-cryptographic hashing for all internal maps and signatures
use seahash::SeaHasher;
use serde::{Deserialize, Serialize};

use core::hash::{BuildHasherDefault, Hasher};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

// used to print out readable forms of a construct
use std::fmt;

// ------------- Attribute -------------
pub type AttributeName = String;
pub type Value = String;

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

// ------------- Constraint -------------
/// A named attribute restricted to a set of allowed values, such as
/// `model={ACCESS1-0,MIROC5}`.
///
/// Constraints are immutable value objects: two constraints are the same
/// construct exactly when their key and value set are equal, regardless of
/// where they were created. Values are kept ordered so that "pick one
/// value" always means the smallest.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Constraint {
    key: AttributeName,
    values: BTreeSet<Value>,
}

impl Constraint {
    pub fn new<K, V>(key: K, values: V) -> Self
    where
        K: Into<AttributeName>,
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
    /// A constraint restricted to exactly one value.
    pub fn single<K: Into<AttributeName>, V: Into<Value>>(key: K, value: V) -> Self {
        let mut values = BTreeSet::new();
        values.insert(value.into());
        Self { key: key.into(), values }
    }
    /// A constraint with no values, meaning "inherit this attribute's
    /// domain from the other side" during reconciliation.
    pub fn placeholder<K: Into<AttributeName>>(key: K) -> Self {
        Self { key: key.into(), values: BTreeSet::new() }
    }
    // It's intentional to encapsulate key and values in the struct
    // and only expose them using "getters", because this yields
    // true immutability for objects after creation.
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn values(&self) -> &BTreeSet<Value> {
        &self.values
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }
    /// The smallest allowed value, used whenever a single deterministic
    /// representative has to be chosen.
    pub fn smallest(&self) -> Option<&Value> {
        self.values.iter().next()
    }
    /// The allowed value, provided there is exactly one.
    pub fn single_value(&self) -> Option<&Value> {
        if self.values.len() == 1 { self.values.iter().next() } else { None }
    }
    pub fn allows(&self, value: &str) -> bool {
        self.values.contains(value)
    }
    /// Same-key intersection of the allowed values.
    pub fn intersection(&self, other: &Constraint) -> Constraint {
        Constraint {
            key: self.key.clone(),
            values: self.values.intersection(&other.values).cloned().collect(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for v in &self.values {
            s += &(v.to_string() + ",");
        }
        s.pop();
        write!(f, "{}={{{}}}", self.key, s)
    }
}

// ------------- Combination -------------
/// A duplicate-key-free set of constraints, one per attribute,
/// representing one concrete point in the attribute space.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Combination {
    constraints: Vec<Constraint>,
}

impl Combination {
    /// Builds a combination from the given constraints, or `None` when
    /// two of them claim the same attribute key.
    pub fn new(mut set: Vec<Constraint>) -> Option<Self> {
        set.sort_unstable();
        if set.windows(2).any(|x| x[0].key == x[1].key) {
            return None;
        }
        Some(Self { constraints: set })
    }
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
    pub fn len(&self) -> usize {
        self.constraints.len()
    }
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
    pub fn get(&self, key: &str) -> Option<&Constraint> {
        // keys are unique, so the (key, values) sort order is a key order
        self.constraints
            .binary_search_by(|c| c.key().cmp(key))
            .ok()
            .map(|i| &self.constraints[i])
    }
    /// The combination extended with additional constraints, or `None`
    /// when an added key is already present.
    pub fn merge(&self, extra: Vec<Constraint>) -> Option<Combination> {
        let mut all = self.constraints.clone();
        all.extend(extra);
        Combination::new(all)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for c in &self.constraints {
            s += &(c.to_string() + ",");
        }
        s.pop();
        write!(f, "{{{}}}", s)
    }
}

// ------------- ConstraintSet -------------
/// A reconciled set of constraints, one per distinct attribute key.
///
/// Repeated insertions for a key intersect the allowed values, since an
/// attribute must mean the same restricted domain everywhere it is
/// referenced.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ConstraintSet {
    by_key: HashMap<AttributeName, Constraint, KeyHasher>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self { by_key: HashMap::default() }
    }
    /// Inserts the constraint, replacing any previous one for the key.
    pub fn insert(&mut self, constraint: Constraint) -> Option<Constraint> {
        self.by_key.insert(constraint.key.clone(), constraint)
    }
    /// Inserts the constraint, intersecting the allowed values with any
    /// previous constraint for the key.
    pub fn insert_intersect(&mut self, constraint: Constraint) {
        match self.by_key.entry(constraint.key.clone()) {
            Entry::Vacant(e) => {
                e.insert(constraint);
            }
            Entry::Occupied(mut e) => {
                let merged = e.get().intersection(&constraint);
                e.insert(merged);
            }
        }
    }
    pub fn get(&self, key: &str) -> Option<&Constraint> {
        self.by_key.get(key)
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }
    pub fn len(&self) -> usize {
        self.by_key.len()
    }
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.by_key.values()
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }
    /// The constraints of `self` whose key also appears in `other`.
    pub fn intersection(&self, other: &ConstraintSet) -> ConstraintSet {
        self.iter()
            .filter(|c| other.contains_key(c.key()))
            .cloned()
            .collect()
    }
    /// The constraints of `self` whose key does not appear in `other`.
    pub fn difference(&self, other: &ConstraintSet) -> ConstraintSet {
        self.iter()
            .filter(|c| !other.contains_key(c.key()))
            .cloned()
            .collect()
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = Constraint>>(iter: T) -> Self {
        let mut set = ConstraintSet::new();
        for constraint in iter {
            set.insert_intersect(constraint);
        }
        set
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // sorted so that log lines are stable
        let mut ordered: Vec<&Constraint> = self.by_key.values().collect();
        ordered.sort_unstable();
        let mut s = String::new();
        for c in ordered {
            s += &(c.to_string() + ",");
        }
        s.pop();
        write!(f, "{{{}}}", s)
    }
}

// ------------- Assignment -------------
/// One concrete `attribute -> value` mapping, the flat form a combination
/// takes once every constraint has been narrowed to a single value.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    entries: BTreeMap<AttributeName, Value>,
}

impl Assignment {
    pub fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }
    pub fn insert<K: Into<AttributeName>, V: Into<Value>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &Value)> {
        self.entries.iter()
    }
    /// This assignment extended with the entries of `other`; on a key
    /// collision the entry of `other` wins.
    pub fn merged(&self, other: &Assignment) -> Assignment {
        let mut entries = self.entries.clone();
        for (k, v) in &other.entries {
            entries.insert(k.clone(), v.clone());
        }
        Assignment { entries }
    }
    /// A stable signature over the ordered `(key, value)` pairs, used to
    /// recognize an already-processed assignment within one pass.
    pub fn signature(&self) -> u64 {
        let mut hasher = SeaHasher::new();
        for (k, v) in &self.entries {
            k.hash(&mut hasher);
            v.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl<K: Into<AttributeName>, V: Into<Value>> FromIterator<(K, V)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for (k, v) in &self.entries {
            s += &format!("{}={},", k, v);
        }
        s.pop();
        write!(f, "{{{}}}", s)
    }
}
