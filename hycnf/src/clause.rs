//! Clauses and clause sets.
//!
//! A [`Clause`] is a disjunction of literals and a [`ClauseSet`] a conjunction of clauses. Both
//! are sets: duplicates collapse and the order in which elements are added does not matter.
//! They are ordered by node identity, so iteration and text output are deterministic for a
//! given [`FormulaManager`](hyformal::manager::FormulaManager).
//!
//! Text form: `{ { l1 l2 } { l3 } }`. The empty clause set (true) prints as `{ }` and the set
//! holding only the empty clause (false) as `{ { } }`.
use std::{
    collections::{BTreeSet, btree_set},
    fmt,
};

use hyformal::node::FNode;

/// Disjunction of literals.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clause(BTreeSet<FNode>);

impl Clause {
    /// The empty clause, which no assignment satisfies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clause with a single literal.
    pub fn unit(literal: FNode) -> Self {
        Self(BTreeSet::from([literal]))
    }

    /// Add a literal. Returns `false` when it was already present.
    pub fn insert(&mut self, literal: FNode) -> bool {
        self.0.insert(literal)
    }

    #[inline]
    pub fn contains(&self, literal: &FNode) -> bool {
        self.0.contains(literal)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, FNode> {
        self.0.iter()
    }
}

impl FromIterator<FNode> for Clause {
    fn from_iter<I: IntoIterator<Item = FNode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a FNode;
    type IntoIter = btree_set::Iter<'a, FNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Clause {
    type Item = FNode;
    type IntoIter = btree_set::IntoIter<FNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for literal in &self.0 {
            write!(f, " {}", literal)?;
        }
        f.write_str(" }")
    }
}

/// Conjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClauseSet(BTreeSet<Clause>);

impl ClauseSet {
    /// The empty conjunction, i.e. true.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical true: no clause at all.
    pub fn true_() -> Self {
        Self::default()
    }

    /// Canonical false: exactly the empty clause.
    pub fn false_() -> Self {
        Self(BTreeSet::from([Clause::new()]))
    }

    /// No clause constrains anything.
    #[inline]
    pub fn is_true(&self) -> bool {
        self.0.is_empty()
    }

    /// Contains the empty clause, hence unsatisfiable.
    pub fn is_false(&self) -> bool {
        self.0.iter().any(Clause::is_empty)
    }

    /// Add a clause. Returns `false` when it was already present.
    pub fn insert(&mut self, clause: Clause) -> bool {
        self.0.insert(clause)
    }

    #[inline]
    pub fn contains(&self, clause: &Clause) -> bool {
        self.0.contains(clause)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Clause> {
        self.0.iter()
    }

    /// Every literal of every clause, with repetitions.
    pub fn literals(&self) -> impl Iterator<Item = &FNode> {
        self.0.iter().flat_map(Clause::iter)
    }
}

impl FromIterator<Clause> for ClauseSet {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Clause> for ClauseSet {
    fn extend<I: IntoIterator<Item = Clause>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ClauseSet {
    type Item = &'a Clause;
    type IntoIter = btree_set::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ClauseSet {
    type Item = Clause;
    type IntoIter = btree_set::IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ClauseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for clause in &self.0 {
            write!(f, " {}", clause)?;
        }
        f.write_str(" }")
    }
}
