//! Capture sets: the second-class resources a boxed block may close over.

use crate::ident::{CapabilityId, CaptureParamId};
use crate::uvar::CaptureUVar;
use std::collections::BTreeSet;
use std::fmt;

/// A single element of a capture set: a concrete capability (already
/// resolved to a name in scope), a reference to a bound capture
/// parameter (not yet instantiated, the capture-side counterpart of
/// `ValueType::TypeParam`), or a capture unification variable still
/// to be solved.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaptureAtom {
    Capability(CapabilityId),
    Param(CaptureParamId),
    Var(CaptureUVar),
}

impl fmt::Debug for CaptureAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureAtom::Capability(id) => write!(f, "{:?}", id),
            CaptureAtom::Param(id) => write!(f, "{:?}", id),
            CaptureAtom::Var(v) => write!(f, "{:?}", v),
        }
    }
}

/// An unordered set of capture atoms. Kept as a `BTreeSet` (as chalk
/// keeps its own clause sets) so that two structurally equal capture
/// sets compare equal regardless of insertion order.
#[derive(Clone, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct CaptureSet {
    atoms: BTreeSet<CaptureAtom>,
}

impl CaptureSet {
    pub fn empty() -> Self {
        CaptureSet {
            atoms: BTreeSet::new(),
        }
    }

    pub fn singleton(atom: CaptureAtom) -> Self {
        let mut atoms = BTreeSet::new();
        atoms.insert(atom);
        CaptureSet { atoms }
    }

    pub fn from_atoms<I: IntoIterator<Item = CaptureAtom>>(atoms: I) -> Self {
        CaptureSet {
            atoms: atoms.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: &CaptureAtom) -> bool {
        self.atoms.contains(atom)
    }

    pub fn union(&self, other: &CaptureSet) -> CaptureSet {
        CaptureSet {
            atoms: self.atoms.union(&other.atoms).cloned().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaptureAtom> {
        self.atoms.iter()
    }

    pub fn map<F>(&self, mut f: F) -> CaptureSet
    where
        F: FnMut(&CaptureAtom) -> CaptureAtom,
    {
        CaptureSet {
            atoms: self.atoms.iter().map(&mut f).collect(),
        }
    }

    /// Every capture unification variable appearing in this set.
    pub fn variables(&self) -> impl Iterator<Item = CaptureUVar> + '_ {
        self.atoms.iter().filter_map(|atom| match atom {
            CaptureAtom::Var(v) => Some(*v),
            CaptureAtom::Capability(_) | CaptureAtom::Param(_) => None,
        })
    }

    /// True if every atom is a concrete capability (no unification
    /// variables left to solve). Used by `Substitution` to detect the
    /// instantiation-vs-concrete-capture confusion described in
    /// spec.md §4.2.
    pub fn has_concrete_capture(&self) -> bool {
        self.atoms
            .iter()
            .any(|atom| matches!(atom, CaptureAtom::Capability(_)))
    }
}

impl fmt::Debug for CaptureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", atom)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<CaptureAtom> for CaptureSet {
    fn from_iter<I: IntoIterator<Item = CaptureAtom>>(iter: I) -> Self {
        CaptureSet::from_atoms(iter)
    }
}
