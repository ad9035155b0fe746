//! Effect sets: unordered collections of effect atoms with
//! set-difference by subtyping (spec.md §3, §4.5 `subtract`).

use crate::ident::EffectId;
use crate::ty::ValueType;
use std::collections::BTreeSet;
use std::fmt;

/// A single effect in an effect row. Effects are nominal, possibly
/// applied to value-type arguments (an effect like `Exc[String]`),
/// mirroring how `App` applies a constructor to value-type arguments.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectAtom {
    pub id: EffectId,
    pub args: Vec<ValueType>,
}

impl fmt::Debug for EffectAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{:?}", self.id)
        } else {
            write!(f, "{:?}{:?}", self.id, self.args)
        }
    }
}

#[derive(Clone, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct Effects {
    atoms: BTreeSet<EffectAtom>,
}

impl Effects {
    pub fn empty() -> Self {
        Effects {
            atoms: BTreeSet::new(),
        }
    }

    pub fn from_atoms<I: IntoIterator<Item = EffectAtom>>(atoms: I) -> Self {
        Effects {
            atoms: atoms.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectAtom> {
        self.atoms.iter()
    }

    pub fn union(&self, other: &Effects) -> Effects {
        Effects {
            atoms: self.atoms.union(&other.atoms).cloned().collect(),
        }
    }
}

impl fmt::Debug for Effects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", atom)?;
        }
        write!(f, ">")
    }
}
