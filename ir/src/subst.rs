//! Substitutions: pure mappings from bound type/capture parameters to
//! value types / capture sets (spec.md §4.2).

use crate::capture::{CaptureAtom, CaptureSet};
use crate::effect::{EffectAtom, Effects};
use crate::ident::{CaptureParamId, TypeParamId};
use crate::ty::{BlockType, FunctionType, InterfaceType, ValueType};
use crate::uvar::CaptureUVar;
use rustc_hash::FxHashMap;
use std::fmt;

/// Raised when `Substitution::apply` walks into a capture unification
/// variable while the substitution's range contains a concrete
/// capability. Spec.md §4.2 names this the
/// "instantiation-vs-concrete-capture confusion": a substitution built
/// to instantiate a type scheme (whose range is fresh capture
/// variables) should never be applied to a term that still has loose
/// capture unification variables mixed with a substitution meant to
/// install concrete captures.
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot substitute capture variable {var:?}: substitution range already contains concrete captures {caps:?}")]
pub struct SubstitutionConflict {
    pub var: CaptureUVar,
    pub caps: CaptureSet,
}

/// An immutable pair of maps, `TypeParam -> ValueType` and
/// `CaptureParam -> CaptureSet`.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    types: FxHashMap<TypeParamId, ValueType>,
    captures: FxHashMap<CaptureParamId, CaptureSet>,
}

impl Substitution {
    pub fn empty() -> Self {
        Substitution {
            types: FxHashMap::default(),
            captures: FxHashMap::default(),
        }
    }

    pub fn from_maps(
        types: FxHashMap<TypeParamId, ValueType>,
        captures: FxHashMap<CaptureParamId, CaptureSet>,
    ) -> Self {
        Substitution { types, captures }
    }

    pub fn get_type(&self, id: TypeParamId) -> Option<&ValueType> {
        self.types.get(&id)
    }

    pub fn get_capture(&self, id: CaptureParamId) -> Option<&CaptureSet> {
        self.captures.get(&id)
    }

    pub fn is_defined_at_type(&self, id: TypeParamId) -> bool {
        self.types.contains_key(&id)
    }

    pub fn is_defined_at_capture(&self, id: CaptureParamId) -> bool {
        self.captures.contains_key(&id)
    }

    fn range_has_concrete_capture(&self) -> bool {
        self.captures.values().any(CaptureSet::has_concrete_capture)
    }

    /// "First this, then other": apply `other` to every value of
    /// `self`, then union-override with `other`'s own bindings.
    pub fn compose_seq(&self, other: &Substitution) -> Result<Substitution, SubstitutionConflict> {
        let mut types = FxHashMap::default();
        for (id, ty) in &self.types {
            types.insert(*id, other.apply_value_type(ty)?);
        }
        for (id, ty) in &other.types {
            types.insert(*id, ty.clone());
        }

        let mut captures = FxHashMap::default();
        for (id, cs) in &self.captures {
            captures.insert(*id, other.apply_capture_set(cs)?);
        }
        for (id, cs) in &other.captures {
            captures.insert(*id, cs.clone());
        }

        Ok(Substitution { types, captures })
    }

    /// Union of maps, with `other` overriding on key collisions. No
    /// substitution is applied to either side's values.
    pub fn compose_parallel(&self, other: &Substitution) -> Substitution {
        let mut types = self.types.clone();
        types.extend(other.types.iter().map(|(k, v)| (*k, v.clone())));

        let mut captures = self.captures.clone();
        captures.extend(other.captures.iter().map(|(k, v)| (*k, v.clone())));

        Substitution { types, captures }
    }

    pub fn apply_value_type(&self, ty: &ValueType) -> Result<ValueType, SubstitutionConflict> {
        Ok(match ty {
            ValueType::App(ctor, args) => ValueType::App(
                *ctor,
                args.iter()
                    .map(|a| self.apply_value_type(a))
                    .collect::<Result<_, _>>()?,
            ),
            ValueType::Boxed(block, caps) => ValueType::Boxed(
                Box::new(self.apply_block_type(block)?),
                self.apply_capture_set(caps)?,
            ),
            ValueType::TypeParam(id) => match self.get_type(*id) {
                Some(replacement) => replacement.clone(),
                None => ty.clone(),
            },
            ValueType::UVar(_) | ValueType::TTop | ValueType::TBottom => ty.clone(),
        })
    }

    pub fn apply_block_type(&self, block: &BlockType) -> Result<BlockType, SubstitutionConflict> {
        Ok(match block {
            BlockType::Interface(iface) => BlockType::Interface(self.apply_interface_type(iface)?),
            BlockType::Function(fun) => BlockType::Function(self.apply_function_type(fun)?),
        })
    }

    pub fn apply_interface_type(
        &self,
        iface: &InterfaceType,
    ) -> Result<InterfaceType, SubstitutionConflict> {
        Ok(InterfaceType {
            id: iface.id,
            args: iface
                .args
                .iter()
                .map(|a| self.apply_value_type(a))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Function-type substitution shadows: `tparams`/`cparams` bound
    /// by the function are first removed from the substitution's
    /// domain (spec.md §4.2), so a substitution entry for a type
    /// parameter of the same name bound further out does not leak in.
    pub fn apply_function_type(
        &self,
        fun: &FunctionType,
    ) -> Result<FunctionType, SubstitutionConflict> {
        let mut shadowed = self.clone();
        for tparam in &fun.tparams {
            shadowed.types.remove(tparam);
        }
        for cparam in &fun.cparams {
            shadowed.captures.remove(cparam);
        }

        Ok(FunctionType {
            tparams: fun.tparams.clone(),
            cparams: fun.cparams.clone(),
            vparams: fun
                .vparams
                .iter()
                .map(|v| shadowed.apply_value_type(v))
                .collect::<Result<_, _>>()?,
            bparams: fun
                .bparams
                .iter()
                .map(|b| shadowed.apply_block_type(b))
                .collect::<Result<_, _>>()?,
            result: Box::new(shadowed.apply_value_type(&fun.result)?),
            effects: shadowed.apply_effects(&fun.effects)?,
        })
    }

    pub fn apply_effects(&self, effects: &Effects) -> Result<Effects, SubstitutionConflict> {
        let atoms = effects
            .iter()
            .map(|atom| {
                Ok(EffectAtom {
                    id: atom.id,
                    args: atom
                        .args
                        .iter()
                        .map(|a| self.apply_value_type(a))
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, SubstitutionConflict>>()?;
        Ok(Effects::from_atoms(atoms))
    }

    pub fn apply_capture_set(&self, caps: &CaptureSet) -> Result<CaptureSet, SubstitutionConflict> {
        let conflict_guard = self.range_has_concrete_capture();
        let mut out = CaptureSet::empty();
        for atom in caps.iter() {
            match atom {
                CaptureAtom::Capability(_) => out = out.union(&CaptureSet::singleton(*atom)),
                CaptureAtom::Param(id) => match self.get_capture(*id) {
                    Some(replacement) => out = out.union(replacement),
                    None => out = out.union(&CaptureSet::singleton(*atom)),
                },
                CaptureAtom::Var(cv) => {
                    if conflict_guard {
                        return Err(SubstitutionConflict {
                            var: *cv,
                            caps: caps.clone(),
                        });
                    }
                    out = out.union(&CaptureSet::singleton(*atom));
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, ty) in &self.types {
            writeln!(f, "{:?} := {:?}", id, ty)?;
        }
        for (id, cs) in &self.captures {
            writeln!(f, "{:?} := {:?}", id, cs)?;
        }
        Ok(())
    }
}
