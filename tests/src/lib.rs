//! Shared test helpers for the `efx-tests` integration suite, mirroring
//! the small helper module `chalk-tests` keeps alongside its `.chalk`
//! fixture runner.

use efx_ir::{CapabilityId, CaptureAtom, CaptureSet, CtorId, EffectAtom, EffectId, Effects, ValueType};

pub fn ctor(name: &str, args: Vec<ValueType>) -> ValueType {
    ValueType::app(CtorId::new(name), args)
}

pub fn int() -> ValueType {
    ctor("Int", vec![])
}

pub fn string() -> ValueType {
    ctor("String", vec![])
}

pub fn bool_() -> ValueType {
    ctor("Bool", vec![])
}

pub fn capability(name: &str) -> CaptureAtom {
    CaptureAtom::Capability(CapabilityId::new(name))
}

pub fn captures(atoms: impl IntoIterator<Item = CaptureAtom>) -> CaptureSet {
    CaptureSet::from_atoms(atoms)
}

pub fn effect(name: &str, args: Vec<ValueType>) -> EffectAtom {
    EffectAtom {
        id: EffectId::new(name),
        args,
    }
}

pub fn effects(atoms: impl IntoIterator<Item = EffectAtom>) -> Effects {
    Effects::from_atoms(atoms)
}
