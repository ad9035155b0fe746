//! Substitution composition and scheme instantiation (spec.md §4.2,
//! §4.5, and the idempotence/round-trip properties of §8).

use efx_ir::{CaptureParamId, Effects, FunctionType, Substitution, TypeParamId, ValueType};
use efx_solve::UnificationScope;
use efx_tests::int;
use rustc_hash::FxHashMap;

fn subst_type(id: TypeParamId, ty: ValueType) -> Substitution {
    let mut types = FxHashMap::default();
    types.insert(id, ty);
    Substitution::from_maps(types, FxHashMap::default())
}

#[test]
fn compose_seq_then_parallel_agree_when_domains_are_disjoint() {
    let a = TypeParamId::new("A");
    let b = TypeParamId::new("B");
    let s1 = subst_type(a, int());
    let s2 = subst_type(b, ValueType::TTop);

    let seq = s1.compose_seq(&s2).unwrap();
    let parallel = s1.compose_parallel(&s2);

    assert_eq!(
        seq.apply_value_type(&ValueType::TypeParam(a)).unwrap(),
        parallel.apply_value_type(&ValueType::TypeParam(a)).unwrap()
    );
    assert_eq!(
        seq.apply_value_type(&ValueType::TypeParam(b)).unwrap(),
        parallel.apply_value_type(&ValueType::TypeParam(b)).unwrap()
    );
}

#[test]
fn compose_seq_applies_the_right_side_through_the_left() {
    let a = TypeParamId::new("A");
    let b = TypeParamId::new("B");
    // s1: A -> B (as a type param reference), s2: B -> Int.
    let s1 = subst_type(a, ValueType::TypeParam(b));
    let s2 = subst_type(b, int());

    let composed = s1.compose_seq(&s2).unwrap();
    assert_eq!(
        composed.apply_value_type(&ValueType::TypeParam(a)).unwrap(),
        int()
    );
}

#[test]
fn instantiate_then_reabstract_is_alpha_equivalent() {
    let a = TypeParamId::new("A");
    let scheme = FunctionType {
        tparams: vec![a],
        cparams: vec![],
        vparams: vec![ValueType::TypeParam(a)],
        bparams: vec![],
        result: Box::new(ValueType::TypeParam(a)),
        effects: Effects::empty(),
    };

    let mut scope = UnificationScope::new();
    let (rigids, _, instantiated) = scope.instantiate(&scheme).unwrap();
    assert_eq!(rigids.len(), 1);
    assert!(instantiated.tparams.is_empty());

    // Re-abstracting: the instantiated body is exactly
    // `vparams = [UVar(rigid)]`, `result = UVar(rigid)`, matching the
    // scheme's shape with `TypeParam(a)` replaced uniformly by the
    // same fresh variable everywhere.
    let rigid_ty = ValueType::UVar(rigids[0]);
    assert_eq!(instantiated.vparams, vec![rigid_ty.clone()]);
    assert_eq!(*instantiated.result, rigid_ty);
}

#[test]
fn instantiate_allocates_distinct_variables_per_occurrence_of_tparams() {
    let a = TypeParamId::new("A");
    let b = TypeParamId::new("B");
    let scheme = FunctionType {
        tparams: vec![a, b],
        cparams: vec![],
        vparams: vec![ValueType::TypeParam(a), ValueType::TypeParam(a)],
        bparams: vec![],
        result: Box::new(ValueType::TypeParam(b)),
        effects: Effects::empty(),
    };

    let mut scope = UnificationScope::new();
    let (rigids, _, instantiated) = scope.instantiate(&scheme).unwrap();
    assert_eq!(rigids.len(), 2);
    // Both `vparams` entries originated from the same `tparams[0]`, so
    // they must be substituted by the *same* fresh variable.
    assert_eq!(instantiated.vparams[0], instantiated.vparams[1]);
    assert_ne!(instantiated.vparams[0], *instantiated.result);
}

#[test]
fn capture_substitution_rejects_loose_variable_when_range_has_concrete_capture() {
    use efx_ir::{CapabilityId, CaptureAtom, CaptureSet, ScopeId};

    let cparam = CaptureParamId::new("C");
    let mut captures = FxHashMap::default();
    captures.insert(
        cparam,
        CaptureSet::singleton(CaptureAtom::Capability(CapabilityId::new("stdout"))),
    );
    let subst = Substitution::from_maps(FxHashMap::default(), captures);

    // A loose capture variable from some other, unrelated scope.
    let loose = efx_ir::CaptureUVar::new(ScopeId::fresh(), 0);
    let set = CaptureSet::singleton(CaptureAtom::Var(loose));
    assert!(subst.apply_capture_set(&set).is_err());
}

#[test]
fn function_type_substitution_does_not_leak_into_unrelated_bound_param() {
    let a = TypeParamId::new("A");
    let fun = FunctionType {
        tparams: vec![a],
        cparams: vec![],
        vparams: vec![ValueType::TypeParam(a)],
        bparams: vec![],
        result: Box::new(ValueType::TypeParam(a)),
        effects: Effects::empty(),
    };
    let subst = subst_type(a, int());
    let applied = subst.apply_function_type(&fun).unwrap();
    assert_eq!(applied.vparams[0], ValueType::TypeParam(a));
}
