//! Function- and interface-type subtyping (spec.md §4.4
//! `unify_function_types`/`unify_block_types`).

use efx_ir::{BlockType, Effects, FunctionType, InterfaceId, InterfaceType, ValueType};
use efx_solve::{SolveError, UnificationScope};
use efx_tests::{bool_, ctor, int};

fn function(vparams: Vec<ValueType>, result: ValueType) -> BlockType {
    BlockType::Function(FunctionType {
        tparams: vec![],
        cparams: vec![],
        vparams,
        bparams: vec![],
        result: Box::new(result),
        effects: Effects::empty(),
    })
}

#[test]
fn wider_parameter_accepts_in_place_of_narrower() {
    // (Top) -> Int  <:  (Int) -> Int: contravariant parameters.
    let wide = function(vec![ValueType::TTop], int());
    let narrow = function(vec![int()], int());

    let mut scope = UnificationScope::new();
    assert!(scope.require_subtype_block(&wide, &narrow).is_ok());
}

#[test]
fn narrower_parameter_rejected_in_place_of_wider() {
    let wide = function(vec![ValueType::TTop], int());
    let narrow = function(vec![int()], int());

    let mut scope = UnificationScope::new();
    let err = scope.require_subtype_block(&narrow, &wide).unwrap_err();
    assert!(matches!(err, SolveError::TypeMismatch { .. }));
}

#[test]
fn covariant_result_accepts_narrower_return_type() {
    // (Int) -> Int  <:  (Int) -> Top
    let returns_int = function(vec![int()], int());
    let returns_anything = function(vec![int()], ValueType::TTop);

    let mut scope = UnificationScope::new();
    assert!(scope.require_subtype_block(&returns_int, &returns_anything).is_ok());
}

#[test]
fn mismatched_value_parameter_arity_aborts() {
    let one_param = function(vec![int()], int());
    let two_params = function(vec![int(), int()], int());

    let mut scope = UnificationScope::new();
    let err = scope.require_subtype_block(&one_param, &two_params).unwrap_err();
    assert!(matches!(err, SolveError::ArityMismatch { .. }));
}

#[test]
fn function_vs_interface_kind_mismatch_aborts() {
    let f = function(vec![], int());
    let i = BlockType::Interface(InterfaceType {
        id: InterfaceId::new("Eq"),
        args: vec![],
    });

    let mut scope = UnificationScope::new();
    let err = scope.require_subtype_block(&f, &i).unwrap_err();
    assert!(matches!(err, SolveError::BlockTypeMismatch { .. }));
}

#[test]
fn interface_arguments_compare_covariantly() {
    let narrow = BlockType::Interface(InterfaceType {
        id: InterfaceId::new("Box"),
        args: vec![int()],
    });
    let wide = BlockType::Interface(InterfaceType {
        id: InterfaceId::new("Box"),
        args: vec![ValueType::TTop],
    });

    let mut scope = UnificationScope::new();
    assert!(scope.require_subtype_block(&narrow, &wide).is_ok());
    assert!(scope.require_subtype_block(&wide, &narrow).is_err());
}

#[test]
fn differing_interface_identifiers_abort() {
    let a = BlockType::Interface(InterfaceType {
        id: InterfaceId::new("Eq"),
        args: vec![],
    });
    let b = BlockType::Interface(InterfaceType {
        id: InterfaceId::new("Ord"),
        args: vec![],
    });

    let mut scope = UnificationScope::new();
    assert!(scope.require_subtype_block(&a, &b).is_err());
}

#[test]
fn app_arguments_compare_covariantly_in_value_types() {
    let narrow = ctor("List", vec![int()]);
    let wide = ctor("List", vec![ValueType::TTop]);

    let mut scope = UnificationScope::new();
    assert!(scope.require_subtype(&narrow, &wide).is_ok());
    assert!(scope.require_subtype(&wide, &narrow).is_err());
}

#[test]
fn boxed_types_compare_blocks_then_captures() {
    use efx_ir::{CaptureAtom, CaptureSet, CapabilityId};

    let stdout = CaptureAtom::Capability(CapabilityId::new("stdout"));
    let inner = function(vec![], bool_());
    let narrow = ValueType::Boxed(Box::new(inner.clone()), CaptureSet::singleton(stdout));
    let wide = ValueType::Boxed(Box::new(inner), CaptureSet::singleton(stdout));

    let mut scope = UnificationScope::new();
    assert!(scope.require_subtype(&narrow, &wide).is_ok());
}
