//! The six `ConstraintGraph` invariants and the monotonicity property
//! (spec.md §3, §8).

use efx_ir::{UVarRole, ValueType};
use efx_solve::UnificationScope;
use efx_tests::int;

#[test]
fn fresh_variable_starts_unconstrained() {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);
    assert_eq!(scope.bounds_for(x), (ValueType::TBottom, ValueType::TTop));
}

#[test]
fn directness_materializes_transitive_edges() {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);
    let y = scope.fresh(UVarRole::InferredArgument);
    let z = scope.fresh(UVarRole::InferredArgument);

    scope.require_subtype(&ValueType::UVar(x), &ValueType::UVar(y)).unwrap();
    scope.require_subtype(&ValueType::UVar(y), &ValueType::UVar(z)).unwrap();

    // x <: z must already be a materialized edge, not merely
    // reachable through y.
    assert!(scope.is_subtype(&ValueType::UVar(x), &ValueType::UVar(z)));
    assert!(scope.upper_variables(x).contains(&z));
}

#[test]
fn payload_bounds_are_never_unification_variables() {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);
    scope.require_subtype(&int(), &ValueType::UVar(x)).unwrap();
    let (lower, upper) = scope.bounds_for(x);
    assert!(!lower.is_uvar());
    assert!(!upper.is_uvar());
}

#[test]
fn monotonicity_subtyping_survives_further_non_aborting_constraints() {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);
    let y = scope.fresh(UVarRole::InferredArgument);

    scope.require_subtype(&ValueType::UVar(x), &ValueType::UVar(y)).unwrap();
    assert!(scope.is_subtype(&ValueType::UVar(x), &ValueType::UVar(y)));

    // A further, unrelated, non-aborting constraint must not undo it.
    scope.require_subtype(&int(), &ValueType::UVar(y)).unwrap();
    assert!(scope.is_subtype(&ValueType::UVar(x), &ValueType::UVar(y)));
}

#[test]
fn reflexivity_is_a_no_op_for_every_type() {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);

    assert!(scope.require_subtype(&int(), &int()).is_ok());
    assert!(scope.require_subtype(&ValueType::TTop, &ValueType::TTop).is_ok());
    assert!(scope.require_subtype(&ValueType::UVar(x), &ValueType::UVar(x)).is_ok());
    // Bounds of x must be untouched by comparing it against itself.
    assert_eq!(scope.bounds_for(x), (ValueType::TBottom, ValueType::TTop));
}

#[test]
fn snapshot_restore_round_trips_the_graph() {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);
    let y = scope.fresh(UVarRole::InferredArgument);

    let snap = scope.snapshot();
    scope.require_subtype(&ValueType::UVar(x), &ValueType::UVar(y)).unwrap();
    scope.require_subtype(&int(), &ValueType::UVar(x)).unwrap();
    assert!(scope.is_subtype(&ValueType::UVar(x), &ValueType::UVar(y)));

    scope.restore(snap);
    assert_eq!(scope.bounds_for(x), (ValueType::TBottom, ValueType::TTop));
    assert_eq!(scope.bounds_for(y), (ValueType::TBottom, ValueType::TTop));
    assert!(!scope.is_subtype(&ValueType::UVar(x), &ValueType::UVar(y)));
}
