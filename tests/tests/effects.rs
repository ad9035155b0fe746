//! Effect rows: subtraction (`UnificationScope::subtract`) and the
//! effect-coverage check inside `unify_function_types` (spec.md §4.4,
//! §4.5).

use efx_ir::{BlockType, FunctionType, ValueType};
use efx_solve::{SolveError, UnificationScope};
use efx_tests::{effect, effects, int};

fn function_with_effects(row: efx_ir::Effects) -> BlockType {
    BlockType::Function(FunctionType {
        tparams: vec![],
        cparams: vec![],
        vparams: vec![],
        bparams: vec![],
        result: Box::new(int()),
        effects: row,
    })
}

#[test]
fn subtract_removes_exactly_covered_effects() {
    let mut scope = UnificationScope::new();
    let exc = effect("Exc", vec![]);
    let io = effect("IO", vec![]);

    let all = effects(vec![exc.clone(), io.clone()]);
    let covered = effects(vec![exc.clone()]);

    let remaining = scope.subtract(&all, &covered);
    let left: Vec<_> = remaining.iter().cloned().collect();
    assert_eq!(left, vec![io]);
}

#[test]
fn subtract_is_a_no_op_when_nothing_is_covered() {
    let mut scope = UnificationScope::new();
    let exc = effect("Exc", vec![]);
    let all = effects(vec![exc.clone()]);
    let empty = effects(vec![]);

    let remaining = scope.subtract(&all, &empty);
    assert_eq!(remaining.iter().cloned().collect::<Vec<_>>(), vec![exc]);
}

#[test]
fn subtract_uses_argument_subtyping_not_just_effect_identity() {
    let mut scope = UnificationScope::new();
    let exc_of_int = effect("Exc", vec![int()]);
    let exc_of_bottom = effect("Exc", vec![ValueType::TBottom]);

    // Exc[Int] is covered by Exc[Bottom], per spec.md §4.5's
    // `exists e' in effs2. e' <: e`: Bottom <: Int, so Exc[Bottom] <:
    // Exc[Int] under covariant argument comparison.
    let all = effects(vec![exc_of_int]);
    let covering = effects(vec![exc_of_bottom]);
    assert!(scope.subtract(&all, &covering).is_empty());
}

#[test]
fn function_subtyping_accepts_equal_or_smaller_effect_row() {
    let narrow = function_with_effects(effects(vec![effect("Exc", vec![])]));
    let wide = function_with_effects(effects(vec![effect("Exc", vec![]), effect("IO", vec![])]));

    let mut scope = UnificationScope::new();
    assert!(scope.require_subtype_block(&narrow, &wide).is_ok());
}

#[test]
fn function_subtyping_rejects_an_uncovered_effect() {
    let narrow = function_with_effects(effects(vec![effect("Exc", vec![])]));
    let no_effects = function_with_effects(effects(vec![]));

    let mut scope = UnificationScope::new();
    let err = scope.require_subtype_block(&narrow, &no_effects).unwrap_err();
    assert!(matches!(err, SolveError::EffectMismatch { .. }));
}
