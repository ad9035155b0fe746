//! The solver's error taxonomy (spec.md §7).

use efx_ir::{BlockType, CaptureSet, EffectAtom, SubstitutionConflict, ValueType};

/// Every way a solver operation can fail. All user-visible failures
/// are surfaced through `ErrorReporter::abort` with
/// `SolveError::to_string()`; none of these variants pretty-print a
/// full type tree beyond `{:?}` (pretty-printing is out of scope).
#[derive(Clone, Debug, thiserror::Error)]
pub enum SolveError {
    #[error("type mismatch: expected a subtype of {expected:?}, found {actual:?}")]
    TypeMismatch {
        expected: ValueType,
        actual: ValueType,
    },

    #[error("block type mismatch: expected a subtype of {expected:?}, found {actual:?}")]
    BlockTypeMismatch {
        expected: BlockType,
        actual: BlockType,
    },

    #[error("arity mismatch comparing function types: {expected:?} vs {actual:?}")]
    ArityMismatch {
        expected: (usize, usize, usize, usize),
        actual: (usize, usize, usize, usize),
    },

    #[error("cannot merge {old:?} and {new:?} at polarity {polarity:?}")]
    MergeImpossible {
        old: ValueType,
        new: ValueType,
        polarity: crate::compare::Polarity,
    },

    #[error("cannot merge capture sets {old:?} and {new:?}")]
    CaptureMergeImpossible { old: CaptureSet, new: CaptureSet },

    /// Ambient addition: an effect atom required by a function's body
    /// is not covered by the effect row the caller offered. Not one of
    /// spec.md §7's four named variants, but the taxonomy there is
    /// explicitly non-exhaustive ("the taxonomy of solver failures"),
    /// and `unify_function_types`' effect comparison (spec.md §4.4)
    /// needs *some* user-visible failure to raise.
    #[error("effect {missing:?} is not covered by the callee's effect row")]
    EffectMismatch { missing: EffectAtom },

    #[error(transparent)]
    SubstitutionConflict(#[from] SubstitutionConflict),

    /// A programmer-error assertion violation: something the solver's
    /// own invariants should have already prevented (spec.md §7's
    /// "internal assertion violations... are programmer errors and
    /// are fatal").
    #[error("solver invariant violated: {0}")]
    InvariantViolation(String),
}
