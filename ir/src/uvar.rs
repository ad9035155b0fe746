//! Unification variables and the diagnostic role tags they carry.
//!
//! A `UVar`'s identity is its `(scope, index)` pair; equality is by
//! identity, never structural, per spec.md §3 ("variable equality is
//! by identity").

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies the `UnificationScope` that allocated a variable. Scoped
/// so a stray variable from a discarded scope cannot accidentally
/// compare equal to one from a live scope.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub(crate) u64);

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(0);

impl ScopeId {
    /// The sole process-wide piece of mutable state (spec.md §5, §9):
    /// a monotonically increasing counter, serialized by the atomic.
    /// Observable only in diagnostic output (`Debug`).
    pub fn fresh() -> Self {
        ScopeId(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope{}", self.0)
    }
}

/// Purely-diagnostic tag recording *why* a variable was allocated.
/// Never consulted by the solving algorithm itself (spec.md §3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UVarRole {
    /// Instantiation of the bound type parameter named here.
    TypeVariableInstantiation(&'static str),
    /// Introduced while merging two bounds (`TypeComparer::merge`).
    MergeVariable,
    /// Introduced while inferring a function's return type.
    InferredReturn,
    /// Introduced while inferring an argument's type.
    InferredArgument,
}

/// A value-type unification variable (a "skolem" when it stands for a
/// rigid, instantiated type parameter).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UVar {
    pub(crate) scope: ScopeId,
    pub(crate) index: u32,
}

impl UVar {
    /// Constructs a variable with an explicit `(scope, index)`
    /// identity. Callers (in practice only `UnificationScope::fresh`)
    /// are responsible for never reusing an index within a scope.
    pub fn new(scope: ScopeId, index: u32) -> Self {
        UVar { scope, index }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

impl fmt::Debug for UVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}.{}", self.scope.0, self.index)
    }
}

/// Purely-diagnostic tag for capture-side unification variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureUVarRole {
    CaptureParamInstantiation(&'static str),
    MergeVariable,
    InferredCapture,
}

/// A capture-set unification variable.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureUVar {
    pub(crate) scope: ScopeId,
    pub(crate) index: u32,
}

impl CaptureUVar {
    pub fn new(scope: ScopeId, index: u32) -> Self {
        CaptureUVar { scope, index }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

impl fmt::Debug for CaptureUVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?c{}.{}", self.scope.0, self.index)
    }
}
