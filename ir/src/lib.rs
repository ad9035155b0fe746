//! Closed, structural data model for value types, block types,
//! capture sets and effects.
//!
//! This crate is pure data: it exposes constructors, structural
//! pattern matching, and substitution, but performs no unification and
//! owns no mutable solver state. That lives in `efx-solve`.

mod capture;
mod effect;
mod ident;
mod subst;
mod ty;
mod uvar;

pub use capture::{CaptureAtom, CaptureSet};
pub use effect::{EffectAtom, Effects};
pub use ident::{CapabilityId, CaptureParamId, CtorId, EffectId, InterfaceId, TypeParamId};
pub use subst::{Substitution, SubstitutionConflict};
pub use ty::{BlockType, FunctionType, InterfaceType, ValueType};
pub use uvar::{CaptureUVar, CaptureUVarRole, ScopeId, UVar, UVarRole};
