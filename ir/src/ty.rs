//! Value types, block types and function types (spec.md §3).
//!
//! All types here are closed, finite trees: they carry no mutable
//! solver state, and (outside `UVar`/`TypeParam` leaves) no notion of
//! "yet to be solved". This is what lets `TypeComparer::merge`
//! terminate (spec.md §4.1's termination rationale).

use crate::capture::CaptureSet;
use crate::effect::Effects;
use crate::ident::{CtorId, InterfaceId, TypeParamId};
use crate::uvar::UVar;
use std::fmt;

/// A value type, as spec.md §3 defines it: `App`, `Boxed`,
/// `TypeParam`, `UVar`, or the lattice endpoints `TTop`/`TBottom`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// A type constructor applied to a finite, ordered argument list,
    /// e.g. `List[Int]` is `App(List, [App(Int, [])])`.
    App(CtorId, Vec<ValueType>),
    /// A boxed block type, capturing the resources in `CaptureSet`.
    Boxed(Box<BlockType>, CaptureSet),
    /// A reference to a bound type parameter (not yet instantiated).
    TypeParam(TypeParamId),
    /// A unification variable.
    UVar(UVar),
    /// The universal supertype.
    TTop,
    /// The universal subtype.
    TBottom,
}

impl ValueType {
    pub fn app(ctor: impl Into<CtorId>, args: Vec<ValueType>) -> Self {
        ValueType::App(ctor.into(), args)
    }

    pub fn as_uvar(&self) -> Option<UVar> {
        match self {
            ValueType::UVar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_uvar(&self) -> bool {
        self.as_uvar().is_some()
    }

    pub fn is_top(&self) -> bool {
        matches!(self, ValueType::TTop)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, ValueType::TBottom)
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::App(ctor, args) if args.is_empty() => write!(f, "{:?}", ctor),
            ValueType::App(ctor, args) => write!(f, "{:?}{:?}", ctor, args),
            ValueType::Boxed(block, caps) => write!(f, "Boxed({:?}, {:?})", block, caps),
            ValueType::TypeParam(id) => write!(f, "{:?}", id),
            ValueType::UVar(v) => write!(f, "{:?}", v),
            ValueType::TTop => write!(f, "Top"),
            ValueType::TBottom => write!(f, "Bottom"),
        }
    }
}

/// An interface type: a nominal interface identifier, optionally
/// applied to value-type arguments.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceType {
    pub id: InterfaceId,
    pub args: Vec<ValueType>,
}

impl fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{:?}", self.id)
        } else {
            write!(f, "{:?}{:?}", self.id, self.args)
        }
    }
}

/// A function type, as spec.md §3:
/// `FunctionType(tparams, cparams, vparams, bparams, result, effects)`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionType {
    pub tparams: Vec<TypeParamId>,
    pub cparams: Vec<crate::ident::CaptureParamId>,
    pub vparams: Vec<ValueType>,
    pub bparams: Vec<BlockType>,
    pub result: Box<ValueType>,
    pub effects: Effects,
}

impl FunctionType {
    /// Arities as a tuple, used by `unify_function_types`'s
    /// ArityMismatch check (spec.md §4.4).
    pub fn arities(&self) -> (usize, usize, usize, usize) {
        (
            self.tparams.len(),
            self.cparams.len(),
            self.vparams.len(),
            self.bparams.len(),
        )
    }
}

impl fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tparams.is_empty() || !self.cparams.is_empty() {
            write!(f, "[{:?}, {:?}] ", self.tparams, self.cparams)?;
        }
        write!(f, "({:?})", self.vparams)?;
        if !self.bparams.is_empty() {
            write!(f, "{{{:?}}}", self.bparams)?;
        }
        write!(f, " -> {:?} / {:?}", self.result, self.effects)
    }
}

/// A block type: the "second-class" counterpart to a value type,
/// either a bare interface type or a function type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockType {
    Interface(InterfaceType),
    Function(FunctionType),
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::Interface(i) => write!(f, "{:?}", i),
            BlockType::Function(fun) => write!(f, "{:?}", fun),
        }
    }
}
