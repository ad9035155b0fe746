//! Bidirectional subtype/capture unification engine.
//!
//! Built on `efx-ir`'s closed data model: this crate owns all mutable
//! solver state (the constraint graph, the unification scope) and the
//! structural comparer that drives it (spec.md §4.3-4.5).

mod compare;
mod error;
mod graph;
mod reporter;
mod scope;

pub use compare::{Comparer, Polarity, QueryComparer, TypeComparer};
pub use error::SolveError;
pub use reporter::{ErrorReporter, SolveAborted, TracingErrorReporter};
pub use scope::{ScopeSnapshot, UnificationScope};
