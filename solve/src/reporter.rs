//! `ErrorReporter`: the sole sink for user-visible solver diagnostics
//! (spec.md §6).

use std::fmt;

/// Receives `abort(message)` and never returns. Production embeddings
/// are expected to supply their own impl that turns `abort` into a
/// proper diagnostic with non-`!` control flow (spec.md §6's
/// "consumer-side callback"; SPEC_FULL.md §6 notes that embedding is
/// out of scope here).
pub trait ErrorReporter {
    fn abort(&self, message: &str) -> !;
}

/// The payload unwound through when `TracingErrorReporter::abort`
/// diverges, so test harnesses can assert on the message via
/// `std::panic::catch_unwind` without every `ErrorReporter` needing to
/// be `Result`-based.
#[derive(Debug, Clone)]
pub struct SolveAborted(pub String);

impl fmt::Display for SolveAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default, non-panicking-in-the-logging-sense reporter: logs at
/// `tracing::error!` (mirroring `chalk-solve`'s own use of the
/// `tracing` spans for unifier activity) and then diverges by
/// panicking with a `SolveAborted` payload.
#[derive(Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn abort(&self, message: &str) -> ! {
        tracing::error!(%message, "solver aborted");
        std::panic::panic_any(SolveAborted(message.to_string()))
    }
}
