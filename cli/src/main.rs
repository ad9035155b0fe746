//! A tiny demo harness over the solver, wired up the way `chalk-repl`
//! wires a terminal session to chalk's solver: here there is no parser
//! or REPL loop, only a handful of built-in `ValueType`/`BlockType`
//! fixtures exercised through `tracing`-visible `UnificationScope`
//! calls, so a developer can watch constraint propagation without
//! reaching for `chalk-repl`'s concrete syntax (out of scope here).

use clap::{Parser, ValueEnum};
use efx_ir::{BlockType, Effects, FunctionType, InterfaceId, InterfaceType, UVarRole, ValueType};
use efx_solve::{ErrorReporter, SolveError, TracingErrorReporter, UnificationScope};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Demo {
    /// Reflexivity and `TTop`/`TBottom` absorption.
    Lattice,
    /// Two fresh variables sandwiched to a concrete bound.
    Sandwich,
    /// Mutual subtyping collapsing two variables into one class.
    Collapse,
    /// A contravariant function-type subtyping check.
    Function,
}

#[derive(Parser, Debug)]
#[command(name = "efx-cli", about = "Demo harness over the capture/type solver")]
struct Args {
    /// Which built-in scenario to run.
    #[arg(value_enum, default_value_t = Demo::Lattice)]
    demo: Demo,

    /// Shorthand for `--log-level debug`.
    #[arg(long)]
    trace: bool,

    /// `tracing` filter directive, e.g. `efx_solve=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let filter = if args.trace {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match args.demo {
        Demo::Lattice => run_lattice(),
        Demo::Sandwich => run_sandwich(),
        Demo::Collapse => run_collapse(),
        Demo::Function => run_function(),
    };

    // The CLI is the consumer embedding the solver, so it is the call
    // site that owns an `ErrorReporter` and turns a `SolveError` into
    // `abort(message)` (spec.md §6/§7): every other crate in the
    // workspace only ever propagates `Result<_, SolveError>`.
    if let Err(err) = result {
        TracingErrorReporter.abort(&err.to_string());
    }
}

fn int() -> ValueType {
    ValueType::app(efx_ir::CtorId::new("Int"), vec![])
}

fn run_lattice() -> Result<(), SolveError> {
    let mut scope = UnificationScope::new();
    scope.require_subtype(&int(), &int())?;
    tracing::info!("Int <: Int: ok");
    scope.require_subtype(&int(), &ValueType::TTop)?;
    tracing::info!("Int <: Top: ok");
    scope.require_subtype(&ValueType::TBottom, &int())?;
    tracing::info!("Bottom <: Int: ok");
    Ok(())
}

fn run_sandwich() -> Result<(), SolveError> {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);
    scope.require_subtype(&int(), &ValueType::UVar(x))?;
    scope.require_subtype(&ValueType::UVar(x), &int())?;
    tracing::info!(?x, bounds = ?scope.bounds_for(x), "sandwiched variable");
    Ok(())
}

fn run_collapse() -> Result<(), SolveError> {
    let mut scope = UnificationScope::new();
    let x = scope.fresh(UVarRole::InferredArgument);
    let y = scope.fresh(UVarRole::InferredArgument);
    scope.require_subtype(&ValueType::UVar(x), &ValueType::UVar(y))?;
    scope.require_subtype(&ValueType::UVar(y), &ValueType::UVar(x))?;
    tracing::info!(
        collapsed = scope.is_subtype(&ValueType::UVar(x), &ValueType::UVar(y))
            && scope.is_subtype(&ValueType::UVar(y), &ValueType::UVar(x)),
        "mutual subtyping"
    );
    Ok(())
}

fn run_function() -> Result<(), SolveError> {
    let wide = BlockType::Function(FunctionType {
        tparams: vec![],
        cparams: vec![],
        vparams: vec![ValueType::TTop],
        bparams: vec![],
        result: Box::new(int()),
        effects: Effects::empty(),
    });
    let narrow = BlockType::Function(FunctionType {
        tparams: vec![],
        cparams: vec![],
        vparams: vec![int()],
        bparams: vec![],
        result: Box::new(int()),
        effects: Effects::empty(),
    });

    let mut scope = UnificationScope::new();
    scope.require_subtype_block(&wide, &narrow)?;
    tracing::info!("(Top) -> Int <: (Int) -> Int: ok");

    let eq_int = BlockType::Interface(InterfaceType {
        id: InterfaceId::new("Eq"),
        args: vec![int()],
    });
    tracing::info!("Eq[Int] instance: {:?}", eq_int);
    Ok(())
}
