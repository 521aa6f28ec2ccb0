//! Random clocked state-machine module generator.
//!
//! Each module drives three registers `x`, `y`, `z` from three inputs `a`,
//! `b`, `c` through a single `always @(posedge clk)` block. A `case` over a
//! state register selects per-state update expressions and guarded
//! transitions. Every data signal is exposed bit by bit on the port list and
//! reassembled internally, and half of the modules use two reset inputs.

#![warn(missing_docs)]

pub mod expr;
mod machine;
mod signal;

pub use expr::{random_expr, random_simple_expr, BinaryOp, Expr, UnaryOp};
pub use machine::{
    generate, generate_with_topology, CaseArm, FsmModule, Guard, GuardOp, ResetTopology,
    StateEncoding,
};
pub use signal::{Direction, Signal, SIGNAL_NAMES};
