//! Random combinational module generator.
//!
//! Each module is a flat netlist of continuous assignments: a list of
//! sequentially named inputs, a chain of intermediate wires, and outputs
//! driven by sum-of-products terms over everything declared before them.
//! A small share of intermediates are adders, subtractors or comparators over
//! bit concatenations; the individual bits of an adder become selectable
//! literals for later terms.

#![warn(missing_docs)]

mod module;
mod term;
mod wire;

pub use module::{generate, generate_with_shape, CombModule, CombShape};
pub use term::{random_term, Literal, Term};
pub use wire::{ArithOp, CompareOp, Concat, TempWire};
