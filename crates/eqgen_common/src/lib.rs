//! Shared foundations for the eqgen fixture generators.
//!
//! This crate provides the seeded random stream every generator draws from,
//! the `uut_<index>` naming scheme shared by modules and scripts, the growing
//! variable pool, and the generation error type.

#![warn(missing_docs)]

pub mod error;
pub mod name;
pub mod pool;
pub mod rng;

pub use error::{GenError, GenErrorKind, GenResult, Stage};
pub use name::{module_name, pp_script_file_name, script_file_name, source_file_name};
pub use pool::VarPool;
pub use rng::{coin, pick, seeded, GenRng};
