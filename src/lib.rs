//! The `jlc` command-line front end for lambda grouping.
//!
//! Reads programs in the JSON form of [`jlc_ir::Program`], runs
//! [`jlc_lambda::LambdaGroupingPass`] over them and reports the result.

pub use jlc_common as common;
pub use jlc_ir as ir;
pub use jlc_lambda as lambda;

pub mod cli;

pub mod tracing_config;
