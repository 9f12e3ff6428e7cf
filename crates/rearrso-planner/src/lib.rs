//! # rearrso-planner
//!
//! Rearrangement pattern compiler for ReaRSo.
//!
//! This crate turns a compact axis-rearrangement notation such as
//! `"(h w) c -> h w c"` into a validated [`RearrangePlan`]: an ordered
//! sequence of primitive shape operations (split, permute, merge-reshape,
//! broadcast) that an executor applies against a dense tensor.
//!
//! ## Pipeline
//!
//! - **Tokenizer / classifier** ([`parser`]): pattern string → [`Pattern`]
//!   of tagged [`AxisToken`]s
//! - **Shape resolver** ([`resolver`]): array shape + axis-length hints →
//!   every axis name bound to a concrete size and position
//! - **Plan builder** ([`plan`]): resolved shapes → instruction sequence
//!
//! Each stage consumes the prior stage's output; all validation happens
//! here, before any array operation runs.
//!
//! ## Quick Start
//!
//! ```
//! use rearrso_planner::{AxisHints, RearrangePlan};
//!
//! let hints = AxisHints::new().with("h", 3);
//! let plan = RearrangePlan::compile(&[12, 10], "(h w) c -> h w c", &hints).unwrap();
//!
//! assert_eq!(&plan.output_shape[..], &[3, 4, 10]);
//! ```
//!
//! ## Errors
//!
//! Compilation fails with a distinct, inspectable [`RearrangeError`] kind:
//! syntax, rank, shape-mismatch, ambiguous-split, or unknown-axis. The
//! first failure stops the pipeline; nothing is retried or downgraded.

#![deny(warnings)]

pub mod error;
pub mod hints;
pub mod parser;
pub mod plan;
pub mod resolver;

#[cfg(test)]
mod property_tests;

// Re-exports
pub use error::{RearrangeError, ShapeMismatchError, SyntaxError};
pub use hints::AxisHints;
pub use parser::{AxisToken, Pattern};
pub use plan::{RearrangePlan, RearrangeStep};
pub use resolver::{AxisPositionMap, ResolvedShapes, ShapeDict};
