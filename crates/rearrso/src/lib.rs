//! # ReaRSo - Axis Rearrangement for Rust Tensors
//!
//! Einops-style axis rearrangement: a compact pattern notation compiled
//! into split, permute, merge, and broadcast operations over dense
//! tensors.
//!
//! This is the **meta crate** that re-exports all ReaRSo components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use rearrso::prelude::*;
//!
//! let image = DenseND::<f64>::zeros(&[12, 10]);
//! let out = rearrange(&image, "(h w) c -> h w c", &AxisHints::new().with("h", 3)).unwrap();
//! assert_eq!(out.shape(), &[3, 4, 10]);
//! ```
//!
//! ## Components
//!
//! ### Dense Tensors ([`core`])
//!
//! The `DenseND` backend: views, reshape, split, permute, broadcast.
//!
//! ```
//! use rearrso::core::DenseND;
//!
//! let tensor = DenseND::<f64>::ones(&[2, 3, 4]);
//! let merged = tensor.reshape(&[6, 4]).unwrap();
//! assert_eq!(merged.shape(), &[6, 4]);
//! ```
//!
//! ### Pattern Compiler ([`planner`])
//!
//! Parses the notation, resolves axis sizes against an array shape, and
//! builds an instruction sequence without touching any data.
//!
//! ```
//! use rearrso::planner::{AxisHints, RearrangePlan};
//!
//! let plan = RearrangePlan::compile(&[3, 4], "h w -> w h", &AxisHints::new()).unwrap();
//! assert_eq!(&plan.output_shape[..], &[4, 3]);
//! ```
//!
//! ### Execution ([`exec`])
//!
//! The `rearrange` entry point and a builder for incremental hints.
//!
//! ```
//! use rearrso::core::DenseND;
//! use rearrso::exec::rearrange_ex;
//!
//! let t = DenseND::<f64>::zeros(&[12, 10]);
//! let out = rearrange_ex("(h w) c -> h w c")
//!     .input(&t)
//!     .axis("h", 3)
//!     .run()
//!     .unwrap();
//! assert_eq!(out.shape(), &[3, 4, 10]);
//! ```

#![deny(warnings)]

// Re-export all components
pub use rearrso_core as core;
pub use rearrso_exec as exec;
pub use rearrso_planner as planner;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use rearrso::prelude::*;
    //!
    //! let tensor = DenseND::<f64>::zeros(&[10, 20, 30]);
    //! let out = rearrange(&tensor, "a b c -> c (a b)", &AxisHints::new()).unwrap();
    //! assert_eq!(out.shape(), &[30, 200]);
    //! ```

    // Core types
    pub use crate::core::{DenseND, Shape};

    // Pattern compiler
    pub use crate::planner::{AxisHints, Pattern, RearrangeError, RearrangePlan};

    // Execution
    pub use crate::exec::{apply_plan, rearrange, rearrange_ex};
}
