//! # rearrso-core
//!
//! Dense tensor types and shape primitives for ReaRSo.
//!
//! This crate provides the array backend the rearrangement compiler plans
//! against:
//!
//! - **Dense tensor representation** ([`DenseND`]) with dynamic rank
//! - **Shape primitives** (`split_axis`, `permute`, `broadcast_to`, `reshape`)
//!   with row-major element-ordering guarantees
//!
//! ## SciRS2 Integration
//!
//! **CRITICAL:** This crate uses `scirs2-core` for all array operations.
//! Direct use of `ndarray`, `rand`, or `num-traits` is forbidden.
//!
//! ## Memory Layout
//!
//! Tensors default to C-contiguous (row-major) layout. `reshape` is
//! zero-copy when the tensor is contiguous; `permute` adjusts strides and
//! never reorders elements in memory.
//!
//! ## Quick Start
//!
//! ```
//! use rearrso_core::DenseND;
//!
//! let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
//! assert_eq!(tensor.shape(), &[2, 3, 4]);
//! assert_eq!(tensor.rank(), 3);
//!
//! // Split one axis into two (first listed size is slowest-varying)
//! let split = tensor.split_axis(2, &[2, 2]).unwrap();
//! assert_eq!(split.shape(), &[2, 3, 2, 2]);
//!
//! // Permute axes
//! let permuted = split.permute(&[3, 0, 1, 2]).unwrap();
//! assert_eq!(permuted.shape(), &[2, 2, 3, 2]);
//! ```
//!
//! ## Error Handling
//!
//! Operations return `Result<T, anyhow::Error>`:
//!
//! ```
//! use rearrso_core::DenseND;
//!
//! let tensor = DenseND::<f64>::zeros(&[2, 3]);
//!
//! // This will fail - incompatible size
//! assert!(tensor.reshape(&[7]).is_err());
//! ```

#![deny(warnings)]

pub mod dense;
pub mod types;


pub use dense::DenseND;
pub use types::{Axis, Rank, Shape};
