//! # rearrso-exec
//!
//! Execution API for ReaRSo.
//!
//! This crate provides:
//! - `rearrange` - the main public API for axis rearrangement
//! - `rearrange_ex` - a builder variant for incremental axis hints
//! - `apply_plan` - applies an already-compiled plan to a tensor
//!
//! All validation happens during compilation in `rearrso-planner`; no
//! backend primitive runs until the whole plan is known to be valid.

#![deny(warnings)]

pub mod executor;

// Re-exports
pub use executor::apply_plan;
pub use rearrso_planner::{AxisHints, RearrangeError, RearrangePlan};

use anyhow::Result;
use scirs2_core::numeric::Num;

use rearrso_core::DenseND;

/// Rearrange a tensor's axes according to a pattern.
///
/// Compiles the pattern against the tensor's shape and applies the
/// resulting plan. Hints resolve ambiguous split factors and introduce
/// broadcast axes.
///
/// # Example
/// ```
/// use rearrso_core::DenseND;
/// use rearrso_exec::{rearrange, AxisHints};
///
/// let t = DenseND::<f64>::from_vec((0..120).map(|x| x as f64).collect(), &[12, 10]).unwrap();
/// let out = rearrange(&t, "(h w) c -> h w c", &AxisHints::new().with("h", 3)).unwrap();
/// assert_eq!(out.shape(), &[3, 4, 10]);
/// ```
///
/// # Errors
///
/// Fails with a [`RearrangeError`] (retrievable via `downcast_ref`) when
/// the pattern is malformed or incompatible with the tensor's shape.
pub fn rearrange<T>(tensor: &DenseND<T>, pattern: &str, hints: &AxisHints) -> Result<DenseND<T>>
where
    T: Clone + Num,
{
    let plan = RearrangePlan::compile(tensor.shape(), pattern, hints)?;
    apply_plan(tensor, &plan)
}

/// Build a rearrangement with incremental axis hints
///
/// # Example
/// ```
/// use rearrso_core::DenseND;
/// use rearrso_exec::rearrange_ex;
///
/// let t = DenseND::<f64>::from_vec((0..120).map(|x| x as f64).collect(), &[12, 10]).unwrap();
/// let out = rearrange_ex("(h w) c -> h w c")
///     .input(&t)
///     .axis("h", 3)
///     .run()
///     .unwrap();
/// assert_eq!(out.shape(), &[3, 4, 10]);
/// ```
pub fn rearrange_ex<T>(pattern: &str) -> RearrangeBuilder<'_, T>
where
    T: Clone + Num,
{
    RearrangeBuilder::new(pattern)
}

/// Builder for rearrangement operations
pub struct RearrangeBuilder<'a, T> {
    pattern: String,
    input: Option<&'a DenseND<T>>,
    hints: AxisHints,
}

impl<'a, T> RearrangeBuilder<'a, T>
where
    T: Clone + Num,
{
    /// Create a new builder for a pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            input: None,
            hints: AxisHints::new(),
        }
    }

    /// Set the input tensor
    pub fn input(mut self, tensor: &'a DenseND<T>) -> Self {
        self.input = Some(tensor);
        self
    }

    /// Add one axis-length hint
    pub fn axis(mut self, name: impl Into<String>, size: usize) -> Self {
        self.hints = self.hints.with(name, size);
        self
    }

    /// Replace all hints at once
    pub fn hints(mut self, hints: &AxisHints) -> Self {
        self.hints = hints.clone();
        self
    }

    /// Compile and execute the rearrangement
    ///
    /// # Errors
    ///
    /// Returns an error if no input was provided or compilation fails.
    pub fn run(self) -> Result<DenseND<T>> {
        let input = self
            .input
            .ok_or_else(|| anyhow::anyhow!("No input provided to rearrange_ex"))?;
        rearrange(input, &self.pattern, &self.hints)
    }
}
