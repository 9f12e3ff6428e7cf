//! Plan application
//!
//! Maps each compiled instruction onto a backend primitive. The plan is
//! fully validated before this point; failures here indicate a backend
//! contract violation, not bad user input.

use anyhow::Result;
use scirs2_core::numeric::Num;

use rearrso_core::DenseND;
use rearrso_planner::{RearrangePlan, RearrangeStep};

/// Apply a compiled plan to a tensor, producing the rearranged result.
///
/// Steps run in plan order: splits, then the permutation, then the
/// terminal reshape or broadcast. The input is never mutated.
pub fn apply_plan<T>(tensor: &DenseND<T>, plan: &RearrangePlan) -> Result<DenseND<T>>
where
    T: Clone + Num,
{
    let mut current = tensor.clone();
    for step in &plan.steps {
        current = match step {
            RearrangeStep::Split { axis, sizes } => current.split_axis(*axis, sizes)?,
            RearrangeStep::Permute { order } => current.permute(order)?,
            RearrangeStep::Reshape { shape } => current.reshape(shape)?,
            RearrangeStep::Broadcast { source, target } => {
                // The broadcast primitive is right-aligned; reshape into
                // the compiler-chosen size-1 layout first when needed.
                let staged = if current.shape() != &source[..] {
                    current.reshape(source)?
                } else {
                    current
                };
                staged.broadcast_to(target)?
            }
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rearrso_planner::AxisHints;

    fn iota(shape: &[usize]) -> DenseND<f64> {
        let n: usize = shape.iter().product();
        DenseND::from_vec((0..n).map(|x| x as f64).collect(), shape).unwrap()
    }

    #[test]
    fn test_apply_empty_plan_is_identity() {
        let t = iota(&[2, 3]);
        let plan = RearrangePlan::compile(&[2, 3], "a b -> a b", &AxisHints::new()).unwrap();
        let out = apply_plan(&t, &plan).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out[&[1, 2]], 5.0);
    }

    #[test]
    fn test_apply_split_and_permute() {
        let t = iota(&[6]);
        let hints = AxisHints::new().with("a", 2);
        let plan = RearrangePlan::compile(&[6], "(a b) -> b a", &hints).unwrap();
        let out = apply_plan(&t, &plan).unwrap();
        assert_eq!(out.shape(), &[3, 2]);
        // Row-major split of [0..6] into (2, 3), then transposed
        assert_eq!(out[&[0, 0]], 0.0);
        assert_eq!(out[&[0, 1]], 3.0);
        assert_eq!(out[&[2, 0]], 2.0);
        assert_eq!(out[&[2, 1]], 5.0);
    }

    #[test]
    fn test_apply_broadcast_repeats_rows() {
        let t = iota(&[1, 3]);
        let hints = AxisHints::new().with("r", 2);
        let plan = RearrangePlan::compile(&[1, 3], "1 c -> r c", &hints).unwrap();
        let out = apply_plan(&t, &plan).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out[&[0, 1]], 1.0);
        assert_eq!(out[&[1, 1]], 1.0);
    }
}
