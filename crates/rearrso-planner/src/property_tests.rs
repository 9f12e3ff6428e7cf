//! Property-based tests for the pattern compiler

use proptest::prelude::*;

use crate::hints::AxisHints;
use crate::plan::RearrangePlan;

/// Random small shapes of rank 1..=4
fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..6, 1..=4)
}

/// Axis names `a0 a1 ...` for a rank-n pattern side
fn axis_names(rank: usize) -> Vec<String> {
    (0..rank).map(|i| format!("a{}", i)).collect()
}

proptest! {
    /// A pure permutation never changes the element count
    #[test]
    fn prop_permutation_preserves_count(shape in shape_strategy()) {
        let names = axis_names(shape.len());
        let mut reversed = names.clone();
        reversed.reverse();
        let pattern = format!("{} -> {}", names.join(" "), reversed.join(" "));

        let plan = RearrangePlan::compile(&shape, &pattern, &AxisHints::new()).unwrap();
        let input: usize = shape.iter().product();
        let output: usize = plan.output_shape.iter().product();
        prop_assert_eq!(input, output);

        let mut expected: Vec<usize> = shape.clone();
        expected.reverse();
        prop_assert_eq!(&plan.output_shape[..], &expected[..]);
    }

    /// Compiling a pattern and then its syntactic reverse restores the
    /// original shape
    #[test]
    fn prop_round_trip_restores_shape(shape in shape_strategy()) {
        let names = axis_names(shape.len());
        let mut reversed = names.clone();
        reversed.reverse();
        let forward = format!("{} -> {}", names.join(" "), reversed.join(" "));
        let backward = format!("{} -> {}", reversed.join(" "), names.join(" "));

        let plan = RearrangePlan::compile(&shape, &forward, &AxisHints::new()).unwrap();
        let back =
            RearrangePlan::compile(&plan.output_shape, &backward, &AxisHints::new()).unwrap();
        prop_assert_eq!(&back.output_shape[..], &shape[..]);
    }

    /// Merging every axis into one group yields the full product
    #[test]
    fn prop_merge_all_yields_product(shape in shape_strategy()) {
        let names = axis_names(shape.len());
        let pattern = format!("{} -> ({})", names.join(" "), names.join(" "));

        let plan = RearrangePlan::compile(&shape, &pattern, &AxisHints::new()).unwrap();
        let product: usize = shape.iter().product();
        prop_assert_eq!(&plan.output_shape[..], &[product][..]);
    }

    /// Splitting a merged dimension with full hints restores the factors
    #[test]
    fn prop_split_recovers_factors(a in 1usize..6, b in 1usize..6) {
        let hints = AxisHints::new().with("a", a).with("b", b);
        let plan = RearrangePlan::compile(&[a * b], "(a b) -> a b", &hints).unwrap();
        prop_assert_eq!(&plan.output_shape[..], &[a, b][..]);
    }

    /// A broadcast multiplies the element count by the introduced size
    #[test]
    fn prop_broadcast_scales_count(shape in shape_strategy(), extra in 1usize..6) {
        let names = axis_names(shape.len());
        let pattern = format!("{} -> zz {}", names.join(" "), names.join(" "));
        let hints = AxisHints::new().with("zz", extra);

        let plan = RearrangePlan::compile(&shape, &pattern, &hints).unwrap();
        let input: usize = shape.iter().product();
        let output: usize = plan.output_shape.iter().product();
        prop_assert_eq!(output, input * extra);
    }

    /// An ellipsis pattern compiles for any rank that covers the explicit
    /// axes
    #[test]
    fn prop_ellipsis_absorbs_any_rank(shape in prop::collection::vec(1usize..6, 1..=5)) {
        let plan =
            RearrangePlan::compile(&shape, "... c -> c ...", &AxisHints::new()).unwrap();
        let rank = shape.len();
        prop_assert_eq!(plan.output_shape.len(), rank);
        prop_assert_eq!(plan.output_shape[0], shape[rank - 1]);
    }
}
