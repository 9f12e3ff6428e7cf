//! Plan builder
//!
//! Lowers a resolved pattern into an ordered instruction sequence: all
//! splits first, then at most one permutation, then at most one terminal
//! reshape or broadcast. The executor applies these against a tensor
//! without re-validating anything; every failure mode is caught here.

use rearrso_core::Shape;

use crate::error::{RearrangeError, ShapeMismatchError};
use crate::hints::AxisHints;
use crate::parser::{AxisToken, Pattern};
use crate::resolver::{resolve, ResolvedShapes, ShapeDict};

/// One primitive shape operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RearrangeStep {
    /// Replace the dimension at `axis` with several whose product equals
    /// its size, row-major order preserved
    Split { axis: usize, sizes: Vec<usize> },
    /// Reorder dimensions; `order[i]` is the source axis of output axis `i`
    Permute { order: Vec<usize> },
    /// Collapse adjacent dimensions into merged axes of product size
    Reshape { shape: Shape },
    /// Expand size-1 dimensions by repetition. `source` is the broadcast
    /// layout the tensor must be reshaped into first (`target` with 1s in
    /// the broadcast slots); the backend broadcast is right-aligned, so
    /// the compiler decides where those 1s go.
    Broadcast { source: Shape, target: Shape },
}

/// Compiled rearrangement: the instruction sequence and the shape the
/// executor's result will have.
///
/// Built once per call; nothing is shared across invocations.
///
/// # Examples
///
/// ```
/// use rearrso_planner::{AxisHints, RearrangePlan, RearrangeStep};
///
/// let plan = RearrangePlan::compile(&[3, 4], "h w -> w h", &AxisHints::new()).unwrap();
/// assert_eq!(&plan.output_shape[..], &[4, 3]);
/// assert_eq!(plan.steps, vec![RearrangeStep::Permute { order: vec![1, 0] }]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangePlan {
    /// Instructions in application order: splits, then an optional
    /// permutation, then an optional terminal reshape or broadcast
    pub steps: Vec<RearrangeStep>,
    /// Shape of the rearranged result
    pub output_shape: Shape,
}

impl RearrangePlan {
    /// Parse a pattern string and compile it against an array shape
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_planner::{AxisHints, RearrangePlan};
    ///
    /// let hints = AxisHints::new().with("h", 3);
    /// let plan = RearrangePlan::compile(&[12, 10], "(h w) c -> h w c", &hints).unwrap();
    /// assert_eq!(&plan.output_shape[..], &[3, 4, 10]);
    /// ```
    pub fn compile(
        shape: &[usize],
        pattern: &str,
        hints: &AxisHints,
    ) -> Result<Self, RearrangeError> {
        let pattern = Pattern::parse(pattern)?;
        Self::compile_pattern(shape, &pattern, hints)
    }

    /// Compile an already-parsed pattern, reusing it across shapes
    pub fn compile_pattern(
        shape: &[usize],
        pattern: &Pattern,
        hints: &AxisHints,
    ) -> Result<Self, RearrangeError> {
        let resolved = resolve(shape, pattern, hints)?;
        build(pattern, &resolved)
    }
}

fn axis_size(sizes: &ShapeDict, name: &str) -> Result<usize, RearrangeError> {
    sizes.get(name).ok_or_else(|| RearrangeError::unknown_axis(name))
}

fn axis_position(resolved: &ResolvedShapes, name: &str) -> Result<usize, RearrangeError> {
    resolved
        .positions
        .named
        .get(name)
        .copied()
        .ok_or_else(|| RearrangeError::unknown_axis(name))
}

fn build(pattern: &Pattern, resolved: &ResolvedShapes) -> Result<RearrangePlan, RearrangeError> {
    let mut steps = Vec::new();

    // Stage 1: splits, left to right. Earlier splits have already widened
    // the tensor when a later one applies, so each split's axis index is
    // simply the running post-split position.
    let mut post_split_sizes: Vec<usize> = Vec::new();
    let mut singleton_in = resolved.positions.singletons.iter();

    for token in &pattern.input {
        match token {
            AxisToken::Name(name) => {
                post_split_sizes.push(axis_size(&resolved.sizes, name)?);
            }
            AxisToken::Singleton => {
                let &(_, actual) = singleton_in
                    .next()
                    .ok_or_else(|| RearrangeError::unknown_axis("1"))?;
                post_split_sizes.push(actual);
            }
            AxisToken::Composite(members) => {
                let sizes: Vec<usize> = members
                    .iter()
                    .map(|m| axis_size(&resolved.sizes, m))
                    .collect::<Result<_, _>>()?;
                if members.len() > 1 {
                    steps.push(RearrangeStep::Split {
                        axis: post_split_sizes.len(),
                        sizes: sizes.clone(),
                    });
                }
                post_split_sizes.extend(sizes);
            }
            AxisToken::Ellipsis => {
                post_split_sizes.extend(resolved.ellipsis_sizes.iter().copied());
            }
        }
    }

    let split_rank = post_split_sizes.len();

    // Stage 2: permutation and terminal shapes, walking the output side.
    // `source` mirrors `target` with 1s in the broadcast slots.
    let mut order: Vec<usize> = Vec::with_capacity(split_rank);
    let mut target = Shape::new();
    let mut source = Shape::new();
    let mut singleton_cursor = 0usize;
    let mut broadcast = false;
    let mut merged = false;

    let singletons = &resolved.positions.singletons;

    for token in &pattern.output {
        match token {
            AxisToken::Name(name) => {
                let size = axis_size(&resolved.sizes, name)?;
                if let Some(&pos) = resolved.positions.named.get(name) {
                    order.push(pos);
                    source.push(size);
                } else {
                    // Broadcast axis: expand the next input singleton, or
                    // introduce the axis from nothing.
                    broadcast = true;
                    if let Some(&(pos, actual)) = singletons.get(singleton_cursor) {
                        if actual != 1 {
                            return Err(ShapeMismatchError::BroadcastSource {
                                axis: name.clone(),
                                size: actual,
                            }
                            .into());
                        }
                        singleton_cursor += 1;
                        order.push(pos);
                    }
                    source.push(1);
                }
                target.push(size);
            }
            AxisToken::Singleton => {
                let &(pos, actual) = singletons
                    .get(singleton_cursor)
                    .ok_or_else(|| RearrangeError::unknown_axis("1"))?;
                singleton_cursor += 1;
                order.push(pos);
                target.push(actual);
                source.push(actual);
            }
            AxisToken::Composite(members) => {
                if members.len() > 1 {
                    merged = true;
                }
                let mut product = 1usize;
                for member in members {
                    order.push(axis_position(resolved, member)?);
                    product *= axis_size(&resolved.sizes, member)?;
                }
                target.push(product);
                source.push(product);
            }
            AxisToken::Ellipsis => {
                for (slot, &pos) in resolved.positions.ellipsis.iter().enumerate() {
                    order.push(pos);
                    target.push(resolved.ellipsis_sizes[slot]);
                    source.push(resolved.ellipsis_sizes[slot]);
                }
            }
        }
    }

    // Every post-split axis must be drawn exactly once; duplicates are
    // already impossible, so a short order means something was dropped.
    if order.len() != split_rank {
        return Err(find_dangling(pattern, resolved, &order, split_rank));
    }

    if !order.iter().copied().eq(0..split_rank) {
        steps.push(RearrangeStep::Permute {
            order: order.clone(),
        });
    }

    if broadcast {
        if merged {
            return Err(ShapeMismatchError::BroadcastWithMerge.into());
        }
        steps.push(RearrangeStep::Broadcast {
            source,
            target: target.clone(),
        });
    } else {
        let permuted: Shape = order.iter().map(|&p| post_split_sizes[p]).collect();
        if target != permuted {
            steps.push(RearrangeStep::Reshape {
                shape: target.clone(),
            });
        }
    }

    Ok(RearrangePlan {
        steps,
        output_shape: target,
    })
}

/// Name the leftmost input axis the output never consumed
fn find_dangling(
    pattern: &Pattern,
    resolved: &ResolvedShapes,
    order: &[usize],
    split_rank: usize,
) -> RearrangeError {
    let mut used = vec![false; split_rank];
    for &pos in order {
        used[pos] = true;
    }

    let mut singleton_idx = 0usize;
    for token in &pattern.input {
        match token {
            AxisToken::Name(name) => {
                if let Some(&pos) = resolved.positions.named.get(name) {
                    if !used[pos] {
                        return RearrangeError::dangling_axis(name);
                    }
                }
            }
            AxisToken::Composite(members) => {
                for member in members {
                    if let Some(&pos) = resolved.positions.named.get(member) {
                        if !used[pos] {
                            return RearrangeError::dangling_axis(member);
                        }
                    }
                }
            }
            AxisToken::Ellipsis => {
                if resolved.positions.ellipsis.iter().any(|&pos| !used[pos]) {
                    return RearrangeError::dangling_axis("...");
                }
            }
            AxisToken::Singleton => {
                if let Some(&(pos, _)) = resolved.positions.singletons.get(singleton_idx) {
                    if !used[pos] {
                        return RearrangeError::dangling_axis("1");
                    }
                }
                singleton_idx += 1;
            }
        }
    }
    RearrangeError::dangling_axis("1")
}
