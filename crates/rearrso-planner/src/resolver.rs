//! Shape resolution
//!
//! Walks the input tokens against the array's actual shape, binding every
//! axis name to a concrete size and to the position it will occupy after
//! all splits have been applied (but before the permutation). Consumes one
//! input dimension per non-ellipsis token; the ellipsis absorbs whatever
//! rank is left over.

use std::collections::HashMap;

use crate::error::{RearrangeError, ShapeMismatchError};
use crate::hints::AxisHints;
use crate::parser::{AxisToken, Pattern};

/// Insertion-ordered map from axis name to resolved size.
///
/// Axis counts are small, so a linear scan over a `Vec` beats hashing.
///
/// # Examples
///
/// ```
/// use rearrso_planner::ShapeDict;
///
/// let mut dict = ShapeDict::new();
/// dict.insert("h", 3);
/// dict.insert("w", 4);
/// assert_eq!(dict.get("h"), Some(3));
/// assert_eq!(dict.get("c"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeDict {
    entries: Vec<(String, usize)>,
}

impl ShapeDict {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resolved size
    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, size)| size)
    }

    /// Check whether a name has been resolved
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Record a size, updating in place on re-resolution
    pub fn insert(&mut self, name: &str, size: usize) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = size;
        } else {
            self.entries.push((name.to_string(), size));
        }
    }

    /// Iterate in first-resolution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Number of resolved names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing has been resolved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where every input axis lands after splits, before the permutation.
///
/// Ellipsis slots and singleton dimensions are tracked positionally rather
/// than under synthetic names; their relative order is what matters.
#[derive(Debug, Clone, Default)]
pub struct AxisPositionMap {
    /// Named axis → post-split index
    pub named: HashMap<String, usize>,
    /// Post-split indices of the ellipsis slots, in original order
    pub ellipsis: Vec<usize>,
    /// Post-split index and consumed dimension size of each input `1`
    /// marker, in input order
    pub singletons: Vec<(usize, usize)>,
}

/// Output of the shape resolver, input to the plan builder
#[derive(Debug, Clone)]
pub struct ResolvedShapes {
    /// Every axis name bound to its size
    pub sizes: ShapeDict,
    /// Every axis bound to its post-split position
    pub positions: AxisPositionMap,
    /// Sizes of the dimensions the input ellipsis absorbed, in order
    pub ellipsis_sizes: Vec<usize>,
}

/// Resolve every axis name against the array shape and caller hints.
///
/// Fails with [`RearrangeError::Rank`] when the array's rank is
/// incompatible with the pattern, [`RearrangeError::AmbiguousSplit`] /
/// [`RearrangeError::ShapeMismatch`] when a composite cannot be factored,
/// and [`RearrangeError::UnknownAxis`] when an output name resolves to
/// nothing.
pub fn resolve(
    shape: &[usize],
    pattern: &Pattern,
    hints: &AxisHints,
) -> Result<ResolvedShapes, RearrangeError> {
    let rank = shape.len();
    let has_ellipsis = pattern.input.iter().any(AxisToken::is_ellipsis);
    let explicit = pattern
        .input
        .iter()
        .filter(|t| !t.is_ellipsis())
        .count();

    let ellipsis_len = if has_ellipsis {
        rank.checked_sub(explicit)
            .ok_or(RearrangeError::Rank { explicit, rank })?
    } else {
        if explicit != rank {
            return Err(RearrangeError::Rank { explicit, rank });
        }
        0
    };

    let mut sizes = ShapeDict::new();
    let mut positions = AxisPositionMap::default();
    let mut ellipsis_sizes = Vec::with_capacity(ellipsis_len);

    let mut dim = 0; // next input dimension to consume
    let mut pos = 0; // next post-split position to assign

    for token in &pattern.input {
        match token {
            AxisToken::Name(name) => {
                sizes.insert(name, shape[dim]);
                positions.named.insert(name.clone(), pos);
                dim += 1;
                pos += 1;
            }
            AxisToken::Singleton => {
                // The consumed size need not be 1 here; that is checked
                // only when the output broadcasts from this dimension.
                positions.singletons.push((pos, shape[dim]));
                dim += 1;
                pos += 1;
            }
            AxisToken::Composite(members) => {
                let size = shape[dim];
                resolve_composite(members, size, hints, &mut sizes)?;
                for member in members {
                    positions.named.insert(member.clone(), pos);
                    pos += 1;
                }
                dim += 1;
            }
            AxisToken::Ellipsis => {
                for _ in 0..ellipsis_len {
                    ellipsis_sizes.push(shape[dim]);
                    positions.ellipsis.push(pos);
                    dim += 1;
                    pos += 1;
                }
            }
        }
    }

    // Remaining hints introduce axes that never appear on the input side
    // (broadcast sources); an input-resolved size wins over its hint.
    for (name, size) in hints.iter() {
        if !sizes.contains(name) {
            sizes.insert(name, size);
        }
    }

    // Every named output axis must now resolve; merge members must come
    // from the input (a hint alone gives them no position).
    for token in &pattern.output {
        match token {
            AxisToken::Name(name) => {
                if !sizes.contains(name) {
                    return Err(RearrangeError::unknown_axis(name));
                }
            }
            AxisToken::Composite(members) => {
                for member in members {
                    if !positions.named.contains_key(member) {
                        return Err(RearrangeError::unknown_axis(member));
                    }
                }
            }
            AxisToken::Ellipsis | AxisToken::Singleton => {}
        }
    }

    Ok(ResolvedShapes {
        sizes,
        positions,
        ellipsis_sizes,
    })
}

/// Factor one consumed dimension across a composite's members.
///
/// Hinted members are fixed; at most one unhinted member is inferred by
/// exact division.
fn resolve_composite(
    members: &[String],
    size: usize,
    hints: &AxisHints,
    sizes: &mut ShapeDict,
) -> Result<(), RearrangeError> {
    let mut known = 1usize;
    let mut unresolved = Vec::new();

    for member in members {
        match hints.get(member) {
            Some(s) => known *= s,
            None => unresolved.push(member.clone()),
        }
    }

    if unresolved.len() > 1 {
        return Err(RearrangeError::AmbiguousSplit {
            group: members.join(" "),
            unresolved,
        });
    }

    let divisible = known > 0 && size % known == 0;
    let exact = unresolved.is_empty() && known == size;
    if (unresolved.is_empty() && !exact) || (!unresolved.is_empty() && !divisible) {
        return Err(ShapeMismatchError::SplitIndivisible {
            group: members.join(" "),
            size,
            known,
        }
        .into());
    }

    let inferred = size / known;
    for member in members {
        sizes.insert(member, hints.get(member).unwrap_or(inferred));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Pattern;

    fn resolve_pattern(
        shape: &[usize],
        pattern: &str,
        hints: &AxisHints,
    ) -> Result<ResolvedShapes, RearrangeError> {
        let pattern = Pattern::parse(pattern).unwrap();
        resolve(shape, &pattern, hints)
    }

    #[test]
    fn test_resolve_simple_names() {
        let resolved = resolve_pattern(&[3, 4], "h w -> w h", &AxisHints::new()).unwrap();
        assert_eq!(resolved.sizes.get("h"), Some(3));
        assert_eq!(resolved.sizes.get("w"), Some(4));
        assert_eq!(resolved.positions.named["h"], 0);
        assert_eq!(resolved.positions.named["w"], 1);
    }

    #[test]
    fn test_resolve_split_with_hint() {
        let hints = AxisHints::new().with("h", 3);
        let resolved = resolve_pattern(&[12, 10], "(h w) c -> h w c", &hints).unwrap();
        assert_eq!(resolved.sizes.get("h"), Some(3));
        assert_eq!(resolved.sizes.get("w"), Some(4));
        assert_eq!(resolved.sizes.get("c"), Some(10));
        // Post-split positions: h=0, w=1, c=2
        assert_eq!(resolved.positions.named["w"], 1);
        assert_eq!(resolved.positions.named["c"], 2);
    }

    #[test]
    fn test_resolve_split_fully_hinted() {
        let hints = AxisHints::new().with("a", 4).with("b", 6);
        let resolved = resolve_pattern(&[24], "(a b) -> a b", &hints).unwrap();
        assert_eq!(resolved.sizes.get("a"), Some(4));
        assert_eq!(resolved.sizes.get("b"), Some(6));
    }

    #[test]
    fn test_resolve_split_single_member_inferred() {
        let resolved = resolve_pattern(&[5, 2], "(a) b -> b a", &AxisHints::new()).unwrap();
        assert_eq!(resolved.sizes.get("a"), Some(5));
    }

    #[test]
    fn test_resolve_split_ambiguous() {
        let err = resolve_pattern(&[12, 4], "(h1 h2) w -> h1 h2 w", &AxisHints::new()).unwrap_err();
        assert!(matches!(err, RearrangeError::AmbiguousSplit { .. }));
    }

    #[test]
    fn test_resolve_split_indivisible() {
        let hints = AxisHints::new().with("h", 5);
        let err = resolve_pattern(&[12, 4], "(h w) c -> h w c", &hints).unwrap_err();
        assert!(matches!(err, RearrangeError::ShapeMismatch(_)));
    }

    #[test]
    fn test_resolve_split_fully_hinted_wrong_product() {
        let hints = AxisHints::new().with("a", 4).with("b", 3);
        let err = resolve_pattern(&[24], "(a b) -> a b", &hints).unwrap_err();
        assert!(matches!(err, RearrangeError::ShapeMismatch(_)));
    }

    #[test]
    fn test_resolve_rank_mismatch() {
        let err = resolve_pattern(&[3, 4, 5], "h w -> w h", &AxisHints::new()).unwrap_err();
        assert_eq!(err, RearrangeError::Rank { explicit: 2, rank: 3 });
    }

    #[test]
    fn test_resolve_too_many_axes_for_ellipsis() {
        let err = resolve_pattern(&[3], "... h w -> h w ...", &AxisHints::new()).unwrap_err();
        assert_eq!(err, RearrangeError::Rank { explicit: 2, rank: 1 });
    }

    #[test]
    fn test_resolve_ellipsis() {
        let resolved =
            resolve_pattern(&[2, 3, 4, 5], "... h w -> ... (h w)", &AxisHints::new()).unwrap();
        assert_eq!(resolved.ellipsis_sizes, vec![2, 3]);
        assert_eq!(resolved.positions.ellipsis, vec![0, 1]);
        assert_eq!(resolved.sizes.get("h"), Some(4));
        assert_eq!(resolved.sizes.get("w"), Some(5));
    }

    #[test]
    fn test_resolve_unknown_output_axis() {
        let err = resolve_pattern(&[3, 4], "a b -> a c", &AxisHints::new()).unwrap_err();
        assert_eq!(err, RearrangeError::unknown_axis("c"));
    }

    #[test]
    fn test_resolve_hint_introduces_broadcast_axis() {
        let hints = AxisHints::new().with("b", 4);
        let resolved = resolve_pattern(&[3, 1, 5], "a 1 c -> a b c", &hints).unwrap();
        assert_eq!(resolved.sizes.get("b"), Some(4));
        assert_eq!(resolved.positions.singletons, vec![(1, 1)]);
    }

    #[test]
    fn test_resolve_input_wins_over_hint() {
        let hints = AxisHints::new().with("h", 99);
        let resolved = resolve_pattern(&[3, 4], "h w -> w h", &hints).unwrap();
        assert_eq!(resolved.sizes.get("h"), Some(3));
    }

    #[test]
    fn test_resolve_merge_member_needs_input_position() {
        // `b` is hinted but has no input position, so it cannot be merged
        let hints = AxisHints::new().with("b", 4);
        let err = resolve_pattern(&[3, 5], "a c -> a (b c)", &hints).unwrap_err();
        assert_eq!(err, RearrangeError::unknown_axis("b"));
    }

    #[test]
    fn test_shape_dict_order() {
        let resolved =
            resolve_pattern(&[2, 12], "a (b c) -> c b a", &AxisHints::new().with("b", 3)).unwrap();
        let names: Vec<&str> = resolved.sizes.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
