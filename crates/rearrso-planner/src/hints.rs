//! Axis-length hints

/// Caller-supplied axis lengths.
///
/// Hints resolve otherwise-ambiguous split factors and introduce new
/// broadcast axes. A hint for an axis whose size is already fixed by the
/// input shape is ignored; the input wins.
///
/// # Examples
///
/// ```
/// use rearrso_planner::AxisHints;
///
/// let hints = AxisHints::new().with("h", 3).with("b", 4);
/// assert_eq!(hints.get("h"), Some(3));
/// assert_eq!(hints.get("w"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisHints {
    lengths: Vec<(String, usize)>,
}

impl AxisHints {
    /// Create an empty hint set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis length, replacing any previous hint for the same name.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero; axis lengths are positive integers.
    pub fn with(mut self, name: impl Into<String>, size: usize) -> Self {
        assert!(size > 0, "axis length must be a positive integer");
        let name = name.into();
        if let Some(entry) = self.lengths.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = size;
        } else {
            self.lengths.push((name, size));
        }
        self
    }

    /// Look up a hinted length
    pub fn get(&self, name: &str) -> Option<usize> {
        self.lengths
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, size)| size)
    }

    /// Iterate over hints in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lengths.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Number of hints
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Check whether no hints were supplied
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_and_get() {
        let hints = AxisHints::new().with("h", 3).with("w", 4);
        assert_eq!(hints.get("h"), Some(3));
        assert_eq!(hints.get("w"), Some(4));
        assert_eq!(hints.get("c"), None);
        assert_eq!(hints.len(), 2);
    }

    #[test]
    fn test_with_replaces() {
        let hints = AxisHints::new().with("h", 3).with("h", 5);
        assert_eq!(hints.get("h"), Some(5));
        assert_eq!(hints.len(), 1);
    }

    #[test]
    #[should_panic(expected = "positive integer")]
    fn test_zero_length_panics() {
        let _ = AxisHints::new().with("h", 0);
    }
}
