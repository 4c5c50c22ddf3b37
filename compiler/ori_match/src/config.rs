//! Tuning knobs for checking and compilation.

/// How the decision tree compiler picks the next column to test.
///
/// The choice affects tree size and depth, never which arm a value selects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnHeuristic {
    /// Among the columns the first row needs, take the one needed by the
    /// most rows; ties go to fewer distinct constructors, then leftmost.
    #[default]
    Necessity,
    /// The leftmost column the first row needs.
    Leftmost,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchConfig {
    /// Upper bound on reported witnesses per non-exhaustive match. At least
    /// one witness is always reported.
    pub max_witnesses: usize,
    pub heuristic: ColumnHeuristic,
}

impl MatchConfig {
    pub const DEFAULT_MAX_WITNESSES: usize = 3;

    #[must_use]
    pub fn with_max_witnesses(mut self, max_witnesses: usize) -> Self {
        self.max_witnesses = max_witnesses;
        self
    }

    #[must_use]
    pub fn with_heuristic(mut self, heuristic: ColumnHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            max_witnesses: Self::DEFAULT_MAX_WITNESSES,
            heuristic: ColumnHeuristic::default(),
        }
    }
}
