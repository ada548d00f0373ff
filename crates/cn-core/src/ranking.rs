//! Ranking result types.
//!
//! A ranking call has three possible shapes and each is visible to callers:
//!
//! | Shape     | Representation                                             |
//! |-----------|------------------------------------------------------------|
//! | found     | `Ok(Ranking)` with non-empty `candidates`                  |
//! | empty     | `Ok(Ranking)` with `empty = Some(reason)`                  |
//! | invalid   | `Err(CoreError::InvalidInput)`                             |
//!
//! Independently of the shape, `degradation` records whether a fallback
//! distance strategy produced the numbers.

/// One record together with its distances from the anchor point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedCandidate<T> {
    /// Position of `record` in the dataset it was ranked from.
    pub index:           usize,
    pub record:          T,
    /// Great-circle distance; always present.
    pub straight_line_m: f64,
    /// Road-network distance, present only if one was resolved.
    pub road_m:          Option<f64>,
    /// Distance used for ordering: `road_m` if present, else
    /// `straight_line_m` as an approximation.
    pub refined_m:       f64,
}

impl<T> RankedCandidate<T> {
    /// Candidate ranked by straight-line distance only.
    pub fn straight_line(index: usize, record: T, straight_line_m: f64) -> Self {
        Self { index, record, straight_line_m, road_m: None, refined_m: straight_line_m }
    }

    /// `true` when `refined_m` is a straight-line stand-in for a road
    /// distance.
    #[inline]
    pub fn is_approximate(&self) -> bool {
        self.road_m.is_none()
    }
}

/// Why a ranking came back with no candidates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmptyReason {
    /// The dataset was empty, or nothing in it matched the category and had
    /// usable coordinates.
    NoCandidates,
    /// Candidates existed but all were beyond the search radius.
    OutsideRadius,
}

/// Which fallback was taken while computing a ranking.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Degradation {
    /// No road graph was available; every distance is straight-line.
    StraightLineOnly,
    /// A road graph was used but `count` candidates were unreachable on it
    /// and kept with their straight-line distance.
    Approximated { count: usize },
}

/// Ordered candidates plus the flags describing how they were obtained.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ranking<T> {
    pub candidates:  Vec<RankedCandidate<T>>,
    pub empty:       Option<EmptyReason>,
    pub degradation: Option<Degradation>,
}

impl<T> Ranking<T> {
    pub fn empty(reason: EmptyReason) -> Self {
        Self { candidates: Vec::new(), empty: Some(reason), degradation: None }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    /// Best candidate, if any.
    pub fn first(&self) -> Option<&RankedCandidate<T>> {
        self.candidates.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedCandidate<T>> {
        self.candidates.iter()
    }
}
