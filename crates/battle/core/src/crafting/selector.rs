//! Deterministic weighted sampling without replacement.

use tracing::debug;

use crate::env::RandomSource;

/// Why a selection produced nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EmptySelection {
    /// No candidate was ever added.
    NoCandidates,
    /// Zero items were requested.
    ZeroCount,
    /// Candidates exist but every remaining weight is zero.
    Exhausted,
}

/// Outcome of [`WeightedSelector::select`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection<T> {
    Empty(EmptySelection),
    /// One or more items, in draw order.
    Drawn(Vec<T>),
}

impl<T> Selection<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty(_) => 0,
            Self::Drawn(items) => items.len(),
        }
    }

    pub fn empty_reason(&self) -> Option<EmptySelection> {
        match self {
            Self::Empty(reason) => Some(*reason),
            Self::Drawn(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Empty(_) => Vec::new(),
            Self::Drawn(items) => items,
        }
    }
}

/// Weighted pool drawn from without replacement.
///
/// Candidates are ordered by ascending weight before the first draw, ties kept
/// in insertion order. Each draw rolls `rng.next(0, total)` over the remaining
/// weight and takes the first candidate whose cumulative weight exceeds the
/// roll. Exactly one value is consumed from the stream per item drawn.
#[derive(Clone, Debug)]
pub struct WeightedSelector<T> {
    candidates: Vec<(T, u32)>,
}

impl<T> Default for WeightedSelector<T> {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }
}

impl<T> WeightedSelector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: T, weight: u32) {
        self.candidates.push((item, weight));
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Draws up to `count` distinct candidates.
    ///
    /// Returns fewer than `count` items when the pool runs out or the
    /// remaining weight drops to zero.
    pub fn select<R>(mut self, count: usize, rng: &mut R) -> Selection<T>
    where
        R: RandomSource + ?Sized,
    {
        if self.candidates.is_empty() {
            return Selection::Empty(EmptySelection::NoCandidates);
        }
        if count == 0 {
            return Selection::Empty(EmptySelection::ZeroCount);
        }

        self.candidates.sort_by_key(|(_, weight)| *weight);

        let mut drawn = Vec::with_capacity(count.min(self.candidates.len()));
        while drawn.len() < count && !self.candidates.is_empty() {
            let total: u64 = self
                .candidates
                .iter()
                .map(|(_, weight)| u64::from(*weight))
                .sum();
            if total == 0 {
                break;
            }

            let bound = i32::try_from(total).unwrap_or(i32::MAX);
            let roll = rng.next(0, bound) as u64;

            let mut cumulative = 0u64;
            let index = self
                .candidates
                .iter()
                .position(|(_, weight)| {
                    cumulative += u64::from(*weight);
                    cumulative > roll
                })
                .unwrap_or(self.candidates.len() - 1);

            let (item, _) = self.candidates.remove(index);
            drawn.push(item);
        }

        if drawn.is_empty() {
            debug!(
                candidates = self.candidates.len(),
                "weighted selection exhausted before first draw"
            );
            return Selection::Empty(EmptySelection::Exhausted);
        }
        Selection::Drawn(drawn)
    }
}
