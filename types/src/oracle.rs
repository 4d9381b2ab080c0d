//! Request and verdict types exchanged with the solving oracle.

use serde::{Deserialize, Serialize};

use crate::{CandidateItem, ItemId, PositionGroups, PositionKey};

/// A visible candidate as handed to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    /// Index in the unfiltered page ordering.
    pub index: usize,
    pub id: Option<ItemId>,
    pub position: PositionKey,
    pub fingerprint: String,
}

/// Everything the oracle sees for one solve attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub candidates: Vec<CandidateSnapshot>,
    pub positions: PositionGroups,
}

impl SolveRequest {
    /// Filter `items` to visible ones and group their fingerprints by position.
    ///
    /// Invisible items neither reach the oracle nor contribute to grouping.
    #[must_use]
    pub fn from_items(items: &[CandidateItem]) -> Self {
        let mut request = Self::default();
        for (index, item) in items.iter().enumerate() {
            if !item.is_visible() {
                continue;
            }
            let position = item.position();
            request.positions.record(position, item.fingerprint());
            request.candidates.push(CandidateSnapshot {
                index,
                id: item.id.clone(),
                position,
                fingerprint: item.fingerprint().to_string(),
            });
        }
        request
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// The oracle's answer: whether it solved the grid and which items to pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleVerdict {
    pub success: bool,
    #[serde(default)]
    pub selections: Vec<i64>,
}

impl OracleVerdict {
    #[must_use]
    pub fn solved(selections: impl Into<Vec<i64>>) -> Self {
        Self {
            success: true,
            selections: selections.into(),
        }
    }

    #[must_use]
    pub fn unsolved() -> Self {
        Self::default()
    }

    /// Selection indices that address one of `len` items, in verdict order.
    ///
    /// Negative and out-of-range indices are dropped silently.
    pub fn targets(&self, len: usize) -> impl Iterator<Item = usize> + '_ {
        self.selections
            .iter()
            .filter_map(move |&raw| usize::try_from(raw).ok().filter(|&index| index < len))
    }
}
