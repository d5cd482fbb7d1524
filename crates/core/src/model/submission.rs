use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmissionResultError {
    #[error("correct ({correct}) + wrong ({wrong}) does not match total ({total})")]
    CountMismatch { total: u32, correct: u32, wrong: u32 },

    #[error("verdict count ({verdicts}) does not match total ({total})")]
    VerdictMismatch { total: u32, verdicts: usize },

    #[error("a graded submission cannot be empty")]
    Empty,
}

//
// ─── VERDICT ───────────────────────────────────────────────────────────────────
//

/// Grading outcome for a single submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemVerdict {
    pub item_id: ItemId,
    pub is_correct: bool,
    pub correct_answer: String,
    pub analysis: String,
}

//
// ─── SUBMISSION RESULT ─────────────────────────────────────────────────────────
//

/// Graded outcome of one submission.
///
/// Counts are pinned at submission time: deleting an item afterwards removes
/// its verdict from the view but never rewrites `total_count` or the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    total_count: u32,
    correct_count: u32,
    wrong_count: u32,
    verdicts: Vec<ItemVerdict>,
}

impl SubmissionResult {
    /// Assemble a result, checking that the counts are consistent.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionResultError::Empty` for a zero-item grading,
    /// `CountMismatch` when correct + wrong != total, and `VerdictMismatch`
    /// when the per-item list disagrees with the total.
    pub fn new(
        total_count: u32,
        correct_count: u32,
        wrong_count: u32,
        verdicts: Vec<ItemVerdict>,
    ) -> Result<Self, SubmissionResultError> {
        if total_count == 0 {
            return Err(SubmissionResultError::Empty);
        }
        if correct_count + wrong_count != total_count {
            return Err(SubmissionResultError::CountMismatch {
                total: total_count,
                correct: correct_count,
                wrong: wrong_count,
            });
        }
        if verdicts.len() != total_count as usize {
            return Err(SubmissionResultError::VerdictMismatch {
                total: total_count,
                verdicts: verdicts.len(),
            });
        }
        Ok(Self {
            total_count,
            correct_count,
            wrong_count,
            verdicts,
        })
    }

    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    #[must_use]
    pub fn verdicts(&self) -> &[ItemVerdict] {
        &self.verdicts
    }

    #[must_use]
    pub fn verdict_for(&self, item_id: ItemId) -> Option<&ItemVerdict> {
        self.verdicts.iter().find(|v| v.item_id == item_id)
    }

    /// Accuracy as a percentage rounded to one decimal place.
    ///
    /// `total_count = 2, correct_count = 1` yields `50.0`.
    #[must_use]
    pub fn score_percent(&self) -> f64 {
        let raw = f64::from(self.correct_count) / f64::from(self.total_count) * 100.0;
        (raw * 10.0).round() / 10.0
    }

    /// A copy of this result with one item's verdict removed.
    ///
    /// Counts stay pinned to submission time; only the per-item view shrinks.
    /// Used when a graded item is deleted or mastered out of the active set.
    #[must_use]
    pub fn without_item(&self, item_id: ItemId) -> Self {
        Self {
            total_count: self.total_count,
            correct_count: self.correct_count,
            wrong_count: self.wrong_count,
            verdicts: self
                .verdicts
                .iter()
                .filter(|v| v.item_id != item_id)
                .cloned()
                .collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(id: u64, is_correct: bool) -> ItemVerdict {
        ItemVerdict {
            item_id: ItemId::new(id),
            is_correct,
            correct_answer: "esse".into(),
            analysis: "erste Person Singular Präsens".into(),
        }
    }

    #[test]
    fn half_correct_scores_fifty() {
        let result =
            SubmissionResult::new(2, 1, 1, vec![verdict(1, true), verdict(2, false)]).unwrap();
        assert!((result.score_percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_of_three_rounds_to_one_decimal() {
        let result = SubmissionResult::new(
            3,
            1,
            2,
            vec![verdict(1, true), verdict(2, false), verdict(3, false)],
        )
        .unwrap();
        assert!((result.score_percent() - 33.3).abs() < f64::EPSILON);
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let err = SubmissionResult::new(2, 2, 1, vec![verdict(1, true), verdict(2, true)])
            .unwrap_err();
        assert!(matches!(err, SubmissionResultError::CountMismatch { .. }));
    }

    #[test]
    fn verdict_list_must_cover_total() {
        let err = SubmissionResult::new(2, 1, 1, vec![verdict(1, true)]).unwrap_err();
        assert!(matches!(err, SubmissionResultError::VerdictMismatch { .. }));
    }

    #[test]
    fn empty_grading_is_rejected() {
        let err = SubmissionResult::new(0, 0, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, SubmissionResultError::Empty));
    }

    #[test]
    fn without_item_keeps_counts_pinned() {
        let result =
            SubmissionResult::new(2, 1, 1, vec![verdict(1, true), verdict(2, false)]).unwrap();
        let trimmed = result.without_item(ItemId::new(2));
        assert_eq!(trimmed.total_count(), 2);
        assert_eq!(trimmed.verdicts().len(), 1);
        assert!(trimmed.verdict_for(ItemId::new(2)).is_none());
        assert!((trimmed.score_percent() - 50.0).abs() < f64::EPSILON);
    }
}
