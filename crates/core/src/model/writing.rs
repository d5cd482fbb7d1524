use serde::{Deserialize, Serialize};

//
// ─── WRITING REVIEW ────────────────────────────────────────────────────────────
//

/// One problem the reviewer found in a submitted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingIssue {
    /// Human-readable location, e.g. "line 1, word 5".
    pub position: String,
    pub problem: String,
    pub suggestion: String,
}

/// Result of a grammar-check-and-polish pass over a student text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingReview {
    pub issues: Vec<WritingIssue>,
    pub polished_text: String,
}

impl WritingReview {
    /// True when the reviewer found nothing to fix.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_without_issues_is_clean() {
        let review = WritingReview {
            issues: Vec::new(),
            polished_text: "Du gehst zur Schule.".into(),
        };
        assert!(review.is_clean());
    }
}
