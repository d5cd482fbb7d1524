use std::sync::Arc;

use gateway::WritingGateway;
use sprach_core::model::WritingReview;

use crate::error::WritingError;

/// Free-writing assistant: grammar review and sample generation.
///
/// Results replace their predecessors; there is no history. Empty input is
/// rejected locally before anything reaches the gateway.
pub struct WritingService {
    gateway: Arc<dyn WritingGateway>,
    review: Option<WritingReview>,
    sample: Option<String>,
}

impl WritingService {
    #[must_use]
    pub fn new(gateway: Arc<dyn WritingGateway>) -> Self {
        Self {
            gateway,
            review: None,
            sample: None,
        }
    }

    #[must_use]
    pub fn last_review(&self) -> Option<&WritingReview> {
        self.review.as_ref()
    }

    #[must_use]
    pub fn last_sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }

    /// Forget previous results, e.g. when the student clears the editor.
    pub fn clear(&mut self) {
        self.review = None;
        self.sample = None;
    }

    /// Have the student text reviewed and polished.
    ///
    /// # Errors
    ///
    /// Returns `WritingError::EmptyText` for blank input (no network call)
    /// or `WritingError::Remote` when the gateway fails; the previous review
    /// stays in place on failure.
    pub async fn review(&mut self, text: &str) -> Result<&WritingReview, WritingError> {
        if text.trim().is_empty() {
            return Err(WritingError::EmptyText);
        }
        let review = self.gateway.review_text(text).await?;
        Ok(self.review.insert(review))
    }

    /// Generate a sample essay for a topic or opening line.
    ///
    /// # Errors
    ///
    /// Returns `WritingError::EmptyText` for blank input (no network call)
    /// or `WritingError::Remote` when the gateway fails.
    pub async fn sample(&mut self, topic: &str) -> Result<&str, WritingError> {
        if topic.trim().is_empty() {
            return Err(WritingError::EmptyText);
        }
        let essay = self.gateway.sample_essay(topic).await?;
        Ok(self.sample.insert(essay))
    }
}

impl std::fmt::Debug for WritingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritingService")
            .field("has_review", &self.review.is_some())
            .field("has_sample", &self.sample.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::{InMemoryGateway, RemoteError};
    use sprach_core::model::WritingIssue;

    #[tokio::test]
    async fn blank_text_is_rejected_locally() {
        let mut writing = WritingService::new(Arc::new(InMemoryGateway::new()));
        assert_eq!(
            writing.review("   ").await.unwrap_err(),
            WritingError::EmptyText
        );
        assert_eq!(
            writing.sample("").await.unwrap_err(),
            WritingError::EmptyText
        );
    }

    #[tokio::test]
    async fn review_replaces_the_previous_one() {
        let gateway = InMemoryGateway::new();
        gateway.push_writing_review(WritingReview {
            issues: vec![WritingIssue {
                position: "Zeile 1, Wort 2".into(),
                problem: "Verbkonjugation".into(),
                suggestion: "»gehst« statt »gehe«".into(),
            }],
            polished_text: "Du gehst zur Schule.".into(),
        });
        let mut writing = WritingService::new(Arc::new(gateway));

        let review = writing.review("Du gehe zur Schule.").await.unwrap();
        assert_eq!(review.issues.len(), 1);

        let review = writing.review("Du gehst zur Schule.").await.unwrap();
        assert!(review.is_clean());
        assert!(writing.last_review().unwrap().is_clean());
    }

    #[tokio::test]
    async fn failed_review_keeps_the_previous_result() {
        let gateway = InMemoryGateway::new();
        let mut writing = WritingService::new(Arc::new(gateway.clone()));
        writing.review("Erster Text.").await.unwrap();

        gateway.fail_next(RemoteError::network("timeout"));
        assert!(writing.review("Zweiter Text.").await.is_err());
        assert_eq!(
            writing.last_review().unwrap().polished_text,
            "Erster Text."
        );
    }

    #[tokio::test]
    async fn sample_is_stored_for_display() {
        let mut writing = WritingService::new(Arc::new(InMemoryGateway::new()));
        writing.sample("Mein Wochenende").await.unwrap();
        assert!(writing.last_sample().unwrap().contains("Mein Wochenende"));
        writing.clear();
        assert!(writing.last_sample().is_none());
    }
}
