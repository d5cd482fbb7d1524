//! Wire shapes for responses, kept separate from the domain types so the
//! backend contract can drift without leaking into the model layer.

use serde::Deserialize;

use sprach_core::model::{
    Category, CategoryError, CategoryId, Item, ItemId, ItemPayload, ItemVerdict, SubmissionResult,
    SubmissionResultError,
};

/// Category listing entry: `{ id, name, count }`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

impl CategoryRecord {
    /// Convert the record into a domain `Category`.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError` when the record fails domain validation.
    pub fn into_category(self) -> Result<Category, CategoryError> {
        Category::new(CategoryId::new(self.id), self.name, self.count)
    }
}

/// Item listing entry: id, flags, and the kind-tagged payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub id: u64,
    #[serde(default)]
    pub collected: bool,
    #[serde(default)]
    pub mastered: bool,
    #[serde(flatten)]
    pub payload: ItemPayload,
}

impl ItemRecord {
    #[must_use]
    pub fn into_item(self) -> Item {
        Item::with_flags(
            ItemId::new(self.id),
            self.payload,
            self.collected,
            self.mastered,
        )
    }
}

/// Graded submission payload:
/// `{ totalCount, correctCount, wrongCount, perItem: [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResultRecord {
    pub total_count: u32,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub per_item: Vec<ItemVerdict>,
}

impl SubmissionResultRecord {
    /// Convert into a validated domain result.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionResultError` when the counts are inconsistent.
    pub fn into_result(self) -> Result<SubmissionResult, SubmissionResultError> {
        SubmissionResult::new(
            self.total_count,
            self.correct_count,
            self.wrong_count,
            self.per_item,
        )
    }
}

/// Targeted-review acknowledgement: `{ reviewTip }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStartRecord {
    #[serde(default)]
    pub review_tip: Option<String>,
}

/// Sample-essay payload: `{ essay }`.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleEssayRecord {
    pub essay: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_record_decodes_tagged_payload() {
        let record: ItemRecord = serde_json::from_str(
            r#"{"id":103,"kind":"errorRecord","source":"周测","question":"Er ____ (haben) Zeit.",
                "userAnswer":"habe","correctAnswer":"hat","analysis":"dritte Person Singular"}"#,
        )
        .unwrap();
        let item = record.into_item();
        assert_eq!(item.id(), ItemId::new(103));
        assert_eq!(item.prompt(), "Er ____ (haben) Zeit.");
        assert!(!item.is_collected());
    }

    #[test]
    fn submission_record_validates_counts() {
        let record: SubmissionResultRecord = serde_json::from_str(
            r#"{"totalCount":2,"correctCount":1,"wrongCount":1,"perItem":[
                {"itemId":1,"isCorrect":true,"correctAnswer":"esse","analysis":""},
                {"itemId":2,"isCorrect":false,"correctAnswer":"gehst","analysis":""}]}"#,
        )
        .unwrap();
        let result = record.into_result().unwrap();
        assert!((result.score_percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn inconsistent_submission_record_is_rejected() {
        let record: SubmissionResultRecord = serde_json::from_str(
            r#"{"totalCount":3,"correctCount":1,"wrongCount":1,"perItem":[]}"#,
        )
        .unwrap();
        assert!(record.into_result().is_err());
    }

    #[test]
    fn category_record_rejects_blank_names() {
        let record = CategoryRecord {
            id: 1,
            name: "  ".into(),
            count: 4,
        };
        assert!(record.into_category().is_err());
    }
}
