use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ids::ItemId;

//
// ─── ITEM PAYLOAD ──────────────────────────────────────────────────────────────
//

/// Feature-specific content of a learnable item, discriminated by `kind`.
///
/// Every student screen works the same set of motions over a different payload:
/// vocabulary entries, grammar cloze exercises, collected mistakes, listening
/// materials, and favorited snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemPayload {
    #[serde(rename_all = "camelCase")]
    Vocab {
        term: String,
        translation: String,
        example: String,
    },
    #[serde(rename_all = "camelCase")]
    Grammar { question: String },
    #[serde(rename_all = "camelCase")]
    ErrorRecord {
        source: String,
        question: String,
        user_answer: String,
        correct_answer: String,
        analysis: String,
    },
    #[serde(rename_all = "camelCase")]
    Listening {
        title: String,
        level: String,
        duration_secs: u32,
        audio: Url,
    },
    #[serde(rename_all = "camelCase")]
    Favorite { source: String, content: String },
}

impl ItemPayload {
    /// The text shown as the item's prompt: the question for exercises, the
    /// term for vocabulary, the title for listening materials.
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            ItemPayload::Vocab { term, .. } => term,
            ItemPayload::Grammar { question } => question,
            ItemPayload::ErrorRecord { question, .. } => question,
            ItemPayload::Listening { title, .. } => title,
            ItemPayload::Favorite { content, .. } => content,
        }
    }

    /// True for payloads the student answers in writing, i.e. the ones a
    /// session submission can grade.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        matches!(
            self,
            ItemPayload::Grammar { .. } | ItemPayload::ErrorRecord { .. }
        )
    }
}

//
// ─── ITEM ──────────────────────────────────────────────────────────────────────
//

/// A single learnable unit inside a category.
///
/// Items are owned by the active session and replaced, never merged, when the
/// selection changes. The two flags are the only locally mutable state and
/// they only move after the corresponding remote mutation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    payload: ItemPayload,
    collected: bool,
    mastered: bool,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, payload: ItemPayload) -> Self {
        Self {
            id,
            payload,
            collected: false,
            mastered: false,
        }
    }

    /// Rehydrate an item with flag state from the remote listing.
    #[must_use]
    pub fn with_flags(id: ItemId, payload: ItemPayload, collected: bool, mastered: bool) -> Self {
        Self {
            id,
            payload,
            collected,
            mastered,
        }
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn payload(&self) -> &ItemPayload {
        &self.payload
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.payload.prompt()
    }

    #[must_use]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.mastered
    }

    pub fn set_collected(&mut self, collected: bool) {
        self.collected = collected;
    }

    pub fn set_mastered(&mut self, mastered: bool) {
        self.mastered = mastered;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_item(id: u64, question: &str) -> Item {
        Item::new(
            ItemId::new(id),
            ItemPayload::Grammar {
                question: question.to_string(),
            },
        )
    }

    #[test]
    fn prompt_follows_payload_variant() {
        let vocab = Item::new(
            ItemId::new(1),
            ItemPayload::Vocab {
                term: "Haus".into(),
                translation: "house".into(),
                example: "Das ist mein Haus.".into(),
            },
        );
        assert_eq!(vocab.prompt(), "Haus");

        let exercise = grammar_item(2, "Ich ____ (essen) einen Apfel.");
        assert_eq!(exercise.prompt(), "Ich ____ (essen) einen Apfel.");
    }

    #[test]
    fn answerable_is_limited_to_exercise_variants() {
        assert!(grammar_item(1, "Q").payload().is_answerable());

        let listening = Item::new(
            ItemId::new(2),
            ItemPayload::Listening {
                title: "校园日常对话".into(),
                level: "A1".into(),
                duration_secs: 150,
                audio: "https://cdn.example.com/a1-campus.mp3".parse().unwrap(),
            },
        );
        assert!(!listening.payload().is_answerable());
    }

    #[test]
    fn flags_start_cleared() {
        let item = grammar_item(1, "Q");
        assert!(!item.is_collected());
        assert!(!item.is_mastered());
    }

    #[test]
    fn payload_serializes_with_kind_tag() {
        let json = serde_json::to_value(ItemPayload::Grammar {
            question: "Du ____ (gehen) zur Schule.".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "grammar");
    }
}
