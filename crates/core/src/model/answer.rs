use std::collections::HashMap;

use crate::model::ids::ItemId;
use crate::model::item::Item;

//
// ─── COMPLETENESS ──────────────────────────────────────────────────────────────
//

/// Result of checking an answer sheet against an item set before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    Incomplete { missing: Vec<ItemId> },
}

impl Completeness {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Completeness::Complete)
    }
}

//
// ─── ANSWER SHEET ──────────────────────────────────────────────────────────────
//

/// The student's typed answers for the active item set, keyed by item id.
///
/// Owned by exactly one session; reset whenever the selection or the item set
/// changes. An entry that is blank after trimming counts as unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    entries: HashMap<ItemId, String>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the answer for an item. Leading and trailing
    /// whitespace is kept as typed; emptiness is judged on the trimmed text.
    pub fn fill(&mut self, item_id: ItemId, text: impl Into<String>) {
        self.entries.insert(item_id, text.into());
    }

    /// Remove the answer for a single item.
    pub fn clear_item(&mut self, item_id: ItemId) {
        self.entries.remove(&item_id);
    }

    /// Drop every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn answer_for(&self, item_id: ItemId) -> Option<&str> {
        self.entries.get(&item_id).map(String::as_str)
    }

    /// Number of entries, answered or blank.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that every answerable item has a non-blank answer.
    ///
    /// Items that cannot be answered in writing (listening materials,
    /// favorites) are not required to appear on the sheet.
    #[must_use]
    pub fn completeness(&self, items: &[Item]) -> Completeness {
        let mut missing: Vec<ItemId> = items
            .iter()
            .filter(|item| item.payload().is_answerable())
            .filter(|item| {
                self.entries
                    .get(&item.id())
                    .is_none_or(|text| text.trim().is_empty())
            })
            .map(Item::id)
            .collect();

        if missing.is_empty() {
            Completeness::Complete
        } else {
            missing.sort_unstable();
            Completeness::Incomplete { missing }
        }
    }

    /// Iterate entries in an unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &str)> {
        self.entries.iter().map(|(id, text)| (*id, text.as_str()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::ItemPayload;

    fn exercise(id: u64) -> Item {
        Item::new(
            ItemId::new(id),
            ItemPayload::Grammar {
                question: format!("Frage {id}"),
            },
        )
    }

    #[test]
    fn complete_when_every_exercise_is_answered() {
        let items = vec![exercise(1), exercise(2)];
        let mut sheet = AnswerSheet::new();
        sheet.fill(ItemId::new(1), "esse");
        sheet.fill(ItemId::new(2), "gehst");
        assert!(sheet.completeness(&items).is_complete());
    }

    #[test]
    fn missing_entry_is_reported() {
        let items = vec![exercise(1), exercise(2)];
        let mut sheet = AnswerSheet::new();
        sheet.fill(ItemId::new(1), "esse");
        let Completeness::Incomplete { missing } = sheet.completeness(&items) else {
            panic!("expected incomplete sheet");
        };
        assert_eq!(missing, vec![ItemId::new(2)]);
    }

    #[test]
    fn blank_answer_counts_as_missing() {
        let items = vec![exercise(1)];
        let mut sheet = AnswerSheet::new();
        sheet.fill(ItemId::new(1), "   ");
        assert!(!sheet.completeness(&items).is_complete());
    }

    #[test]
    fn unanswerable_items_are_not_required() {
        let listening = Item::new(
            ItemId::new(7),
            ItemPayload::Listening {
                title: "德国美食介绍".into(),
                level: "A2".into(),
                duration_secs: 195,
                audio: "https://cdn.example.com/a2-essen.mp3".parse().unwrap(),
            },
        );
        let sheet = AnswerSheet::new();
        assert!(sheet.completeness(&[listening]).is_complete());
    }

    #[test]
    fn refill_overwrites_previous_answer() {
        let mut sheet = AnswerSheet::new();
        sheet.fill(ItemId::new(1), "gehe");
        sheet.fill(ItemId::new(1), "gehst");
        assert_eq!(sheet.answer_for(ItemId::new(1)), Some("gehst"));
        assert_eq!(sheet.len(), 1);
    }
}
