//! In-memory gateway for tests and prototyping.
//!
//! Plays the backend's part: it owns a seeded copy of categories, items, and
//! answer keys, grades submissions against them, and applies mutations to its
//! own store. Failures can be scripted per upcoming call so error paths are
//! testable without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sprach_core::model::{
    Category, CategoryId, Item, ItemId, ItemVerdict, Recording, SceneId, SpeakingFeedback,
    SubmissionResult, WritingIssue, WritingReview,
};

use crate::api::{
    ChatGateway, ChatReply, MutationAction, MutationRequest, SpeakingGateway, StudyGateway,
    SubmissionRequest, WritingGateway,
};
use crate::error::RemoteError;

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    items: HashMap<CategoryId, Vec<Item>>,
    answer_key: HashMap<ItemId, AnswerKey>,
    scripted_failures: VecDeque<RemoteError>,
    scripted_chat: VecDeque<ChatReply>,
    scripted_reviews: VecDeque<WritingReview>,
    submit_calls: u32,
    item_list_calls: u32,
    mutation_calls: u32,
    chat_calls: u32,
}

#[derive(Clone)]
struct AnswerKey {
    correct: String,
    analysis: String,
}

/// Seedable in-memory implementation of every gateway contract.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    inner: Arc<Mutex<State>>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, RemoteError> {
        self.inner
            .lock()
            .map_err(|e| RemoteError::network(e.to_string()))
    }

    /// Seed one category together with its item set.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned; seeding happens in test setup
    /// where that is a programming error.
    pub fn seed_category(&self, category: Category, items: Vec<Item>) {
        let mut state = self.inner.lock().expect("gateway lock poisoned");
        state.items.insert(category.id(), items);
        state.categories.retain(|c| c.id() != category.id());
        state.categories.push(category);
    }

    /// Record the expected answer (and analysis) for one item.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_answer_key(
        &self,
        item_id: ItemId,
        correct: impl Into<String>,
        analysis: impl Into<String>,
    ) {
        let mut state = self.inner.lock().expect("gateway lock poisoned");
        state.answer_key.insert(
            item_id,
            AnswerKey {
                correct: correct.into(),
                analysis: analysis.into(),
            },
        );
    }

    /// Make the next remote call fail with `error`. Queued failures are
    /// consumed one per call, oldest first, across all contracts.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_next(&self, error: RemoteError) {
        let mut state = self.inner.lock().expect("gateway lock poisoned");
        state.scripted_failures.push_back(error);
    }

    /// Queue a scripted chat reply; without one a canned reply is produced.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn push_chat_reply(&self, reply: ChatReply) {
        let mut state = self.inner.lock().expect("gateway lock poisoned");
        state.scripted_chat.push_back(reply);
    }

    /// Queue a scripted writing review; without one a clean review is
    /// produced.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn push_writing_review(&self, review: WritingReview) {
        let mut state = self.inner.lock().expect("gateway lock poisoned");
        state.scripted_reviews.push_back(review);
    }

    /// Number of grading submissions that reached this gateway.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn submit_calls(&self) -> u32 {
        self.inner.lock().expect("gateway lock poisoned").submit_calls
    }

    /// Number of item listings that reached this gateway.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn item_list_calls(&self) -> u32 {
        self.inner
            .lock()
            .expect("gateway lock poisoned")
            .item_list_calls
    }

    /// Number of mutations that reached this gateway.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn mutation_calls(&self) -> u32 {
        self.inner
            .lock()
            .expect("gateway lock poisoned")
            .mutation_calls
    }

    /// Number of chat turns that reached this gateway.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn chat_calls(&self) -> u32 {
        self.inner.lock().expect("gateway lock poisoned").chat_calls
    }
}

fn take_failure(state: &mut State) -> Result<(), RemoteError> {
    match state.scripted_failures.pop_front() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn answers_match(submitted: &str, expected: &str) -> bool {
    submitted.trim().to_lowercase() == expected.trim().to_lowercase()
}

#[async_trait]
impl StudyGateway for InMemoryGateway {
    async fn list_categories(&self) -> Result<Vec<Category>, RemoteError> {
        let mut state = self.lock()?;
        take_failure(&mut state)?;
        Ok(state.categories.clone())
    }

    async fn list_items(&self, category_id: CategoryId) -> Result<Vec<Item>, RemoteError> {
        let mut state = self.lock()?;
        state.item_list_calls += 1;
        take_failure(&mut state)?;
        state
            .items
            .get(&category_id)
            .cloned()
            .ok_or_else(|| RemoteError::server_rejected(404, "unknown category"))
    }

    async fn submit_answers(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, RemoteError> {
        let mut state = self.lock()?;
        state.submit_calls += 1;
        take_failure(&mut state)?;

        let mut verdicts = Vec::with_capacity(request.answers.len());
        let mut correct_count = 0_u32;
        for entry in &request.answers {
            let key = state.answer_key.get(&entry.item_id);
            let is_correct =
                key.is_some_and(|key| answers_match(&entry.user_answer, &key.correct));
            if is_correct {
                correct_count += 1;
            }
            verdicts.push(ItemVerdict {
                item_id: entry.item_id,
                is_correct,
                correct_answer: key.map(|k| k.correct.clone()).unwrap_or_default(),
                analysis: key.map(|k| k.analysis.clone()).unwrap_or_default(),
            });
        }

        let total = u32::try_from(verdicts.len())
            .map_err(|_| RemoteError::server_rejected(400, "submission too large"))?;
        SubmissionResult::new(total, correct_count, total - correct_count, verdicts)
            .map_err(|err| RemoteError::malformed(err.to_string()))
    }

    async fn start_targeted_review(
        &self,
        _category_id: CategoryId,
        category_name: &str,
    ) -> Result<String, RemoteError> {
        let mut state = self.lock()?;
        take_failure(&mut state)?;
        Ok(format!("Review round for {category_name} is ready."))
    }

    async fn mutate_item(&self, request: &MutationRequest) -> Result<(), RemoteError> {
        let mut state = self.lock()?;
        state.mutation_calls += 1;
        take_failure(&mut state)?;

        let items = state
            .items
            .get_mut(&request.category_id)
            .ok_or_else(|| RemoteError::server_rejected(404, "unknown category"))?;
        let position = items
            .iter()
            .position(|item| item.id() == request.item_id)
            .ok_or_else(|| RemoteError::server_rejected(404, "unknown item"))?;

        match request.action {
            MutationAction::Delete | MutationAction::MarkMastered => {
                items.remove(position);
                if let Some(category) = state
                    .categories
                    .iter_mut()
                    .find(|c| c.id() == request.category_id)
                {
                    category.note_item_removed();
                }
            }
            MutationAction::Collect => items[position].set_collected(true),
            MutationAction::Uncollect => items[position].set_collected(false),
        }
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for InMemoryGateway {
    async fn send_message(
        &self,
        _scene_id: SceneId,
        scene_name: &str,
        _text: &str,
    ) -> Result<ChatReply, RemoteError> {
        let mut state = self.lock()?;
        state.chat_calls += 1;
        take_failure(&mut state)?;
        Ok(state.scripted_chat.pop_front().unwrap_or_else(|| ChatReply {
            reply: format!("Sehr gut! Erzähl mir mehr über {scene_name}."),
            correction: None,
        }))
    }
}

#[async_trait]
impl WritingGateway for InMemoryGateway {
    async fn review_text(&self, text: &str) -> Result<WritingReview, RemoteError> {
        let mut state = self.lock()?;
        take_failure(&mut state)?;
        Ok(state
            .scripted_reviews
            .pop_front()
            .unwrap_or_else(|| WritingReview {
                issues: Vec::<WritingIssue>::new(),
                polished_text: text.trim().to_string(),
            }))
    }

    async fn sample_essay(&self, topic: &str) -> Result<String, RemoteError> {
        let mut state = self.lock()?;
        take_failure(&mut state)?;
        Ok(format!(
            "Mein Aufsatz über {topic}: Es war ein toller Tag!"
        ))
    }
}

#[async_trait]
impl SpeakingGateway for InMemoryGateway {
    async fn evaluate_recording(
        &self,
        _material_id: ItemId,
        _recording: &Recording,
    ) -> Result<SpeakingFeedback, RemoteError> {
        let mut state = self.lock()?;
        take_failure(&mut state)?;
        Ok(SpeakingFeedback {
            score_percent: 85.0,
            pronunciation_notes: "Gute Aussprache, achte auf die Umlaute.".to_string(),
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
