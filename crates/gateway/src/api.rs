//! Trait contracts for everything the backend offers.
//!
//! Callers hold these behind `Arc<dyn …>` so the HTTP implementation and the
//! in-memory double are interchangeable. None of the contracts retry; retry
//! policy belongs to whoever issued the call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sprach_core::model::{
    Category, CategoryId, Item, ItemId, Recording, SceneId, SpeakingFeedback, SubmissionResult,
    WritingReview,
};

use crate::error::RemoteError;

//
// ─── WIRE REQUESTS ─────────────────────────────────────────────────────────────
//

/// One answered item inside a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub item_id: ItemId,
    pub user_answer: String,
}

/// Submission payload: the active category and one entry per answered item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub category_id: CategoryId,
    pub answers: Vec<AnswerEntry>,
}

/// Per-item side-effecting operations, distinct from session submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationAction {
    Collect,
    Uncollect,
    MarkMastered,
    Delete,
}

/// A single mutation against one item of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRequest {
    pub item_id: ItemId,
    pub category_id: CategoryId,
    pub action: MutationAction,
}

/// Assistant turn for the scene-chat screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    /// Grammar-correction hint, present when the assistant found a mistake.
    #[serde(default)]
    pub correction: Option<String>,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Category listing, item retrieval, submission grading, and per-item
/// mutations for one study feature (error book, grammar, vocabulary, …).
#[async_trait]
pub trait StudyGateway: Send + Sync {
    /// Fetch the category listing for this feature.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failure, rejection, or a body that
    /// does not match the envelope.
    async fn list_categories(&self) -> Result<Vec<Category>, RemoteError>;

    /// Fetch the item set of one category.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failure, rejection, or a malformed
    /// body.
    async fn list_items(&self, category_id: CategoryId) -> Result<Vec<Item>, RemoteError>;

    /// Submit the student's answers for grading.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on any remote failure; the request is never
    /// partially applied from the caller's point of view.
    async fn submit_answers(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, RemoteError>;

    /// Ask the backend to prepare a targeted review round for a category.
    /// Returns the server's review tip for display.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on any remote failure.
    async fn start_targeted_review(
        &self,
        category_id: CategoryId,
        category_name: &str,
    ) -> Result<String, RemoteError>;

    /// Apply one mutation. Sent exactly once per invocation; no retry and no
    /// client-side deduplication.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on any remote failure.
    async fn mutate_item(&self, request: &MutationRequest) -> Result<(), RemoteError>;
}

/// Scene-based conversation practice.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send one student message within a scene and get the assistant's turn.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on any remote failure.
    async fn send_message(
        &self,
        scene_id: SceneId,
        scene_name: &str,
        text: &str,
    ) -> Result<ChatReply, RemoteError>;
}

/// Grammar checking and sample generation for free writing.
#[async_trait]
pub trait WritingGateway: Send + Sync {
    /// Review a student text: found issues plus a polished version.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on any remote failure.
    async fn review_text(&self, text: &str) -> Result<WritingReview, RemoteError>;

    /// Generate a sample essay for a topic or opening line.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on any remote failure.
    async fn sample_essay(&self, topic: &str) -> Result<String, RemoteError>;
}

/// Pronunciation evaluation of captured recordings.
#[async_trait]
pub trait SpeakingGateway: Send + Sync {
    /// Evaluate a recording against the listening material it imitates.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on any remote failure.
    async fn evaluate_recording(
        &self,
        material_id: ItemId,
        recording: &Recording,
    ) -> Result<SpeakingFeedback, RemoteError>;
}
