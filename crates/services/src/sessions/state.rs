use chrono::{DateTime, Utc};

use gateway::{AnswerEntry, MutationAction, RemoteError, SubmissionRequest};
use sprach_core::model::{
    AnswerSheet, Category, CategoryId, Completeness, Item, ItemId, SubmissionResult,
};

use super::progress::SessionProgress;
use crate::error::SessionError;
use crate::loader::{LoadOutcome, LoadTicket};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Which suspend-capable action a fault interrupted. Decides what a retry
/// re-issues: the load or the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Load,
    Submit,
}

/// A recoverable failure the session is parked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub during: Activity,
    pub message: String,
}

/// Lifecycle of one category session. Exactly one phase is active at a time;
/// `Graded` is only reachable from `Submitting`, and any phase yields to a
/// fresh load when the selection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading { ticket: LoadTicket },
    Ready,
    Submitting,
    Graded,
    Faulted(Fault),
}

/// What a successful mutation did to the local view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The item left the active set. `mastered` distinguishes the mastery
    /// signal from a plain delete; nothing else is recorded for it.
    Removed { mastered: bool },
    /// The item's collect flag changed.
    Flagged { collected: bool },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state for one screen's active category: the item set, the
/// student's answers, and the grading result.
///
/// All three are owned exclusively here and replaced, never merged, when the
/// selection changes. The async edges (fetching, submitting) live in
/// `SessionWorkflow`; this type holds the transitions themselves so they can
/// be exercised without a runtime.
#[derive(Debug)]
pub struct LearningSession {
    category: Option<Category>,
    started_at: Option<DateTime<Utc>>,
    items: Vec<Item>,
    answers: AnswerSheet,
    result: Option<SubmissionResult>,
    phase: SessionPhase,
}

impl Default for LearningSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            category: None,
            started_at: None,
            items: Vec::new(),
            answers: AnswerSheet::new(),
            result: None,
            phase: SessionPhase::Idle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.as_ref().map(Category::id)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    /// Returns a summary of how far the student is through the active set.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answerable: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| item.payload().is_answerable())
            .collect();
        let total = answerable.len();
        let answered = answerable
            .iter()
            .filter(|item| {
                self.answers
                    .answer_for(item.id())
                    .is_some_and(|text| !text.trim().is_empty())
            })
            .count();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: total > 0 && answered == total,
        }
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────
    //

    /// Enter `Loading` for `category`, voiding items, answers, and result of
    /// whatever was active before. Legal from every phase: a new selection
    /// always wins.
    pub fn begin_loading(&mut self, category: Category, ticket: LoadTicket, now: DateTime<Utc>) {
        self.category = Some(category);
        self.started_at = Some(now);
        self.items.clear();
        self.answers.reset();
        self.result = None;
        self.phase = SessionPhase::Loading { ticket };
    }

    /// Apply a resolved load. Outcomes for a ticket other than the one this
    /// session is waiting on are ignored — they belong to a superseded
    /// selection.
    pub fn finish_loading(&mut self, ticket: LoadTicket, outcome: LoadOutcome) {
        let SessionPhase::Loading { ticket: expected } = &self.phase else {
            return;
        };
        if *expected != ticket {
            return;
        }
        match outcome {
            LoadOutcome::Loaded(items) => {
                self.items = items;
                self.phase = SessionPhase::Ready;
            }
            LoadOutcome::Failed(err) => {
                self.phase = SessionPhase::Faulted(Fault {
                    during: Activity::Load,
                    message: err.to_string(),
                });
            }
            LoadOutcome::Superseded => {}
        }
    }

    //
    // ─── ANSWERING ─────────────────────────────────────────────────────────
    //

    /// Record the student's answer for one item.
    ///
    /// Editing while `Graded` discards the previous result and returns the
    /// session to `Ready` with every other answer intact.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotReady` outside `Ready`/`Graded` and
    /// `SessionError::UnknownItem` for ids not in the active set.
    pub fn edit_answer(
        &mut self,
        item_id: ItemId,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Ready => {}
            SessionPhase::Graded => {
                self.result = None;
                self.phase = SessionPhase::Ready;
            }
            _ => return Err(SessionError::NotReady),
        }
        if self.item(item_id).is_none() {
            return Err(SessionError::UnknownItem(item_id));
        }
        self.answers.fill(item_id, text);
        Ok(())
    }

    //
    // ─── SUBMITTING ────────────────────────────────────────────────────────
    //

    /// Validate completeness and enter `Submitting`, producing the wire
    /// request for the gateway.
    ///
    /// An incomplete sheet is rejected here, locally — the phase does not
    /// move and nothing reaches the network. Legal from `Ready` and from a
    /// submit fault (resubmission with preserved answers).
    ///
    /// # Errors
    ///
    /// Returns `SubmissionInFlight` while `Submitting`, `NotReady` from
    /// other phases, `NoSelection` without a category, and
    /// `IncompleteAnswers` listing the unanswered item ids.
    pub fn prepare_submission(&mut self) -> Result<SubmissionRequest, SessionError> {
        match &self.phase {
            SessionPhase::Submitting => return Err(SessionError::SubmissionInFlight),
            SessionPhase::Ready
            | SessionPhase::Faulted(Fault {
                during: Activity::Submit,
                ..
            }) => {}
            _ => return Err(SessionError::NotReady),
        }

        let category_id = self.category_id().ok_or(SessionError::NoSelection)?;

        if let Completeness::Incomplete { missing } = self.answers.completeness(&self.items) {
            return Err(SessionError::IncompleteAnswers { missing });
        }

        let answers = self
            .items
            .iter()
            .filter(|item| item.payload().is_answerable())
            .map(|item| AnswerEntry {
                item_id: item.id(),
                user_answer: self
                    .answers
                    .answer_for(item.id())
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        self.phase = SessionPhase::Submitting;
        Ok(SubmissionRequest {
            category_id,
            answers,
        })
    }

    /// Store the graded result and enter `Graded`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotReady` unless the session is `Submitting`.
    pub fn complete_submission(
        &mut self,
        result: SubmissionResult,
    ) -> Result<&SubmissionResult, SessionError> {
        if self.phase != SessionPhase::Submitting {
            return Err(SessionError::NotReady);
        }
        self.phase = SessionPhase::Graded;
        Ok(self.result.insert(result))
    }

    /// Park the session on a submit fault, keeping every answer so the
    /// student can resubmit. Ignored outside `Submitting`.
    pub fn fail_submission(&mut self, error: &RemoteError) {
        if self.phase == SessionPhase::Submitting {
            self.phase = SessionPhase::Faulted(Fault {
                during: Activity::Submit,
                message: error.to_string(),
            });
        }
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────
    //

    /// Reconcile the local view after a mutation the gateway accepted.
    ///
    /// Removal drops the item, its answer, and its verdict, and decrements
    /// the owning category's count; grading counts stay pinned to submission
    /// time. The whole reconciliation applies atomically — callers only
    /// invoke this after the remote call succeeded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownItem` if the item is not in the active
    /// set.
    pub fn apply_mutation(
        &mut self,
        item_id: ItemId,
        action: MutationAction,
    ) -> Result<MutationOutcome, SessionError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or(SessionError::UnknownItem(item_id))?;

        match action {
            MutationAction::Delete | MutationAction::MarkMastered => {
                self.items.remove(position);
                self.answers.clear_item(item_id);
                if let Some(result) = &self.result {
                    self.result = Some(result.without_item(item_id));
                }
                if let Some(category) = &mut self.category {
                    category.note_item_removed();
                }
                Ok(MutationOutcome::Removed {
                    mastered: action == MutationAction::MarkMastered,
                })
            }
            MutationAction::Collect => {
                self.items[position].set_collected(true);
                Ok(MutationOutcome::Flagged { collected: true })
            }
            MutationAction::Uncollect => {
                self.items[position].set_collected(false);
                Ok(MutationOutcome::Flagged { collected: false })
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use sprach_core::model::{ItemPayload, ItemVerdict};
    use sprach_core::time::fixed_now;

    fn category(count: u32) -> Category {
        Category::new(CategoryId::new(1), "语法题", count).unwrap()
    }

    fn exercise(id: u64) -> Item {
        Item::new(
            ItemId::new(id),
            ItemPayload::Grammar {
                question: format!("Frage {id}"),
            },
        )
    }

    fn verdict(id: u64, is_correct: bool) -> ItemVerdict {
        ItemVerdict {
            item_id: ItemId::new(id),
            is_correct,
            correct_answer: "richtig".into(),
            analysis: String::new(),
        }
    }

    fn ticket(n: u64) -> LoadTicket {
        // Tickets come from an ItemLoader in production; fabricate a loader
        // here so tests stay in lockstep with its numbering.
        let gateway = std::sync::Arc::new(gateway::InMemoryGateway::new());
        let mut loader = crate::loader::ItemLoader::new(gateway);
        let mut ticket = loader.issue_ticket();
        for _ in 1..n {
            ticket = loader.issue_ticket();
        }
        ticket
    }

    fn ready_session(item_ids: &[u64]) -> LearningSession {
        let mut session = LearningSession::new();
        let t = ticket(1);
        session.begin_loading(category(item_ids.len() as u32), t, fixed_now());
        session.finish_loading(
            t,
            LoadOutcome::Loaded(item_ids.iter().map(|id| exercise(*id)).collect()),
        );
        session
    }

    #[test]
    fn load_success_reaches_ready() {
        let session = ready_session(&[1, 2]);
        assert_eq!(*session.phase(), SessionPhase::Ready);
        assert_eq!(session.items().len(), 2);
    }

    #[test]
    fn stale_load_result_is_ignored() {
        let mut session = LearningSession::new();
        let slow = ticket(1);
        let fast = ticket(2);

        session.begin_loading(category(1), slow, fixed_now());
        session.begin_loading(category(1), fast, fixed_now());

        // The slow response arrives after the fast selection took over.
        session.finish_loading(slow, LoadOutcome::Loaded(vec![exercise(9)]));
        assert_eq!(*session.phase(), SessionPhase::Loading { ticket: fast });
        assert!(session.items().is_empty());

        session.finish_loading(fast, LoadOutcome::Loaded(vec![exercise(1)]));
        assert_eq!(*session.phase(), SessionPhase::Ready);
        assert_eq!(session.items()[0].id(), ItemId::new(1));
    }

    #[test]
    fn load_failure_faults_the_session() {
        let mut session = LearningSession::new();
        let t = ticket(1);
        session.begin_loading(category(1), t, fixed_now());
        session.finish_loading(
            t,
            LoadOutcome::Failed(RemoteError::network("connection reset")),
        );
        assert!(matches!(
            session.phase(),
            SessionPhase::Faulted(Fault {
                during: Activity::Load,
                ..
            })
        ));
    }

    #[test]
    fn faulted_load_recovers_through_a_fresh_load() {
        let mut session = LearningSession::new();
        let first = ticket(1);
        session.begin_loading(category(1), first, fixed_now());
        session.finish_loading(first, LoadOutcome::Failed(RemoteError::network("timeout")));

        let retry = ticket(2);
        session.begin_loading(category(1), retry, fixed_now());
        assert_eq!(*session.phase(), SessionPhase::Loading { ticket: retry });
        session.finish_loading(retry, LoadOutcome::Loaded(vec![exercise(1)]));
        assert_eq!(*session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn incomplete_submission_is_rejected_locally() {
        let mut session = ready_session(&[1, 2]);
        session.edit_answer(ItemId::new(1), "esse").unwrap();

        let err = session.prepare_submission().unwrap_err();
        assert_eq!(
            err,
            SessionError::IncompleteAnswers {
                missing: vec![ItemId::new(2)]
            }
        );
        assert_eq!(*session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn blank_answer_blocks_submission() {
        let mut session = ready_session(&[1]);
        session.edit_answer(ItemId::new(1), "   ").unwrap();
        assert!(matches!(
            session.prepare_submission(),
            Err(SessionError::IncompleteAnswers { .. })
        ));
    }

    #[test]
    fn complete_submission_reaches_graded() {
        let mut session = ready_session(&[1, 2]);
        session.edit_answer(ItemId::new(1), "esse").unwrap();
        session.edit_answer(ItemId::new(2), "gehst").unwrap();

        let request = session.prepare_submission().unwrap();
        assert_eq!(*session.phase(), SessionPhase::Submitting);
        assert_eq!(request.answers.len(), 2);

        let result =
            SubmissionResult::new(2, 1, 1, vec![verdict(1, true), verdict(2, false)]).unwrap();
        session.complete_submission(result).unwrap();
        assert_eq!(*session.phase(), SessionPhase::Graded);
        assert!((session.result().unwrap().score_percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn submitting_blocks_reentrant_submission() {
        let mut session = ready_session(&[1]);
        session.edit_answer(ItemId::new(1), "esse").unwrap();
        session.prepare_submission().unwrap();
        assert_eq!(
            session.prepare_submission().unwrap_err(),
            SessionError::SubmissionInFlight
        );
    }

    #[test]
    fn submit_failure_preserves_answers_and_allows_resubmission() {
        let mut session = ready_session(&[1]);
        session.edit_answer(ItemId::new(1), "esse").unwrap();
        session.prepare_submission().unwrap();
        session.fail_submission(&RemoteError::network("timeout"));

        assert!(matches!(
            session.phase(),
            SessionPhase::Faulted(Fault {
                during: Activity::Submit,
                ..
            })
        ));
        assert_eq!(session.answers().answer_for(ItemId::new(1)), Some("esse"));

        // Same answers, new attempt, no re-selection needed.
        let request = session.prepare_submission().unwrap();
        assert_eq!(request.answers[0].user_answer, "esse");
    }

    #[test]
    fn editing_after_grading_discards_the_result() {
        let mut session = ready_session(&[1, 2]);
        session.edit_answer(ItemId::new(1), "esse").unwrap();
        session.edit_answer(ItemId::new(2), "gehe").unwrap();
        session.prepare_submission().unwrap();
        let result =
            SubmissionResult::new(2, 1, 1, vec![verdict(1, true), verdict(2, false)]).unwrap();
        session.complete_submission(result).unwrap();

        session.edit_answer(ItemId::new(2), "gehst").unwrap();
        assert_eq!(*session.phase(), SessionPhase::Ready);
        assert!(session.result().is_none());
        // The unedited answer survives.
        assert_eq!(session.answers().answer_for(ItemId::new(1)), Some("esse"));
        assert_eq!(session.answers().answer_for(ItemId::new(2)), Some("gehst"));
    }

    #[test]
    fn new_selection_discards_the_previous_session_state() {
        let mut session = ready_session(&[1]);
        session.edit_answer(ItemId::new(1), "esse").unwrap();

        let t = ticket(2);
        session.begin_loading(
            Category::new(CategoryId::new(2), "过去时", 1).unwrap(),
            t,
            fixed_now(),
        );
        assert!(session.items().is_empty());
        assert!(session.answers().is_empty());
        assert!(session.result().is_none());
        assert_eq!(session.category_id(), Some(CategoryId::new(2)));
    }

    #[test]
    fn delete_mutation_removes_item_answer_and_verdict() {
        let mut session = ready_session(&[101, 102, 103]);
        for id in [101, 102, 103] {
            session.edit_answer(ItemId::new(id), "x").unwrap();
        }
        session.prepare_submission().unwrap();
        let result = SubmissionResult::new(
            3,
            1,
            2,
            vec![verdict(101, true), verdict(102, false), verdict(103, false)],
        )
        .unwrap();
        session.complete_submission(result).unwrap();

        let outcome = session
            .apply_mutation(ItemId::new(103), MutationAction::Delete)
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Removed { mastered: false });
        assert_eq!(session.items().len(), 2);
        assert_eq!(session.category().unwrap().item_count(), 2);
        assert!(session.answers().answer_for(ItemId::new(103)).is_none());

        let result = session.result().unwrap();
        assert!(result.verdict_for(ItemId::new(103)).is_none());
        assert_eq!(result.total_count(), 3);
    }

    #[test]
    fn mastered_mutation_signals_mastery() {
        let mut session = ready_session(&[1]);
        let outcome = session
            .apply_mutation(ItemId::new(1), MutationAction::MarkMastered)
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Removed { mastered: true });
        assert!(session.items().is_empty());
    }

    #[test]
    fn collect_mutation_flips_the_flag_in_place() {
        let mut session = ready_session(&[1]);
        session
            .apply_mutation(ItemId::new(1), MutationAction::Collect)
            .unwrap();
        assert!(session.item(ItemId::new(1)).unwrap().is_collected());
        session
            .apply_mutation(ItemId::new(1), MutationAction::Uncollect)
            .unwrap();
        assert!(!session.item(ItemId::new(1)).unwrap().is_collected());
    }

    #[test]
    fn progress_counts_answerable_items_only() {
        let mut session = ready_session(&[1, 2]);
        session.edit_answer(ItemId::new(1), "esse").unwrap();
        let progress = session.progress();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
        assert!(!progress.is_complete);
    }
}
