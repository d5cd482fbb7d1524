use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;
use tracing::debug;

use gateway::{MutationAction, StudyGateway};
use sprach_core::Clock;
use sprach_core::model::{AnswerSheet, Category, CategoryId, Item, ItemId, SubmissionResult};

use super::progress::SessionProgress;
use super::state::{LearningSession, MutationOutcome, SessionPhase};
use crate::error::{MutationError, SessionError};
use crate::loader::{ItemLoader, LoadTicket};
use crate::mutation::MutationDispatcher;
use crate::selection::{SelectionOutcome, SelectionStore};

/// Orchestrates one screen's learning session: category selection, item
/// loading with stale-response suppression, answer collection, grading, and
/// per-item mutations.
///
/// Construct one per screen mount and drop it on unmount; nothing here is
/// shared across screens.
pub struct SessionWorkflow {
    clock: Clock,
    gateway: Arc<dyn StudyGateway>,
    selection: SelectionStore,
    loader: ItemLoader,
    dispatcher: MutationDispatcher,
    session: LearningSession,
    categories: Vec<Category>,
    shuffle: bool,
}

impl SessionWorkflow {
    #[must_use]
    pub fn new(gateway: Arc<dyn StudyGateway>, clock: Clock) -> Self {
        Self {
            clock,
            selection: SelectionStore::new(),
            loader: ItemLoader::new(Arc::clone(&gateway)),
            dispatcher: MutationDispatcher::new(Arc::clone(&gateway)),
            gateway,
            session: LearningSession::new(),
            categories: Vec::new(),
            shuffle: false,
        }
    }

    /// Enable or disable shuffling of the practice order on load.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn selected(&self) -> Option<CategoryId> {
        self.selection.current()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        self.session.items()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        self.session.answers()
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.session.result()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    /// Register a listener on selection changes (used by the presentation
    /// layer to reset scroll position and the like).
    pub fn on_selection_change(
        &mut self,
        listener: impl Fn(Option<CategoryId>, CategoryId) + Send + 'static,
    ) {
        self.selection.subscribe(listener);
    }

    //
    // ─── CATEGORIES ────────────────────────────────────────────────────────
    //

    /// Fetch the category listing. Called once per screen mount; replaces the
    /// listing wholesale and clears a selection that no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Remote` when the listing cannot be fetched;
    /// the previous listing stays in place.
    pub async fn refresh_categories(&mut self) -> Result<&[Category], SessionError> {
        let categories = self.gateway.list_categories().await?;
        if let Some(current) = self.selection.current()
            && !categories.iter().any(|c| c.id() == current)
        {
            self.selection.clear();
        }
        self.categories = categories;
        Ok(&self.categories)
    }

    fn category(&self, category_id: CategoryId) -> Result<Category, SessionError> {
        self.categories
            .iter()
            .find(|c| c.id() == category_id)
            .cloned()
            .ok_or(SessionError::UnknownCategory(category_id))
    }

    //
    // ─── SELECTION AND LOADING ─────────────────────────────────────────────
    //

    /// Select a category and load its items.
    ///
    /// Re-selecting the active category is a no-op. Selecting a different
    /// one voids the previous items, answers, and result, and any load still
    /// in flight for the old selection is discarded when it resolves.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` for ids missing from the listing and
    /// `Remote` when the load fails (the session parks on a load fault).
    pub async fn select(&mut self, category_id: CategoryId) -> Result<&SessionPhase, SessionError> {
        let category = self.category(category_id)?;
        if self.selection.select(category_id) == SelectionOutcome::Unchanged {
            debug!(%category_id, "selection unchanged, skipping reload");
            return Ok(self.session.phase());
        }
        self.run_load(category).await
    }

    /// Re-issue the load for the current selection, e.g. after a load fault.
    /// The selection itself is untouched.
    ///
    /// # Errors
    ///
    /// Returns `NoSelection` without an active selection, otherwise behaves
    /// like the load half of `select`.
    pub async fn retry_load(&mut self) -> Result<&SessionPhase, SessionError> {
        let category_id = self.selection.current().ok_or(SessionError::NoSelection)?;
        let category = self.category(category_id)?;
        self.run_load(category).await
    }

    async fn run_load(&mut self, category: Category) -> Result<&SessionPhase, SessionError> {
        let category_id = category.id();
        let ticket = self.loader.issue_ticket();
        self.session
            .begin_loading(category, ticket, self.clock.now());

        let fetched = self.loader.fetch(category_id).await;
        self.apply_load(ticket, fetched)
    }

    fn apply_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<Vec<Item>, gateway::RemoteError>,
    ) -> Result<&SessionPhase, SessionError> {
        let mut outcome = self.loader.resolve(ticket, fetched);
        if self.shuffle
            && let crate::loader::LoadOutcome::Loaded(items) = &mut outcome
        {
            items.as_mut_slice().shuffle(&mut rng());
        }

        let failure = match &outcome {
            crate::loader::LoadOutcome::Failed(err) => Some(err.clone()),
            _ => None,
        };
        self.session.finish_loading(ticket, outcome);
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(self.session.phase()),
        }
    }

    //
    // ─── ANSWERING AND SUBMISSION ──────────────────────────────────────────
    //

    /// Record the student's answer for one item. See
    /// [`LearningSession::edit_answer`] for the phase rules.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the state machine.
    pub fn edit_answer(
        &mut self,
        item_id: ItemId,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.session.edit_answer(item_id, text)
    }

    /// Submit the answer sheet for grading.
    ///
    /// Incomplete sheets are rejected locally without touching the network.
    /// While a submission is in flight further submits are rejected; after a
    /// remote failure the same call retries with the preserved answers.
    ///
    /// # Errors
    ///
    /// Returns the state machine's local validation errors, or
    /// `SessionError::Remote` when the gateway fails (the session parks on a
    /// submit fault).
    pub async fn submit(&mut self) -> Result<&SubmissionResult, SessionError> {
        let request = self.session.prepare_submission()?;
        match self.gateway.submit_answers(&request).await {
            Ok(result) => self.session.complete_submission(result),
            Err(err) => {
                self.session.fail_submission(&err);
                Err(err.into())
            }
        }
    }

    /// Ask the backend for a targeted review round on the current selection
    /// and return its tip for display.
    ///
    /// # Errors
    ///
    /// Returns `NoSelection` without an active selection and `Remote` when
    /// the call fails.
    pub async fn start_targeted_review(&mut self) -> Result<String, SessionError> {
        let category_id = self.selection.current().ok_or(SessionError::NoSelection)?;
        let category = self.category(category_id)?;
        let tip = self
            .gateway
            .start_targeted_review(category_id, category.name())
            .await?;
        Ok(tip)
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────
    //

    /// Apply one per-item mutation through the dispatcher and reconcile the
    /// category listing on removal.
    ///
    /// # Errors
    ///
    /// Returns `MutationError` on validation or remote failure; local state
    /// is untouched unless the remote call succeeded.
    pub async fn mutate(
        &mut self,
        item_id: ItemId,
        action: MutationAction,
    ) -> Result<MutationOutcome, MutationError> {
        self.dispatcher
            .dispatch(&mut self.session, &mut self.categories, item_id, action)
            .await
    }
}

impl std::fmt::Debug for SessionWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionWorkflow")
            .field("selected", &self.selection.current())
            .field("phase", self.session.phase())
            .field("categories_len", &self.categories.len())
            .field("shuffle", &self.shuffle)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
