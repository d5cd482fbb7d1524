use std::sync::Arc;

use tracing::warn;

use gateway::{MutationAction, MutationRequest, StudyGateway};
use sprach_core::model::{Category, ItemId};

use crate::error::MutationError;
use crate::sessions::{LearningSession, MutationOutcome};

/// Applies per-item mutations (collect, mark-mastered, delete) and reconciles
/// the local view afterwards.
///
/// Each call sends exactly one request — no retry, no deduplication; a
/// repeated invocation is a repeated request. The local view moves only after
/// the gateway accepted the mutation, and then atomically: on failure nothing
/// changes and the error is handed back for user-facing reporting.
pub struct MutationDispatcher {
    gateway: Arc<dyn StudyGateway>,
}

impl MutationDispatcher {
    #[must_use]
    pub fn new(gateway: Arc<dyn StudyGateway>) -> Self {
        Self { gateway }
    }

    /// Send one mutation and, on success, fold its effect into the session
    /// and the category listing.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::NoSelection`/`UnknownItem` for local
    /// precondition failures (nothing is sent), or `MutationError::Remote`
    /// when the gateway refused (local state untouched).
    pub async fn dispatch(
        &self,
        session: &mut LearningSession,
        categories: &mut [Category],
        item_id: ItemId,
        action: MutationAction,
    ) -> Result<MutationOutcome, MutationError> {
        let category_id = session.category_id().ok_or(MutationError::NoSelection)?;
        if session.item(item_id).is_none() {
            return Err(MutationError::UnknownItem(item_id));
        }

        let request = MutationRequest {
            item_id,
            category_id,
            action,
        };
        if let Err(err) = self.gateway.mutate_item(&request).await {
            warn!(%item_id, ?action, "mutation rejected: {err}");
            return Err(err.into());
        }

        let outcome = session
            .apply_mutation(item_id, action)
            .map_err(|_| MutationError::UnknownItem(item_id))?;

        if matches!(outcome, MutationOutcome::Removed { .. })
            && let Some(category) = categories.iter_mut().find(|c| c.id() == category_id)
        {
            category.note_item_removed();
        }
        Ok(outcome)
    }
}

impl std::fmt::Debug for MutationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationDispatcher").finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
