use std::sync::Arc;

use tracing::debug;

use gateway::{RemoteError, StudyGateway};
use sprach_core::model::{CategoryId, Item};

//
// ─── TICKETS ───────────────────────────────────────────────────────────────────
//

/// Monotonically increasing token for one issued load.
///
/// A response is only honored if its ticket is still the latest one; anything
/// older belongs to a superseded selection and is dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Resolution of one load against the latest issued ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response belongs to the latest load and carries the item set.
    Loaded(Vec<Item>),
    /// The latest load failed; the session should fault.
    Failed(RemoteError),
    /// A newer load was issued before this one resolved; ignore it entirely,
    /// success or failure alike.
    Superseded,
}

//
// ─── ITEM LOADER ───────────────────────────────────────────────────────────────
//

/// Fetches the item set for a selection and suppresses stale responses.
///
/// There is no cancellation of in-flight requests; superseded responses are
/// simply discarded when they resolve.
pub struct ItemLoader {
    gateway: Arc<dyn StudyGateway>,
    latest: u64,
}

impl ItemLoader {
    #[must_use]
    pub fn new(gateway: Arc<dyn StudyGateway>) -> Self {
        Self { gateway, latest: 0 }
    }

    /// Issue the ticket for a new load, invalidating every earlier one.
    pub fn issue_ticket(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    /// True if `ticket` is still the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Perform the remote fetch for `category_id`.
    ///
    /// This is the suspension point; callers pair it with `resolve` so that
    /// staleness is judged at resolution time, not at issue time.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` exactly as the gateway produced it.
    pub async fn fetch(&self, category_id: CategoryId) -> Result<Vec<Item>, RemoteError> {
        self.gateway.list_items(category_id).await
    }

    /// Resolve a finished fetch against the latest ticket.
    pub fn resolve(
        &self,
        ticket: LoadTicket,
        fetched: Result<Vec<Item>, RemoteError>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.value(),
                latest = self.latest,
                "dropping stale load response"
            );
            return LoadOutcome::Superseded;
        }
        match fetched {
            Ok(items) => LoadOutcome::Loaded(items),
            Err(err) => LoadOutcome::Failed(err),
        }
    }
}

impl std::fmt::Debug for ItemLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemLoader")
            .field("latest", &self.latest)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
