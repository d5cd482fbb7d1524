use sprach_core::model::CategoryId;

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// What a `select` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The active category changed; pending work for the old one is void.
    Changed,
    /// The same category was selected again; nothing to reload.
    Unchanged,
}

/// Listener invoked after the active category changes.
///
/// Receives the previous selection (if any) and the new one.
pub type SelectionListener = Box<dyn Fn(Option<CategoryId>, CategoryId) + Send>;

//
// ─── SELECTION STORE ───────────────────────────────────────────────────────────
//

/// Single source of truth for which category a screen is showing.
///
/// One store per screen instance; `select` is idempotent so re-clicking the
/// active category never triggers a reload.
#[derive(Default)]
pub struct SelectionStore {
    current: Option<CategoryId>,
    listeners: Vec<SelectionListener>,
}

impl SelectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<CategoryId> {
        self.current
    }

    /// Make `category_id` the active selection.
    ///
    /// Selecting the already-active category is a no-op: no listener fires
    /// and the caller must not reload.
    pub fn select(&mut self, category_id: CategoryId) -> SelectionOutcome {
        if self.current == Some(category_id) {
            return SelectionOutcome::Unchanged;
        }
        let previous = self.current.replace(category_id);
        for listener in &self.listeners {
            listener(previous, category_id);
        }
        SelectionOutcome::Changed
    }

    /// Drop the active selection, e.g. when the category listing is refreshed
    /// wholesale.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Register a change listener. Listeners fire on every change, in
    /// registration order, after the store already points at the new value.
    pub fn subscribe(&mut self, listener: impl Fn(Option<CategoryId>, CategoryId) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("current", &self.current)
            .field("listeners_len", &self.listeners.len())
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
