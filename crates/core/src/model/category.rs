use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CategoryId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category name cannot be empty")]
    EmptyName,
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// A named grouping of learnable items: a grammar topic, an error-book
/// classification, a listening collection, a favorites bucket.
///
/// Categories arrive from the remote listing and are replaced wholesale on
/// refresh; the only field that moves locally is `item_count`, which tracks
/// deletions applied through the mutation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    item_count: u32,
}

impl Category {
    /// Create a category with a validated name.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` if `name` is blank after trimming.
    pub fn new(
        id: CategoryId,
        name: impl Into<String>,
        item_count: u32,
    ) -> Result<Self, CategoryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            item_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Record the removal of one item from this category.
    ///
    /// Saturates at zero; the count is a display hint, not an authority.
    pub fn note_item_removed(&mut self) {
        self.item_count = self.item_count.saturating_sub(1);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
