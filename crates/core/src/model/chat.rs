use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::SceneId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SceneError {
    #[error("scene name cannot be empty")]
    EmptyName,
}

//
// ─── SCENE ─────────────────────────────────────────────────────────────────────
//

/// A roleplay setting for the conversation practice screen, e.g. ordering in
/// a restaurant or a university admission interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatScene {
    id: SceneId,
    name: String,
    description: String,
}

impl ChatScene {
    /// Create a scene with a validated name.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::EmptyName` if `name` is blank after trimming.
    pub fn new(
        id: SceneId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SceneError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SceneError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            description: description.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

//
// ─── MESSAGES ──────────────────────────────────────────────────────────────────
//

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Author {
    Student,
    Assistant,
    /// Local notes such as grammar-correction hints.
    System,
}

/// One entry in a scene-chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: Author,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(author: Author, body: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            author,
            body: body.into(),
            sent_at,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn scene_requires_a_name() {
        let err = ChatScene::new(SceneId::new(1), "", "desc").unwrap_err();
        assert_eq!(err, SceneError::EmptyName);
    }

    #[test]
    fn message_keeps_author_and_time() {
        let msg = ChatMessage::new(Author::Assistant, "Guten Tag!", fixed_now());
        assert_eq!(msg.author, Author::Assistant);
        assert_eq!(msg.sent_at, fixed_now());
    }
}
