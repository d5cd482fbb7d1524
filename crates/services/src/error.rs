//! Shared error types for the services crate.
//!
//! Each enum separates locally detected precondition failures (which never
//! reach the network and leave state untouched) from remote failures wrapped
//! transparently. Every variant renders as a single user-displayable message.

use thiserror::Error;

use gateway::RemoteError;
use sprach_core::model::{CategoryId, ItemId, SceneId};

/// Errors emitted by the session workflow and its state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no category is selected")]
    NoSelection,

    #[error("category {0} is not in the loaded listing")]
    UnknownCategory(CategoryId),

    #[error("item {0} is not part of the active set")]
    UnknownItem(ItemId),

    #[error("the session is not ready for this action")]
    NotReady,

    #[error("{} item(s) still need an answer", missing.len())]
    IncompleteAnswers { missing: Vec<ItemId> },

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors emitted by `MutationDispatcher`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MutationError {
    #[error("no category is selected")]
    NoSelection,

    #[error("item {0} is not part of the active set")]
    UnknownItem(ItemId),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors emitted by `SceneChatService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChatError {
    #[error("no conversation scene is selected")]
    NoScene,

    #[error("scene {0} is not in the scene list")]
    UnknownScene(SceneId),

    #[error("the message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors emitted by `WritingService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WritingError {
    #[error("the text is empty")]
    EmptyText,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors emitted by `SpeakingPractice`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpeakingError {
    #[error("no listening material is selected")]
    NoMaterial,

    #[error("there is no finished recording to evaluate")]
    NoRecording,

    #[error("the recorder is still capturing")]
    RecorderBusy,

    #[error("recorder failure: {0}")]
    Recorder(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
