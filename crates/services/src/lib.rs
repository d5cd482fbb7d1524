#![forbid(unsafe_code)]

//! Orchestration layer for the language-trainer client.
//!
//! Every student screen follows the same motions: pick a category, load its
//! items, act on them, submit, and show graded feedback. The pieces here give
//! that workflow its guarantees — idempotent selection, stale-response
//! suppression, serialized submissions, all-or-nothing mutations — over the
//! gateway contracts, with no presentation concerns.

pub mod app_services;
pub mod chat;
pub mod error;
pub mod loader;
pub mod mutation;
pub mod selection;
pub mod sessions;
pub mod speaking;
pub mod writing;

pub use sprach_core::Clock;

pub use error::{ChatError, MutationError, SessionError, SpeakingError, WritingError};

pub use app_services::AppServices;
pub use chat::SceneChatService;
pub use loader::{ItemLoader, LoadOutcome, LoadTicket};
pub use mutation::MutationDispatcher;
pub use selection::{SelectionOutcome, SelectionStore};
pub use sessions::{
    Activity, Fault, LearningSession, MutationOutcome, SessionPhase, SessionProgress,
    SessionWorkflow,
};
pub use speaking::{RecordingProducer, SpeakingPractice, StubRecorder};
pub use writing::WritingService;
