mod answer;
mod category;
mod chat;
mod ids;
mod item;
mod speaking;
mod submission;
mod writing;

pub use ids::{CategoryId, ItemId, ParseIdError, SceneId};

pub use answer::{AnswerSheet, Completeness};
pub use category::{Category, CategoryError};
pub use chat::{Author, ChatMessage, ChatScene, SceneError};
pub use item::{Item, ItemPayload};
pub use speaking::{Recording, RecordingId, SpeakingFeedback};
pub use submission::{ItemVerdict, SubmissionResult, SubmissionResultError};
pub use writing::{WritingIssue, WritingReview};
