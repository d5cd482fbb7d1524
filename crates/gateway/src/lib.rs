#![forbid(unsafe_code)]

//! Remote boundary for the language-trainer client.
//!
//! Everything the backend offers is reached through the trait contracts in
//! [`api`]; the rest of this crate is the plumbing behind them: the uniform
//! response envelope, the error taxonomy, a reqwest-backed implementation,
//! and an in-memory implementation for tests and prototyping.

pub mod api;
pub mod envelope;
pub mod error;
pub mod http;
pub mod memory;
pub mod records;

pub use api::{
    AnswerEntry, ChatGateway, ChatReply, MutationAction, MutationRequest, SpeakingGateway,
    StudyGateway, SubmissionRequest, WritingGateway,
};
pub use envelope::Envelope;
pub use error::{RemoteError, RemoteErrorKind};
pub use http::{
    GatewayConfig, HttpChatGateway, HttpSpeakingGateway, HttpStudyGateway, HttpWritingGateway,
    StudyRoutes,
};
pub use memory::InMemoryGateway;
