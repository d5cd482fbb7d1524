mod progress;
mod state;
mod workflow;

pub use progress::SessionProgress;
pub use state::{Activity, Fault, LearningSession, MutationOutcome, SessionPhase};
pub use workflow::SessionWorkflow;
