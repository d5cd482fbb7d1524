use thiserror::Error;

use crate::model::CategoryError;
use crate::model::SceneError;
use crate::model::SubmissionResultError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    SubmissionResult(#[from] SubmissionResultError),
}
