//! Stage error composition (§7): the only stage that can fail is
//! recommendation generation — intent processing and composition are
//! both infallible by design.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("recommendation stage failed: {0}")]
    Recommend(#[from] wr_recommend::RecommendError),

    #[error("recommendation stage timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type StageResult<T> = Result<T, StageError>;
