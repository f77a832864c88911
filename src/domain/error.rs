use thiserror::Error;

use super::page::InvalidPageRequest;
use super::todo::TodoId;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("no such todo: {0}")]
    NotFound(TodoId),

    #[error(transparent)]
    InvalidPage(#[from] InvalidPageRequest),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
