use crate::clipboard::ClipboardError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("gtk application exited abnormally: {0}")]
    ExitStatus(String),
}
