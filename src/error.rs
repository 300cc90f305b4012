use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("duplicate garage id: {0}")]
    DuplicateGarage(String),
    #[error("garage id must not be empty")]
    EmptyGarageId,
}
