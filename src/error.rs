use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OdeError {
  #[error("dimension mismatch: {left} components vs {right} components")]
  DimensionMismatch { left: usize, right: usize },

  #[error("index {index} out of range for vector of dimension {dimension}")]
  IndexOutOfRange { index: usize, dimension: usize },

  #[error("division by zero")]
  DivisionByZero,

  #[error("invalid configuration: {0}")]
  InvalidConfiguration(String),

  #[error("solver already completed all {max_iterations} iterations")]
  AlreadyComplete { max_iterations: usize },
}

pub type Result<T> = std::result::Result<T, OdeError>;
