use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdalineError>;

#[derive(Error, Debug)]
pub enum AdalineError {
  /// Lengths of vectors or matrix rows do not line up.
  #[error("shape mismatch in {context}: expected {expected}, found {found}")]
  ShapeMismatch {
    context: String,
    expected: usize,
    found: usize,
  },

  /// Nothing to train on or to score.
  #[error("insufficient data: {0}")]
  InsufficientData(String),

  #[error("invalid hyperparameter: {0}")]
  InvalidHyperParameter(String),

  #[error("file not found: {0}")]
  FileNotFound(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Row and column are 1-based.
  #[error("{}:{row}:{column}: cannot parse {field:?} as a number", .path.display())]
  Parse {
    path: PathBuf,
    row: usize,
    column: usize,
    field: String,
  },

  #[error("configuration error: {0}")]
  Config(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl AdalineError {
  pub fn shape(context: impl Into<String>, expected: usize, found: usize) -> Self {
    AdalineError::ShapeMismatch {
      context: context.into(),
      expected,
      found,
    }
  }

  pub fn is_shape_mismatch(&self) -> bool {
    matches!(self, AdalineError::ShapeMismatch { .. })
  }

  pub fn is_insufficient_data(&self) -> bool {
    matches!(self, AdalineError::InsufficientData(_))
  }
}
