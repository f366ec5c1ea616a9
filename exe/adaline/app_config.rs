use std::path::{Path, PathBuf};

use adaline::AdalineError;
use serde::Deserialize;

/// Settings shared by the subcommands. Also defines the config file format
/// (every field can be omitted).
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
  pub learning_rate: Option<f64>,
  pub epochs: Option<usize>,
  /// Seed for weight initialization
  pub seed: Option<u64>,
  /// Regression scoring: a fitted value this close to its target counts as a hit
  pub tolerance: Option<f64>,
  pub earth_space: Option<PathBuf>,
  pub med_sci: Option<PathBuf>,
  pub trial_data: Option<PathBuf>,
}

impl AppConfig {
  pub fn from_file(path: &Path) -> Result<Self, AdalineError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
      std::io::ErrorKind::NotFound => AdalineError::FileNotFound(path.to_path_buf()),
      _ => AdalineError::Io(e),
    })?;
    serde_yaml::from_str(&content)
      .map_err(|e| AdalineError::Config(format!("{}: {}", path.display(), e)))
  }

  // merge configs where the second overwrites the first
  pub fn merge(self, other: Self) -> Self {
    Self {
      learning_rate: other.learning_rate.or(self.learning_rate),
      epochs: other.epochs.or(self.epochs),
      seed: other.seed.or(self.seed),
      tolerance: other.tolerance.or(self.tolerance),
      earth_space: other.earth_space.or(self.earth_space),
      med_sci: other.med_sci.or(self.med_sci),
      trial_data: other.trial_data.or(self.trial_data),
    }
  }

  pub fn require_path(value: Option<PathBuf>, name: &str) -> Result<PathBuf, AdalineError> {
    value.ok_or_else(|| {
      AdalineError::Config(format!("`{}` must be given on the command line or in the config file", name))
    })
  }
}
