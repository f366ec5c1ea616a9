use std::{
  fmt,
  path::{Path, PathBuf},
};

use itertools::Itertools;
use tracing::{info, warn};

use crate::{
  model::{
    learn,
    metrics::{mean_squared_error, r_squared, tolerance_accuracy},
    read_csv, Adaline, Dataset, FeatureMap, HyperParams,
  },
  utils::serialize_to_file,
  Result,
};

/// Column holding the target in regression files; the input is column 0.
pub const TARGET_COLUMN: usize = 1;

/// Fits a line to `FeatureMap`-expanded inputs of a two column file.
pub struct Regress {
  data_path: PathBuf,
  feature_map: FeatureMap,
  hyper: HyperParams,
  tolerance: f64,
  weights_output_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RegressReport {
  pub model: Adaline,
  pub mse: f64,
  pub r_squared: f64,
  /// Percentage of fitted values within the tolerance of their target.
  pub tolerance_accuracy: f64,
}

impl fmt::Display for RegressReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "WEIGHTS [{} ]", self.model.weights.iter().join(" "))?;
    writeln!(f, "MSE: {}", self.mse)?;
    writeln!(f, "R2: {}", self.r_squared)?;
    writeln!(f, "WITHIN TOLERANCE: {}", self.tolerance_accuracy)
  }
}

impl Regress {
  pub fn new(
    data_path: &Path,
    feature_map: FeatureMap,
    hyper: HyperParams,
    tolerance: f64,
    weights_output_path: Option<&Path>,
  ) -> Self {
    Self {
      data_path: PathBuf::from(data_path),
      feature_map,
      hyper,
      tolerance,
      weights_output_path: weights_output_path.map(PathBuf::from),
    }
  }

  pub fn run(self) -> Result<RegressReport> {
    let rows = read_csv(&self.data_path)?;
    let dataset = Dataset::from_columns(&rows, TARGET_COLUMN, self.feature_map)?;
    info!(
      "Regressing {} observations from {:?} with {:?}",
      dataset.len(),
      self.data_path,
      self.feature_map
    );
    let report = self.train(&dataset)?;
    println!("{}", report);
    if let Some(path) = &self.weights_output_path {
      serialize_to_file(path, &report.model)?;
      info!("Wrote weights to {:?}", path);
    }
    Ok(report)
  }

  pub fn train(&self, dataset: &Dataset) -> Result<RegressReport> {
    let model = learn(
      &dataset.features,
      &dataset.labels,
      self.hyper.learning_rate,
      self.hyper.epochs,
      &mut self.hyper.rng(),
    )?;
    let fitted = model.net_product(&dataset.features)?;
    let mse = mean_squared_error(&dataset.labels, &fitted)?;
    if !mse.is_finite() {
      warn!("Training diverged (mse {}), try a smaller learning rate", mse);
    }
    Ok(RegressReport {
      r_squared: r_squared(&dataset.labels, &fitted)?,
      tolerance_accuracy: tolerance_accuracy(&dataset.labels, &fitted, self.tolerance)?,
      mse,
      model,
    })
  }
}
