use std::{
  fmt,
  path::{Path, PathBuf},
};

use tracing::info;

use crate::{
  model::{accuracy, learn, read_csv, split_dataset, Adaline, Dataset, HyperParams},
  utils::serialize_to_file,
  AdalineError, Result,
};

/// Two-class training: rows of the first file are labelled +1, rows of the
/// second -1.
pub struct Classify {
  positive_path: PathBuf,
  negative_path: PathBuf,
  hyper: HyperParams,
  /// Share of rows held out for testing. `None` trains and scores on everything.
  test_ratio: Option<f64>,
  weights_output_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ClassifyReport {
  pub model: Adaline,
  /// Percentage on the rows the model was trained on.
  pub accuracy: f64,
  pub test_accuracy: Option<f64>,
}

impl fmt::Display for ClassifyReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "ACCURACY: {}", self.accuracy)?;
    if let Some(test_accuracy) = self.test_accuracy {
      writeln!(f, "TEST ACCURACY: {}", test_accuracy)?;
    }
    Ok(())
  }
}

impl Classify {
  pub fn new(
    positive_path: &Path,
    negative_path: &Path,
    hyper: HyperParams,
    test_ratio: Option<f64>,
    weights_output_path: Option<&Path>,
  ) -> Self {
    Self {
      positive_path: PathBuf::from(positive_path),
      negative_path: PathBuf::from(negative_path),
      hyper,
      test_ratio,
      weights_output_path: weights_output_path.map(PathBuf::from),
    }
  }

  pub fn run(self) -> Result<ClassifyReport> {
    let dataset = Dataset::two_class(
      read_csv(&self.positive_path)?,
      read_csv(&self.negative_path)?,
    );
    info!(
      "Classifying {} observations from {:?} and {:?}",
      dataset.len(),
      self.positive_path,
      self.negative_path
    );
    let report = self.train(dataset)?;
    println!("{}", report);
    if let Some(path) = &self.weights_output_path {
      serialize_to_file(path, &report.model)?;
      info!("Wrote weights to {:?}", path);
    }
    Ok(report)
  }

  pub fn train(&self, dataset: Dataset) -> Result<ClassifyReport> {
    let mut rng = self.hyper.rng();
    let (train, test) = match self.test_ratio {
      Some(ratio) => {
        if !(0.0..1.0).contains(&ratio) {
          return Err(AdalineError::InvalidHyperParameter(format!(
            "holdout share must lie in [0, 1), got {}",
            ratio
          )));
        }
        let (train, test) = split_dataset(dataset, ratio, &mut rng)?;
        (train, Some(test).filter(|test| !test.is_empty()))
      }
      None => (dataset, None),
    };

    let model = learn(
      &train.features,
      &train.labels,
      self.hyper.learning_rate,
      self.hyper.epochs,
      &mut rng,
    )?;
    let train_accuracy = accuracy(&train.labels, &model.predict(&train.features)?)?;
    let test_accuracy = match test {
      Some(test) => Some(accuracy(&test.labels, &model.predict(&test.features)?)?),
      None => None,
    };
    Ok(ClassifyReport {
      model,
      accuracy: train_accuracy,
      test_accuracy,
    })
  }
}
