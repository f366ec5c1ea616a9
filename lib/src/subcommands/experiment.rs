use std::path::{Path, PathBuf};

use tracing::info;

use super::{Classify, ClassifyReport, Regress, RegressReport};
use crate::{
  model::{FeatureMap, HyperParams},
  Result,
};

pub const LEARNING_RATE: f64 = 1e-10;
pub const CLASSIFY_EPOCHS: usize = 100;
pub const LOG_SHIFT_EPOCHS: usize = 20000;
pub const CUBIC_EPOCHS: usize = 10;
pub const LOG_SHIFT: f64 = 20000.0;
pub const DEFAULT_TOLERANCE: f64 = 1.0;

/// The three reference trials: a two-class fit of the earth/space against
/// the med/sci observations, then two basis-expanded regressions on the trial
/// data.
pub struct Experiment {
  earth_space_path: PathBuf,
  med_sci_path: PathBuf,
  trial_data_path: PathBuf,
  seed: Option<u64>,
  tolerance: f64,
}

#[derive(Debug, Clone)]
pub struct ExperimentReport {
  pub classification: ClassifyReport,
  pub log_shift: RegressReport,
  pub cubic: RegressReport,
}

impl Experiment {
  pub fn new(
    earth_space_path: &Path,
    med_sci_path: &Path,
    trial_data_path: &Path,
    seed: Option<u64>,
    tolerance: f64,
  ) -> Self {
    Self {
      earth_space_path: PathBuf::from(earth_space_path),
      med_sci_path: PathBuf::from(med_sci_path),
      trial_data_path: PathBuf::from(trial_data_path),
      seed,
      tolerance,
    }
  }

  fn hyper(&self, epochs: usize) -> HyperParams {
    HyperParams::new(LEARNING_RATE, epochs).with_seed(self.seed)
  }

  #[tracing::instrument(skip(self))]
  pub fn run(self) -> Result<ExperimentReport> {
    info!("Trial 1: two-class fit");
    let classification = Classify::new(
      &self.earth_space_path,
      &self.med_sci_path,
      self.hyper(CLASSIFY_EPOCHS),
      None,
      None,
    )
    .run()?;

    info!("Trial 2: x and log10(x + {})", LOG_SHIFT);
    let log_shift = Regress::new(
      &self.trial_data_path,
      FeatureMap::LogShift { shift: LOG_SHIFT },
      self.hyper(LOG_SHIFT_EPOCHS),
      self.tolerance,
      None,
    )
    .run()?;

    info!("Trial 3: x and x^3");
    let cubic = Regress::new(
      &self.trial_data_path,
      FeatureMap::Cubic,
      self.hyper(CUBIC_EPOCHS),
      self.tolerance,
      None,
    )
    .run()?;

    Ok(ExperimentReport {
      classification,
      log_shift,
      cubic,
    })
  }
}
