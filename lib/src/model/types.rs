use rand::{rngs::StdRng, SeedableRng};

/// Row-major, one observation per row. Every row must have the same width.
pub type Matrix = Vec<Vec<f64>>;

/// Label of the first class in two-class data.
pub const POSITIVE: f64 = 1.0;
/// Label of the second class in two-class data.
pub const NEGATIVE: f64 = -1.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
  pub features: Matrix,
  pub labels: Vec<f64>,
}

impl Dataset {
  pub fn new(features: Matrix, labels: Vec<f64>) -> Self {
    Self { features, labels }
  }

  pub fn len(&self) -> usize {
    self.features.len()
  }

  pub fn is_empty(&self) -> bool {
    self.features.is_empty()
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperParams {
  pub learning_rate: f64,
  pub epochs: usize,
  /// Fixed seed for weight initialization. `None` draws one from the OS.
  pub seed: Option<u64>,
}

impl HyperParams {
  pub fn new(learning_rate: f64, epochs: usize) -> Self {
    Self {
      learning_rate,
      epochs,
      seed: None,
    }
  }

  pub fn with_seed(self, seed: Option<u64>) -> Self {
    Self { seed, ..self }
  }

  pub fn rng(&self) -> StdRng {
    match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    }
  }
}

pub struct TrainParams {
  pub data: Dataset,
  pub hyper: HyperParams,
}
