use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{
  linalg::{
    add_vectors, check_rectangular, matrix_vector_product, scale_vector, subtract_vectors,
    transpose, vector_power, vector_sum,
  },
  TrainParams,
};
use crate::error::{AdalineError, Result};

/// Standard deviation of the Gaussian noise used for initial weights.
pub const WEIGHT_STD_DEV: f64 = 0.01;

/// Trained weights (bias first) and the per-epoch MSE recorded while training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adaline {
  pub weights: Vec<f64>,
  pub mse: Vec<f64>,
}

impl Adaline {
  /// `None` only for a model deserialized without weights.
  pub fn bias(&self) -> Option<f64> {
    self.weights.first().copied()
  }

  pub fn net_product(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
    net_product(features, &self.weights)
  }

  pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
    predict(features, &self.weights)
  }
}

/// One weight per feature plus the bias, each drawn from N(0, 0.01).
pub fn random_weights<R: Rng + ?Sized>(features: &[Vec<f64>], rng: &mut R) -> Result<Vec<f64>> {
  let width = match features.first() {
    Some(row) => row.len(),
    None => {
      return Err(AdalineError::InsufficientData(
        "cannot size weights from an empty feature matrix".to_string(),
      ))
    }
  };
  let normal = Normal::new(0.0, WEIGHT_STD_DEV)
    .map_err(|e| AdalineError::InvalidHyperParameter(e.to_string()))?;
  Ok((0..=width).map(|_| normal.sample(&mut *rng)).collect())
}

/// `bias + row · weights[1..]` for every row.
pub fn net_product(features: &[Vec<f64>], weights: &[f64]) -> Result<Vec<f64>> {
  let (bias, rest) = weights
    .split_first()
    .ok_or_else(|| AdalineError::shape("weight vector", 1, 0))?;
  features
    .iter()
    .enumerate()
    .map(|(i, row)| {
      if row.len() != rest.len() {
        return Err(AdalineError::shape(
          format!("net product of row {}", i),
          row.len() + 1,
          weights.len(),
        ));
      }
      Ok(bias + row.iter().zip(rest).map(|(x, w)| x * w).sum::<f64>())
    })
    .collect()
}

/// Maps each net product to -1 when negative, +1 otherwise (so 0 is +1).
pub fn predict(features: &[Vec<f64>], weights: &[f64]) -> Result<Vec<f64>> {
  Ok(
    net_product(features, weights)?
      .into_iter()
      .map(|score| if score < 0.0 { -1.0 } else { 1.0 })
      .collect(),
  )
}

fn validate(features: &[Vec<f64>], labels: &[f64], learning_rate: f64, epochs: usize) -> Result<()> {
  if features.is_empty() || labels.is_empty() {
    return Err(AdalineError::InsufficientData(format!(
      "need at least one observation, got {} rows and {} labels",
      features.len(),
      labels.len()
    )));
  }
  check_rectangular(features)?;
  if labels.len() != features.len() {
    return Err(AdalineError::shape("label vector", features.len(), labels.len()));
  }
  if !learning_rate.is_finite() || learning_rate <= 0.0 {
    return Err(AdalineError::InvalidHyperParameter(format!(
      "learning rate must be positive and finite, got {}",
      learning_rate
    )));
  }
  if epochs == 0 {
    return Err(AdalineError::InvalidHyperParameter(
      "epoch count must be positive".to_string(),
    ));
  }
  Ok(())
}

/// Batch gradient descent on the squared error for a fixed number of epochs.
///
/// The MSE recorded for an epoch is measured with the weights that entered
/// that epoch, before they are updated.
#[instrument(level = "debug", skip(features, labels, rng))]
pub fn learn<R: Rng + ?Sized>(
  features: &[Vec<f64>],
  labels: &[f64],
  learning_rate: f64,
  epochs: usize,
  rng: &mut R,
) -> Result<Adaline> {
  validate(features, labels, learning_rate, epochs)?;
  let features_t = transpose(features)?;
  let mut weights = random_weights(features, rng)?;
  let mut mse = Vec::with_capacity(epochs);
  let start = std::time::Instant::now();

  for epoch in 0..epochs {
    let net = net_product(features, &weights)?;
    let gradient = scale_vector(&subtract_vectors(&net, labels)?, 2.0);

    let step = scale_vector(
      &matrix_vector_product(&features_t, &scale_vector(&gradient, -1.0))?,
      learning_rate,
    );
    let bias = weights[0] + learning_rate * -1.0 * vector_sum(&gradient);
    let updated = add_vectors(&weights[1..], &step)?;
    weights = std::iter::once(bias).chain(updated).collect();

    let error = vector_sum(&vector_power(&subtract_vectors(labels, &net)?, 2)) / labels.len() as f64;
    debug!(epoch, mse = error);
    mse.push(error);
  }

  info!(
    "Trained {} weights over {} epochs in {:.2}s, final mse {:e}",
    weights.len(),
    epochs,
    start.elapsed().as_secs_f32(),
    mse.last().copied().unwrap_or(f64::NAN)
  );
  Ok(Adaline { weights, mse })
}

/// Percentage of positions where the labels match exactly.
#[allow(clippy::float_cmp)]
pub fn accuracy(y: &[f64], predicted: &[f64]) -> Result<f64> {
  if y.is_empty() {
    return Err(AdalineError::InsufficientData(
      "cannot score an empty label vector".to_string(),
    ));
  }
  if y.len() != predicted.len() {
    return Err(AdalineError::shape("predicted labels", y.len(), predicted.len()));
  }
  let correct = y.iter().zip(predicted).filter(|(a, b)| a == b).count();
  Ok(correct as f64 / y.len() as f64 * 100.0)
}

pub fn run_model(params: TrainParams) -> Result<Adaline> {
  let TrainParams { data, hyper } = params;
  let mut rng = hyper.rng();
  learn(
    &data.features,
    &data.labels,
    hyper.learning_rate,
    hyper.epochs,
    &mut rng,
  )
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;
  use crate::model::{Dataset, HyperParams};

  fn features() -> Vec<Vec<f64>> {
    vec![vec![1.0, 2.0], vec![-1.0, 0.5], vec![0.0, 0.0]]
  }

  #[test]
  fn test_random_weights_shape() {
    let mut rng = StdRng::seed_from_u64(3);
    let w = random_weights(&features(), &mut rng).unwrap();
    assert_eq!(w.len(), 3);
    assert!(w.iter().all(|x| x.abs() < 0.1));
  }

  #[test]
  fn test_random_weights_distribution() {
    let wide = vec![vec![0.0; 9999]];
    let w = random_weights(&wide, &mut StdRng::seed_from_u64(17)).unwrap();
    assert_eq!(w.len(), 10000);
    let n = w.len() as f64;
    let mean = w.iter().sum::<f64>() / n;
    let std_dev = (w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
    assert!(mean.abs() < 5e-4, "mean {}", mean);
    assert!((std_dev - WEIGHT_STD_DEV).abs() < 5e-4, "std dev {}", std_dev);
  }

  #[test]
  fn test_bias_of_empty_model() {
    let model: Adaline = serde_json::from_str(r#"{"weights":[],"mse":[]}"#).unwrap();
    assert_eq!(model.bias(), None);
    let model: Adaline = serde_json::from_str(r#"{"weights":[0.25,1.0],"mse":[]}"#).unwrap();
    assert_eq!(model.bias(), Some(0.25));
  }

  #[test]
  fn test_random_weights_reproducible_with_seed() {
    let a = random_weights(&features(), &mut StdRng::seed_from_u64(11)).unwrap();
    let b = random_weights(&features(), &mut StdRng::seed_from_u64(11)).unwrap();
    let c = random_weights(&features(), &mut StdRng::seed_from_u64(12)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn test_random_weights_empty() {
    let err = random_weights(&[], &mut StdRng::seed_from_u64(0)).unwrap_err();
    assert!(err.is_insufficient_data());
  }

  #[test]
  fn test_net_product() {
    let nets = net_product(&features(), &[0.5, 1.0, -2.0]).unwrap();
    assert_eq!(nets, vec![-2.5, -1.5, 0.5]);
  }

  #[test]
  fn test_net_product_shape_mismatch() {
    assert!(net_product(&features(), &[0.5, 1.0]).unwrap_err().is_shape_mismatch());
    assert!(net_product(&features(), &[]).unwrap_err().is_shape_mismatch());
  }

  #[test]
  fn test_predict_boundary_is_positive() {
    let labels = predict(&features(), &[0.5, 1.0, -2.0]).unwrap();
    assert_eq!(labels, vec![-1.0, -1.0, 1.0]);
    let at_zero = predict(&[vec![0.0]], &[0.0, 1.0]).unwrap();
    assert_eq!(at_zero, vec![1.0]);
  }

  #[test]
  fn test_accuracy() {
    let y = vec![1.0, -1.0, 1.0, 1.0];
    assert_eq!(accuracy(&y, &y).unwrap(), 100.0);
    assert_eq!(accuracy(&y, &[-1.0, 1.0, -1.0, -1.0]).unwrap(), 0.0);
    assert_eq!(accuracy(&y, &[1.0, 1.0, 1.0, -1.0]).unwrap(), 50.0);
    assert!(accuracy(&[], &[]).unwrap_err().is_insufficient_data());
    assert!(accuracy(&y, &[1.0]).unwrap_err().is_shape_mismatch());
  }

  #[test]
  fn test_mse_is_measured_before_update() {
    let x = features();
    let y = vec![1.0, -1.0, 1.0];
    let initial = random_weights(&x, &mut StdRng::seed_from_u64(5)).unwrap();
    let model = learn(&x, &y, 0.05, 1, &mut StdRng::seed_from_u64(5)).unwrap();

    let net = net_product(&x, &initial).unwrap();
    let expected: f64 = net.iter().zip(&y).map(|(n, t)| (t - n).powi(2)).sum::<f64>() / 3.0;
    assert_eq!(model.mse.len(), 1);
    assert!((model.mse[0] - expected).abs() < 1e-12);

    // one explicit update step
    let grad: Vec<f64> = net.iter().zip(&y).map(|(n, t)| 2.0 * (n - t)).collect();
    let bias = initial[0] - 0.05 * grad.iter().sum::<f64>();
    assert!((model.weights[0] - bias).abs() < 1e-12);
    for j in 0..2 {
      let g: f64 = x.iter().zip(&grad).map(|(row, g)| row[j] * -g).sum();
      assert!((model.weights[j + 1] - (initial[j + 1] + 0.05 * g)).abs() < 1e-12);
    }
  }

  #[test]
  fn test_learn_rejects_bad_input() {
    let mut rng = StdRng::seed_from_u64(0);
    let ragged = vec![vec![1.0, 2.0], vec![1.0]];
    assert!(learn(&ragged, &[1.0, -1.0], 0.1, 5, &mut rng).unwrap_err().is_shape_mismatch());
    assert!(learn(&features(), &[1.0], 0.1, 5, &mut rng).unwrap_err().is_shape_mismatch());
    assert!(learn(&[], &[], 0.1, 5, &mut rng).unwrap_err().is_insufficient_data());
    assert!(matches!(
      learn(&features(), &[1.0, 1.0, 1.0], -0.1, 5, &mut rng),
      Err(AdalineError::InvalidHyperParameter(_))
    ));
    assert!(matches!(
      learn(&features(), &[1.0, 1.0, 1.0], 0.1, 0, &mut rng),
      Err(AdalineError::InvalidHyperParameter(_))
    ));
  }

  #[test]
  fn test_run_model_is_deterministic_with_seed() {
    let params = || TrainParams {
      data: Dataset::new(features(), vec![1.0, -1.0, 1.0]),
      hyper: HyperParams::new(0.01, 7).with_seed(Some(42)),
    };
    let a = run_model(params()).unwrap();
    let b = run_model(params()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.mse.len(), 7);
    assert_eq!(a.predict(&features()).unwrap().len(), 3);
  }

  fn labelled() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<f64>)> {
    (1usize..12, 1usize..5).prop_flat_map(|(rows, cols)| {
      (
        prop::collection::vec(prop::collection::vec(-10.0..10.0f64, cols), rows),
        prop::collection::vec(prop::sample::select(vec![1.0, -1.0]), rows),
      )
    })
  }

  proptest! {
    #[test]
    fn test_trace_has_one_entry_per_epoch((x, y) in labelled(), epochs in 1usize..30, seed in any::<u64>()) {
      let model = learn(&x, &y, 1e-4, epochs, &mut StdRng::seed_from_u64(seed)).unwrap();
      prop_assert_eq!(model.mse.len(), epochs);
      prop_assert_eq!(model.weights.len(), x[0].len() + 1);
    }

    #[test]
    fn test_predictions_are_signs((x, _) in labelled(), seed in any::<u64>()) {
      let w = random_weights(&x, &mut StdRng::seed_from_u64(seed)).unwrap();
      let nets = net_product(&x, &w).unwrap();
      prop_assert_eq!(nets.len(), x.len());
      let labels = predict(&x, &w).unwrap();
      prop_assert!(labels.iter().all(|l| *l == 1.0 || *l == -1.0));
    }
  }
}
