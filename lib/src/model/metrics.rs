//! Scores for continuous targets, where exact-match accuracy says nothing.

use crate::error::{AdalineError, Result};

fn check_pair(y: &[f64], predicted: &[f64]) -> Result<()> {
  if y.is_empty() {
    return Err(AdalineError::InsufficientData(
      "cannot score an empty target vector".to_string(),
    ));
  }
  if y.len() != predicted.len() {
    return Err(AdalineError::shape("predictions", y.len(), predicted.len()));
  }
  Ok(())
}

pub fn mean_squared_error(y: &[f64], predicted: &[f64]) -> Result<f64> {
  check_pair(y, predicted)?;
  Ok(y.iter().zip(predicted).map(|(a, b)| (a - b).powi(2)).sum::<f64>() / y.len() as f64)
}

/// Coefficient of determination. Constant targets score 1.0 only when
/// predicted exactly.
pub fn r_squared(y: &[f64], predicted: &[f64]) -> Result<f64> {
  check_pair(y, predicted)?;
  let mean = y.iter().sum::<f64>() / y.len() as f64;
  let ss_res: f64 = y.iter().zip(predicted).map(|(a, b)| (a - b).powi(2)).sum();
  let ss_tot: f64 = y.iter().map(|a| (a - mean).powi(2)).sum();
  if ss_tot == 0.0 {
    return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
  }
  Ok(1.0 - ss_res / ss_tot)
}

/// Percentage of predictions within `tolerance` of the target.
pub fn tolerance_accuracy(y: &[f64], predicted: &[f64], tolerance: f64) -> Result<f64> {
  check_pair(y, predicted)?;
  if tolerance.is_nan() || tolerance < 0.0 {
    return Err(AdalineError::InvalidHyperParameter(format!(
      "tolerance must be non-negative, got {}",
      tolerance
    )));
  }
  let close = y
    .iter()
    .zip(predicted)
    .filter(|(a, b)| (*a - *b).abs() <= tolerance)
    .count();
  Ok(close as f64 / y.len() as f64 * 100.0)
}
