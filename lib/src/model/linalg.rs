//! Dense vector and matrix helpers used by the training loop.
//!
//! Matrices are nested `Vec`s in row-major order. Every helper checks the
//! shapes it relies on and reports a `ShapeMismatch` instead of indexing out
//! of bounds.

use itertools::Itertools;

use super::Matrix;
use crate::error::{AdalineError, Result};

/// Returns the common row width. An empty matrix has width 0.
pub fn check_rectangular(m: &[Vec<f64>]) -> Result<usize> {
  let width = m.first().map(Vec::len).unwrap_or(0);
  match m.iter().find_position(|row| row.len() != width) {
    Some((i, row)) => Err(AdalineError::shape(format!("matrix row {}", i), width, row.len())),
    None => Ok(width),
  }
}

fn ensure_same_len(context: &str, a: &[f64], b: &[f64]) -> Result<()> {
  if a.len() != b.len() {
    return Err(AdalineError::shape(context, a.len(), b.len()));
  }
  Ok(())
}

pub fn add_vectors(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
  ensure_same_len("vector addition", a, b)?;
  Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn subtract_vectors(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
  ensure_same_len("vector subtraction", a, b)?;
  Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

pub fn scale_vector(a: &[f64], k: f64) -> Vec<f64> {
  a.iter().map(|x| x * k).collect()
}

pub fn vector_sum(a: &[f64]) -> f64 {
  a.iter().sum()
}

pub fn vector_power(a: &[f64], power: i32) -> Vec<f64> {
  a.iter().map(|x| x.powi(power)).collect()
}

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
  ensure_same_len("dot product", a, b)?;
  Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// `m · v`, one output per row of `m`.
pub fn matrix_vector_product(m: &[Vec<f64>], v: &[f64]) -> Result<Vec<f64>> {
  m.iter()
    .enumerate()
    .map(|(i, row)| {
      if row.len() != v.len() {
        return Err(AdalineError::shape(
          format!("matrix-vector product, row {}", i),
          v.len(),
          row.len(),
        ));
      }
      dot(row, v)
    })
    .collect()
}

pub fn transpose(m: &[Vec<f64>]) -> Result<Matrix> {
  if m.is_empty() {
    return Ok(Vec::new());
  }
  let width = check_rectangular(m)?;
  Ok(
    (0..width)
      .map(|j| m.iter().map(|row| row[j]).collect())
      .collect(),
  )
}
