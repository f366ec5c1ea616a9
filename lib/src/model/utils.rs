use std::{io, path::Path};

use rand::{seq::SliceRandom, Rng};

use super::{Dataset, Matrix, NEGATIVE, POSITIVE};
use crate::error::{AdalineError, Result};

/// Parses comma separated numbers, one observation per line. Blank lines are
/// skipped. `origin` only labels parse errors.
pub fn parse_csv(content: &str, origin: &Path) -> Result<Matrix> {
  content
    .lines()
    .enumerate()
    .filter(|(_, line)| !line.trim().is_empty())
    .map(|(i, line)| {
      line
        .split(',')
        .enumerate()
        .map(|(j, field)| {
          field.trim().parse::<f64>().map_err(|_| AdalineError::Parse {
            path: origin.to_path_buf(),
            row: i + 1,
            column: j + 1,
            field: field.to_string(),
          })
        })
        .collect::<Result<Vec<f64>>>()
    })
    .collect()
}

pub fn read_csv(path: &Path) -> Result<Matrix> {
  let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
    io::ErrorKind::NotFound => AdalineError::FileNotFound(path.to_path_buf()),
    _ => AdalineError::Io(e),
  })?;
  let rows = parse_csv(&content, path)?;
  tracing::debug!("Read {} rows from {:?}", rows.len(), path);
  Ok(rows)
}

/// Basis expansion applied to a single input column before fitting a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureMap {
  /// Use every non-label column as is.
  Identity,
  /// `x -> [x, log10(x + shift)]`
  LogShift { shift: f64 },
  /// `x -> [x, x^3]`
  Cubic,
}

impl FeatureMap {
  /// `inputs` are the non-label columns of one row.
  pub fn apply(&self, inputs: &[f64]) -> Result<Vec<f64>> {
    let first = || {
      inputs
        .first()
        .copied()
        .ok_or_else(|| AdalineError::shape("feature map input", 1, 0))
    };
    match self {
      FeatureMap::Identity => Ok(inputs.to_vec()),
      FeatureMap::LogShift { shift } => {
        let x = first()?;
        Ok(vec![x, (x + shift).log10()])
      }
      FeatureMap::Cubic => {
        let x = first()?;
        Ok(vec![x, x.powi(3)])
      }
    }
  }
}

impl Dataset {
  /// Stacks `positive` rows labelled +1 over `negative` rows labelled -1.
  pub fn two_class(positive: Matrix, negative: Matrix) -> Self {
    let labels = std::iter::repeat(POSITIVE)
      .take(positive.len())
      .chain(std::iter::repeat(NEGATIVE).take(negative.len()))
      .collect();
    let mut features = positive;
    features.extend(negative);
    Dataset { features, labels }
  }

  /// Takes the target from `label_column` and builds features from the
  /// remaining columns through `map`.
  pub fn from_columns(rows: &[Vec<f64>], label_column: usize, map: FeatureMap) -> Result<Self> {
    let mut features = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
      let label = *row.get(label_column).ok_or_else(|| {
        AdalineError::shape(format!("label column of row {}", i), label_column + 1, row.len())
      })?;
      let inputs: Vec<f64> = row
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != label_column)
        .map(|(_, v)| *v)
        .collect();
      features.push(map.apply(&inputs)?);
      labels.push(label);
    }
    Ok(Dataset { features, labels })
  }
}

/// Shuffles the observations and cuts them into `(train, test)`, with
/// `test_ratio` of the rows (rounded to the nearest row) in the test part.
pub fn split_dataset<R: Rng + ?Sized>(
  dataset: Dataset,
  test_ratio: f64,
  rng: &mut R,
) -> Result<(Dataset, Dataset)> {
  if !(0.0..=1.0).contains(&test_ratio) {
    return Err(AdalineError::InvalidHyperParameter(format!(
      "test ratio must lie in [0, 1], got {}",
      test_ratio
    )));
  }
  if dataset.features.len() != dataset.labels.len() {
    return Err(AdalineError::shape(
      "label vector",
      dataset.features.len(),
      dataset.labels.len(),
    ));
  }
  let test_len = (dataset.len() as f64 * test_ratio).round() as usize;
  let splitting_point = dataset.len() - test_len;
  let mut order: Vec<usize> = (0..dataset.len()).collect();
  order.shuffle(rng);

  let pick = |indices: &[usize]| Dataset {
    features: indices.iter().map(|&i| dataset.features[i].clone()).collect(),
    labels: indices.iter().map(|&i| dataset.labels[i]).collect(),
  };
  let (train, test) = order.split_at(splitting_point);
  Ok((pick(train), pick(test)))
}
