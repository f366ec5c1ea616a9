mod app_config;

use adaline::{model, subcommands, utils};

use app_config::AppConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use model::{FeatureMap, HyperParams};
use std::{error::Error, path::PathBuf};
use subcommands::experiment::{
  CLASSIFY_EPOCHS, CUBIC_EPOCHS, DEFAULT_TOLERANCE, LEARNING_RATE, LOG_SHIFT, LOG_SHIFT_EPOCHS,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
  /// YAML file with default settings, overridden by command line flags
  #[arg(short, long, value_name = "PATH", global = true)]
  config: Option<PathBuf>,
  #[command(subcommand)]
  command: Command,
}

#[derive(Args)]
struct TrainArgs {
  #[arg(long, value_name = "FLOAT")]
  learning_rate: Option<f64>,
  #[arg(short, long, value_name = "INT")]
  epochs: Option<usize>,
  /// Seed for weight initialization, random when omitted
  #[arg(long, value_name = "INT")]
  seed: Option<u64>,
}

impl TrainArgs {
  fn config(&self) -> AppConfig {
    AppConfig {
      learning_rate: self.learning_rate,
      epochs: self.epochs,
      seed: self.seed,
      ..Default::default()
    }
  }
}

#[derive(Clone, Copy, ValueEnum)]
enum Basis {
  /// Every non-target column as is
  Identity,
  /// x and log10(x + shift)
  LogShift,
  /// x and x^3
  Cubic,
}

impl Basis {
  /// Epochs of the reference trial using this basis.
  fn default_epochs(self) -> usize {
    match self {
      Basis::Identity | Basis::LogShift => LOG_SHIFT_EPOCHS,
      Basis::Cubic => CUBIC_EPOCHS,
    }
  }
}

#[derive(Subcommand)]
enum Command {
  /// Two-class fit: rows of the positive file are +1, rows of the negative file -1
  Classify {
    #[arg(long, value_name = "PATH")]
    positive: PathBuf,
    #[arg(long, value_name = "PATH")]
    negative: PathBuf,
    #[command(flatten)]
    train: TrainArgs,
    /// Hold out this share of the rows and report accuracy on them
    #[arg(long, value_name = "FLOAT")]
    test_ratio: Option<f64>,
    /// Write the trained weights and mse trace as JSON
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
  },
  /// Linear fit of column 1 against basis-expanded column 0
  Regress {
    #[arg(short, long, value_name = "PATH")]
    data: PathBuf,
    #[arg(long, value_enum, default_value_t = Basis::Identity)]
    basis: Basis,
    #[arg(long, value_name = "FLOAT", default_value_t = LOG_SHIFT)]
    shift: f64,
    #[command(flatten)]
    train: TrainArgs,
    #[arg(long, value_name = "FLOAT")]
    tolerance: Option<f64>,
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
  },
  /// The three reference trials
  Experiment {
    #[arg(long, value_name = "PATH")]
    earth_space: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    med_sci: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    trial_data: Option<PathBuf>,
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,
    #[arg(long, value_name = "FLOAT")]
    tolerance: Option<f64>,
  },
}

fn hyper(config: &AppConfig, default_epochs: usize) -> HyperParams {
  HyperParams::new(
    config.learning_rate.unwrap_or(LEARNING_RATE),
    config.epochs.unwrap_or(default_epochs),
  )
  .with_seed(config.seed)
}

fn main() -> Result<(), Box<dyn Error>> {
  utils::init_logging()?;
  let args = Cli::parse();

  let file_config = match &args.config {
    Some(path) => AppConfig::from_file(path)?,
    None => AppConfig::default(),
  };
  tracing::debug!("File config: {:?}", file_config);

  match args.command {
    Command::Classify {
      positive,
      negative,
      train,
      test_ratio,
      output,
    } => {
      let config = file_config.merge(train.config());
      let app = subcommands::Classify::new(
        &positive,
        &negative,
        hyper(&config, CLASSIFY_EPOCHS),
        test_ratio,
        output.as_deref(),
      );
      app.run()?;
    }
    Command::Regress {
      data,
      basis,
      shift,
      train,
      tolerance,
      output,
    } => {
      let config = file_config.merge(AppConfig {
        tolerance,
        ..train.config()
      });
      let feature_map = match basis {
        Basis::Identity => FeatureMap::Identity,
        Basis::LogShift => FeatureMap::LogShift { shift },
        Basis::Cubic => FeatureMap::Cubic,
      };
      let app = subcommands::Regress::new(
        &data,
        feature_map,
        hyper(&config, basis.default_epochs()),
        config.tolerance.unwrap_or(DEFAULT_TOLERANCE),
        output.as_deref(),
      );
      app.run()?;
    }
    Command::Experiment {
      earth_space,
      med_sci,
      trial_data,
      seed,
      tolerance,
    } => {
      let config = file_config.merge(AppConfig {
        earth_space,
        med_sci,
        trial_data,
        seed,
        tolerance,
        ..Default::default()
      });
      let app = subcommands::Experiment::new(
        &AppConfig::require_path(config.earth_space, "earth_space")?,
        &AppConfig::require_path(config.med_sci, "med_sci")?,
        &AppConfig::require_path(config.trial_data, "trial_data")?,
        config.seed,
        config.tolerance.unwrap_or(DEFAULT_TOLERANCE),
      );
      app.run()?;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cli_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }

  #[test]
  fn test_flags_override_defaults() {
    let args = Cli::parse_from([
      "adaline",
      "regress",
      "--data",
      "t.csv",
      "--basis",
      "log-shift",
      "--epochs",
      "7",
    ]);
    match args.command {
      Command::Regress { train, basis, shift, .. } => {
        let h = hyper(&AppConfig::default().merge(train.config()), LOG_SHIFT_EPOCHS);
        assert_eq!(h.epochs, 7);
        assert_eq!(h.learning_rate, LEARNING_RATE);
        assert!(matches!(basis, Basis::LogShift));
        assert_eq!(shift, LOG_SHIFT);
      }
      _ => panic!("expected regress"),
    }
  }

  #[test]
  fn test_epoch_default_follows_basis() {
    let args = Cli::parse_from(["adaline", "regress", "--data", "t.csv", "--basis", "cubic"]);
    match args.command {
      Command::Regress { train, basis, .. } => {
        let h = hyper(&AppConfig::default().merge(train.config()), basis.default_epochs());
        assert_eq!(h.epochs, CUBIC_EPOCHS);
      }
      _ => panic!("expected regress"),
    }
    assert_eq!(Basis::LogShift.default_epochs(), LOG_SHIFT_EPOCHS);
  }
}
