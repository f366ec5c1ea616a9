use serde::Serialize;
use std::path::Path;

#[cfg(not(debug_assertions))]
use human_panic::setup_panic;
use tracing::subscriber::{DefaultGuard, SetGlobalDefaultError};

#[cfg(debug_assertions)]
extern crate better_panic;

use tracing_subscriber::EnvFilter;

// [NOTE] tracing
//
// Verbosity follows RUST_LOG, e.g. `RUST_LOG=adaline=debug` prints the mse of
// every epoch. Without it only info and above are shown.

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn install_logger() -> Result<(), SetGlobalDefaultError> {
  let subscriber = tracing_subscriber::fmt()
    .compact()
    .with_env_filter(env_filter())
    .finish();
  tracing::subscriber::set_global_default(subscriber)
}

pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
  // Human Panic. Only enabled when *not* debugging.
  #[cfg(not(debug_assertions))]
  {
    setup_panic!();
  }

  // Better Panic. Only enabled *when* debugging.
  #[cfg(debug_assertions)]
  {
    better_panic::Settings::debug()
      .most_recent_first(false)
      .lineno_suffix(true)
      .verbosity(better_panic::Verbosity::Full)
      .install();
  }

  install_logger()?;

  Ok(())
}

/// Logging scoped to the current thread, so every test can install its own.
pub fn init_logging_tests() -> DefaultGuard {
  let subscriber = tracing_subscriber::fmt()
    .compact()
    .with_test_writer()
    .with_max_level(tracing::Level::DEBUG)
    .finish();
  tracing::subscriber::set_default(subscriber)
}

pub fn serialize_to_file<T: Serialize>(path: &Path, obj: &T) -> crate::Result<()> {
  let buff = serde_json::to_string(obj)?;
  std::fs::write(path, buff)?;
  Ok(())
}
