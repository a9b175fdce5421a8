//! Command-line interface for ranking relocation destinations.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod recommend;

pub use error::CliError;

use recommend::{RecommendArgs, run_recommend};

const ARG_ARTEFACTS_DIR: &str = "artefacts-dir";
const ARG_COUNTRIES: &str = "countries";
const ARG_USERS: &str = "users";
const ARG_SCALER: &str = "scaler";
const ARG_MODEL: &str = "model";
const ARG_USER_INDEX: &str = "user-index";
const ARG_PROFILE: &str = "profile";
const ARG_TOP_K: &str = "top-k";
const ARG_ALPHA: &str = "alpha";
const ARG_IMPUTATION: &str = "imputation";
const ARG_FORMAT: &str = "format";

/// Run the relocation CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, inputs or ranking
/// fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Recommend(args) => run_recommend(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "relocate",
    about = "Rank relocation destinations for a user profile",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank destinations for one user with the fitted model and heuristic.
    Recommend(RecommendArgs),
}

#[cfg(test)]
mod tests;
