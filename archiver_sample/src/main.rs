use anyhow::{anyhow, Result};
use archiver_sample::fs_utils::{self, ENV_VAR_DATA_PATH};
use archiver_sample::{activate_standard_archivables, LoadOutcome, SampleStore};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Keeps a list of titled samples in an archive file.
#[derive(Parser)]
#[command(name = "archiver-sample", version, about, long_about = None)]
struct Cli {
    /// The archive file. Defaults to a file under the system temp dir.
    #[arg(long, env = ENV_VAR_DATA_PATH)]
    data_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the samples, newest first.
    List,
    /// Adds a sample stamped with the current time.
    Add { title: String },
    /// Removes all samples.
    Clear,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_path = cli.data_path.unwrap_or_else(fs_utils::default_data_path);

    activate_standard_archivables(|_| Ok(()))?;

    let mut store = SampleStore::new();
    let outcome = store.load(&data_path)?;

    match cli.command {
        Command::List => match outcome {
            LoadOutcome::NoData => println!("No data"),
            LoadOutcome::FailedToConvert => println!("Failed to convert data"),
            LoadOutcome::Loaded(_) => {
                for sample in store.samples() {
                    println!("{sample}");
                }
            }
        },
        Command::Add { title } => {
            refuse_to_overwrite(&outcome, &data_path)?;
            store.add(title);
            store.save(&data_path)?;
            println!("Saved");
        }
        Command::Clear => {
            refuse_to_overwrite(&outcome, &data_path)?;
            if store.clear() {
                store.save(&data_path)?;
                println!("Cleared");
            } else {
                println!("No data to clear");
            }
        }
    }

    Ok(())
}

fn refuse_to_overwrite(outcome: &LoadOutcome, data_path: &Path) -> Result<()> {
    if *outcome == LoadOutcome::FailedToConvert {
        return Err(anyhow!(
            "Failed to convert data in {data_path:?}. Not overwriting it."
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn data_path_sources() -> Result<()> {
        Cli::command().debug_assert();

        std::env::remove_var(ENV_VAR_DATA_PATH);
        let cli = Cli::try_parse_from(["archiver-sample", "list"])?;
        assert_eq!(cli.data_path, None);

        std::env::set_var(ENV_VAR_DATA_PATH, "/from/env.data");
        let cli = Cli::try_parse_from(["archiver-sample", "list"])?;
        assert_eq!(cli.data_path, Some(PathBuf::from("/from/env.data")));

        let args = ["archiver-sample", "--data-path", "/from/flag.data", "list"];
        let cli = Cli::try_parse_from(args)?;
        assert_eq!(cli.data_path, Some(PathBuf::from("/from/flag.data")));
        std::env::remove_var(ENV_VAR_DATA_PATH);
        Ok(())
    }
}
