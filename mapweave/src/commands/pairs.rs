use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use mapweave_build::ManifestFile;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct PairsCommand {
    /// Path to mapweave.toml (defaults to ./mapweave.toml)
    #[arg(short, long, default_value = "mapweave.toml")]
    pub config: PathBuf,

    /// Print the pairs as JSON
    #[arg(long)]
    pub json: bool,
}

impl PairsCommand {
    pub fn run(&self) -> Result<()> {
        let file = ManifestFile::open(&self.config).unwrap_or_exit();
        let report = ops::pairs(&file).unwrap_or_exit();

        if self.json {
            let json =
                serde_json::to_string_pretty(&report).wrap_err("Failed to serialize report")?;
            println!("{}", json);
        } else {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}
