use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "git-cz")]
#[command(bin_name = "git-cz")]
#[command(version)]
#[command(about = "Write Conventional Commits messages interactively and commit them")]
pub struct Cli {
    /// Config file to use instead of ~/.config/git-cz/config.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a debug log under ~/.config/git-cz/diagnostics
    #[arg(long)]
    pub diagnostics: bool,
}
