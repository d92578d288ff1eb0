pub mod cli;
pub mod diagnostics;

use anyhow::{Context, Result};
use clap::Parser;
use gitcz_core::command_runner::SystemCommandRunner;
use gitcz_core::config;
use gitcz_core::git::GitRepository;
use gitcz_tui::SessionExit;

use crate::cli::Cli;
use crate::diagnostics::DiagnosticsSession;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let diagnostics = DiagnosticsSession::initialize(cli.diagnostics)?;
    if let Some(path) = diagnostics.path() {
        eprintln!("Diagnostics enabled: {}", path.display());
    }

    let config = config::load_or_default(cli.config.as_deref())?;
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let runner = SystemCommandRunner::new();
    let repo = GitRepository::discover(&cwd, &runner)
        .context("failed to resolve git repository root")?;
    tracing::info!(root = %repo.root().display(), "repository found");

    match gitcz_tui::run_commit_dialog(&config, &repo)? {
        SessionExit::Committed { message } => {
            println!("Committed:\n{message}");
        }
        SessionExit::Quit | SessionExit::Declined => {
            println!("Aborted.");
        }
    }

    Ok(())
}
