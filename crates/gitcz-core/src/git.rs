use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::command_runner::{CommandOutput, CommandRunner};

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git command failed: git {command} (exit {status}) {detail}")]
    CommandFailed {
        command: String,
        status: i32,
        detail: String,
    },
    #[error("failed to execute git command: {0}")]
    Execute(String),
    #[error("failed to parse git output: {0}")]
    Parse(String),
    #[error("HEAD is not pointing to a branch")]
    DetachedHead,
}

/// The two repository operations the commit dialogue depends on.
pub trait Repository {
    fn current_branch(&self) -> Result<String, GitError>;
    fn commit(&self, message: &str) -> Result<(), GitError>;
}

pub struct GitRepository<'a> {
    root: PathBuf,
    runner: &'a dyn CommandRunner,
}

impl<'a> GitRepository<'a> {
    /// Resolves the enclosing repository of `cwd`. Fails outside a work tree.
    pub fn discover(cwd: &Path, runner: &'a dyn CommandRunner) -> Result<Self, GitError> {
        let root = repo_root(cwd, runner)?;
        Ok(Self { root, runner })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Repository for GitRepository<'_> {
    fn current_branch(&self) -> Result<String, GitError> {
        let output = run_git(
            self.runner,
            &["symbolic-ref", "--quiet", "--short", "HEAD"],
            Some(&self.root),
        )?;

        if !output.succeeded() {
            return Err(GitError::DetachedHead);
        }

        let branch = first_non_empty_stdout_line(&output, "git symbolic-ref returned no branch")?;
        if branch == "HEAD" {
            return Err(GitError::DetachedHead);
        }
        Ok(branch)
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        tracing::info!(root = %self.root.display(), "creating commit");
        run_git_checked(
            self.runner,
            &["commit", "--message", message],
            Some(&self.root),
        )?;
        Ok(())
    }
}

pub fn repo_root(cwd: &Path, runner: &dyn CommandRunner) -> Result<PathBuf, GitError> {
    let output = run_git_checked(runner, &["rev-parse", "--show-toplevel"], Some(cwd))?;
    Ok(PathBuf::from(first_non_empty_stdout_line(
        &output,
        "git rev-parse returned empty repo root",
    )?))
}

fn first_non_empty_stdout_line(output: &CommandOutput, message: &str) -> Result<String, GitError> {
    output
        .stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GitError::Parse(message.to_string()))
}

fn run_git_checked(
    runner: &dyn CommandRunner,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, GitError> {
    let output = run_git(runner, args, cwd)?;
    if output.succeeded() {
        return Ok(output);
    }

    // Commit messages are long; keep only the subcommand in the error.
    let command = args.first().copied().unwrap_or_default().to_string();
    Err(GitError::CommandFailed {
        command,
        status: output.status_code,
        detail: failure_detail(&output),
    })
}

/// Git reports some refusals, like an empty commit, on stdout only.
fn failure_detail(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        output.stdout.trim().to_string()
    } else {
        stderr.to_string()
    }
}

fn run_git(
    runner: &dyn CommandRunner,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, GitError> {
    runner
        .run("git", args, cwd)
        .map_err(|error| GitError::Execute(error.to_string()))
}
