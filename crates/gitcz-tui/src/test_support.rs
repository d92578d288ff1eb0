use std::cell::{Cell, RefCell};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gitcz_core::git::{GitError, Repository};

/// In-memory repository that records commits instead of creating them.
#[derive(Default)]
pub(crate) struct FakeRepository {
    branch: Option<String>,
    fail_commit: bool,
    branch_queries: Cell<usize>,
    commits: RefCell<Vec<String>>,
}

impl FakeRepository {
    pub(crate) fn on_branch(branch: &str) -> Self {
        Self {
            branch: Some(branch.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn detached() -> Self {
        Self::default()
    }

    pub(crate) fn failing_commits(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub(crate) fn branch_queries(&self) -> usize {
        self.branch_queries.get()
    }

    pub(crate) fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }
}

impl Repository for FakeRepository {
    fn current_branch(&self) -> Result<String, GitError> {
        self.branch_queries.set(self.branch_queries.get() + 1);
        self.branch.clone().ok_or(GitError::DetachedHead)
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        if self.fail_commit {
            return Err(GitError::CommandFailed {
                command: "commit".to_string(),
                status: 1,
                detail: "nothing to commit".to_string(),
            });
        }
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }
}

pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub(crate) fn chord(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}
