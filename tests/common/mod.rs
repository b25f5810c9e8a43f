//! Test infrastructure for git-summary integration tests.

#![allow(dead_code)]

use anyhow::Result;
use git_summary::git::run_git;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialises a repository at `path` with an initial commit on `branch`.
pub fn init_repo(path: &Path, branch: &str) -> Result<()> {
    init_empty(path, branch)?;
    std::fs::write(path.join("README.md"), "# Test Repo\n")?;
    run_git(path, &["add", "README.md"])?;
    run_git(path, &["commit", "-m", "Initial commit"])?;
    Ok(())
}

/// Initialises a repository at `path` without any commits.
pub fn init_empty(path: &Path, branch: &str) -> Result<()> {
    std::fs::create_dir_all(path)?;
    run_git(path, &["init", "-b", branch])?;
    configure_identity(path)
}

fn configure_identity(path: &Path) -> Result<()> {
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    run_git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Writes `contents` to `file` and commits it.
pub fn commit_file(repo: &Path, file: &str, contents: &str) -> Result<()> {
    std::fs::write(repo.join(file), contents)?;
    run_git(repo, &["add", file])?;
    run_git(repo, &["commit", "-m", &format!("Update {}", file)])?;
    Ok(())
}

/// Creates a bare repository, adds it as `origin` of `repo`, and pushes the
/// current branch with upstream tracking.
pub fn add_remote(repo: &Path) -> Result<TempDir> {
    let remote = TempDir::new()?;
    run_git(remote.path(), &["init", "--bare"])?;
    run_git(
        repo,
        &["remote", "add", "origin", remote.path().to_str().unwrap()],
    )?;
    run_git(repo, &["push", "-u", "origin", "HEAD"])?;
    Ok(remote)
}

/// Clones `branch` of `remote` into a fresh temp directory, ready to commit.
pub fn clone(remote: &Path, branch: &str) -> Result<TempDir> {
    let dir = TempDir::new()?;
    run_git(
        dir.path(),
        &[
            "clone",
            "--quiet",
            "--branch",
            branch,
            remote.to_str().unwrap(),
            ".",
        ],
    )?;
    configure_identity(dir.path())?;
    Ok(dir)
}

/// A temporary git repository for testing.
/// Automatically cleaned up when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
    remote: Option<TempDir>,
}

impl TestRepo {
    /// Creates a new test repository with an initial commit on the main branch.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        init_repo(&path, "main")?;
        Ok(Self {
            _temp_dir: temp_dir,
            path,
            remote: None,
        })
    }

    /// Creates a test repository whose main branch tracks a bare remote.
    pub fn with_remote() -> Result<Self> {
        let mut repo = Self::new()?;
        repo.remote = Some(add_remote(&repo.path)?);
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remote_path(&self) -> &Path {
        self.remote.as_ref().expect("repo has no remote").path()
    }

    pub fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.path, args)
    }

    pub fn write(&self, file: &str, contents: &str) -> Result<()> {
        std::fs::write(self.path.join(file), contents)?;
        Ok(())
    }

    pub fn commit(&self, file: &str, contents: &str) -> Result<()> {
        commit_file(&self.path, file, contents)
    }
}

/// A folder of repositories, laid out like a user's projects directory.
pub struct Workspace {
    dir: TempDir,
    remotes: Vec<TempDir>,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            remotes: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A clean repository on `main` with no remote.
    pub fn add_clean(&mut self, name: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        init_repo(&path, "main")?;
        Ok(path)
    }

    /// A repository on `feature/x`, one commit ahead of its upstream, with two
    /// modified tracked files.
    pub fn add_dirty_ahead(&mut self, name: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        init_repo(&path, "main")?;
        commit_file(&path, "lib.txt", "lib\n")?;
        self.remotes.push(add_remote(&path)?);

        run_git(&path, &["checkout", "-b", "feature/x"])?;
        run_git(&path, &["push", "-u", "origin", "feature/x"])?;
        commit_file(&path, "notes.txt", "ahead\n")?;

        std::fs::write(path.join("README.md"), "# Changed\n")?;
        std::fs::write(path.join("lib.txt"), "changed\n")?;
        Ok(path)
    }

    /// A directory that is not a repository.
    pub fn add_plain(&mut self, name: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        std::fs::create_dir_all(&path)?;
        std::fs::write(path.join("file.txt"), "plain\n")?;
        Ok(path)
    }

    /// The three-repository layout: clean `A`, dirty-and-ahead `B`, plain `C`.
    pub fn scenario() -> Result<(Self, Vec<PathBuf>)> {
        let mut workspace = Self::new()?;
        let paths = vec![
            workspace.add_clean("A")?,
            workspace.add_dirty_ahead("B")?,
            workspace.add_plain("C")?,
        ];
        Ok((workspace, paths))
    }
}

pub const SCENARIO_LINES: [&str; 3] = [
    "A  main  (clean)",
    "B  feature/x  [2 modified] ahead 1",
    "C  (not a repository)",
];
