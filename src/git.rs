//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution and error formatting. Every command here is
//! read-only apart from `fetch`, which only updates remote-tracking refs.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn git_output(repo: &Path, args: &[&str]) -> anyhow::Result<Output> {
    log::debug!("$ git {} [{}]", args.join(" "), repo.display());

    Command::new("git")
        .current_dir(repo)
        .args(args)
        // Status would otherwise refresh the index, which is a write.
        .env("GIT_OPTIONAL_LOCKS", "0")
        // Error messages are matched below; keep them untranslated.
        .env("LC_ALL", "C")
        // A credential prompt would hang the run and scribble over the summary.
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .context("Failed to spawn git command")
}

/// Runs git in `repo` and returns its trimmed stdout, failing on a non-zero exit.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = git_output(repo, args)?;

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim())
    }
}

/// Returns the work tree root containing `path`, or `None` if `path` is not
/// inside a git work tree at all.
pub fn show_toplevel(path: &Path) -> anyhow::Result<Option<PathBuf>> {
    let output = git_output(path, &["rev-parse", "--show-toplevel"])?;

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Ok(Some(PathBuf::from(stdout.trim())));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("not a git repository") {
        Ok(None)
    } else {
        anyhow::bail!("git rev-parse --show-toplevel failed: {}", stderr.trim())
    }
}

/// Machine-readable status including branch headers.
pub fn status_porcelain(repo: &Path) -> anyhow::Result<String> {
    run_git(repo, &["status", "--porcelain=v2", "--branch"])
        .context("Failed to read repository status")
}

/// Full ref name of the checked-out branch, or `None` when HEAD is detached.
pub fn current_branch_ref(repo: &Path) -> anyhow::Result<Option<String>> {
    let output = git_output(repo, &["symbolic-ref", "-q", "HEAD"])?;
    if !output.status.success() {
        return Ok(None);
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(Some(name).filter(|n| !n.is_empty()))
}

/// Name of the remote that `branch_ref` tracks, if it has an upstream.
pub fn upstream_remote(repo: &Path, branch_ref: &str) -> anyhow::Result<Option<String>> {
    let remote = run_git(
        repo,
        &["for-each-ref", "--format=%(upstream:remotename)", branch_ref],
    )
    .with_context(|| format!("Failed to look up upstream of '{}'", branch_ref))?;
    Ok(Some(remote).filter(|r| !r.is_empty()))
}

pub fn fetch(repo: &Path, remote: &str) -> anyhow::Result<()> {
    run_git(repo, &["fetch", "--quiet", remote])
        .with_context(|| format!("Failed to fetch from '{}'", remote))?;
    Ok(())
}
