// Repository discovery, inspection, and status types

use crate::constants::{DEFAULT_REPO_NAME, GIT_DIR};
use crate::git;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// What HEAD points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Branch(String),
    Detached,
}

/// Number of entries in each category reported by `git status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    /// Tracked files with unstaged changes.
    pub modified: usize,
    /// Entries with changes in the index (excluding renames).
    pub staged: usize,
    pub renamed: usize,
    pub untracked: usize,
    /// Unmerged paths.
    pub conflicted: usize,
}

impl ChangeCounts {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Relationship between the current branch and its upstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Upstream {
    #[default]
    None,
    /// Configured, but the remote branch no longer exists.
    Gone { name: String },
    Tracking {
        name: String,
        ahead: usize,
        behind: usize,
    },
}

impl Upstream {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Upstream::None => None,
            Upstream::Gone { name } | Upstream::Tracking { name, .. } => Some(name),
        }
    }
}

/// Everything learned about a repository that could be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub head: Head,
    /// False for a freshly initialised repository with no commits.
    pub has_commits: bool,
    pub changes: ChangeCounts,
    pub upstream: Upstream,
    /// Reason the pre-status fetch failed, if one was attempted and failed.
    pub fetch_failed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    Report(RepoReport),
    NotARepository,
    /// Inspection failed; the reason is shown on the repository's line.
    Failed(String),
}

/// Snapshot of one repository, produced by a single inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    pub name: String,
    pub path: PathBuf,
    pub outcome: RepoOutcome,
}

/// Overall classification of a [`RepoStatus`], most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    NotARepository,
    InspectionError,
    Unborn,
    Dirty,
    DetachedHead,
    NoUpstream,
    FetchFailed,
    AheadBehind,
    Clean,
}

impl RepoStatus {
    #[must_use]
    pub fn state(&self) -> RepoState {
        let report = match &self.outcome {
            RepoOutcome::NotARepository => return RepoState::NotARepository,
            RepoOutcome::Failed(_) => return RepoState::InspectionError,
            RepoOutcome::Report(report) => report,
        };

        if !report.has_commits {
            RepoState::Unborn
        } else if !report.changes.is_clean() {
            RepoState::Dirty
        } else if report.head == Head::Detached {
            RepoState::DetachedHead
        } else if report.fetch_failed.is_some() {
            RepoState::FetchFailed
        } else {
            match report.upstream {
                Upstream::None | Upstream::Gone { .. } => RepoState::NoUpstream,
                Upstream::Tracking { ahead, behind, .. } if ahead + behind > 0 => {
                    RepoState::AheadBehind
                }
                Upstream::Tracking { .. } => RepoState::Clean,
            }
        }
    }
}

/// Produces a [`RepoStatus`] for a directory.
///
/// Implementations are called from many worker threads at once and must not
/// share mutable state between calls.
pub trait Inspector: Sync {
    fn inspect(&self, path: &Path, fetch_first: bool) -> RepoStatus;
}

/// Inspector backed by the git CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitInspector;

impl Inspector for GitInspector {
    fn inspect(&self, path: &Path, fetch_first: bool) -> RepoStatus {
        let outcome = inspect_outcome(path, fetch_first).unwrap_or_else(|e| {
            log::debug!("Inspecting {} failed: {:#}", path.display(), e);
            RepoOutcome::Failed(format!("{:#}", e))
        });

        RepoStatus {
            name: repo_name(path),
            path: path.to_path_buf(),
            outcome,
        }
    }
}

fn inspect_outcome(path: &Path, fetch_first: bool) -> anyhow::Result<RepoOutcome> {
    let Some(toplevel) = git::show_toplevel(path)? else {
        return Ok(RepoOutcome::NotARepository);
    };
    // A plain directory nested inside some other checkout is not a repository.
    if !same_dir(&toplevel, path) {
        return Ok(RepoOutcome::NotARepository);
    }

    let fetch_failed = if fetch_first {
        fetch_upstream(path).err().map(|e| {
            log::debug!("Fetch failed for {}: {:#}", path.display(), e);
            format!("{:#}", e)
        })
    } else {
        None
    };

    let porcelain = git::status_porcelain(path)?;
    let mut report = parse_status(&porcelain)?;
    report.fetch_failed = fetch_failed;
    Ok(RepoOutcome::Report(report))
}

/// Fetches the remote tracked by the current branch. Branches without an
/// upstream, and detached heads, have nothing to fetch.
fn fetch_upstream(path: &Path) -> anyhow::Result<()> {
    let Some(branch_ref) = git::current_branch_ref(path)? else {
        return Ok(());
    };
    let Some(remote) = git::upstream_remote(path, &branch_ref)? else {
        return Ok(());
    };
    git::fetch(path, &remote)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Parses `git status --porcelain=v2 --branch` output.
pub fn parse_status(porcelain: &str) -> anyhow::Result<RepoReport> {
    let mut head = Head::Detached;
    let mut has_commits = true;
    let mut upstream_name = None;
    let mut ahead_behind = None;
    let mut changes = ChangeCounts::default();

    for line in porcelain.lines() {
        if let Some(header) = line.strip_prefix("# ") {
            let (key, value) = header.split_once(' ').unwrap_or((header, ""));
            match key {
                "branch.oid" => has_commits = value != "(initial)",
                "branch.head" if value != "(detached)" => head = Head::Branch(value.to_string()),
                "branch.upstream" => upstream_name = Some(value.to_string()),
                "branch.ab" => ahead_behind = Some(parse_ahead_behind(value)?),
                _ => {}
            }
            continue;
        }

        let mut fields = line.split(' ');
        match fields.next() {
            Some("1") => {
                let xy = fields.next().unwrap_or("..");
                let (staged, modified) = xy_flags(xy);
                changes.staged += usize::from(staged);
                changes.modified += usize::from(modified);
            }
            Some("2") => {
                let xy = fields.next().unwrap_or("..");
                let (_, modified) = xy_flags(xy);
                changes.renamed += 1;
                changes.modified += usize::from(modified);
            }
            Some("u") => changes.conflicted += 1,
            Some("?") => changes.untracked += 1,
            _ => {}
        }
    }

    let upstream = match (upstream_name, ahead_behind) {
        (None, _) => Upstream::None,
        (Some(name), None) => Upstream::Gone { name },
        (Some(name), Some((ahead, behind))) => Upstream::Tracking {
            name,
            ahead,
            behind,
        },
    };

    Ok(RepoReport {
        head,
        has_commits,
        changes,
        upstream,
        fetch_failed: None,
    })
}

/// `+3 -1` → `(3, 1)`
fn parse_ahead_behind(value: &str) -> anyhow::Result<(usize, usize)> {
    let (ahead, behind) = value
        .split_once(' ')
        .with_context(|| format!("Malformed branch.ab header: {:?}", value))?;
    let ahead = ahead
        .trim_start_matches('+')
        .parse()
        .with_context(|| format!("Malformed ahead count: {:?}", ahead))?;
    let behind = behind
        .trim_start_matches('-')
        .parse()
        .with_context(|| format!("Malformed behind count: {:?}", behind))?;
    Ok((ahead, behind))
}

/// Splits a porcelain `XY` field into (index changed, work tree changed).
fn xy_flags(xy: &str) -> (bool, bool) {
    let mut chars = xy.chars();
    let x = chars.next().unwrap_or('.');
    let y = chars.next().unwrap_or('.');
    (x != '.', y != '.')
}

#[must_use]
pub fn repo_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_REPO_NAME)
        .to_string()
}

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    path.join(GIT_DIR).exists()
}

/// Lists the immediate subdirectories of `path` to summarise, sorted by name.
///
/// With `all_dirs` unset only directories containing a `.git` entry are kept;
/// otherwise every subdirectory is listed and non-repositories are reported as such.
pub fn find_repos(path: &Path, all_dirs: bool) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?;

    let mut repos: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() && (all_dirs || is_git_repo(p)))
        .collect();
    repos.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(repos)
}
