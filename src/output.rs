//! Summary line formatting.
//!
//! Turns a [`RepoStatus`] into the single text line shown for that
//! repository. Formatting is pure: no I/O and no shared state, so worker
//! threads and the renderer can call it freely.

use crate::config::Config;
use crate::constants::COLUMN_GAP;
use crate::repo::{ChangeCounts, Head, RepoOutcome, RepoReport, RepoState, RepoStatus, Upstream};
use colored::Colorize;
use std::path::{Path, PathBuf};

const PENDING: &str = "…";

/// Maps repository statuses to display lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Formatter {
    /// Emit ANSI colors. Off in monochrome mode and whenever output is not a terminal.
    pub color: bool,
    /// Width the repository name column is padded to.
    pub name_width: usize,
    /// Append the upstream branch name.
    pub show_tracking: bool,
}

impl Formatter {
    /// Builds a formatter whose name column fits every repository in `paths`.
    #[must_use]
    pub fn for_repos(paths: &[PathBuf], config: &Config, color: bool) -> Self {
        let name_width = paths
            .iter()
            .map(|p| crate::repo::repo_name(p).chars().count())
            .max()
            .unwrap_or(0);

        Self {
            color,
            name_width,
            show_tracking: config.show_tracking,
        }
    }

    #[must_use]
    pub fn format(&self, status: &RepoStatus) -> String {
        let state = status.state();
        let name = self.name_column(&status.name, state);

        let rest = match &status.outcome {
            RepoOutcome::NotARepository => self.paint("(not a repository)", |s| s.dimmed()),
            RepoOutcome::Failed(reason) => {
                let reason = reason.lines().next().unwrap_or_default();
                self.paint(&format!("(error: {})", reason), |s| s.red())
            }
            RepoOutcome::Report(report) => self.report_columns(report),
        };

        format!("{}{}{}", name, COLUMN_GAP, rest)
    }

    /// Placeholder for a repository whose status has not arrived yet.
    #[must_use]
    pub fn pending(&self, name: &str) -> String {
        let padding = self.name_width.saturating_sub(name.chars().count());
        format!(
            "{}{}{}{}",
            name,
            " ".repeat(padding),
            COLUMN_GAP,
            self.paint(PENDING, |s| s.dimmed())
        )
    }

    fn name_column(&self, name: &str, state: RepoState) -> String {
        let padding = self.name_width.saturating_sub(name.chars().count());
        let styled = self.paint(name, |s| match state {
            RepoState::Clean => s.green(),
            RepoState::Dirty | RepoState::InspectionError => s.red(),
            RepoState::DetachedHead | RepoState::NoUpstream => s.yellow(),
            RepoState::FetchFailed => s.magenta(),
            RepoState::AheadBehind => s.cyan(),
            RepoState::Unborn => s.black().on_yellow(),
            RepoState::NotARepository => s.dimmed(),
        });
        format!("{}{}", styled, " ".repeat(padding))
    }

    fn report_columns(&self, report: &RepoReport) -> String {
        let head = match &report.head {
            Head::Branch(branch) => self.paint(branch, |s| s.bold()),
            Head::Detached => self.paint("(detached)", |s| s.yellow()),
        };

        let mut local = Vec::new();
        if !report.has_commits {
            local.push("(no commits)".to_string());
        }
        if !report.changes.is_clean() {
            local.push(describe_changes(&report.changes));
        } else if report.has_commits {
            local.push("(clean)".to_string());
        }

        let mut remote = Vec::new();
        match &report.upstream {
            // Counts against remote-tracking refs that failed to refresh are stale.
            _ if report.fetch_failed.is_some() => {}
            Upstream::Tracking { ahead, behind, .. } => {
                if *ahead > 0 {
                    remote.push(self.paint(&format!("ahead {}", ahead), |s| s.cyan()));
                }
                if *behind > 0 {
                    remote.push(self.paint(&format!("behind {}", behind), |s| s.cyan()));
                }
            }
            Upstream::Gone { .. } => remote.push(self.paint("(upstream gone)", |s| s.yellow())),
            Upstream::None => {}
        }
        if report.fetch_failed.is_some() {
            remote.push(self.paint("(fetch failed)", |s| s.magenta()));
        }
        if self.show_tracking
            && let Some(name) = report.upstream.name()
        {
            remote.push(self.paint(&format!("-> {}", name), |s| s.dimmed()));
        }

        let mut line = format!("{}{}{}", head, COLUMN_GAP, local.join(" "));
        for part in remote {
            line.push(' ');
            line.push_str(&part);
        }
        line
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> colored::ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// `[2 modified, 1 untracked]`, listing only the non-zero categories.
fn describe_changes(changes: &ChangeCounts) -> String {
    let parts: Vec<String> = [
        (changes.modified, "modified"),
        (changes.staged, "staged"),
        (changes.renamed, "renamed"),
        (changes.untracked, "untracked"),
        (changes.conflicted, "conflicted"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{} {}", count, label))
    .collect();

    format!("[{}]", parts.join(", "))
}

/// Heading printed above the summary lines.
#[must_use]
pub fn format_header(path: &Path, color: bool) -> String {
    let title = "git summary for";
    let path = path.display().to_string();
    if color {
        format!("{} {}", title.cyan(), path.white().bold())
    } else {
        format!("{} {}", title, path)
    }
}
