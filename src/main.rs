use anyhow::Context;
use clap::Parser;
use git_summary::config::{Config, RunMode, Verbosity};
use git_summary::constants::{RAYON_THREAD_COUNT, REPOS_PATH_ENV_VAR};
use git_summary::repo::{self, GitInspector};
use git_summary::terminal::{self, TerminalProbe};
use git_summary::summary;
use std::path::PathBuf;

const LEGEND: &str = "\
Each line shows the repository name, its branch, local changes, and how the
branch compares with its upstream:

    (clean)            no local changes
    [2 modified, ...]  counts of modified, staged, renamed, untracked, conflicted entries
    ahead N / behind N commits not yet pushed / pulled
    (upstream gone)    the tracking branch no longer exists on the remote
    (fetch failed)     --fetch was requested and the fetch failed
    (no commits)       the repository has no commits yet
    …                  still being inspected

Name colors: green all good, red local changes, yellow no upstream,
cyan ahead/behind, magenta fetch failed, black on yellow no commits.";

/// Summarise the state of every git repository in a folder.
#[derive(Parser, Debug)]
#[command(name = "git-summary", version, about, after_help = LEGEND)]
struct Cli {
    /// Folder containing the repositories
    #[arg(env = REPOS_PATH_ENV_VAR)]
    path: Option<PathBuf>,

    /// Run `git fetch` on each repository before comparing with its upstream (slow)
    #[arg(short, long)]
    fetch: bool,

    /// Don't use colors
    #[arg(short, long)]
    monochrome: bool,

    /// Print lines one after another instead of updating them in place (implies --monochrome)
    #[arg(short, long)]
    simple: bool,

    /// Inspect repositories one at a time
    #[arg(short = 'S', long)]
    sequential: bool,

    /// Show the upstream branch name
    #[arg(short, long)]
    tracking: bool,

    /// List every subdirectory, not only those containing .git
    #[arg(short, long)]
    all: bool,

    /// Number of repositories inspected concurrently
    #[arg(short, long, default_value_t = RAYON_THREAD_COUNT)]
    jobs: usize,

    /// Log git commands and rendering decisions to stderr (lines are appended, not updated in place)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Omit the heading
    #[arg(short, long)]
    quiet: bool,

    /// Clear the screen and draw the summary from the top
    #[arg(short, long)]
    clear: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let verbosity = if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        };

        Config {
            mode: RunMode {
                concurrent_collection: !self.sequential,
                concurrent_render: !self.simple,
            },
            fetch_first: self.fetch,
            color_enabled: !(self.monochrome || self.simple)
                && std::env::var_os("NO_COLOR").is_none(),
            show_tracking: self.tracking,
            all_dirs: self.all,
            clear_screen: self.clear,
            jobs: self.jobs,
            verbosity,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter()),
    )
    .init();

    let path = cli.path.with_context(|| {
        format!(
            "No path specified, and none in {} env var",
            REPOS_PATH_ENV_VAR
        )
    })?;
    let path = std::path::absolute(&path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;

    let repos = repo::find_repos(&path, config.all_dirs)?;
    if repos.is_empty() {
        anyhow::bail!("No git repos found at path: {}", path.display());
    }

    let probe = terminal::Stdout;
    let color = config.color_enabled && probe.is_interactive();
    colored::control::set_override(color);

    let mut out = std::io::stdout();
    summary::write_preamble(&mut out, &path, &config, probe.is_interactive(), color)
        .context("Failed to write heading")?;

    summary::run(&repos, &GitInspector, &probe, &config, out)?;
    Ok(())
}
