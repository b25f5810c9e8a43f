//! Configuration types for CLI verbosity and run options.

use crate::constants::RAYON_THREAD_COUNT;

/// Which halves of the pipeline run concurrently.
///
/// Collection and rendering are toggled independently, giving four modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMode {
    /// Inspect repositories in parallel instead of one after another.
    pub concurrent_collection: bool,
    /// Redraw each repository's line in place as soon as its result arrives.
    pub concurrent_render: bool,
}

impl RunMode {
    pub const CONCURRENT: Self = Self {
        concurrent_collection: true,
        concurrent_render: true,
    };

    pub const SEQUENTIAL: Self = Self {
        concurrent_collection: false,
        concurrent_render: false,
    };

    /// All four combinations, for exhaustive testing.
    pub const ALL: [Self; 4] = [
        Self::CONCURRENT,
        Self {
            concurrent_collection: true,
            concurrent_render: false,
        },
        Self {
            concurrent_collection: false,
            concurrent_render: true,
        },
        Self::SEQUENTIAL,
    ];
}

impl Default for RunMode {
    fn default() -> Self {
        Self::CONCURRENT
    }
}

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub mode: RunMode,
    /// Run `git fetch` against the upstream remote before reading status.
    pub fetch_first: bool,
    pub color_enabled: bool,
    /// Append the upstream branch name to each line.
    pub show_tracking: bool,
    /// List every subdirectory, not just the ones containing `.git`.
    pub all_dirs: bool,
    /// Clear an interactive screen and draw the summary from the top.
    pub clear_screen: bool,
    /// Worker threads used for concurrent collection.
    pub jobs: usize,
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            fetch_first: false,
            color_enabled: true,
            show_tracking: false,
            all_dirs: false,
            clear_screen: false,
            jobs: RAYON_THREAD_COUNT,
            verbosity: Verbosity::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Default `env_logger` filter for this verbosity.
    ///
    /// `RUST_LOG` still takes precedence; this only picks the fallback.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}
