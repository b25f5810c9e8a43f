//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic numbers throughout the codebase.

/// Environment variable holding the default folder to summarise.
pub const REPOS_PATH_ENV_VAR: &str = "GIT_SUMMARY_REPOS_PATH";

/// Number of threads for parallel repository inspection.
/// Higher than CPU count because git operations are I/O-bound (network, disk).
pub const RAYON_THREAD_COUNT: usize = 60;

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// Default name used when a repository name cannot be determined from its path.
pub const DEFAULT_REPO_NAME: &str = "repository";

/// Separator between the columns of a summary line.
pub const COLUMN_GAP: &str = "  ";
