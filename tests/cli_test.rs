mod common;

use common::{SCENARIO_LINES, Workspace};
use git_summary::constants::REPOS_PATH_ENV_VAR;
use std::path::Path;
use std::process::{Command, Output};

fn git_summary(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_git-summary"));
    cmd.args(args)
        .env_remove(REPOS_PATH_ENV_VAR)
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn expected_with_header(path: &Path, lines: &[&str]) -> String {
    let mut expected = format!("git summary for {}\n\n", path.display());
    for line in lines {
        expected.push_str(line);
        expected.push('\n');
    }
    expected
}

#[test]
fn test_piped_output_is_plain_and_ordered() -> anyhow::Result<()> {
    let (workspace, _) = Workspace::scenario()?;
    let path = workspace.path().to_str().unwrap();

    let flag_sets: [&[&str]; 4] = [&[], &["--sequential"], &["--simple"], &["-S", "-s"]];
    for flags in flag_sets {
        let mut args = vec!["--all", path];
        args.extend_from_slice(flags);
        let output = git_summary(&args).output()?;

        assert!(output.status.success(), "{:?}", output);
        assert_eq!(
            stdout(&output),
            expected_with_header(workspace.path(), &SCENARIO_LINES),
            "flags {:?}",
            flags
        );
    }
    Ok(())
}

#[test]
fn test_only_repositories_listed_by_default() -> anyhow::Result<()> {
    let (workspace, _) = Workspace::scenario()?;
    let output = git_summary(&[workspace.path().to_str().unwrap()]).output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        expected_with_header(workspace.path(), &SCENARIO_LINES[..2])
    );
    Ok(())
}

#[test]
fn test_path_from_environment_and_quiet() -> anyhow::Result<()> {
    let (workspace, _) = Workspace::scenario()?;
    let output = git_summary(&["--quiet", "--tracking"])
        .env(REPOS_PATH_ENV_VAR, workspace.path())
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "A  main  (clean)\nB  feature/x  [2 modified] ahead 1 -> origin/feature/x\n"
    );
    Ok(())
}

#[test]
fn test_missing_path_fails() -> anyhow::Result<()> {
    let output = git_summary(&[]).output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No path specified"));
    Ok(())
}

#[test]
fn test_empty_folder_fails() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;
    let output = git_summary(&[workspace.path().to_str().unwrap()]).output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No git repos found"));
    Ok(())
}
