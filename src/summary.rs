//! One summary run: probe the terminal, collect, and render.

use anyhow::Context;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::collect::collect;
use crate::config::Config;
use crate::output::{Formatter, format_header};
use crate::render::LineRenderer;
use crate::repo::{Inspector, RepoStatus, repo_name};
use crate::terminal::{self, TerminalProbe};

/// What a finished run produced.
#[derive(Debug)]
pub struct RunOutput<W> {
    /// The output stream, handed back after the cursor is left below the summary.
    pub out: W,
    /// One status per repository, in index order.
    pub statuses: Vec<RepoStatus>,
    /// Whether lines were rewritten in place (false when appended).
    pub in_place: bool,
}

/// Writes what precedes the summary lines: an optional screen clear, then
/// the heading unless the run is quiet.
pub fn write_preamble<W: Write>(
    out: &mut W,
    path: &Path,
    config: &Config,
    interactive: bool,
    color: bool,
) -> io::Result<()> {
    if config.clear_screen && interactive {
        terminal::clear_screen(out)?;
    }
    if !config.is_quiet() {
        writeln!(out, "{}", format_header(path, color))?;
        writeln!(out)?;
    }
    out.flush()
}

/// Summarises every repository in `paths` onto `out`.
///
/// In-place rendering needs an interactive terminal that answers the
/// cursor-position query and `concurrent_render`; anything else appends
/// plain lines in index order. Verbose runs always append, since their log
/// lines share the terminal and would scroll the reserved rows away.
/// Colors are only used on an interactive terminal.
pub fn run<W, I, P>(
    paths: &[PathBuf],
    inspector: &I,
    probe: &P,
    config: &Config,
    out: W,
) -> anyhow::Result<RunOutput<W>>
where
    W: Write,
    I: Inspector + ?Sized,
    P: TerminalProbe + ?Sized,
{
    let interactive = probe.is_interactive();
    let color = config.color_enabled && interactive;

    let mut renderer = if config.is_verbose() {
        log::debug!("Verbose output; appending lines");
        LineRenderer::append(out)
    } else if interactive && config.mode.concurrent_render {
        match probe.origin() {
            Ok(origin) => LineRenderer::in_place(out, origin),
            Err(e) => {
                log::debug!("Falling back to plain output: {}", e);
                LineRenderer::append(out)
            }
        }
    } else {
        LineRenderer::append(out)
    };

    renderer
        .initialize(paths.len())
        .context("Failed to reserve summary lines")?;
    let in_place = renderer.is_in_place();
    log::debug!(
        "Summarising {} repositories ({:?}, in place: {})",
        paths.len(),
        config.mode,
        in_place
    );

    let formatter = Formatter::for_repos(paths, config, color);
    if in_place {
        for (index, path) in paths.iter().enumerate() {
            renderer
                .draw(index, &formatter.pending(&repo_name(path)))
                .context("Failed to write summary line")?;
        }
    }
    let mut statuses: Vec<Option<RepoStatus>> = vec![None; paths.len()];

    collect(paths, inspector, config, |index, status| {
        renderer
            .draw(index, &formatter.format(&status))
            .context("Failed to write summary line")?;
        statuses[index] = Some(status);
        Ok(())
    })?;

    let out = renderer.finalize().context("Failed to finish summary output")?;

    Ok(RunOutput {
        out,
        statuses: statuses.into_iter().flatten().collect(),
        in_place,
    })
}
