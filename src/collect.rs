//! Repository status collection.
//!
//! Concurrent mode fans out one inspection per repository onto a bounded
//! rayon pool. Finished statuses travel over a channel to the calling thread,
//! which is the only consumer: every `on_result` call happens there, so the
//! consumer can own the terminal without any locking.
//!
//! Sequential mode inspects repositories one at a time in index order, and
//! each `on_result` call returns before the next inspection starts.

use anyhow::Context;
use crossbeam_channel as chan;
use rayon::prelude::*;
use std::path::PathBuf;

use crate::config::Config;
use crate::repo::{Inspector, RepoStatus};

/// Inspects every repository in `paths` and hands each status to `on_result`
/// exactly once, together with its index.
///
/// Inspection failures arrive as statuses. The only error that stops
/// collection is one returned by `on_result` itself; in concurrent mode
/// workers then stop picking up new repositories.
pub fn collect<I, F>(
    paths: &[PathBuf],
    inspector: &I,
    config: &Config,
    mut on_result: F,
) -> anyhow::Result<()>
where
    I: Inspector + ?Sized,
    F: FnMut(usize, RepoStatus) -> anyhow::Result<()>,
{
    let fetch_first = config.fetch_first;

    if !config.mode.concurrent_collection {
        for (index, path) in paths.iter().enumerate() {
            let status = inspector.inspect(path, fetch_first);
            on_result(index, status)?;
        }
        return Ok(());
    }

    // `jobs == 0` lets rayon pick its default thread count.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .thread_name(|i| format!("inspect-{}", i))
        .build()
        .context("Failed to build worker pool")?;

    let (tx, rx) = chan::unbounded::<(usize, RepoStatus)>();

    std::thread::scope(|scope| {
        scope.spawn(move || {
            let sent = pool.install(|| {
                paths
                    .par_iter()
                    .enumerate()
                    .try_for_each_with(tx, |tx, (index, path)| {
                        tx.send((index, inspector.inspect(path, fetch_first)))
                    })
            });
            if sent.is_err() {
                log::debug!("Result consumer stopped; abandoning remaining inspections");
            }
        });

        drain(rx, paths.len(), &mut on_result)
    })
}

/// Feeds results to `on_result` until every worker has hung up. Taking the
/// receiver by value means an early error drops it, which stops the workers.
fn drain<F>(
    rx: chan::Receiver<(usize, RepoStatus)>,
    total: usize,
    on_result: &mut F,
) -> anyhow::Result<()>
where
    F: FnMut(usize, RepoStatus) -> anyhow::Result<()>,
{
    let mut received = 0;
    for (index, status) in rx {
        received += 1;
        log::debug!("Collected {} ({}/{})", status.name, received, total);
        on_result(index, status)?;
    }
    Ok(())
}
