//! Sequential, fail-fast execution of a batch of tool invocations.
//!
//! Items run strictly one after another. The first failing item stops the
//! batch; items that already finished stay finished. Every failure ends up
//! as a `false` result plus log lines, never as an error to the caller.

mod runners;

pub use runners::{EncodeRunner, RipRunner};

use async_trait::async_trait;
use tracing::{error, info};

/// Runs one kind of batch item.
#[async_trait]
pub trait ItemRunner: Send + Sync {
    type Item: Send + Sync;

    /// Short label for log lines, e.g. `title 3`.
    fn describe(&self, item: &Self::Item) -> String;

    /// Called once before the first item. A failure aborts the batch before
    /// any item is attempted.
    async fn prepare(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Run one item; `position` is 1-based.
    async fn run_item(&self, position: usize, total: usize, item: &Self::Item)
        -> anyhow::Result<()>;
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub success: bool,
    /// Items that were started, including a failing one.
    pub attempted: usize,
    pub completed: usize,
    /// Human-readable lines for the session log.
    pub log: Vec<String>,
}

/// Run `items` in order through `runner`, stopping at the first failure.
pub async fn run_batch<R: ItemRunner>(runner: &R, items: &[R::Item]) -> BatchReport {
    let total = items.len();
    let mut report = BatchReport::default();

    if let Err(e) = runner.prepare().await {
        error!("Batch aborted before start: {:#}", e);
        report.log.push(format!("Error: {e:#}"));
        return report;
    }

    info!("Batch started: {} item(s)", total);

    for (i, item) in items.iter().enumerate() {
        let position = i + 1;
        let label = runner.describe(item);
        report.log.push(format!("Starting {label} ({position}/{total})"));
        report.attempted += 1;

        match runner.run_item(position, total, item).await {
            Ok(()) => {
                report.completed += 1;
                report.log.push(format!("Finished {label}"));
            }
            Err(e) => {
                error!("Batch item {}/{} failed: {:#}", position, total, e);
                report.log.push(format!("Failed {label}: {e:#}"));
                if position < total {
                    report
                        .log
                        .push(format!("Skipping {} remaining item(s)", total - position));
                }
                return report;
            }
        }
    }

    info!("Batch finished: {}/{} item(s)", report.completed, total);
    report.success = true;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Scripted {
        fail_on: Option<u32>,
        fail_prepare: bool,
        seen: Mutex<Vec<u32>>,
    }

    impl Scripted {
        fn new(fail_on: Option<u32>) -> Self {
            Self {
                fail_on,
                fail_prepare: false,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ItemRunner for Scripted {
        type Item = u32;

        fn describe(&self, item: &u32) -> String {
            format!("item {item}")
        }

        async fn prepare(&self) -> anyhow::Result<()> {
            if self.fail_prepare {
                anyhow::bail!("cannot create output directory");
            }
            Ok(())
        }

        async fn run_item(&self, _position: usize, _total: usize, item: &u32) -> anyhow::Result<()> {
            self.seen.lock().push(*item);
            if self.fail_on == Some(*item) {
                anyhow::bail!("exit status: 1");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn all_items_succeed() {
        let runner = Scripted::new(None);
        let report = run_batch(&runner, &[1, 2, 3]).await;
        assert!(report.success);
        assert_eq!(report.completed, 3);
        assert_eq!(*runner.seen.lock(), vec![1, 2, 3]);
        assert_eq!(report.log[0], "Starting item 1 (1/3)");
    }

    #[tokio::test]
    async fn first_item_failure_stops_everything() {
        let runner = Scripted::new(Some(1));
        let report = run_batch(&runner, &[1, 2]).await;
        assert!(!report.success);
        assert_eq!(report.attempted, 1);
        assert_eq!(report.completed, 0);
        assert!(report.log.iter().any(|l| l == "Skipping 1 remaining item(s)"));
    }

    #[tokio::test]
    async fn prepare_failure_attempts_nothing() {
        let mut runner = Scripted::new(None);
        runner.fail_prepare = true;
        let report = run_batch(&runner, &[1, 2]).await;
        assert!(!report.success);
        assert_eq!(report.attempted, 0);
        assert!(runner.seen.lock().is_empty());
        assert!(report.log[0].contains("cannot create output directory"));
    }

    #[tokio::test]
    async fn empty_batch_succeeds() {
        let runner = Scripted::new(None);
        let report = run_batch(&runner, &[]).await;
        assert!(report.success);
        assert_eq!(report.attempted, 0);
    }
}
