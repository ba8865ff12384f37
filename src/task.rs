//! Handle for one unit of background work driven from the foreground loop.

use anyhow::{anyhow, Result};
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A spawned task the foreground loop polls without blocking.
///
/// Must be created and joined from outside the runtime's worker threads.
#[derive(Debug)]
pub struct TaskHandle<T> {
    handle: Option<JoinHandle<T>>,
    runtime: Handle,
}

impl<T: Send + 'static> TaskHandle<T> {
    pub fn spawn<F>(runtime: &Handle, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: Some(runtime.spawn(future)),
            runtime: runtime.clone(),
        }
    }

    /// True once the task has finished (or was already joined).
    pub fn poll(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Block until the task finishes and take its result.
    ///
    /// The result is handed out once; later calls return an error, as does
    /// a task that panicked.
    pub fn join(&mut self) -> Result<T> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("task result already taken"))?;
        self.runtime
            .block_on(handle)
            .map_err(|e| anyhow!("background task failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn poll_then_join_once() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut task = TaskHandle::spawn(rt.handle(), async move {
            let _ = rx.await;
            42
        });

        assert!(!task.poll());
        tx.send(()).unwrap();
        while !task.poll() {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(task.join().unwrap(), 42);
        assert!(task.poll());
        assert!(task.join().is_err());
    }

    #[test]
    fn panicking_task_joins_as_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut task: TaskHandle<()> = TaskHandle::spawn(rt.handle(), async { panic!("boom") });
        assert!(task.join().is_err());
    }
}
