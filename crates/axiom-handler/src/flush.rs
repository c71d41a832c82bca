//! Deferred completion of flushes.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

/// Accepts work the host must finish before reclaiming the execution context.
pub trait WaitUntil: Send + Sync {
    fn wait_until(&self, fut: BoxFuture<'static, ()>);
}

enum Task {
    Spawned(JoinHandle<()>),
    Deferred(BoxFuture<'static, ()>),
}

/// Tracks background work until the host drains it.
///
/// Work is spawned onto the current Tokio runtime when one is available and
/// held for `drain` otherwise.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl fmt::Debug for BackgroundTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundTasks")
            .field("pending", &self.pending())
            .finish()
    }
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks registered and not yet finished.
    pub fn pending(&self) -> usize {
        let mut tasks = self.lock();
        reap(&mut tasks);
        tasks.len()
    }

    /// Wait for every registered task, including ones registered meanwhile.
    ///
    /// Returns the number of tasks awaited.
    pub async fn drain(&self) -> usize {
        let mut count = 0;
        loop {
            let tasks = std::mem::take(&mut *self.lock());
            if tasks.is_empty() {
                return count;
            }

            for task in tasks {
                match task {
                    Task::Spawned(handle) => {
                        if let Err(e) = handle.await {
                            tracing::warn!(error = %e, "axiom: background task failed");
                        }
                    }
                    Task::Deferred(fut) => fut.await,
                }
                count += 1;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WaitUntil for BackgroundTasks {
    fn wait_until(&self, fut: BoxFuture<'static, ()>) {
        let task = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Task::Spawned(handle.spawn(fut)),
            Err(_) => Task::Deferred(fut),
        };
        let mut tasks = self.lock();
        reap(&mut tasks);
        tasks.push(task);
    }
}

/// Drop handles of spawned tasks that already completed.
fn reap(tasks: &mut Vec<Task>) {
    tasks.retain(|task| !matches!(task, Task::Spawned(handle) if handle.is_finished()));
}
