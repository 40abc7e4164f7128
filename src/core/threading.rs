//! Run closures on their own thread and collect their results
//!
//! [`threaded`] starts a closure on a dedicated OS thread and hands back a
//! [`TaskHandle`] right away, so blocking work (a bisection driving external
//! probes, for instance) never stalls the caller. Handles can be awaited one
//! by one or together with [`wait_for_results`], which enforces a single
//! deadline over all of them.
//!
//! A timed out task keeps running on its thread: OS threads cannot be
//! cancelled, only abandoned.

use crate::error::TaskError;
use futures::future::join_all;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{Instant, timeout_at};

static TASK_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Handle to a closure running on its own thread.
pub struct TaskHandle<T> {
    name: String,
    receiver: oneshot::Receiver<thread::Result<T>>,
    thread: JoinHandle<()>,
}

impl<T> TaskHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the closure has returned (or panicked).
    pub fn is_done(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the closure's return value without blocking the runtime.
    pub async fn result(self) -> Result<T, TaskError> {
        let outcome = self.receiver.await;
        Self::settle(self.name, outcome.ok())
    }

    /// Block the current thread until the closure returns.
    pub fn blocking_result(mut self) -> Result<T, TaskError> {
        if self.thread.join().is_err() {
            return Err(TaskError::Disconnected { task: self.name });
        }
        let outcome = self.receiver.try_recv().ok();
        Self::settle(self.name, outcome)
    }

    fn settle(name: String, outcome: Option<thread::Result<T>>) -> Result<T, TaskError> {
        match outcome {
            Some(Ok(value)) => Ok(value),
            Some(Err(payload)) => Err(TaskError::Panicked {
                task: name,
                message: panic_message(payload.as_ref()),
            }),
            None => Err(TaskError::Disconnected { task: name }),
        }
    }
}

/// Start `f` on a new thread with a generated name (`task-N`).
pub fn threaded<F, T>(f: F) -> Result<TaskHandle<T>, TaskError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let id = TASK_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    threaded_named(format!("task-{}", id), f)
}

/// Start `f` on a new thread named `name`.
pub fn threaded_named<F, T>(name: impl Into<String>, f: F) -> Result<TaskHandle<T>, TaskError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let name = name.into();
    let (sender, receiver) = oneshot::channel();

    let thread = thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f));
            // The handle may already be gone; nobody is left to tell
            let _ = sender.send(outcome);
        })
        .map_err(|e| TaskError::Spawn {
            task: name.clone(),
            message: e.to_string(),
        })?;

    log::debug!("Started task '{}'", name);
    Ok(TaskHandle {
        name,
        receiver,
        thread,
    })
}

/// Await every handle under one shared deadline.
///
/// Results come back in the order of `handles`. If any task misses the
/// deadline the whole wait fails with [`TaskError::Timeout`]; otherwise the
/// first task failure (in input order) is returned.
pub async fn wait_for_results<T>(
    handles: Vec<TaskHandle<T>>,
    timeout: Duration,
) -> Result<Vec<T>, TaskError> {
    let deadline = Instant::now() + timeout;
    let outcomes = join_all(
        handles
            .into_iter()
            .map(|handle| timeout_at(deadline, handle.result())),
    )
    .await;

    let mut results = Vec::with_capacity(outcomes.len());
    let mut pending = 0;
    let mut first_error = None;

    for outcome in outcomes {
        match outcome {
            Ok(Ok(value)) => results.push(value),
            Ok(Err(error)) => {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
            Err(_) => pending += 1,
        }
    }

    if pending > 0 {
        log::warn!(
            "{} task(s) did not finish within {:?}, abandoning them",
            pending,
            timeout
        );
        return Err(TaskError::Timeout {
            timeout_ms: timeout.as_millis(),
            pending,
        });
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(results),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
