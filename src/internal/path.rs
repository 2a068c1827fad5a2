//! Cyclic-dependency detection via a task-local resolution path.
//!
//! A resolution walk is sequential within one task, even when it
//! suspends for `initialize()` or delegates across scopes, so the path
//! of in-progress type names lives in task-local storage. Revisiting a
//! name that is already on the path means the graph is cyclic; reporting
//! that as an error (before touching the type's creation gate) is what
//! keeps a cycle from deadlocking against its own lock.

use std::cell::RefCell;
use std::future::Future;

use crate::error::{DiError, DiResult};

tokio::task_local! {
    static RESOLUTION_PATH: RefCell<Vec<&'static str>>;
}

/// Pops the current frame when a nested resolve finishes, error or not.
struct PathFrame;

impl Drop for PathFrame {
    fn drop(&mut self) {
        let _ = RESOLUTION_PATH.try_with(|path| {
            path.borrow_mut().pop();
        });
    }
}

fn enter(path: &RefCell<Vec<&'static str>>, name: &'static str) -> DiResult<()> {
    let mut path = path.borrow_mut();
    if path.iter().any(|n| *n == name) {
        let mut cycle = path.clone();
        cycle.push(name);
        return Err(DiError::Circular(cycle));
    }
    path.push(name);
    Ok(())
}

/// Runs `f` with `name` pushed onto this task's resolution path,
/// failing with [`DiError::Circular`] if `name` is already in progress.
pub(crate) async fn with_path_guard<F, T>(name: &'static str, f: F) -> DiResult<T>
where
    F: Future<Output = DiResult<T>>,
{
    match RESOLUTION_PATH.try_with(|path| enter(path, name)) {
        // Nested resolve on a task that already carries a path.
        Ok(Ok(())) => {
            let _frame = PathFrame;
            f.await
        }
        Ok(Err(cycle)) => Err(cycle),
        // Top-level resolve: install a fresh path for this task.
        Err(_) => RESOLUTION_PATH.scope(RefCell::new(vec![name]), f).await,
    }
}
