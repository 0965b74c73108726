//! Resource guard.
//!
//! Bounds the cost of a single extraction: input size before parsing, tree
//! depth during every traversal, and wall-clock time. A batch can also attach
//! a cancellation flag so in-flight work stops at the next traversal step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Reject inputs larger than `max` bytes before any parsing work.
pub fn check_input_size(size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(Error::InputTooLarge { size, max });
    }
    Ok(())
}

/// Per-extraction budget tracker.
///
/// The depth counter is absolute: a walk starting below the document node
/// begins at its root's depth, so every scope sees the same limit. It returns
/// to zero when a walk completes.
#[derive(Debug, Clone)]
pub struct Guard {
    max_depth: usize,
    depth: usize,
    budget: Duration,
    /// `None` when the budget reaches past the representable future.
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Guard {
    /// Start a guard whose deadline is `budget` from now.
    ///
    /// A budget too large to add to the clock, such as `Duration::MAX`,
    /// means no time limit.
    #[must_use]
    pub fn new(max_depth: usize, budget: Duration) -> Self {
        Self {
            max_depth,
            depth: 0,
            budget,
            deadline: Instant::now().checked_add(budget),
            cancel: None,
        }
    }

    /// Pull the deadline in to `deadline` if that is earlier.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        let Some(deadline) = deadline else {
            return self;
        };
        match self.deadline {
            Some(current) if deadline >= current => {}
            Some(current) => {
                self.budget = self.budget.saturating_sub(current - deadline);
                self.deadline = Some(deadline);
            }
            None => {
                self.budget = deadline.saturating_duration_since(Instant::now());
                self.deadline = Some(deadline);
            }
        }
        self
    }

    /// Attach a shared cancellation flag.
    #[must_use]
    pub fn with_cancel(mut self, cancel: Option<Arc<AtomicBool>>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Current traversal depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Enter a child level. Fails the moment the depth passes the maximum.
    pub fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::DepthExceeded { max: self.max_depth });
        }
        Ok(())
    }

    /// Start a walk at absolute depth `depth`.
    pub fn enter_at(&mut self, depth: usize) -> Result<()> {
        self.depth = depth;
        if self.depth > self.max_depth {
            return Err(Error::DepthExceeded { max: self.max_depth });
        }
        Ok(())
    }

    /// Leave a child level.
    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Forget depth left over from an aborted walk.
    pub fn reset_depth(&mut self) {
        self.depth = 0;
    }

    /// Time and cancellation check, called at every traversal step.
    pub fn check(&self) -> Result<()> {
        if let Some(cancel) = &self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Error::ProcessingTimeout { budget: self.budget });
        }
        Ok(())
    }
}
