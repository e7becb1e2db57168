// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::SearchError;

/// Recommended number of allowed node expansions in a search
/// before [SearchError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Shared flag used to abort in-flight searches from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bounds on the amount of work a single search may perform.
/// All limits are checked before every node expansion.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// How many nodes may be expanded before [SearchError::StepLimitExceeded] is returned.
    pub step_limit: usize,

    /// Point in time after which the search returns [SearchError::Cancelled].
    pub deadline: Option<Instant>,

    /// Token which, once cancelled, makes the search return [SearchError::Cancelled].
    pub cancel: Option<CancelToken>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            deadline: None,
            cancel: None,
        }
    }
}

impl SearchLimits {
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Checks whether another expansion is allowed, given that `steps`
    /// expansions (including the upcoming one) have been performed.
    pub(crate) fn check(&self, steps: usize) -> Result<(), SearchError> {
        if steps > self.step_limit {
            return Err(SearchError::StepLimitExceeded);
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(SearchError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SearchError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_limit() {
        let limits = SearchLimits::default().with_step_limit(2);
        assert_eq!(limits.check(1), Ok(()));
        assert_eq!(limits.check(2), Ok(()));
        assert_eq!(limits.check(3), Err(SearchError::StepLimitExceeded));
    }

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let limits = SearchLimits::default().with_cancel(token.clone());
        assert_eq!(limits.check(1), Ok(()));
        token.cancel();
        assert_eq!(limits.check(1), Err(SearchError::Cancelled));
    }

    #[test]
    fn expired_deadline() {
        let limits = SearchLimits::default().with_deadline(Instant::now());
        assert_eq!(limits.check(1), Err(SearchError::Cancelled));
    }
}
