//! Staged wait schedule for index lock contention.

use std::time::Duration;

use backoff::backoff::Backoff;

/// Default wait before re-checking a present lock file.
pub const DEFAULT_INITIAL_WAIT_SECS: u64 = 10;

/// Default grace period granted to a running git process.
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 60;

/// How long to wait on a held `index.lock` before removing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    pub initial_wait: Duration,
    pub grace_period: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            initial_wait: Duration::from_secs(DEFAULT_INITIAL_WAIT_SECS),
            grace_period: Duration::from_secs(DEFAULT_GRACE_PERIOD_SECS),
        }
    }
}

impl LockPolicy {
    pub fn schedule(&self) -> LockWaitSchedule {
        LockWaitSchedule {
            stages: [self.initial_wait, self.grace_period],
            next: 0,
        }
    }
}

/// Bounded backoff: the initial wait, then the grace period, then exhausted.
#[derive(Debug, Clone)]
pub struct LockWaitSchedule {
    stages: [Duration; 2],
    next: usize,
}

impl Backoff for LockWaitSchedule {
    fn next_backoff(&mut self) -> Option<Duration> {
        let wait = self.stages.get(self.next).copied();
        if wait.is_some() {
            self.next += 1;
        }
        wait
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}
