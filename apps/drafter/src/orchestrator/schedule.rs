//! Reapply scheduling: how many attempts to make and how long to wait between them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::RunConfig;
use crate::errors::AppError;

/// Whether the process stops after one attempt or keeps reapplying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Once,
    Continuous,
}

impl RunMode {
    /// CLI flags win over the run configuration's `daemon` field.
    pub fn resolve(once: bool, daemon: bool, config: &RunConfig) -> Self {
        if once {
            RunMode::Once
        } else if daemon || config.daemon {
            RunMode::Continuous
        } else {
            RunMode::Once
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub min_days: u32,
    pub max_days: u32,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &RunConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            min_days: config.min_reapply_days,
            max_days: config.max_reapply_days,
            max_attempts: config.max_attempts,
        })
    }

    /// Attempts allowed in `mode`.
    pub fn attempts_for(&self, mode: RunMode) -> u32 {
        match mode {
            RunMode::Once => 1,
            RunMode::Continuous => self.max_attempts,
        }
    }

    /// Uniformly random whole number of days in `[min_days, max_days]`.
    pub fn next_delay(&self, rng: &mut impl Rng) -> Duration {
        let days = rng.gen_range(self.min_days..=self.max_days);
        Duration::days(i64::from(days))
    }

    pub fn next_run_at(&self, now: DateTime<Utc>, rng: &mut impl Rng) -> DateTime<Utc> {
        now + self.next_delay(rng)
    }
}

/// Suspends the process until the next attempt is due.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep_until(&self, at: DateTime<Utc>);
}

/// Sleeps on the tokio timer. A time already in the past returns immediately.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep_until(&self, at: DateTime<Utc>) {
        let wait = (at - Utc::now()).to_std().unwrap_or_default();
        debug!("Sleeping {}s until {at}", wait.as_secs());
        tokio::time::sleep(wait).await;
    }
}

/// Picks reapply times from a `RetryPolicy` and waits for them.
pub struct Scheduler<S: Sleeper> {
    policy: RetryPolicy,
    rng: StdRng,
    sleeper: S,
}

impl<S: Sleeper> Scheduler<S> {
    pub fn new(policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            policy,
            rng: StdRng::from_entropy(),
            sleeper,
        }
    }

    /// Deterministic delays, for tests.
    #[cfg(test)]
    pub fn with_seed(policy: RetryPolicy, sleeper: S, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
            sleeper,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    #[cfg(test)]
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn next_run_at(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.policy.next_run_at(now, &mut self.rng)
    }

    pub async fn sleep_until(&self, at: DateTime<Utc>) {
        self.sleeper.sleep_until(at).await;
    }
}
