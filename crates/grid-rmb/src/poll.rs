//! Bounded polling combinator
//!
//! Drives an attempt function once per interval until it reports a value,
//! fails `error_threshold` times, or the cancellation token fires.
//! "Not ready yet" answers are free: they neither count as failures nor
//! reset the failure count.

use std::future::Future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shortest interval a timer will tick at
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polling cadence and failure budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub error_threshold: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, error_threshold: u32) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            error_threshold: error_threshold.max(1),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4)
    }
}

/// Outcome of a single attempt
#[derive(Debug)]
pub enum PollStep<T, E> {
    /// Done, stop polling
    Ready(T),
    /// Nothing yet, try again next tick
    Pending,
    /// Counted failure
    Failed(E),
}

/// Why polling stopped without a value
#[derive(Debug)]
pub enum PollError<E> {
    Cancelled,
    Exhausted { attempts: u32, last: E },
}

/// Poll `attempt` until it is ready.
///
/// The first attempt runs one interval after the call. Cancellation is
/// observed before every tick and while an attempt is in flight.
pub async fn poll_until<T, E, F, Fut>(
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollStep<T, E>>,
{
    let period = policy.interval.max(MIN_POLL_INTERVAL);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut failures = 0u32;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            _ = ticker.tick() => {}
        }

        let step = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            step = attempt() => step,
        };

        match step {
            PollStep::Ready(value) => return Ok(value),
            PollStep::Pending => {
                debug!(failures, "Not ready yet");
            }
            PollStep::Failed(err) => {
                failures += 1;
                debug!(failures, threshold = policy.error_threshold, "Poll attempt failed");
                if failures >= policy.error_threshold {
                    return Err(PollError::Exhausted {
                        attempts: failures,
                        last: err,
                    });
                }
            }
        }
    }
}
