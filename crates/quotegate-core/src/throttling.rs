//! Single-lane gate for outbound provider calls.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::Clock;
use governor::middleware::NoOpMiddleware;
use governor::nanos::Nanos;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::debug;

use crate::rate_policy::RatePolicy;

type QuotaLimiter = RateLimiter<NotKeyed, InMemoryState, TokioClock, NoOpMiddleware<Nanos>>;

/// Governor clock that reads tokio's timer, so a paused runtime also pauses the quota.
#[derive(Debug, Clone, Copy)]
struct TokioClock {
    origin: Instant,
}

impl Clock for TokioClock {
    type Instant = Nanos;

    fn now(&self) -> Nanos {
        Nanos::from(self.origin.elapsed())
    }
}

#[derive(Debug, Default)]
struct GateState {
    last_finished: Option<Instant>,
    dispatched: u64,
}

/// Serializes provider calls end-to-start with a fixed gap, plus a rolling quota.
///
/// Waiters are served first-come-first-served. Only one [`RatePermit`] exists
/// at a time, so outbound calls never overlap.
#[derive(Clone)]
pub struct RateGate {
    state: Arc<Mutex<GateState>>,
    limiter: Arc<QuotaLimiter>,
    clock: TokioClock,
    policy: RatePolicy,
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(RatePolicy::default())
    }
}

impl RateGate {
    pub fn new(policy: RatePolicy) -> Self {
        let clock = TokioClock {
            origin: Instant::now(),
        };
        let quota = quota_from_window(policy.quota_window, policy.quota_limit);

        Self {
            state: Arc::new(Mutex::new(GateState::default())),
            limiter: Arc::new(RateLimiter::direct_with_clock(quota, &clock)),
            clock,
            policy,
        }
    }

    /// Suspends until the next outbound call may start.
    ///
    /// Hold the permit for the whole call; dropping it marks the call finished.
    pub async fn acquire(&self) -> RatePermit {
        let mut state = Arc::clone(&self.state).lock_owned().await;

        if let Some(finished) = state.last_finished {
            let ready_at = finished + self.policy.min_spacing;
            let now = Instant::now();
            if ready_at > now {
                debug!(
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "waiting for provider call spacing"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        while let Err(not_until) = self.limiter.check() {
            let wait = not_until.wait_time_from(self.clock.now());
            debug!(
                wait_ms = wait.as_millis() as u64,
                "provider quota exhausted; waiting for budget"
            );
            tokio::time::sleep(wait).await;
        }

        state.dispatched += 1;
        RatePermit {
            state,
            started_at: Instant::now(),
        }
    }

    /// True when no call is in flight and the spacing window has elapsed.
    pub fn is_ready(&self) -> bool {
        match self.state.try_lock() {
            Ok(state) => state
                .last_finished
                .map_or(true, |finished| finished + self.policy.min_spacing <= Instant::now()),
            Err(_) => false,
        }
    }

    /// Number of permits handed out so far, or `None` while a call is in flight.
    pub fn dispatched(&self) -> Option<u64> {
        self.state.try_lock().ok().map(|state| state.dispatched)
    }
}

/// Exclusive right to perform one outbound provider call.
pub struct RatePermit {
    state: OwnedMutexGuard<GateState>,
    started_at: Instant,
}

impl RatePermit {
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

impl Drop for RatePermit {
    fn drop(&mut self) {
        self.state.last_finished = Some(Instant::now());
    }
}

/// One cell every `window / limit` with no burst, so any `window`-long span
/// admits at most `limit` calls.
fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let limit = NonZeroU32::new(quota_limit).unwrap_or(NonZeroU32::MIN);

    Quota::with_period(quota_window / limit.get())
        .unwrap_or_else(|| Quota::per_minute(limit))
}
