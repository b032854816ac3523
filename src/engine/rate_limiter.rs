//! @ai:module:intent Rate limiting for HTTP engines
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Token bucket limiter keyed to requests per minute
pub struct RateLimiter {
    state: Mutex<BucketState>,
    requests_per_minute: u32,
}

struct BucketState {
    tokens: f64,
    last_update: Instant,
}

impl RateLimiter {
    /// @ai:intent Create a limiter with a full bucket
    /// @ai:pre requests_per_minute > 0
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            state: Mutex::new(BucketState {
                tokens: requests_per_minute as f64,
                last_update: Instant::now(),
            }),
            requests_per_minute,
        }
    }

    /// @ai:intent Refill tokens based on elapsed time
    /// @ai:effects state:write
    fn refill(state: &mut BucketState, rpm: u32) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_update);
        let refill = elapsed.as_secs_f64() * (rpm as f64 / 60.0);
        state.tokens = (state.tokens + refill).min(rpm as f64);
        state.last_update = now;
    }

    /// @ai:intent Block until a request is allowed
    /// @ai:effects state:write, time
    pub async fn wait(&self) {
        loop {
            let sleep_for = {
                let mut state = self.state.lock().await;
                Self::refill(&mut state, self.requests_per_minute);

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }

                let deficit = 1.0 - state.tokens;
                Duration::from_secs_f64(deficit / (self.requests_per_minute as f64 / 60.0))
            };

            tokio::time::sleep(sleep_for).await;
        }
    }
}
