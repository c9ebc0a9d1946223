use std::{net::IpAddr, num::NonZeroU32, time::Duration};

use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};

use crate::errors::AppError;

const RETAIN_THRESHOLD: usize = 10_000;
const WINDOW: Duration = Duration::from_secs(60);

type KeyedLimiter<C> =
    RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Per source address limit for unauthenticated endpoints that cost money
/// or guard a secret (the OTP sender and verifier).
///
/// The whole burst is granted up front and a single slot comes back per
/// minute, so no address gets more than `limit` calls inside one minute.
pub struct AddressRateLimiter<C: Clock = DefaultClock> {
    limiter: KeyedLimiter<C>,
}

impl AddressRateLimiter {
    pub fn per_minute(limit: u32) -> Self {
        Self::with_clock(limit, DefaultClock::default())
    }
}

impl<C: Clock> AddressRateLimiter<C> {
    pub fn with_clock(limit: u32, clock: C) -> Self {
        let burst = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
        let quota = match Quota::with_period(WINDOW) {
            Some(quota) => quota.allow_burst(burst),
            None => Quota::per_minute(NonZeroU32::MIN),
        };
        Self {
            limiter: RateLimiter::new(quota, DefaultKeyedStateStore::default(), clock),
        }
    }

    pub fn check(&self, addr: IpAddr) -> Result<(), AppError> {
        if self.limiter.len() > RETAIN_THRESHOLD {
            self.limiter.retain_recent();
        }
        self.limiter.check_key(&addr).map_err(|_| {
            log::warn!("Rate limit exceeded for {}", addr);
            AppError::RateLimited
        })
    }
}
