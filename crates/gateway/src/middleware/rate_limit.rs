//! Rate limiting for public form submissions (token bucket)

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::QuantaClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use unipath_common::{config::RateLimitConfig, errors::AppError};

/// Rate limiter using governor crate
pub type GlobalRateLimiter = RateLimiter<NotKeyed, InMemoryState, QuantaClock>;

/// Shared limiter plus the rate it was built with, for error reporting
#[derive(Clone)]
pub struct LeadLimiter {
    limiter: Arc<GlobalRateLimiter>,
    per_second: u32,
}

impl LeadLimiter {
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

/// Create a new rate limiter; zero values are raised to one
pub fn create_rate_limiter(config: &RateLimitConfig) -> LeadLimiter {
    let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);

    let quota = Quota::per_second(per_second).allow_burst(burst);

    LeadLimiter {
        limiter: Arc::new(RateLimiter::direct(quota)),
        per_second: per_second.get(),
    }
}

/// Rejects with 429 once the bucket is empty; passes everything through when
/// no limiter is configured
pub async fn rate_limit_middleware(
    State(limiter): State<Option<LeadLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(limiter) = limiter else {
        return Ok(next.run(request).await);
    };

    if limiter.check() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
        Err(AppError::RateLimited {
            limit: limiter.per_second,
        })
    }
}
