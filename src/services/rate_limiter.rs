// src/services/rate_limiter.rs
// DOCUMENTATION: Process-wide limit on outbound model searches
// PURPOSE: Protect the model quota from bursts of search requests

use crate::errors::PlacesError;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

pub struct SearchRateLimiter {
    limiter: Option<DefaultDirectRateLimiter>,
}

impl SearchRateLimiter {
    /// Allow `per_minute` searches per minute; 0 disables limiting
    pub fn per_minute(per_minute: u32) -> Self {
        Self {
            limiter: NonZeroU32::new(per_minute)
                .map(|n| RateLimiter::direct(Quota::per_minute(n))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Consume one search slot
    pub fn check(&self) -> Result<(), PlacesError> {
        match &self.limiter {
            Some(limiter) => limiter.check().map_err(|_| {
                log::warn!("Search rate limit exceeded");
                PlacesError::RateLimitExceeded
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_limiter_always_allows() {
        let limiter = SearchRateLimiter::per_minute(0);
        assert!(!limiter.is_enabled());
        for _ in 0..100 {
            assert!(limiter.check().is_ok());
        }
    }

    #[test]
    fn test_limiter_rejects_after_burst() {
        let limiter = SearchRateLimiter::per_minute(2);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(matches!(
            limiter.check(),
            Err(PlacesError::RateLimitExceeded)
        ));
    }
}
