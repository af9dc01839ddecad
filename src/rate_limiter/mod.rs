use std::time::Duration;
use tokio::time::sleep;

/// Spaces out consecutive lookups so the source sites aren't hammered
pub struct RateLimiter {
    delay: Duration,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            request_count: 0,
        }
    }

    /// Returns immediately the first time, then sleeps the fixed delay
    pub async fn wait(&mut self) {
        if self.should_wait() {
            self.apply_delay().await;
        }
        self.increment();
    }

    fn should_wait(&self) -> bool {
        self.request_count > 0
    }

    async fn apply_delay(&self) {
        sleep(self.delay).await;
    }

    fn increment(&mut self) {
        self.request_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_first_request_is_free() {
        let mut limiter = RateLimiter::new(200);
        let started = Instant::now();
        limiter.wait().await;
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_later_requests_are_delayed() {
        let mut limiter = RateLimiter::new(30);
        limiter.wait().await;

        let started = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
