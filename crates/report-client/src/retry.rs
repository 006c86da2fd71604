use std::time::Duration;

/// Exponential backoff schedule for submission retries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub min_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: u32,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            multiplier: 2,
            max_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following `attempt` (zero-based), clamped at
    /// `max_backoff`.
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let growth = self.multiplier.saturating_pow(attempt);
        self.min_backoff.saturating_mul(growth).min(self.max_backoff)
    }
}

#[cfg(test)]
mod tests;
