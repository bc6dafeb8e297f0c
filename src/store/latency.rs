// Simulated network latency for store operations

use async_trait::async_trait;
use std::time::Duration;

/// Store operations, used for latency lookup and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAll,
    GetById,
    Create,
    Update,
    Delete,
    ToggleStatus,
    TestWebhook,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAll => "get_all",
            Operation::GetById => "get_by_id",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::ToggleStatus => "toggle_status",
            Operation::TestWebhook => "test_webhook",
        }
    }
}

/// Fixed simulated delay per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub get_all: Duration,
    pub get_by_id: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
    pub toggle_status: Duration,
    pub test_webhook: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            get_all: Duration::from_millis(300),
            get_by_id: Duration::from_millis(200),
            create: Duration::from_millis(400),
            update: Duration::from_millis(300),
            delete: Duration::from_millis(250),
            toggle_status: Duration::from_millis(200),
            test_webhook: Duration::from_millis(1000),
        }
    }
}

impl LatencyProfile {
    pub fn with_get_all(mut self, delay: Duration) -> Self {
        self.get_all = delay;
        self
    }

    pub fn delay_for(&self, operation: Operation) -> Duration {
        match operation {
            Operation::GetAll => self.get_all,
            Operation::GetById => self.get_by_id,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
            Operation::ToggleStatus => self.toggle_status,
            Operation::TestWebhook => self.test_webhook,
        }
    }
}

/// Suspends the caller for a simulated delay
#[async_trait]
pub trait Delay: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer, scaled by a constant factor
#[derive(Debug, Clone, Copy)]
pub struct SleepDelay {
    scale: f64,
}

impl SleepDelay {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Default for SleepDelay {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl Delay for SleepDelay {
    async fn pause(&self, duration: Duration) {
        let scaled = duration.mul_f64(self.scale);
        if !scaled.is_zero() {
            tokio::time::sleep(scaled).await;
        }
    }
}

/// Resolves immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn pause(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_default_profile() {
        let profile = LatencyProfile::default();
        assert_eq!(profile.delay_for(Operation::GetAll), Duration::from_millis(300));
        assert_eq!(profile.delay_for(Operation::Create), Duration::from_millis(400));
        assert_eq!(
            profile.with_get_all(Duration::from_millis(250)).get_all,
            Duration::from_millis(250)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_delay_scales() {
        let start = Instant::now();
        SleepDelay::new(0.5).pause(Duration::from_millis(400)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay() {
        let start = Instant::now();
        NoDelay.pause(Duration::from_secs(5)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
