use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::time::Instant;

/// Represents an entity responsible for providing dates across application. Sessions are stamped
/// with local wall-clock time, so tests swap this out to pin the date and hour.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Local>;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: tokio::time::Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: tokio::time::Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
