// Embassy-Implementierungen der Zeit-Traits aus esp-core

use core::future::Future;

use embassy_time::{Duration, Instant, Timer, with_timeout};
use esp_core::{TaskTimer, TickSource};

/// TaskTimer auf Basis von embassy-time (esp-rtos Zeittreiber)
pub struct EmbassyTimer;

impl TaskTimer for EmbassyTimer {
    async fn delay(&mut self, duration: Duration) {
        Timer::after(duration).await;
    }

    async fn within<F: Future>(&mut self, limit: Duration, fut: F) -> Option<F::Output> {
        with_timeout(limit, fut).await.ok()
    }
}

/// Monotone Millisekunden seit Boot
#[derive(Clone, Copy)]
pub struct EmbassyTicks;

impl TickSource for EmbassyTicks {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
