//! Timer and clock utilities shared by the loader and the scheduler.

#[cfg(not(target_arch = "wasm32"))]
use once_cell::sync::Lazy;

#[cfg(not(target_arch = "wasm32"))]
static EPOCH: Lazy<std::time::Instant> = Lazy::new(std::time::Instant::now);

/// Suspend the current task for `ms` milliseconds. Zero returns immediately.
pub async fn sleep_ms(ms: u64) {
    if ms == 0 {
        return;
    }

    #[cfg(target_arch = "wasm32")]
    {
        let capped = u32::try_from(ms).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(capped).await;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

/// Monotonic milliseconds since an arbitrary process-local origin.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        EPOCH.elapsed().as_secs_f64() * 1000.0
    }
}

/// Measures the wall time of one operation.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_ms: f64,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started_ms: now_ms(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        (now_ms() - self.started_ms).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }

    #[tokio::test]
    async fn stopwatch_measures_sleep() {
        let watch = Stopwatch::start();
        sleep_ms(5).await;
        assert!(watch.elapsed_ms() >= 4.0);
    }
}
