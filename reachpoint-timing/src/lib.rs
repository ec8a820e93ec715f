use std::time::{Duration, Instant};

/// Trait for high-precision timers. Event timestamps and stimulus
/// onsets are compared across the session, so every clock the session
/// touches must come from the same timer or a clone of it.
pub trait Timer {
    /// Nanoseconds since the timer epoch.
    fn now(&self) -> u64;

    /// Milliseconds elapsed since an earlier timestamp.
    fn elapsed_ms(&self, since: u64) -> f64 {
        self.now().saturating_sub(since) as f64 / 1_000_000.0
    }

    /// Blocks for the duration with the best precision the platform
    /// offers.
    fn sleep(&self, duration: Duration);
}

/// Monotonic timer with platform-specific precise sleep. Clones share
/// the epoch, so timestamps taken through any clone are comparable.
#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    start: Instant,
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn high_precision_sleep(&self, duration: Duration) {
        #[cfg(target_os = "windows")]
        self.windows_sleep(duration);
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(target_os = "macos")]
        self.macos_sleep(duration);
        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "windows")]
    fn windows_sleep(&self, duration: Duration) {
        use windows::core::PCWSTR;
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{
            CreateWaitableTimerW, SetWaitableTimer, WaitForSingleObject, INFINITE,
        };

        // Due time is negative for a relative wait, in 100 ns units
        let due = -((duration.as_nanos() / 100) as i64);

        unsafe {
            let Ok(timer) = CreateWaitableTimerW(None, true, PCWSTR::null()) else {
                std::thread::sleep(duration);
                return;
            };
            if SetWaitableTimer(timer, &due, 0, None, None, false).is_ok() {
                let _ = WaitForSingleObject(timer, INFINITE);
            } else {
                std::thread::sleep(duration);
            }
            let _ = CloseHandle(timer);
        }
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC, EINTR};

        let mut req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };
        let mut rem = timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        unsafe {
            while clock_nanosleep(CLOCK_MONOTONIC, 0, &req, &mut rem) == EINTR {
                req = rem;
            }
        }
    }

    #[cfg(target_os = "macos")]
    fn macos_sleep(&self, duration: Duration) {
        use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};
        use std::thread;

        if duration.as_nanos() < 100_000 {
            unsafe {
                let start = mach_absolute_time();
                let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
                mach_timebase_info(&mut timebase);

                let target_ticks =
                    duration.as_nanos() as u64 * timebase.denom as u64 / timebase.numer as u64;

                while mach_absolute_time() - start < target_ticks {
                    std::hint::spin_loop();
                }
            }
        } else {
            thread::sleep(duration);
        }
    }
}

impl Timer for HighPrecisionTimer {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn sleep(&self, duration: Duration) {
        self.high_precision_sleep(duration);
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_epoch() {
        let timer = HighPrecisionTimer::new();
        let clone = timer.clone();
        let a = timer.now();
        let b = clone.now();
        assert!(b >= a);
        assert!(b - a < 1_000_000_000);
    }

    #[test]
    fn elapsed_ms_converts_nanoseconds() {
        let timer = HighPrecisionTimer::new();
        let before = timer.now();
        timer.sleep(Duration::from_millis(2));
        let elapsed = timer.elapsed_ms(before);
        assert!(elapsed >= 2.0, "slept for {elapsed} ms");
    }

    #[test]
    fn elapsed_ms_saturates_on_future_timestamps() {
        let timer = HighPrecisionTimer::new();
        assert_eq!(timer.elapsed_ms(u64::MAX), 0.0);
    }
}
