//! Per-thread CPU clock
//!
//! Stress duration is measured on the calling thread's own CPU clock rather
//! than wall time, so time the scheduler hands to sibling stressor threads
//! neither inflates nor deflates a measurement.

use std::marker::PhantomData;
use std::time::Duration;

use crate::error::{ExecutionError, ExecutionResult};

/// CPU time consumed so far by the calling thread
#[cfg(unix)]
pub fn thread_cpu_time() -> ExecutionResult<Duration> {
    use nix::time::{clock_gettime, ClockId};

    let ts = clock_gettime(ClockId::CLOCK_THREAD_CPUTIME_ID)
        .map_err(|e| ExecutionError::ClockUnavailable(e.to_string()))?;

    Ok(Duration::new(ts.tv_sec() as u64, ts.tv_nsec() as u32))
}

#[cfg(not(unix))]
pub fn thread_cpu_time() -> ExecutionResult<Duration> {
    Err(ExecutionError::ClockUnavailable(
        "per-thread CPU clock is only supported on unix targets".to_string(),
    ))
}

/// Stopwatch over the calling thread's CPU clock.
///
/// Readings are only meaningful on the thread that started the timer, so the
/// timer is neither `Send` nor `Sync`.
#[derive(Debug)]
pub struct ThreadCpuTimer {
    start: Duration,
    _thread_bound: PhantomData<*const ()>,
}

impl ThreadCpuTimer {
    pub fn start() -> ExecutionResult<Self> {
        Ok(Self {
            start: thread_cpu_time()?,
            _thread_bound: PhantomData,
        })
    }

    /// CPU time consumed by this thread since `start`
    pub fn elapsed(&self) -> ExecutionResult<Duration> {
        Ok(thread_cpu_time()?.saturating_sub(self.start))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_thread_clock_is_monotonic() {
        let first = thread_cpu_time().unwrap();
        let mut acc = 0u64;
        for i in 0..200_000u64 {
            acc = acc.wrapping_add(i * i);
        }
        std::hint::black_box(acc);
        let second = thread_cpu_time().unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_sleeping_does_not_advance_thread_clock() {
        let timer = ThreadCpuTimer::start().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(timer.elapsed().unwrap() < Duration::from_millis(25));
    }
}
