//! Metrics module - loop timing tracking and statistics

use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct TimingMetrics {
    sample_hist: Arc<Mutex<Histogram<u64>>>,
    tick_hist: Arc<Mutex<Histogram<u64>>>,
    e2e_hist: Arc<Mutex<Histogram<u64>>>,
    // Jitter tracking (variation between consecutive sampling cycles)
    last_cycle_ns: Arc<AtomicU64>,
    jitter_hist: Arc<Mutex<Histogram<u64>>>,
    missed_deadlines: Arc<AtomicU64>,
}

impl TimingMetrics {
    pub fn new() -> Self {
        Self {
            sample_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
            tick_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
            e2e_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
            last_cycle_ns: Arc::new(AtomicU64::new(0)),
            jitter_hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
            missed_deadlines: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_sample(&self, duration: Duration) {
        self.sample_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    pub fn record_tick(&self, duration: Duration, deadline_ns: u64) {
        let nanos = duration.as_nanos() as u64;
        self.tick_hist.lock().record(nanos).ok();

        if nanos > deadline_ns {
            self.missed_deadlines.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_e2e(&self, duration: Duration) {
        self.e2e_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Records the gap since the previous cycle and tracks how much it varies.
    pub fn record_cycle_jitter(&self, cycle_duration_ns: u64) {
        let last = self.last_cycle_ns.swap(cycle_duration_ns, Ordering::Relaxed);
        if last > 0 {
            let jitter = cycle_duration_ns.abs_diff(last);
            self.jitter_hist.lock().record(jitter).ok();
        }
    }

    pub fn missed_deadlines(&self) -> u64 {
        self.missed_deadlines.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> MetricsReport {
        let sample = self.sample_hist.lock();
        let tick = self.tick_hist.lock();
        let e2e = self.e2e_hist.lock();
        let jitter = self.jitter_hist.lock();

        MetricsReport {
            sample_p50: Duration::from_nanos(sample.value_at_quantile(0.5)),
            sample_p99: Duration::from_nanos(sample.value_at_quantile(0.99)),
            tick_p50: Duration::from_nanos(tick.value_at_quantile(0.5)),
            tick_p99: Duration::from_nanos(tick.value_at_quantile(0.99)),
            e2e_p50: Duration::from_nanos(e2e.value_at_quantile(0.5)),
            e2e_p99: Duration::from_nanos(e2e.value_at_quantile(0.99)),
            jitter_p99: Duration::from_nanos(jitter.value_at_quantile(0.99)),
            missed_deadlines: self.missed_deadlines.load(Ordering::Relaxed),
        }
    }
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct MetricsReport {
    pub sample_p50: Duration,
    pub sample_p99: Duration,
    pub tick_p50: Duration,
    pub tick_p99: Duration,
    pub e2e_p50: Duration,
    pub e2e_p99: Duration,
    pub jitter_p99: Duration,
    pub missed_deadlines: u64,
}
