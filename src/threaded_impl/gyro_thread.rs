use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::benchmark::metrics::TimingMetrics;
use crate::control::mode::{Mode, ModeSwitch};
use crate::ipc::channels::SystemChannels;
use crate::ipc::shared::{ConfigBuffer, DiagnosticLog};
use crate::sensor::fault::RateFaultDetector;
use crate::sensor::filter::MovingAverageFilter;
use crate::sensor::gyro::{HeadingSample, HeadingSensor, SimulatedGyro};
use crate::actuator::drive::DriveCommand;

pub struct SamplerStats {
    pub total_cycles: AtomicU64,
    pub faults: AtomicU64,
    pub dropped_samples: AtomicU64,
    pub shutdown: AtomicBool,
}

impl SamplerStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_cycles: AtomicU64::new(0),
            faults: AtomicU64::new(0),
            dropped_samples: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }
}

/// Fixed-cadence sampling loop: applies the latest drive command to the
/// simulated plant, samples and smooths the heading, and forwards it to the
/// control loop. Owns the gyro; mode transitions that re-zero the sensor are
/// applied here.
pub fn spawn_gyro_thread(
    mut gyro: SimulatedGyro,
    channels: SystemChannels,
    mode: ModeSwitch,
    diagnostic_log: DiagnosticLog,
    config: ConfigBuffer,
    metrics: TimingMetrics,
) -> (thread::JoinHandle<()>, Arc<SamplerStats>) {
    let stats = SamplerStats::new();
    let stats_clone = stats.clone();

    let handle = thread::spawn(move || {
        let startup_cfg = config.get();
        let mut filter = MovingAverageFilter::new(startup_cfg.filter_window);
        let detector = RateFaultDetector::new(startup_cfg.fault_rate_limit_dps);

        let mut last_cmd = DriveCommand::zero();
        let mut last_sample: Option<HeadingSample> = None;
        let mut last_mode = Mode::Idle;
        let mut last_cycle = Instant::now();

        info!("gyro sampling loop started");

        loop {
            if stats_clone.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let cfg = config.get();
            let cycle_start = Instant::now();
            let dt = cycle_start.duration_since(last_cycle).as_secs_f64();
            last_cycle = cycle_start;
            metrics.record_cycle_jitter((dt * 1e9) as u64);

            let current_mode = mode.get();
            if current_mode != last_mode {
                if matches!(current_mode, Mode::Active | Mode::Test) {
                    gyro.reset();
                    filter.reset();
                    last_sample = None;
                    last_cmd = DriveCommand::zero();
                    info!("gyro re-zeroed on transition to {current_mode:?}");
                }
                last_mode = current_mode;
            }

            // Latest command wins; drain anything queued since last cycle.
            while let Ok(cmd) = channels.command_rx.try_recv() {
                last_cmd = cmd;
            }
            gyro.apply_command(&last_cmd, dt);

            let sample_start = Instant::now();
            let raw = gyro.sample();
            metrics.record_sample(sample_start.elapsed());

            let smoothed = filter.apply(raw);

            let mut drop_sample = false;
            if let Some(prev) = &last_sample {
                if let Some(fault) = detector.check(prev, &smoothed) {
                    stats_clone.faults.fetch_add(1, Ordering::Relaxed);
                    diagnostic_log.write(format!("[GYRO] {fault}"));
                    warn!("{fault}");
                    drop_sample = cfg.fail_safe_enabled;
                }
            }

            if drop_sample {
                stats_clone.dropped_samples.fetch_add(1, Ordering::Relaxed);
            } else {
                last_sample = Some(smoothed);
                if channels.heading_tx.send(smoothed).is_err() {
                    diagnostic_log.write("[GYRO] heading channel closed".to_string());
                    break;
                }
            }

            stats_clone.total_cycles.fetch_add(1, Ordering::Relaxed);

            // Sleep off the rest of the cycle to hold the sampling cadence.
            let elapsed = cycle_start.elapsed();
            let interval = Duration::from_millis(cfg.loop_interval_ms);
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }

        info!("gyro sampling loop stopped");
    });

    (handle, stats)
}
