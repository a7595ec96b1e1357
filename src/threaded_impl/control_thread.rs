use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::actuator::drive::{Actuator, DriveCommand};
use crate::benchmark::metrics::TimingMetrics;
use crate::control::heading::{HeadingController, TickError};
use crate::control::mode::{apply_controller_transition, Mode, ModeSwitch};
use crate::ipc::channels::SystemChannels;
use crate::ipc::shared::{ConfigBuffer, DiagnosticLog};
use crate::telemetry::{Dashboard, TelemetrySink, TraceRow, HEADING_KEY, OUTPUT_KEY};

pub struct ControlStats {
    pub total_ticks: AtomicU64,
    pub missed_deadlines: AtomicU64,
    pub invalid_intervals: AtomicU64,
    pub shutdown: AtomicBool,
}

impl ControlStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_ticks: AtomicU64::new(0),
            missed_deadlines: AtomicU64::new(0),
            invalid_intervals: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }
}

/// Control loop: consumes heading samples, runs the control law, and writes
/// the command to the actuator and back to the plant. Owns the controller;
/// mode transitions that reset/enable it are applied here.
pub fn spawn_control_thread<A>(
    mut controller: HeadingController,
    mut actuator: A,
    channels: SystemChannels,
    mode: ModeSwitch,
    diagnostic_log: DiagnosticLog,
    config: ConfigBuffer,
    metrics: TimingMetrics,
    dashboard: Dashboard,
) -> (thread::JoinHandle<()>, Arc<ControlStats>)
where
    A: Actuator + Send + 'static,
{
    let stats = ControlStats::new();
    let stats_clone = stats.clone();

    let handle = thread::spawn(move || {
        let started = Instant::now();
        let mut last_mode = Mode::Idle;
        let mut last_timestamp: Option<Instant> = None;
        let mut last_cmd = DriveCommand::zero();
        let mut was_at_setpoint = false;

        info!("control loop started");

        loop {
            if stats_clone.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let cfg = config.get();

            let current_mode = mode.get();
            if current_mode != last_mode {
                apply_controller_transition(&mut controller, current_mode);
                last_timestamp = None;
                was_at_setpoint = false;
                info!(
                    "controller {} on transition to {current_mode:?}",
                    if controller.is_enabled() { "enabled" } else { "disabled" }
                );
                last_mode = current_mode;
            }

            // Timeout keeps the shutdown flag observable even when the sampler
            // goes quiet.
            let sample = match channels.heading_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(s) => s,
                Err(crossbeam::channel::RecvTimeoutError::Timeout) => continue,
                Err(_) => {
                    diagnostic_log.write("[CONTROL] heading channel closed".to_string());
                    break;
                }
            };

            if current_mode == Mode::Test {
                // Tuning view: hold the drive and publish the controller
                // parameters alongside the live heading.
                let tuning = controller.config();
                dashboard.publish("tune_kp", tuning.kp);
                dashboard.publish("tune_ki", tuning.ki);
                dashboard.publish("tune_kd", tuning.kd);
                dashboard.publish("tune_setpoint_deg", tuning.setpoint_deg);
                dashboard.publish(HEADING_KEY, sample.heading_deg);
                actuator.drive(DriveCommand::zero());
                let _ = channels.command_tx.send(DriveCommand::zero());
                continue;
            }

            let dt = match last_timestamp {
                Some(prev) => sample.timestamp.duration_since(prev).as_secs_f64(),
                None => Duration::from_millis(cfg.loop_interval_ms).as_secs_f64(),
            };
            last_timestamp = Some(sample.timestamp);

            let tick_start = Instant::now();
            let cmd = match controller.tick(sample.heading_deg, dt) {
                Ok(cmd) => cmd,
                Err(err @ TickError::InvalidInterval { .. }) => {
                    // Recoverable: keep the previous command so the loop never
                    // stalls on one bad interval.
                    stats_clone.invalid_intervals.fetch_add(1, Ordering::Relaxed);
                    diagnostic_log.write(format!("[CONTROL] {err}, re-applying previous command"));
                    warn!("{err}");
                    last_cmd
                }
            };
            let tick_elapsed = tick_start.elapsed();
            metrics.record_tick(tick_elapsed, (cfg.tick_deadline_ms * 1_000_000.0) as u64);
            if tick_elapsed.as_secs_f64() * 1000.0 > cfg.tick_deadline_ms {
                stats_clone.missed_deadlines.fetch_add(1, Ordering::Relaxed);
            }

            actuator.drive(cmd);
            // Plant may already be gone during shutdown; not an error here.
            let _ = channels.command_tx.send(cmd);
            last_cmd = cmd;

            dashboard.publish(HEADING_KEY, sample.heading_deg);
            dashboard.publish(OUTPUT_KEY, cmd.value());
            dashboard.record_trace(TraceRow {
                elapsed_secs: started.elapsed().as_secs_f64(),
                heading_deg: sample.heading_deg,
                output: cmd.value(),
            });

            let now_at_setpoint = controller.at_setpoint();
            if now_at_setpoint != was_at_setpoint {
                if now_at_setpoint {
                    info!(
                        "heading settled within tolerance at {:.1} deg",
                        sample.heading_deg
                    );
                } else {
                    info!("heading left the tolerance band");
                }
                was_at_setpoint = now_at_setpoint;
            }

            metrics.record_e2e(sample.timestamp.elapsed());
            stats_clone.total_ticks.fetch_add(1, Ordering::Relaxed);
        }

        info!("control loop stopped");
    });

    (handle, stats)
}
