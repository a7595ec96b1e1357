use tokio::time::{interval, Duration};

use std::time::Instant;

use crate::actuator::drive::DriveCommand;
use crate::benchmark::metrics::TimingMetrics;
use crate::ipc::channels::SystemChannels;
use crate::sensor::filter::MovingAverageFilter;
use crate::sensor::gyro::SimulatedGyro;

/// Async variant of the sampling loop. Leaner than the threaded one: no mode
/// machine or fault gating, just plant integration, smoothing, and send.
pub async fn gyro_task(
    mut gyro: SimulatedGyro,
    channels: SystemChannels,
    metrics: TimingMetrics,
    loop_interval: Duration,
) {
    let mut filter = MovingAverageFilter::new(5);
    let mut interval_timer = interval(loop_interval);
    let mut last_cmd = DriveCommand::zero();
    let mut last_cycle = Instant::now();

    loop {
        interval_timer.tick().await;

        let now = Instant::now();
        let dt = now.duration_since(last_cycle).as_secs_f64();
        last_cycle = now;

        while let Ok(cmd) = channels.command_rx.try_recv() {
            last_cmd = cmd;
        }
        gyro.apply_command(&last_cmd, dt);

        let sample_start = Instant::now();
        let raw = gyro.sample();
        metrics.record_sample(sample_start.elapsed());

        let smoothed = filter.apply(raw);
        if channels.heading_tx.send(smoothed).is_err() {
            break;
        }
    }
}
