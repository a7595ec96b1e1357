use std::time::{Duration, Instant};

use crate::actuator::drive::{Actuator, DriveCommand};
use crate::benchmark::metrics::TimingMetrics;
use crate::control::heading::HeadingController;
use crate::ipc::channels::SystemChannels;
use crate::telemetry::{Dashboard, TelemetrySink, HEADING_KEY, OUTPUT_KEY};

/// Async variant of the control loop. The caller enables the controller
/// before spawning; there is no mode machine on this path.
pub async fn control_task<A: Actuator>(
    mut controller: HeadingController,
    mut actuator: A,
    channels: SystemChannels,
    metrics: TimingMetrics,
    dashboard: Dashboard,
    loop_interval: Duration,
) {
    let mut last_timestamp: Option<Instant> = None;
    let mut last_cmd = DriveCommand::zero();

    loop {
        let sample = match channels.heading_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(s) => s,
            Err(crossbeam::channel::RecvTimeoutError::Timeout) => {
                tokio::task::yield_now().await;
                continue;
            }
            Err(_) => break,
        };

        let dt = match last_timestamp {
            Some(prev) => sample.timestamp.duration_since(prev).as_secs_f64(),
            None => loop_interval.as_secs_f64(),
        };
        last_timestamp = Some(sample.timestamp);

        let cmd = match controller.tick(sample.heading_deg, dt) {
            Ok(cmd) => cmd,
            Err(_) => last_cmd,
        };

        actuator.drive(cmd);
        let _ = channels.command_tx.send(cmd);
        last_cmd = cmd;

        dashboard.publish(HEADING_KEY, sample.heading_deg);
        dashboard.publish(OUTPUT_KEY, cmd.value());

        metrics.record_e2e(sample.timestamp.elapsed());
    }
}
