//! Closed-loop tests: simulated robot, both loop runtimes

use std::sync::atomic::Ordering;
use std::time::Duration;

use heading_hold::async_impl::{control_task, gyro_task};
use heading_hold::benchmark::metrics::TimingMetrics;
use heading_hold::threaded_impl::{control_thread, gyro_thread};
use heading_hold::{
    ConfigBuffer, Dashboard, DiagnosticLog, DifferentialDrive, GyroParams, HeadingConfig,
    HeadingController, Mode, ModeSwitch, SimulatedGyro, SystemChannels, HEADING_KEY,
};

fn quiet_gyro(max_slew_dps: f64) -> SimulatedGyro {
    SimulatedGyro::new(
        1,
        GyroParams {
            max_slew_dps,
            noise_amplitude_deg: 0.0,
            drift_dps: 0.0,
        },
    )
}

fn hold_minus_ninety() -> HeadingController {
    HeadingController::new(HeadingConfig {
        setpoint_deg: -90.0,
        tolerance_pct: 3.0,
        output_min: -0.75,
        output_max: 0.75,
        kp: 0.2,
        ki: 0.001,
        kd: 0.0,
    })
    .expect("config should be valid")
}

#[test]
fn threaded_loop_converges_to_setpoint() {
    let cfg_buf = ConfigBuffer::new();
    cfg_buf.update(|config| {
        config.loop_interval_ms = 5;
        config.filter_window = 1;
    });

    let channels = SystemChannels::new(256);
    let diagnostic_log = DiagnosticLog::new(100);
    let metrics = TimingMetrics::new();
    let dashboard = Dashboard::new(4096);
    let mode = ModeSwitch::new();

    let (gyro_handle, sampler_stats) = gyro_thread::spawn_gyro_thread(
        quiet_gyro(360.0),
        channels.clone(),
        mode.clone(),
        diagnostic_log.clone(),
        cfg_buf.clone(),
        metrics.clone(),
    );
    let (control_handle, control_stats) = control_thread::spawn_control_thread(
        hold_minus_ninety(),
        DifferentialDrive::new(false),
        channels.clone(),
        mode.clone(),
        diagnostic_log.clone(),
        cfg_buf.clone(),
        metrics.clone(),
        dashboard.clone(),
    );

    mode.set(Mode::Active);
    std::thread::sleep(Duration::from_secs(2));
    mode.set(Mode::Idle);

    sampler_stats.shutdown.store(true, Ordering::Relaxed);
    control_stats.shutdown.store(true, Ordering::Relaxed);
    let _ = gyro_handle.join();
    let _ = control_handle.join();

    let final_heading = dashboard.get(HEADING_KEY).expect("heading was published");
    assert!(
        (final_heading - -90.0).abs() < 3.0,
        "robot should settle near -90 deg, ended at {final_heading}"
    );
    assert!(control_stats.total_ticks.load(Ordering::Relaxed) > 100);
    assert_eq!(control_stats.invalid_intervals.load(Ordering::Relaxed), 0);
}

#[test]
fn fail_safe_drops_glitched_samples() {
    let cfg_buf = ConfigBuffer::new();
    cfg_buf.update(|config| {
        config.loop_interval_ms = 2;
        config.filter_window = 1;
        config.fault_rate_limit_dps = 720.0;
        config.fail_safe_enabled = true;
    });

    // Noise far beyond anything a chassis can rotate between samples.
    let noisy_gyro = SimulatedGyro::new(
        3,
        GyroParams {
            max_slew_dps: 180.0,
            noise_amplitude_deg: 400.0,
            drift_dps: 0.0,
        },
    );

    let channels = SystemChannels::new(256);
    let diagnostic_log = DiagnosticLog::new(100);
    let metrics = TimingMetrics::new();
    let dashboard = Dashboard::new(256);
    let mode = ModeSwitch::new();

    let (gyro_handle, sampler_stats) = gyro_thread::spawn_gyro_thread(
        noisy_gyro,
        channels.clone(),
        mode.clone(),
        diagnostic_log.clone(),
        cfg_buf.clone(),
        metrics.clone(),
    );
    let (control_handle, control_stats) = control_thread::spawn_control_thread(
        hold_minus_ninety(),
        DifferentialDrive::new(false),
        channels.clone(),
        mode.clone(),
        diagnostic_log.clone(),
        cfg_buf.clone(),
        metrics.clone(),
        dashboard.clone(),
    );

    mode.set(Mode::Active);
    std::thread::sleep(Duration::from_millis(500));

    sampler_stats.shutdown.store(true, Ordering::Relaxed);
    control_stats.shutdown.store(true, Ordering::Relaxed);
    let _ = gyro_handle.join();
    let _ = control_handle.join();

    assert!(
        sampler_stats.faults.load(Ordering::Relaxed) > 0,
        "glitched samples should be flagged"
    );
    assert!(
        sampler_stats.dropped_samples.load(Ordering::Relaxed) > 0,
        "fail-safe should drop flagged samples"
    );
    assert!(!diagnostic_log.read_all().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_loop_converges_to_setpoint() {
    let channels = SystemChannels::new(256);
    let metrics = TimingMetrics::new();
    let dashboard = Dashboard::new(4096);

    let mut controller = hold_minus_ninety();
    controller.enable();

    tokio::spawn(gyro_task::gyro_task(
        quiet_gyro(360.0),
        channels.clone(),
        metrics.clone(),
        Duration::from_millis(5),
    ));
    tokio::spawn(control_task::control_task(
        controller,
        DifferentialDrive::new(false),
        channels.clone(),
        metrics.clone(),
        dashboard.clone(),
        Duration::from_millis(5),
    ));

    tokio::time::sleep(Duration::from_secs(2)).await;

    let final_heading = dashboard.get(HEADING_KEY).expect("heading was published");
    assert!(
        (final_heading - -90.0).abs() < 3.0,
        "robot should settle near -90 deg, ended at {final_heading}"
    );
}
