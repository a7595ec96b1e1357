use std::sync::atomic::Ordering;
use std::time::Duration;

use log::info;

use heading_hold::benchmark::analysis::render_heading_chart;
use heading_hold::benchmark::metrics::TimingMetrics;
use heading_hold::threaded_impl::{control_thread, gyro_thread};
use heading_hold::{
    load_config, ConfigBuffer, Dashboard, DiagnosticLog, DifferentialDrive, HeadingController,
    Mode, ModeSwitch, SimulatedGyro, SystemChannels, HEADING_KEY, OUTPUT_KEY,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("===========================================");
    println!("Starting Gyro Heading-Hold Demo");
    println!("===========================================\n");

    let file_cfg = load_config("config/heading.toml");

    let cfg_buf = ConfigBuffer::new();
    cfg_buf.update(|config| {
        config.loop_interval_ms = file_cfg.loop_interval_ms;
        config.tick_deadline_ms = file_cfg.tick_deadline_ms;
        config.filter_window = file_cfg.filter_window;
        config.fault_rate_limit_dps = file_cfg.fault_rate_limit_dps;
        config.fail_safe_enabled = file_cfg.fail_safe_enabled;
    });

    let channels = SystemChannels::new(256);
    let diagnostic_log = DiagnosticLog::new(2000);
    let metrics = TimingMetrics::new();
    let dashboard = Dashboard::new(4096);
    let mode = ModeSwitch::new();

    // Malformed controller settings can never produce a valid command, so
    // they are fatal here rather than inside the loop.
    let controller = HeadingController::new(file_cfg.controller())?;
    let gyro = SimulatedGyro::new(file_cfg.gyro_seed, file_cfg.gyro_params());
    let drive = DifferentialDrive::new(file_cfg.invert_rotation);

    let (gyro_handle, sampler_stats) = gyro_thread::spawn_gyro_thread(
        gyro,
        channels.clone(),
        mode.clone(),
        diagnostic_log.clone(),
        cfg_buf.clone(),
        metrics.clone(),
    );
    let (control_handle, control_stats) = control_thread::spawn_control_thread(
        controller,
        drive,
        channels.clone(),
        mode.clone(),
        diagnostic_log.clone(),
        cfg_buf.clone(),
        metrics.clone(),
        dashboard.clone(),
    );

    info!("arming: switching to active mode");
    mode.set(Mode::Active);

    println!(
        "Holding {:.0} deg for {} seconds...\n",
        file_cfg.setpoint_deg, file_cfg.run_secs
    );
    std::thread::sleep(Duration::from_secs(file_cfg.run_secs));

    mode.set(Mode::Idle);
    sampler_stats.shutdown.store(true, Ordering::Relaxed);
    control_stats.shutdown.store(true, Ordering::Relaxed);
    let _ = gyro_handle.join();
    let _ = control_handle.join();

    let total_ticks = control_stats.total_ticks.load(Ordering::Relaxed);
    let missed = control_stats.missed_deadlines.load(Ordering::Relaxed);
    let compliance = if total_ticks > 0 {
        ((total_ticks - missed) as f64 / total_ticks as f64) * 100.0
    } else {
        100.0
    };

    println!("\n===========================================");
    println!("FINAL HEADING-HOLD RESULTS");
    println!("===========================================");
    println!("Setpoint: {:.1} deg", file_cfg.setpoint_deg);
    println!(
        "Final heading: {:.2} deg",
        dashboard.get(HEADING_KEY).unwrap_or(f64::NAN)
    );
    println!(
        "Final output: {:.4}",
        dashboard.get(OUTPUT_KEY).unwrap_or(f64::NAN)
    );
    println!(
        "Sampler cycles: {}",
        sampler_stats.total_cycles.load(Ordering::Relaxed)
    );
    println!(
        "Gyro faults: {} ({} samples dropped)",
        sampler_stats.faults.load(Ordering::Relaxed),
        sampler_stats.dropped_samples.load(Ordering::Relaxed)
    );
    println!("Control ticks: {}", total_ticks);
    println!("Deadline compliance: {:.2}% ({} missed)", compliance, missed);
    println!(
        "Invalid intervals: {}",
        control_stats.invalid_intervals.load(Ordering::Relaxed)
    );

    let report = metrics.report();
    println!("\n=== Loop Timing ===");
    println!("Sample P50: {:?}, P99: {:?}", report.sample_p50, report.sample_p99);
    println!("Tick P50: {:?}, P99: {:?}", report.tick_p50, report.tick_p99);
    println!("E2E P50: {:?}, P99: {:?}", report.e2e_p50, report.e2e_p99);
    println!("Cycle jitter P99: {:?}", report.jitter_p99);

    let recent = diagnostic_log.read_all();
    if !recent.is_empty() {
        println!("\n=== Last Diagnostics ===");
        for line in recent.iter().rev().take(5).rev() {
            println!("{line}");
        }
    }

    render_heading_chart(
        &dashboard.trace(),
        file_cfg.setpoint_deg,
        "heading_response.png",
    )?;
    println!("\nWrote heading_response.png");

    Ok(())
}
