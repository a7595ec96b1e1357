use criterion::{criterion_group, criterion_main, Criterion};

use heading_hold::{GyroParams, HeadingConfig, HeadingController, SimulatedGyro};

fn benchmark_gyro_sample(c: &mut Criterion) {
    let mut gyro = SimulatedGyro::new(42, GyroParams::default());
    c.bench_function("gyro_sample", |b| b.iter(|| gyro.sample()));
}

fn benchmark_controller_tick(c: &mut Criterion) {
    let mut ctl = HeadingController::new(HeadingConfig {
        setpoint_deg: -90.0,
        tolerance_pct: 3.0,
        output_min: -0.75,
        output_max: 0.75,
        kp: 0.2,
        ki: 0.001,
        kd: 0.003,
    })
    .expect("config should be valid");
    ctl.enable();

    c.bench_function("heading_tick", |b| b.iter(|| ctl.tick(-45.0, 0.02)));
}

criterion_group!(benches, benchmark_gyro_sample, benchmark_controller_tick);
criterion_main!(benches);
