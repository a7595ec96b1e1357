//! Gyro simulation - seeded heading sensor over a rotating plant

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actuator::drive::DriveCommand;

#[derive(Debug, Clone, Copy)]
pub struct HeadingSample {
    pub timestamp: Instant,
    pub heading_deg: f64,
    pub sequence_id: u64,
}

/// Accumulated-heading sensor: a signed angle in degrees that keeps growing
/// past +-360 and re-zeroes only on `reset`.
pub trait HeadingSensor {
    fn read(&self) -> f64;
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy)]
pub struct GyroParams {
    /// Chassis rotation rate at full command, in degrees per second.
    pub max_slew_dps: f64,
    /// Uniform measurement noise amplitude in degrees.
    pub noise_amplitude_deg: f64,
    /// Constant drift rate in degrees per second.
    pub drift_dps: f64,
}

impl Default for GyroParams {
    fn default() -> Self {
        Self {
            max_slew_dps: 180.0,
            noise_amplitude_deg: 0.25,
            drift_dps: 0.02,
        }
    }
}

/// Deterministic gyro-plus-plant model: integrates the applied drive command
/// into a true heading, then samples it with seeded measurement noise.
pub struct SimulatedGyro {
    rng: StdRng,
    params: GyroParams,
    heading_deg: f64,
    sequence_counter: u64,
}

impl SimulatedGyro {
    pub fn new(seed: u64, params: GyroParams) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            params,
            heading_deg: 0.0,
            sequence_counter: 0,
        }
    }

    /// Integrates the chassis rotation produced by `cmd` over `dt` seconds,
    /// plus the configured drift.
    pub fn apply_command(&mut self, cmd: &DriveCommand, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.heading_deg += cmd.value() * self.params.max_slew_dps * dt;
        self.heading_deg += self.params.drift_dps * dt;
    }

    /// Kicks the true heading, e.g. a bump or wheel slip.
    pub fn inject_disturbance(&mut self, delta_deg: f64) {
        self.heading_deg += delta_deg;
    }

    pub fn sample(&mut self) -> HeadingSample {
        self.sequence_counter += 1;
        let noise = if self.params.noise_amplitude_deg > 0.0 {
            self.rng
                .gen_range(-self.params.noise_amplitude_deg..self.params.noise_amplitude_deg)
        } else {
            0.0
        };

        HeadingSample {
            timestamp: Instant::now(),
            heading_deg: self.heading_deg + noise,
            sequence_id: self.sequence_counter,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence_counter
    }
}

impl HeadingSensor for SimulatedGyro {
    fn read(&self) -> f64 {
        self.heading_deg
    }

    fn reset(&mut self) {
        self.heading_deg = 0.0;
    }
}
