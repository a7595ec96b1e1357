use log::warn;
use serde::Deserialize;

use crate::control::heading::HeadingConfig;
use crate::sensor::gyro::GyroParams;

// ============================================================================
// CONFIG FILE LOADING
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    // Loop timing
    pub loop_interval_ms: u64,
    pub tick_deadline_ms: f64,
    pub run_secs: u64,

    // Controller
    pub setpoint_deg: f64,
    pub tolerance_pct: f64,
    pub output_min: f64,
    pub output_max: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    // Drivetrain
    pub invert_rotation: bool,

    // Sensor pipeline
    pub filter_window: usize,
    pub fault_rate_limit_dps: f64,
    pub fail_safe_enabled: bool,

    // Gyro simulation
    pub gyro_seed: u64,
    pub gyro_noise_deg: f64,
    pub gyro_drift_dps: f64,
    pub max_slew_dps: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: 20,
            tick_deadline_ms: 2.0,
            run_secs: 10,
            setpoint_deg: -90.0,
            tolerance_pct: 3.0,
            output_min: -0.75,
            output_max: 0.75,
            kp: 0.2,
            ki: 0.001,
            kd: 0.003,
            invert_rotation: false,
            filter_window: 5,
            fault_rate_limit_dps: 720.0,
            fail_safe_enabled: false,
            gyro_seed: 42,
            gyro_noise_deg: 0.25,
            gyro_drift_dps: 0.02,
            max_slew_dps: 180.0,
        }
    }
}

impl RuntimeConfig {
    pub fn controller(&self) -> HeadingConfig {
        HeadingConfig {
            setpoint_deg: self.setpoint_deg,
            tolerance_pct: self.tolerance_pct,
            output_min: self.output_min,
            output_max: self.output_max,
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
        }
    }

    pub fn gyro_params(&self) -> GyroParams {
        GyroParams {
            max_slew_dps: self.max_slew_dps,
            noise_amplitude_deg: self.gyro_noise_deg,
            drift_dps: self.gyro_drift_dps,
        }
    }
}

/// Loads the runtime configuration, falling back to the defaults when the
/// file is missing or malformed so the demo always starts.
pub fn load_config(path: &str) -> RuntimeConfig {
    match std::fs::read_to_string(path) {
        Ok(s) => toml::from_str::<RuntimeConfig>(&s).unwrap_or_else(|err| {
            warn!("config {path} failed to parse ({err}), using defaults");
            RuntimeConfig::default()
        }),
        Err(_) => RuntimeConfig::default(),
    }
}
