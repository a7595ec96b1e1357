//! Heading controller - PID control law with output clamping and anti-windup

use thiserror::Error;

use crate::actuator::drive::DriveCommand;

// Absolute tolerance band, in degrees, used when the setpoint is zero and a
// percent tolerance would collapse to nothing.
const ZERO_SETPOINT_BAND_DEG: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid output range: min {min} must be below max {max}")]
    InvalidOutputRange { min: f64, max: f64 },
    #[error("tolerance must be a non-negative percentage, got {0}")]
    InvalidTolerance(f64),
    #[error("gains must be finite: kp={kp} ki={ki} kd={kd}")]
    NonFiniteGain { kp: f64, ki: f64, kd: f64 },
}

#[derive(Debug, Error)]
pub enum TickError {
    #[error("control interval must be positive and finite, got {dt}")]
    InvalidInterval { dt: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct HeadingConfig {
    pub setpoint_deg: f64,
    pub tolerance_pct: f64,
    pub output_min: f64,
    pub output_max: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// Drives an accumulated gyro heading toward a fixed setpoint with a
/// rotation-only differential-drive command.
///
/// The controller starts disabled. While disabled, `tick` returns a zero
/// command and the accumulators are frozen, so a later `enable` resumes from
/// the same state. `reset` clears the accumulators explicitly.
pub struct HeadingController {
    cfg: HeadingConfig,

    // Accumulators
    integral: f64,
    prev_error: f64,
    last_error: Option<f64>,

    enabled: bool,
}

impl HeadingController {
    pub fn new(cfg: HeadingConfig) -> Result<Self, ConfigError> {
        if !cfg.output_min.is_finite()
            || !cfg.output_max.is_finite()
            || cfg.output_min >= cfg.output_max
        {
            return Err(ConfigError::InvalidOutputRange {
                min: cfg.output_min,
                max: cfg.output_max,
            });
        }
        if !cfg.tolerance_pct.is_finite() || cfg.tolerance_pct < 0.0 {
            return Err(ConfigError::InvalidTolerance(cfg.tolerance_pct));
        }
        if !cfg.kp.is_finite() || !cfg.ki.is_finite() || !cfg.kd.is_finite() {
            return Err(ConfigError::NonFiniteGain {
                kp: cfg.kp,
                ki: cfg.ki,
                kd: cfg.kd,
            });
        }

        Ok(Self {
            cfg,
            integral: 0.0,
            prev_error: 0.0,
            last_error: None,
            enabled: false,
        })
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Zeroes the integrator and the error memory.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
        self.last_error = None;
    }

    /// Runs one step of the control law.
    ///
    /// `dt` must be positive and finite; a bad interval is reported as
    /// `InvalidInterval` without touching the accumulators, so the caller can
    /// skip the tick or re-apply the previous command and keep the loop
    /// running.
    pub fn tick(&mut self, current_heading_deg: f64, dt: f64) -> Result<DriveCommand, TickError> {
        if !self.enabled {
            return Ok(DriveCommand::zero());
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TickError::InvalidInterval { dt });
        }

        let error = self.cfg.setpoint_deg - current_heading_deg;
        let integral_candidate = self.integral + error * dt;
        let derivative = (error - self.prev_error) / dt;

        let raw = self.cfg.kp * error
            + self.cfg.ki * integral_candidate
            + self.cfg.kd * derivative;
        let output = raw.clamp(self.cfg.output_min, self.cfg.output_max);

        // Conditional integration: once the output saturates, increments that
        // push the integral further into the saturated direction are dropped.
        let deepens_saturation = (raw > self.cfg.output_max && error > 0.0)
            || (raw < self.cfg.output_min && error < 0.0);
        if !deepens_saturation {
            self.integral = integral_candidate;
        }

        self.prev_error = error;
        self.last_error = Some(error);

        Ok(DriveCommand::rotation(output))
    }

    /// True once the most recent error is inside the tolerance band. Before
    /// the first tick (or after a reset) there is no error to judge, so this
    /// reports false.
    pub fn at_setpoint(&self) -> bool {
        let Some(error) = self.last_error else {
            return false;
        };
        let band = if self.cfg.setpoint_deg == 0.0 {
            ZERO_SETPOINT_BAND_DEG
        } else {
            self.cfg.tolerance_pct / 100.0 * self.cfg.setpoint_deg.abs()
        };
        error.abs() <= band
    }

    pub fn set_setpoint(&mut self, setpoint_deg: f64) {
        self.cfg.setpoint_deg = setpoint_deg;
    }

    pub fn setpoint_deg(&self) -> f64 {
        self.cfg.setpoint_deg
    }

    pub fn last_error(&self) -> Option<f64> {
        self.last_error
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn config(&self) -> HeadingConfig {
        self.cfg
    }
}
