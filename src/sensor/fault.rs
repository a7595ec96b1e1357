use super::gyro::HeadingSample;

/// Flags heading slews no physical chassis could produce, which points at a
/// glitching gyro rather than real rotation.
pub struct RateFaultDetector {
    max_rate_dps: f64,
}

impl RateFaultDetector {
    pub fn new(max_rate_dps: f64) -> Self {
        Self { max_rate_dps }
    }

    pub fn check(&self, previous: &HeadingSample, current: &HeadingSample) -> Option<String> {
        let dt = current
            .timestamp
            .duration_since(previous.timestamp)
            .as_secs_f64();
        if dt <= 0.0 {
            return None;
        }

        let rate = ((current.heading_deg - previous.heading_deg) / dt).abs();
        if rate > self.max_rate_dps {
            return Some(format!(
                "implausible heading slew: {:.1} deg/s (limit {:.1} deg/s)",
                rate, self.max_rate_dps
            ));
        }
        None
    }
}
