//! Telemetry sink - named numeric readings for a dashboard

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const HEADING_KEY: &str = "heading_deg";
pub const OUTPUT_KEY: &str = "applied_output";

/// Observability boundary: the control loop publishes two readings per tick
/// (current heading and applied output); nothing reads them back into the
/// control path.
pub trait TelemetrySink {
    fn publish(&self, name: &str, value: f64);
}

#[derive(Debug, Clone, Copy)]
pub struct TraceRow {
    pub elapsed_secs: f64,
    pub heading_deg: f64,
    pub output: f64,
}

/// In-process dashboard: latest value per name, plus a bounded trace of the
/// run used for the response chart.
#[derive(Clone)]
pub struct Dashboard {
    values: Arc<RwLock<HashMap<String, f64>>>,
    trace: Arc<RwLock<VecDeque<TraceRow>>>,
    max_rows: usize,
}

impl Dashboard {
    pub fn new(max_rows: usize) -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            trace: Arc::new(RwLock::new(VecDeque::with_capacity(max_rows))),
            max_rows,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.read().get(name).copied()
    }

    pub fn record_trace(&self, row: TraceRow) {
        let mut trace = self.trace.write();
        trace.push_back(row);
        if trace.len() > self.max_rows {
            trace.pop_front();
        }
    }

    pub fn trace(&self) -> Vec<TraceRow> {
        self.trace.read().iter().copied().collect()
    }
}

impl TelemetrySink for Dashboard {
    fn publish(&self, name: &str, value: f64) {
        self.values.write().insert(name.to_string(), value);
    }
}
