use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;

// Shared diagnostic log, bounded so a chatty loop cannot grow it unboundedly
#[derive(Clone)]
pub struct DiagnosticLog {
    entries: Arc<RwLock<VecDeque<String>>>,
    max_size: usize,
}

impl DiagnosticLog {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(max_size))),
            max_size,
        }
    }

    pub fn write(&self, message: String) {
        let mut log = self.entries.write();
        log.push_back(message);
        if log.len() > self.max_size {
            log.pop_front();
        }
    }

    pub fn read_all(&self) -> Vec<String> {
        self.entries.read().iter().cloned().collect()
    }
}

// Live loop parameters, shared between the composition root and both loops
#[derive(Clone, Debug)]
pub struct LoopConfig {
    pub loop_interval_ms: u64,
    pub tick_deadline_ms: f64,
    pub filter_window: usize,
    pub fault_rate_limit_dps: f64,
    /// When set, samples that fail the plausibility check are dropped instead
    /// of being forwarded to the control loop.
    pub fail_safe_enabled: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: 20,
            tick_deadline_ms: 2.0,
            filter_window: 5,
            fault_rate_limit_dps: 720.0,
            fail_safe_enabled: false,
        }
    }
}

#[derive(Clone)]
pub struct ConfigBuffer {
    data: Arc<Mutex<LoopConfig>>,
}

impl ConfigBuffer {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(LoopConfig::default())),
        }
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut LoopConfig),
    {
        let mut config = self.data.lock();
        f(&mut *config);
    }

    pub fn get(&self) -> LoopConfig {
        self.data.lock().clone()
    }
}

impl Default for ConfigBuffer {
    fn default() -> Self {
        Self::new()
    }
}
