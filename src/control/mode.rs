//! Operating-mode state machine, kept outside the controller

use parking_lot::RwLock;
use std::sync::Arc;

use super::heading::HeadingController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Active,
    Test,
}

/// Shared mode selector. The composition root sets it; the sampling and
/// control loops observe it and apply the transition on their own resources.
#[derive(Clone)]
pub struct ModeSwitch {
    inner: Arc<RwLock<Mode>>,
}

impl ModeSwitch {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Mode::Idle)),
        }
    }

    pub fn set(&self, mode: Mode) {
        *self.inner.write() = mode;
    }

    pub fn get(&self) -> Mode {
        *self.inner.read()
    }
}

impl Default for ModeSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a mode transition to the controller.
///
/// Entering Active starts a fresh control session; entering Idle pauses
/// without clearing the accumulators so the operator can resume; Test holds
/// the drive and is used for publishing tuning values.
pub fn apply_controller_transition(controller: &mut HeadingController, mode: Mode) {
    match mode {
        Mode::Active => {
            controller.reset();
            controller.enable();
        }
        Mode::Idle => {
            controller.disable();
        }
        Mode::Test => {
            controller.disable();
            controller.reset();
        }
    }
}
