// Noise reduction over heading samples (moving average)
use std::collections::VecDeque;

use super::gyro::HeadingSample;

pub struct MovingAverageFilter {
    window: usize,
    buf: VecDeque<f64>,
    sum: f64,
}

impl MovingAverageFilter {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            buf: VecDeque::new(),
            sum: 0.0,
        }
    }

    pub fn apply(&mut self, sample: HeadingSample) -> HeadingSample {
        self.buf.push_back(sample.heading_deg);
        self.sum += sample.heading_deg;
        if self.buf.len() > self.window {
            if let Some(old) = self.buf.pop_front() {
                self.sum -= old;
            }
        }

        HeadingSample {
            heading_deg: self.sum / self.buf.len() as f64,
            ..sample
        }
    }

    // Must be called when the gyro is re-zeroed, or the window keeps dragging
    // pre-reset headings into the average.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.sum = 0.0;
    }
}
