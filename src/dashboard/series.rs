// Bounded time-series storage for one dashboard channel.

use std::collections::VecDeque;

use serde::Serialize;

/// Samples retained per channel; the oldest entries drop first.
pub const SERIES_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Paired (time, value) history with ring-buffer semantics. The two
/// sequences always have equal length, and within one recording the times
/// are non-decreasing because appends come from a monotonic sampler.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    times: VecDeque<f64>,
    values: VecDeque<f64>,
    capacity: usize,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::with_capacity(SERIES_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: VecDeque::with_capacity(capacity),
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, t: f64, value: f64) {
        self.times.push_back(t);
        self.values.push_back(value);

        while self.times.len() > self.capacity {
            self.times.pop_front();
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Live min/max/mean over the current contents. `None` when empty.
    pub fn stats(&self) -> Option<SeriesStats> {
        if self.values.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in &self.values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        Some(SeriesStats {
            min,
            max,
            mean: sum / self.values.len() as f64,
        })
    }

    /// Copy of the retained history, oldest first.
    pub fn snapshot(&self) -> (Vec<f64>, Vec<f64>) {
        (
            self.times.iter().copied().collect(),
            self.values.iter().copied().collect(),
        )
    }
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::new()
    }
}
