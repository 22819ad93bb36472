//! Fixed-size rolling window of plotted samples.

use std::collections::VecDeque;

use serde::Serialize;

/// Upper bound on the slots reserved up front; larger windows grow on demand.
const INITIAL_RESERVE: usize = 1024;

/// One plotted point: seconds since the first reading plus the two charted channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub t: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Keeps the most recent `capacity` samples in arrival order.
///
/// Pushing into a full window evicts the oldest sample, so iteration is
/// always chronological and never exceeds the configured span.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl RollingWindow {
    /// Create an empty window. A capacity of zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(INITIAL_RESERVE)),
            capacity,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Pressure series as `(t, kPa)` pairs.
    pub fn pressure_points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.t, s.pressure)).collect()
    }

    /// Temperature series as `(t, °C)` pairs.
    pub fn temperature_points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.t, s.temperature)).collect()
    }

    /// X-axis bounds: the oldest sample on the left edge, the newest plus
    /// `margin` on the right. `[0, 1]` while empty.
    pub fn time_bounds(&self, margin: f64) -> [f64; 2] {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => [first.t, last.t + margin],
            _ => [0.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64) -> Sample {
        Sample {
            t,
            pressure: 300.0 + t,
            temperature: 150.0 + t,
        }
    }

    #[test]
    fn test_push_below_capacity() {
        let mut window = RollingWindow::with_capacity(4);
        window.push(sample(0.0));
        window.push(sample(0.1));

        assert_eq!(window.len(), 2);
        assert_eq!(window.latest().unwrap().t, 0.1);
        assert_eq!(window.pressure_points(), vec![(0.0, 300.0), (0.1, 300.1)]);
    }

    #[test]
    fn test_large_capacity_reserves_lazily() {
        let mut window = RollingWindow::with_capacity(usize::MAX / 2);
        assert_eq!(window.capacity(), usize::MAX / 2);
        assert!(window.samples.capacity() < 4 * INITIAL_RESERVE);

        window.push(sample(0.0));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut window = RollingWindow::with_capacity(3);
        for i in 0..5 {
            window.push(sample(i as f64));
        }

        assert_eq!(window.len(), 3);
        let times: Vec<f64> = window.iter().map(|s| s.t).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0]);
        assert_eq!(window.temperature_points()[0], (2.0, 152.0));
    }

    #[test]
    fn test_time_bounds() {
        let mut window = RollingWindow::with_capacity(200);
        assert_eq!(window.time_bounds(0.2), [0.0, 1.0]);

        window.push(sample(1.0));
        window.push(sample(3.0));
        assert_eq!(window.time_bounds(0.5), [1.0, 3.5]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut window = RollingWindow::with_capacity(0);
        window.push(sample(0.0));
        window.push(sample(1.0));
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.len(), 1);
        assert_eq!(window.latest().unwrap().t, 1.0);
    }

    #[test]
    fn test_clear() {
        let mut window = RollingWindow::with_capacity(2);
        window.push(sample(0.0));
        window.clear();
        assert!(window.is_empty());
        assert!(window.latest().is_none());
    }
}
