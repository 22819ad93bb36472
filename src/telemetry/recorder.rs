//! Timestamping and gap filling for the rolling window.
//!
//! The controller reports at a fixed cadence. When it goes quiet the chart
//! should keep scrolling rather than freeze, so the recorder pads the window
//! with "hold" samples that repeat the last reading at the expected times.

use std::time::{Duration, Instant};

use super::frame::TelemetryFrame;
use super::window::{RollingWindow, Sample};

/// Feeds readings into a [`RollingWindow`] on a time axis anchored at the
/// first reading.
#[derive(Debug, Clone)]
pub struct Recorder {
    window: RollingWindow,
    interval: Duration,
    origin: Option<Instant>,
    last_update: Option<Instant>,
    last_values: Option<(f64, f64)>,
}

impl Recorder {
    /// Create a recorder holding `capacity` samples spaced `interval` apart.
    pub fn new(capacity: usize, interval: Duration) -> Self {
        Self {
            window: RollingWindow::with_capacity(capacity),
            interval,
            origin: None,
            last_update: None,
            last_values: None,
        }
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the first reading arrived (the chart's time zero).
    pub fn first_reading_at(&self) -> Option<Instant> {
        self.origin
    }

    /// Record a real reading.
    ///
    /// A reading stamped earlier than the previous sample is moved up to it,
    /// keeping the series monotonic.
    pub fn record(&mut self, received_at: Instant, frame: &TelemetryFrame) {
        let origin = *self.origin.get_or_insert(received_at);
        let at = match self.last_update {
            Some(last) if received_at < last => last,
            _ => received_at,
        };

        self.window.push(Sample {
            t: at.saturating_duration_since(origin).as_secs_f64(),
            pressure: frame.pressure,
            temperature: frame.temperature,
        });
        self.last_update = Some(at);
        self.last_values = Some((frame.pressure, frame.temperature));
    }

    /// Pad the window with hold samples up to `now`.
    ///
    /// Returns the number of samples added. Gaps longer than the window only
    /// generate the samples that would still be visible.
    pub fn fill_gaps(&mut self, now: Instant) -> usize {
        let (Some(origin), Some(mut last), Some((pressure, temperature))) =
            (self.origin, self.last_update, self.last_values)
        else {
            return 0;
        };

        let step = self.interval.as_nanos();
        if step == 0 {
            return 0;
        }

        let behind = now.saturating_duration_since(last).as_nanos();
        let mut missing = behind / step;
        if missing == 0 {
            return 0;
        }

        let capacity = self.window.capacity() as u128;
        if missing > capacity {
            let skipped = (missing - capacity) * step;
            last += Duration::from_nanos(u64::try_from(skipped).unwrap_or(u64::MAX));
            missing = capacity;
        }

        for _ in 0..missing {
            last += self.interval;
            self.window.push(Sample {
                t: last.saturating_duration_since(origin).as_secs_f64(),
                pressure,
                temperature,
            });
        }
        self.last_update = Some(last);

        missing as usize
    }

    /// Right-hand padding of the time axis: two sample intervals, in seconds.
    pub fn margin(&self) -> f64 {
        self.interval.as_secs_f64() * 2.0
    }

    /// X-axis bounds of the window with [`margin`](Self::margin) on the right.
    pub fn time_bounds(&self) -> [f64; 2] {
        self.window.time_bounds(self.margin())
    }

    /// Drop all plotted samples. The time origin is kept.
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pressure: f64, temperature: f64) -> TelemetryFrame {
        let mut frame = TelemetryFrame::parse(crate::telemetry::frame::sample_line()).unwrap();
        frame.pressure = pressure;
        frame.temperature = temperature;
        frame
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_reading_anchors_time_zero() {
        let start = Instant::now();
        let mut recorder = Recorder::new(200, ms(100));

        recorder.record(start, &frame(300.0, 150.0));
        recorder.record(start + ms(100), &frame(305.0, 151.0));

        assert_eq!(recorder.first_reading_at(), Some(start));
        let points = recorder.window().pressure_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], (0.0, 300.0));
        assert!((points[1].0 - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_fill_gaps_before_first_reading_is_noop() {
        let mut recorder = Recorder::new(200, ms(100));
        assert_eq!(recorder.fill_gaps(Instant::now() + ms(1000)), 0);
        assert!(recorder.window().is_empty());
    }

    #[test]
    fn test_fill_gaps_repeats_last_reading() {
        let start = Instant::now();
        let mut recorder = Recorder::new(200, ms(100));
        recorder.record(start, &frame(320.0, 155.0));

        // 350ms of silence -> three hold samples at 0.1, 0.2, 0.3
        let added = recorder.fill_gaps(start + ms(350));
        assert_eq!(added, 3);

        let samples: Vec<Sample> = recorder.window().iter().copied().collect();
        assert_eq!(samples.len(), 4);
        for (i, s) in samples.iter().enumerate() {
            assert!((s.t - i as f64 * 0.1).abs() < 1e-9);
            assert_eq!(s.pressure, 320.0);
            assert_eq!(s.temperature, 155.0);
        }

        // Not enough time for another interval yet
        assert_eq!(recorder.fill_gaps(start + ms(399)), 0);
        assert_eq!(recorder.fill_gaps(start + ms(400)), 1);
    }

    #[test]
    fn test_fill_gaps_within_interval_adds_nothing() {
        let start = Instant::now();
        let mut recorder = Recorder::new(200, ms(100));
        recorder.record(start, &frame(320.0, 155.0));
        assert_eq!(recorder.fill_gaps(start + ms(99)), 0);
        assert_eq!(recorder.window().len(), 1);
    }

    #[test]
    fn test_long_gap_is_bounded_by_capacity() {
        let start = Instant::now();
        let mut recorder = Recorder::new(10, ms(100));
        recorder.record(start, &frame(320.0, 155.0));

        // An hour of silence only generates what fits in the window
        let added = recorder.fill_gaps(start + Duration::from_secs(3600));
        assert_eq!(added, 10);
        assert_eq!(recorder.window().len(), 10);

        let latest = recorder.window().latest().unwrap();
        assert!((latest.t - 3600.0).abs() < 1e-6);
        let first = recorder.window().iter().next().unwrap();
        assert!((first.t - 3599.1).abs() < 1e-6);
    }

    #[test]
    fn test_late_reading_is_kept_monotonic() {
        let start = Instant::now();
        let mut recorder = Recorder::new(200, ms(100));
        recorder.record(start, &frame(300.0, 150.0));
        recorder.fill_gaps(start + ms(300));

        // Stamped before the last hold sample
        recorder.record(start + ms(250), &frame(310.0, 152.0));

        let times: Vec<f64> = recorder.window().iter().map(|s| s.t).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(recorder.window().latest().unwrap().pressure, 310.0);
    }

    #[test]
    fn test_time_bounds_margin() {
        let start = Instant::now();
        let mut recorder = Recorder::new(200, ms(100));
        assert!((recorder.margin() - 0.2).abs() < 1e-12);
        assert_eq!(recorder.time_bounds(), [0.0, 1.0]);

        recorder.record(start, &frame(300.0, 150.0));
        recorder.record(start + ms(1000), &frame(300.0, 150.0));
        let [lo, hi] = recorder.time_bounds();
        assert_eq!(lo, 0.0);
        assert!((hi - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_clear_keeps_origin() {
        let start = Instant::now();
        let mut recorder = Recorder::new(200, ms(100));
        recorder.record(start, &frame(300.0, 150.0));
        recorder.clear();

        assert!(recorder.window().is_empty());
        assert_eq!(recorder.first_reading_at(), Some(start));

        recorder.record(start + ms(500), &frame(300.0, 150.0));
        assert!((recorder.window().latest().unwrap().t - 0.5).abs() < 1e-9);
    }
}
