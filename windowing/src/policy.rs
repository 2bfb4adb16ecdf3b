use std::collections::VecDeque;

use crate::{WindowError, WindowOptions};

/// Point-in-time view of a [`PerformancePolicy`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceSnapshot {
    /// `None` until the first counting window completes.
    pub estimated_fps: Option<f64>,
    pub is_lagging: bool,
    /// Mean of the recent frame durations, if any were recorded.
    pub average_frame_ms: Option<f64>,
    /// Whether virtualization has been switched on for this session.
    pub activated: bool,
}

/// Estimates frame rate from host-reported frame timestamps and decides whether a surface
/// should be virtualized.
///
/// Activation is one-way: once [`PerformancePolicy::should_virtualize`] has answered `true`, it
/// keeps answering `true` for the rest of the session, even if the frame rate recovers.
#[derive(Clone, Debug)]
pub struct PerformancePolicy {
    fps_threshold: f64,
    window_ms: u64,
    window_start_ms: Option<u64>,
    frames_in_window: u64,
    last_frame_ms: Option<u64>,
    recent_frames: VecDeque<u64>,
    recent_capacity: usize,
    estimated_fps: Option<f64>,
    activated: bool,
}

impl PerformancePolicy {
    pub fn new(fps_threshold: f64) -> Result<Self, WindowError> {
        let options = WindowOptions::default().with_fps_threshold(fps_threshold);
        Self::from_options(&options)
    }

    pub fn from_options(options: &WindowOptions) -> Result<Self, WindowError> {
        options.validate()?;
        Ok(Self {
            fps_threshold: options.fps_threshold,
            window_ms: options.fps_sample_window_ms,
            window_start_ms: None,
            frames_in_window: 0,
            last_frame_ms: None,
            recent_frames: VecDeque::with_capacity(options.recent_frame_capacity),
            recent_capacity: options.recent_frame_capacity,
            estimated_fps: None,
            activated: false,
        })
    }

    pub fn fps_threshold(&self) -> f64 {
        self.fps_threshold
    }

    /// Records that a frame was produced at `now_ms`.
    ///
    /// The first frame opens a counting window. Once at least one window length has elapsed,
    /// `estimated_fps = frames * 1000 / elapsed_ms` is computed, returned, and a new window
    /// starts at `now_ms`.
    pub fn record_frame(&mut self, now_ms: u64) -> Option<f64> {
        if let Some(last) = self.last_frame_ms {
            if self.recent_capacity > 0 {
                if self.recent_frames.len() == self.recent_capacity {
                    self.recent_frames.pop_front();
                }
                self.recent_frames.push_back(now_ms.saturating_sub(last));
            }
        }
        self.last_frame_ms = Some(now_ms);

        let Some(start) = self.window_start_ms else {
            self.window_start_ms = Some(now_ms);
            self.frames_in_window = 0;
            return None;
        };

        self.frames_in_window += 1;
        let elapsed = now_ms.saturating_sub(start);
        if elapsed == 0 || elapsed < self.window_ms {
            return None;
        }

        let fps = self.frames_in_window as f64 * 1000.0 / elapsed as f64;
        wdebug!(
            fps,
            frames = self.frames_in_window,
            elapsed_ms = elapsed,
            "PerformancePolicy: window complete"
        );
        self.estimated_fps = Some(fps);
        self.window_start_ms = Some(now_ms);
        self.frames_in_window = 0;
        Some(fps)
    }

    pub fn estimated_fps(&self) -> Option<f64> {
        self.estimated_fps
    }

    /// `true` when the latest estimate is below the configured threshold.
    pub fn is_lagging(&self) -> bool {
        self.estimated_fps.is_some_and(|fps| fps < self.fps_threshold)
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn average_frame_ms(&self) -> Option<f64> {
        if self.recent_frames.is_empty() {
            return None;
        }
        let sum: u64 = self.recent_frames.iter().sum();
        Some(sum as f64 / self.recent_frames.len() as f64)
    }

    /// Decides whether to virtualize a collection of `item_count` items.
    ///
    /// `true` when the collection exceeds `auto_threshold`, when the surface is lagging, or when
    /// activation was already raised. Any `true` answer raises activation for the session.
    pub fn should_virtualize(&mut self, item_count: usize, auto_threshold: usize) -> bool {
        if self.activated {
            return true;
        }
        let by_count = item_count > auto_threshold;
        let by_lag = self.is_lagging();
        if by_count || by_lag {
            wdebug!(
                item_count,
                auto_threshold,
                by_count,
                by_lag,
                "PerformancePolicy: activation raised"
            );
            self.activated = true;
        }
        self.activated
    }

    pub fn snapshot(&self) -> PerformanceSnapshot {
        PerformanceSnapshot {
            estimated_fps: self.estimated_fps,
            is_lagging: self.is_lagging(),
            average_frame_ms: self.average_frame_ms(),
            activated: self.activated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(policy: &mut PerformancePolicy, start_ms: u64, frame_ms: u64, frames: u64) -> u64 {
        let mut now = start_ms;
        for _ in 0..frames {
            policy.record_frame(now);
            now += frame_ms;
        }
        now - frame_ms
    }

    #[test]
    fn no_estimate_before_a_full_window() {
        let mut p = PerformancePolicy::new(30.0).unwrap();
        feed(&mut p, 0, 16, 50);
        assert_eq!(p.estimated_fps(), None);
        assert!(!p.is_lagging());
    }

    #[test]
    fn estimate_is_frames_per_elapsed_second() {
        let mut p = PerformancePolicy::new(30.0).unwrap();
        // Opens the window at 0, then 20 frames 50ms apart: 20 frames over 1000ms.
        feed(&mut p, 0, 50, 21);
        assert_eq!(p.estimated_fps(), Some(20.0));
        assert!(p.is_lagging());
        assert_eq!(p.average_frame_ms(), Some(50.0));
    }

    #[test]
    fn window_restarts_after_each_estimate() {
        let mut p = PerformancePolicy::new(30.0).unwrap();
        let last = feed(&mut p, 0, 50, 21);
        assert_eq!(p.estimated_fps(), Some(20.0));
        // 60 more frames at 1000/60ms cadence, rounded to whole ms (~16.7 -> 17): fast again.
        feed(&mut p, last + 17, 17, 60);
        let fps = p.estimated_fps().unwrap();
        assert!(fps > 55.0, "fps={fps}");
        assert!(!p.is_lagging());
    }

    #[test]
    fn count_threshold_activates() {
        let mut p = PerformancePolicy::new(30.0).unwrap();
        assert!(!p.should_virtualize(10, 50));
        assert!(!p.is_activated());
        assert!(p.should_virtualize(51, 50));
        assert!(p.is_activated());
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        assert_eq!(
            PerformancePolicy::new(0.0).unwrap_err(),
            WindowError::InvalidFpsThreshold(0.0)
        );
        assert!(PerformancePolicy::new(f64::NAN).is_err());
    }

    #[test]
    fn recent_frames_are_bounded() {
        let options = WindowOptions::default().with_recent_frame_capacity(4);
        let mut p = PerformancePolicy::from_options(&options).unwrap();
        for (i, t) in [0u64, 10, 20, 30, 130, 230, 330, 430].into_iter().enumerate() {
            p.record_frame(t);
            assert!(p.recent_frames.len() <= 4, "i={i}");
        }
        assert_eq!(p.average_frame_ms(), Some(100.0));
    }
}
