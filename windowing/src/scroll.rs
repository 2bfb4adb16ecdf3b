use core::cmp::Ordering;

use crate::{ScrollDirection, WindowError, WindowOptions};

/// A lightweight, serializable snapshot of the scroll state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub position: f64,
    pub is_scrolling: bool,
}

/// Owns the scroll position of one surface and a debounced `is_scrolling` flag.
///
/// Time is supplied by the host (`now_ms`): call [`ScrollTracker::on_scroll`] for every scroll
/// notification and [`ScrollTracker::update_scrolling`] on each frame/timer tick. The flag turns
/// off once `reset_delay_ms` has passed without a scroll event.
///
/// `is_scrolling` is advisory. Nothing in range computation reads it.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    position: f64,
    is_scrolling: bool,
    direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,
    reset_delay_ms: u64,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(WindowOptions::default().is_scrolling_reset_delay_ms)
    }
}

impl ScrollTracker {
    pub fn new(reset_delay_ms: u64) -> Self {
        Self {
            position: 0.0,
            is_scrolling: false,
            direction: None,
            last_scroll_event_ms: None,
            reset_delay_ms,
        }
    }

    pub fn from_options(options: &WindowOptions) -> Self {
        Self::new(options.is_scrolling_reset_delay_ms)
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Direction of the last movement, cleared when scrolling stops.
    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    pub fn reset_delay_ms(&self) -> u64 {
        self.reset_delay_ms
    }

    pub fn set_reset_delay_ms(&mut self, delay_ms: u64) {
        self.reset_delay_ms = delay_ms;
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            position: self.position,
            is_scrolling: self.is_scrolling,
        }
    }

    /// Applies a scroll notification from the host: updates the position synchronously, marks
    /// the surface as scrolling and restarts the trailing timer.
    pub fn on_scroll(&mut self, position: f64, now_ms: u64) -> Result<(), WindowError> {
        wtrace!(position, now_ms, "ScrollTracker::on_scroll");
        self.set_position(position)?;
        self.last_scroll_event_ms = Some(now_ms);
        self.is_scrolling = true;
        Ok(())
    }

    /// Moves the position without counting as a user scroll (e.g. scroll-jump compensation).
    pub fn set_position(&mut self, position: f64) -> Result<(), WindowError> {
        ensure_non_negative!(position, WindowError::InvalidScrollPosition(position));
        self.direction = match position.partial_cmp(&self.position) {
            Some(Ordering::Greater) => Some(ScrollDirection::Forward),
            Some(Ordering::Less) => Some(ScrollDirection::Backward),
            _ => self.direction,
        };
        self.position = position;
        Ok(())
    }

    /// Runs the `is_scrolling` debounce. Returns `true` when the flag just turned off.
    pub fn update_scrolling(&mut self, now_ms: u64) -> bool {
        if !self.is_scrolling {
            return false;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) < self.reset_delay_ms {
            return false;
        }
        self.stop();
        true
    }

    /// Clears `is_scrolling` immediately (e.g. the host received a native scroll-end event).
    pub fn stop(&mut self) {
        self.is_scrolling = false;
        self.direction = None;
        self.last_scroll_event_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_flag_trails_the_last_event() {
        let mut t = ScrollTracker::new(150);
        t.on_scroll(10.0, 1_000).unwrap();
        assert!(t.is_scrolling());
        assert_eq!(t.position(), 10.0);

        assert!(!t.update_scrolling(1_100));
        t.on_scroll(20.0, 1_100).unwrap();
        // The timer restarted at 1_100.
        assert!(!t.update_scrolling(1_200));
        assert!(t.is_scrolling());
        assert!(t.update_scrolling(1_250));
        assert!(!t.is_scrolling());
        assert_eq!(t.direction(), None);
        assert_eq!(t.position(), 20.0);
    }

    #[test]
    fn direction_follows_movement() {
        let mut t = ScrollTracker::default();
        t.on_scroll(100.0, 0).unwrap();
        assert_eq!(t.direction(), Some(ScrollDirection::Forward));
        t.on_scroll(40.0, 1).unwrap();
        assert_eq!(t.direction(), Some(ScrollDirection::Backward));
        t.on_scroll(40.0, 2).unwrap();
        assert_eq!(t.direction(), Some(ScrollDirection::Backward));
    }

    #[test]
    fn set_position_does_not_mark_scrolling() {
        let mut t = ScrollTracker::default();
        t.set_position(300.0).unwrap();
        assert!(!t.is_scrolling());
        assert_eq!(
            t.state(),
            ScrollState {
                position: 300.0,
                is_scrolling: false
            }
        );
    }

    #[test]
    fn negative_positions_are_rejected_and_leave_state_untouched() {
        let mut t = ScrollTracker::default();
        t.on_scroll(5.0, 0).unwrap();
        assert_eq!(
            t.on_scroll(-1.0, 1),
            Err(WindowError::InvalidScrollPosition(-1.0))
        );
        assert_eq!(t.position(), 5.0);
    }
}
