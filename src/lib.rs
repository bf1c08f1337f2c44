//! Client-side behavior for the Fincomercio promotional site.
//!
//! The library holds the platform-free state behind every interactive piece of the
//! page (carousel, swipe gestures, panels, modals, form submission, chatbot, notices)
//! so it can be exercised natively. The Yew front end in `main.rs` owns the timers and
//! DOM listeners and feeds events into these types.

use log::debug;

/// Fixed timing and gesture parameters shared by the front end and the state machines.
pub mod defaults {
    /// Minimum horizontal travel, in pixels, for a gesture to count as a swipe.
    pub const SWIPE_THRESHOLD_PX: f64 = 50.0;
    pub const AUTOPLAY_MS: u32 = 5_000;
    /// Simulated network latency before a submission succeeds.
    pub const SUBMIT_LATENCY_MS: u32 = 2_000;
    /// How long the success message stays up before the form resets and closes.
    pub const SUCCESS_HOLD_MS: u32 = 3_000;
    pub const NOTICE_LIFETIME_MS: u32 = 6_000;
    pub const PARALLAX_FACTOR: f64 = 0.5;
}

/// Discrete outcome of a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger/pointer moved right-to-left: show the next slide.
    Advance,
    /// Finger/pointer moved left-to-right: show the previous slide.
    Retreat,
}

/// Turns pointer/touch start and end coordinates into a swipe signal.
///
/// Only the latest sample is kept; every `begin` overwrites the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureTracker {
    start_x: f64,
    end_x: f64,
    active: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer or touch went down at `x`.
    pub fn begin(&mut self, x: f64) {
        self.start_x = x;
        self.active = true;
    }

    /// Pointer or touch went up at `x`. Returns the swipe, if the travel exceeded the threshold.
    pub fn finish(&mut self, x: f64) -> Option<SwipeDirection> {
        self.end_x = x;
        self.active = false;
        classify_swipe(self.start_x, self.end_x, defaults::SWIPE_THRESHOLD_PX)
    }

    /// Whether a gesture has started and not finished yet.
    pub fn in_progress(&self) -> bool {
        self.active
    }

    /// Drops a gesture that left the surface without an up event.
    pub fn abandon(&mut self) {
        if self.active {
            debug!("Gesture abandoned at start_x={}", self.start_x);
        }
        self.active = false;
    }
}

/// Classify a horizontal movement. `delta = start - end`; travel equal to the threshold is a tap.
pub fn classify_swipe(start_x: f64, end_x: f64, threshold: f64) -> Option<SwipeDirection> {
    let delta = start_x - end_x;
    if delta.abs() <= threshold {
        return None;
    }
    if delta > 0.0 {
        Some(SwipeDirection::Advance)
    } else {
        Some(SwipeDirection::Retreat)
    }
}

/// Vertical offset applied to the hero section for the given scroll position.
pub fn parallax_offset(scroll_y: f64) -> f64 {
    scroll_y * defaults::PARALLAX_FACTOR
}

/// One-way flag set the first time an element is seen intersecting the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealLatch {
    revealed: bool,
}

impl RevealLatch {
    /// Feed an intersection sample. Returns `true` only on the transition to revealed.
    pub fn observe(&mut self, is_intersecting: bool) -> bool {
        if self.revealed || !is_intersecting {
            return false;
        }
        self.revealed = true;
        true
    }
}

pub mod bridge;
pub mod carousel;
pub mod chatbot;
pub mod content;
pub mod forms;
pub mod modal;
pub mod notice;
pub mod panel;
pub mod site;
pub mod submission;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_travel_is_a_tap() {
        let mut tracker = GestureTracker::new();
        for end in [150.0, 100.0, 50.0, 149.5] {
            tracker.begin(100.0);
            assert_eq!(tracker.finish(end), None, "end_x = {end}");
        }
    }

    #[test]
    fn travel_just_past_threshold_swipes() {
        let mut tracker = GestureTracker::new();
        tracker.begin(200.0);
        assert_eq!(tracker.finish(149.0), Some(SwipeDirection::Advance));
        tracker.begin(200.0);
        assert_eq!(tracker.finish(251.0), Some(SwipeDirection::Retreat));
    }

    #[test]
    fn begin_overwrites_previous_sample() {
        let mut tracker = GestureTracker::new();
        tracker.begin(500.0);
        tracker.begin(10.0);
        assert!(tracker.in_progress());
        assert_eq!(tracker.finish(20.0), None);
        assert!(!tracker.in_progress());
    }

    #[test]
    fn abandon_clears_progress() {
        let mut tracker = GestureTracker::new();
        tracker.begin(10.0);
        tracker.abandon();
        assert!(!tracker.in_progress());
    }

    #[test]
    fn reveal_latch_fires_once() {
        let mut latch = RevealLatch::default();
        assert!(!latch.observe(false));
        assert!(latch.observe(true));
        assert!(!latch.observe(true));
        assert!(!latch.observe(false));
        assert_eq!(latch, RevealLatch { revealed: true });
    }

    #[test]
    fn parallax_moves_at_half_speed() {
        assert_eq!(parallax_offset(0.0), 0.0);
        assert_eq!(parallax_offset(300.0), 150.0);
    }
}
