//! Slide index state for the hero carousel.
//!
//! The carousel owns a bounded counter with wraparound plus the gesture tracker that
//! drives it. Views project the index onto the `active` flag of every slide and dot.

use crate::{GestureTracker, SwipeDirection};
use log::debug;
use std::rc::Rc;
use yew::Reducible;

#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    count: usize,
    index: usize,
    gesture: GestureTracker,
}

/// Everything that can move the carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselAction {
    /// Periodic autoplay tick. Ignored while a gesture is in progress.
    Tick,
    Next,
    Previous,
    /// Dot navigation. Out-of-range positions are ignored.
    GoTo(usize),
    PointerDown(f64),
    PointerUp(f64),
    /// Pointer left the carousel while pressed.
    PointerCancel,
}

impl Carousel {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            index: 0,
            gesture: GestureTracker::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.in_progress()
    }

    /// `index = (index + 1) mod count`
    pub fn advance(&mut self) {
        if self.count == 0 {
            return;
        }
        self.index = (self.index + 1) % self.count;
    }

    /// Inverse of [`advance`](Self::advance); wraps from 0 to `count - 1`.
    pub fn retreat(&mut self) {
        if self.count == 0 {
            return;
        }
        self.index = if self.index == 0 {
            self.count - 1
        } else {
            self.index - 1
        };
    }

    pub fn go_to(&mut self, position: usize) {
        if position >= self.count {
            debug!("Ignoring dot navigation to {} of {}", position, self.count);
            return;
        }
        self.index = position;
    }

    /// `active` flag for the slide (and its dot) at `position`.
    pub fn is_active(&self, position: usize) -> bool {
        position == self.index
    }

    pub fn apply(&mut self, action: CarouselAction) {
        match action {
            CarouselAction::Tick => {
                if self.gesture.in_progress() {
                    debug!("Autoplay tick skipped during drag");
                } else {
                    self.advance();
                }
            }
            CarouselAction::Next => self.advance(),
            CarouselAction::Previous => self.retreat(),
            CarouselAction::GoTo(position) => self.go_to(position),
            CarouselAction::PointerDown(x) => self.gesture.begin(x),
            CarouselAction::PointerUp(x) => {
                if !self.gesture.in_progress() {
                    return;
                }
                match self.gesture.finish(x) {
                    Some(SwipeDirection::Advance) => self.advance(),
                    Some(SwipeDirection::Retreat) => self.retreat(),
                    None => {}
                }
            }
            CarouselAction::PointerCancel => self.gesture.abandon(),
        }
    }
}

impl Reducible for Carousel {
    type Action = CarouselAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn advance_wraps_after_count_steps() {
        for count in 1..=7 {
            let mut carousel = Carousel::new(count);
            carousel.go_to(count / 2);
            let start = carousel.index();
            for _ in 0..count {
                carousel.advance();
            }
            assert_eq!(carousel.index(), start, "count = {count}");
        }
    }

    #[test]
    fn retreat_from_zero_goes_to_last() {
        let mut carousel = Carousel::new(4);
        carousel.retreat();
        assert_eq!(carousel.index(), 3);
    }

    #[test]
    fn retreat_undoes_advance() {
        let mut carousel = Carousel::new(5);
        for start in 0..5 {
            carousel.go_to(start);
            carousel.advance();
            carousel.retreat();
            assert_eq!(carousel.index(), start);
        }
    }

    #[test]
    fn active_flags_mirror_index() {
        let mut carousel = Carousel::new(3);
        carousel.go_to(1);
        let flags: Vec<bool> = (0..carousel.len()).map(|p| carousel.is_active(p)).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn out_of_range_go_to_is_ignored() {
        let mut carousel = Carousel::new(3);
        carousel.go_to(2);
        carousel.go_to(3);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn swipes_move_exactly_one_slide() {
        let mut carousel = Carousel::new(3);
        carousel.apply(CarouselAction::PointerDown(300.0));
        carousel.apply(CarouselAction::PointerUp(249.0));
        assert_eq!(carousel.index(), 1);

        carousel.apply(CarouselAction::PointerDown(300.0));
        carousel.apply(CarouselAction::PointerUp(351.0));
        assert_eq!(carousel.index(), 0);

        carousel.apply(CarouselAction::PointerDown(300.0));
        carousel.apply(CarouselAction::PointerUp(350.0));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn pointer_up_without_down_does_nothing() {
        let mut carousel = Carousel::new(3);
        carousel.apply(CarouselAction::PointerUp(0.0));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn autoplay_pauses_while_dragging() {
        let mut carousel = Carousel::new(3);
        carousel.apply(CarouselAction::PointerDown(100.0));
        carousel.apply(CarouselAction::Tick);
        assert_eq!(carousel.index(), 0);
        carousel.apply(CarouselAction::PointerCancel);
        carousel.apply(CarouselAction::Tick);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn empty_carousel_stays_put() {
        let mut carousel = Carousel::new(0);
        carousel.apply(CarouselAction::Tick);
        carousel.apply(CarouselAction::Previous);
        assert_eq!(carousel.index(), 0);
        assert!(carousel.is_empty());
    }

    #[test]
    fn reducer_returns_updated_state() {
        let state = Rc::new(Carousel::new(2));
        let next = state.clone().reduce(CarouselAction::Next);
        assert_eq!(state.index(), 0);
        assert_eq!(next.index(), 1);
    }
}
