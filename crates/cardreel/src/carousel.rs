//! The rotation state machine.
//!
//! [`CarouselEngine`] is the single source of truth for which item is shown.
//! It is generic over the item type: the live preview rotates [`Vendor`]s,
//! the artifact replay rotates card ids, and both go through the same code.
//!
//! Time is passed in explicitly as a [`Duration`] since an arbitrary epoch.
//! The engine owns exactly one [`Timer`]; every operation that could affect
//! the next advance cancels or re-arms it synchronously, so two advances can
//! never be pending at once.
//!
//! ```rust
//! use std::time::Duration;
//! use cardreel::carousel::CarouselEngine;
//!
//! let mut engine = CarouselEngine::new(vec!["a", "b", "c"], "elegant_minimal", Duration::from_secs(5));
//! engine.play(Duration::ZERO);
//! engine.poll(Duration::from_secs(11));
//! assert_eq!(engine.current(), Some(&"c"));
//! ```
//!
//! [`Vendor`]: crate::vendor::Vendor

use std::time::Duration;

use crate::timer::Timer;

/// Dwell time used when none is configured.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

/// Shortest accepted dwell time.
pub const MIN_DURATION: Duration = Duration::from_millis(500);

/// Clamps a dwell time to [`MIN_DURATION`].
pub fn clamp_duration(duration: Duration) -> Duration {
    duration.max(MIN_DURATION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
}

/// Runtime state of one carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationState<T> {
    pub items: Vec<T>,
    pub style_key: String,
    pub duration: Duration,
    pub play_state: PlayState,
    /// Always `< items.len()` when `items` is non-empty.
    pub current_index: usize,
}

impl<T> PresentationState<T> {
    pub fn is_playing(&self) -> bool {
        self.play_state == PlayState::Playing
    }
}

#[derive(Debug, Clone)]
pub struct CarouselEngine<T> {
    state: PresentationState<T>,
    timer: Timer,
}

impl<T> CarouselEngine<T> {
    /// Creates a stopped engine showing the first item.
    pub fn new(items: Vec<T>, style_key: impl Into<String>, duration: Duration) -> Self {
        Self {
            state: PresentationState {
                items,
                style_key: style_key.into(),
                duration: clamp_duration(duration),
                play_state: PlayState::Stopped,
                current_index: 0,
            },
            timer: Timer::new(),
        }
    }

    pub fn state(&self) -> &PresentationState<T> {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    pub fn style_key(&self) -> &str {
        &self.state.style_key
    }

    pub fn duration(&self) -> Duration {
        self.state.duration
    }

    /// Index of the shown item, or `None` for an empty list.
    pub fn current_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.state.current_index)
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.state.items.get(self.state.current_index)
    }

    /// Deadline of the pending advance, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Starts rotating. A no-op while already playing.
    pub fn play(&mut self, now: Duration) {
        if self.is_playing() {
            return;
        }
        self.state.play_state = PlayState::Playing;
        self.rearm(now);
        log::debug!("carousel playing, next advance at {:?}", self.timer.deadline());
    }

    /// Stops rotating and cancels the pending advance. Idempotent.
    pub fn pause(&mut self) {
        if self.timer.cancel() || self.is_playing() {
            log::debug!("carousel paused at index {:?}", self.current_index());
        }
        self.state.play_state = PlayState::Stopped;
    }

    pub fn toggle(&mut self, now: Duration) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Moves to the next item, wrapping around. While playing, the next
    /// advance is scheduled one dwell after `now`.
    pub fn advance(&mut self, now: Duration) {
        self.step_forward();
        if self.is_playing() {
            self.rearm(now);
        }
    }

    /// Moves to the previous item, wrapping around, restarting the dwell.
    pub fn retreat(&mut self, now: Duration) {
        let len = self.len();
        if len > 0 {
            self.state.current_index = (self.state.current_index + len - 1) % len;
        }
        if self.is_playing() {
            self.rearm(now);
        }
    }

    /// Fires every advance due at or before `now`, in deadline order.
    ///
    /// Each fired advance re-arms at its own deadline plus the dwell, so a
    /// late poll catches up without drifting. Returns how many fired.
    pub fn poll(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.timer.take_due(now) {
            self.step_forward();
            fired += 1;
            if self.is_playing() {
                self.timer.arm(deadline + self.state.duration);
            }
        }
        if fired > 0 {
            log::debug!(
                "carousel advanced {} time(s) to index {:?}",
                fired,
                self.current_index()
            );
        }
        fired
    }

    /// Replaces the item list. The index resets to 0 if it no longer fits;
    /// play state and the pending advance are unchanged.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.state.items = items;
        if self.state.current_index >= self.state.items.len() {
            self.state.current_index = 0;
        }
    }

    /// Swaps the style. Never touches the index or timing.
    pub fn set_style(&mut self, style_key: impl Into<String>) {
        self.state.style_key = style_key.into();
    }

    /// Shows item `index` (clamped into range). While playing, the dwell
    /// restarts from `now`.
    pub fn jump_to(&mut self, index: usize, now: Duration) {
        if self.is_empty() {
            return;
        }
        self.state.current_index = index.min(self.len() - 1);
        if self.is_playing() {
            self.rearm(now);
        }
    }

    /// Changes the dwell time (at least [`MIN_DURATION`]). While playing, the
    /// next advance is rescheduled one new dwell after `now`.
    pub fn set_duration(&mut self, duration: Duration, now: Duration) {
        self.state.duration = clamp_duration(duration);
        if self.is_playing() {
            self.rearm(now);
        }
    }

    fn step_forward(&mut self) {
        let len = self.len();
        if len > 0 {
            self.state.current_index = (self.state.current_index + 1) % len;
        }
    }

    fn rearm(&mut self, now: Duration) {
        self.timer.arm(now + self.state.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn engine(n: usize) -> CarouselEngine<usize> {
        CarouselEngine::new((0..n).collect(), "elegant_minimal", ms(5000))
    }

    #[test]
    fn test_new_engine_is_stopped_at_zero() {
        let e = engine(3);
        assert!(!e.is_playing());
        assert_eq!(e.current_index(), Some(0));
        assert_eq!(e.next_deadline(), None);
    }

    #[test]
    fn test_empty_engine_has_no_index() {
        let mut e = engine(0);
        assert_eq!(e.current_index(), None);
        assert_eq!(e.current(), None);
        e.play(ms(0));
        e.advance(ms(0));
        assert_eq!(e.poll(ms(60_000)), 12);
        assert_eq!(e.current_index(), None);
    }

    #[test]
    fn test_two_items_five_seconds() {
        let mut e = engine(2);
        e.play(ms(0));
        assert_eq!(e.poll(ms(4999)), 0);
        assert_eq!(e.current_index(), Some(0));
        assert_eq!(e.poll(ms(5000)), 1);
        assert_eq!(e.current_index(), Some(1));
        assert_eq!(e.poll(ms(10_000)), 1);
        assert_eq!(e.current_index(), Some(0));
    }

    #[test]
    fn test_play_twice_keeps_one_timer() {
        let mut e = engine(3);
        e.play(ms(0));
        e.play(ms(2000));
        assert_eq!(e.next_deadline(), Some(ms(5000)));
        assert_eq!(e.poll(ms(9999)), 1);
    }

    #[test]
    fn test_pause_cancels_pending_advance() {
        let mut e = engine(3);
        e.play(ms(0));
        e.pause();
        e.pause();
        assert_eq!(e.next_deadline(), None);
        assert_eq!(e.poll(ms(60_000)), 0);
        assert_eq!(e.current_index(), Some(0));
    }

    #[test]
    fn test_poll_catches_up_without_drift() {
        let mut e = engine(4);
        e.play(ms(100));
        assert_eq!(e.poll(ms(15_200)), 3);
        assert_eq!(e.current_index(), Some(3));
        assert_eq!(e.next_deadline(), Some(ms(20_100)));
    }

    #[test]
    fn test_manual_advance_restarts_dwell() {
        let mut e = engine(3);
        e.play(ms(0));
        e.advance(ms(3000));
        assert_eq!(e.current_index(), Some(1));
        assert_eq!(e.next_deadline(), Some(ms(8000)));
    }

    #[test]
    fn test_advance_while_stopped_does_not_arm() {
        let mut e = engine(3);
        e.advance(ms(0));
        assert_eq!(e.current_index(), Some(1));
        assert_eq!(e.next_deadline(), None);
    }

    #[test]
    fn test_retreat_wraps() {
        let mut e = engine(3);
        e.retreat(ms(0));
        assert_eq!(e.current_index(), Some(2));
    }

    #[test]
    fn test_shrinking_list_resets_index() {
        let mut e = engine(5);
        e.jump_to(4, ms(0));
        e.set_items(vec![10, 11]);
        assert_eq!(e.current_index(), Some(0));

        e.jump_to(1, ms(0));
        e.set_items(vec![20, 21, 22]);
        assert_eq!(e.current_index(), Some(1));
    }

    #[test]
    fn test_set_items_keeps_timer() {
        let mut e = engine(3);
        e.play(ms(0));
        e.set_items(vec![1, 2]);
        assert!(e.is_playing());
        assert_eq!(e.next_deadline(), Some(ms(5000)));
    }

    #[test]
    fn test_set_style_is_pure_swap() {
        let mut e = engine(3);
        e.play(ms(0));
        e.jump_to(2, ms(1000));
        let deadline = e.next_deadline();
        e.set_style("cyber_neon");
        assert_eq!(e.style_key(), "cyber_neon");
        assert_eq!(e.current_index(), Some(2));
        assert_eq!(e.next_deadline(), deadline);
    }

    #[test]
    fn test_jump_to_clamps_and_restarts_dwell() {
        let mut e = engine(3);
        e.play(ms(0));
        e.jump_to(99, ms(4000));
        assert_eq!(e.current_index(), Some(2));
        assert_eq!(e.next_deadline(), Some(ms(9000)));
        assert!(e.is_playing());
    }

    #[test]
    fn test_set_duration_clamps_and_rearms() {
        let mut e = engine(3);
        e.set_duration(ms(10), ms(0));
        assert_eq!(e.duration(), MIN_DURATION);
        assert_eq!(e.next_deadline(), None);

        e.play(ms(0));
        e.set_duration(ms(2000), ms(1000));
        assert_eq!(e.next_deadline(), Some(ms(3000)));
    }

    #[test]
    fn test_toggle() {
        let mut e = engine(2);
        e.toggle(ms(0));
        assert!(e.is_playing());
        e.toggle(ms(0));
        assert!(!e.is_playing());
    }

    proptest! {
        #[test]
        fn visits_in_modular_order(n in 1usize..12, start in 0usize..12, steps in 0usize..50) {
            let mut e = engine(n);
            e.jump_to(start, ms(0));
            let first = e.current_index().unwrap();
            for _ in 0..steps {
                e.advance(ms(0));
            }
            prop_assert_eq!(e.current_index(), Some((first + steps) % n));
        }

        #[test]
        fn single_item_always_index_zero(steps in 0usize..30, elapsed in 0u64..120_000) {
            let mut e = engine(1);
            e.play(ms(0));
            for _ in 0..steps {
                e.advance(ms(0));
            }
            e.poll(ms(elapsed));
            prop_assert_eq!(e.current_index(), Some(0));
        }

        #[test]
        fn poll_matches_elapsed_dwells(n in 1usize..8, dwell in 500u64..8000, elapsed in 0u64..200_000) {
            let mut e = CarouselEngine::new((0..n).collect::<Vec<_>>(), "k", ms(dwell));
            e.play(ms(0));
            let fired = e.poll(ms(elapsed));
            prop_assert_eq!(fired as u64, elapsed / dwell);
            prop_assert_eq!(e.current_index(), Some((elapsed / dwell) as usize % n));
        }

        #[test]
        fn play_pause_idempotent(ops in prop::collection::vec(any::<bool>(), 1..20)) {
            let mut e = engine(3);
            for play in &ops {
                if *play { e.play(ms(0)); } else { e.pause(); }
            }
            let expect_playing = *ops.last().unwrap();
            prop_assert_eq!(e.is_playing(), expect_playing);
            prop_assert_eq!(e.next_deadline().is_some(), expect_playing);
        }
    }
}
