//! Slide navigation state machine.
//!
//! A slide change runs in three steps:
//!
//! 1. commit, immediately: the current slide loses `active`, is marked
//!    `previous` when moving forward, and the target is parked off to one
//!    side, fully transparent.
//! 2. enter, after the profile's enter delay: the target becomes `active` and
//!    both slides are pointed at their final offset and opacity.
//! 3. settle, after the full transition duration: inline overrides are
//!    dropped, the index is committed, status is refreshed and the target's
//!    entry animations restart.
//!
//! While a change is in flight every navigation request is dropped.

use std::time::Duration;

use crate::constants::RESIZE_DEBOUNCE_MS;
use crate::deck::Surface;
use crate::error::DeckError;
use crate::fullscreen::{Fullscreen, FullscreenBackend};
use crate::input::{action_for_key, swipe_direction, Action, Direction, Key, Point, Zone};
use crate::profile::Profile;
use crate::scheduler::{Scheduler, TaskId};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Handoff {
    from: usize,
    to: usize,
    forward: bool,
    offset: f32,
}

impl Handoff {
    /// Offset the target enters from; the current slide leaves to the opposite side.
    fn entry_offset(&self) -> f32 {
        if self.forward { self.offset } else { -self.offset }
    }
}

#[derive(Debug)]
enum Task {
    Enter(Handoff),
    Settle(Handoff),
    Reflow,
}

#[derive(Debug)]
pub struct PresentationController {
    current: usize,
    total: usize,
    transitioning: bool,
    profile: Profile,
    scheduler: Scheduler<Task>,
    pending_resize: Option<TaskId>,
    touch_start: Option<Point>,
    hidden: bool,
}

impl PresentationController {
    /// Creates a controller positioned on slide 1 and paints the initial status.
    /// A surface without slides is rejected.
    pub fn new<S: Surface + ?Sized>(profile: Profile, surface: &mut S) -> Result<Self, DeckError> {
        let total = surface.slide_count();
        if total == 0 {
            return Err(DeckError::Empty);
        }
        let controller = Self {
            current: 1,
            total,
            transitioning: false,
            profile,
            scheduler: Scheduler::new(),
            pending_resize: None,
            touch_start: None,
            hidden: false,
        };
        controller.refresh_status(surface);
        Ok(controller)
    }

    pub fn current_slide(&self) -> usize {
        self.current
    }

    pub fn total_slides(&self) -> usize {
        self.total
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn advance<S: Surface + ?Sized>(&mut self, direction: Direction, surface: &mut S) {
        if self.transitioning {
            return;
        }
        match direction {
            Direction::Forward if self.current < self.total => {
                self.go_to(self.current + 1, surface)
            }
            Direction::Backward if self.current > 1 => self.go_to(self.current - 1, surface),
            _ => {}
        }
    }

    pub fn next_slide<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.advance(Direction::Forward, surface);
    }

    pub fn previous_slide<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.advance(Direction::Backward, surface);
    }

    pub fn go_to<S: Surface + ?Sized>(&mut self, target: usize, surface: &mut S) {
        if self.transitioning || target == self.current {
            return;
        }
        if target < 1 || target > self.total {
            return;
        }

        self.transitioning = true;

        if surface.slide(self.current).is_none() || surface.slide(target).is_none() {
            tracing::warn!(
                from = self.current,
                to = target,
                "slide not found, transition aborted"
            );
            self.transitioning = false;
            return;
        }

        let handoff = Handoff {
            from: self.current,
            to: target,
            forward: target > self.current,
            offset: self.profile.offset,
        };
        tracing::debug!(from = handoff.from, to = handoff.to, "slide transition started");

        if let Some(target) = surface.slide_mut(handoff.to) {
            target.offset = Some(handoff.entry_offset());
            target.opacity = Some(0.0);
        }
        if let Some(current) = surface.slide_mut(handoff.from) {
            current.active = false;
            if handoff.forward {
                current.previous = true;
            }
        }

        self.scheduler.schedule(self.profile.enter_delay, Task::Enter(handoff));
        self.scheduler.schedule(self.profile.transition, Task::Settle(handoff));
    }

    /// Public entry point for external callers; same rules as [`Self::go_to`].
    pub fn jump_to_slide<S: Surface + ?Sized>(&mut self, n: usize, surface: &mut S) {
        self.go_to(n, surface);
    }

    /// Handles a key press and returns the action it triggered, if any.
    pub fn handle_key<S, B>(
        &mut self,
        key: Key,
        surface: &mut S,
        fullscreen: &Fullscreen,
        backend: &mut B,
    ) -> Option<Action>
    where
        S: Surface + ?Sized,
        B: FullscreenBackend + ?Sized,
    {
        if self.profile.suppress_on_text_entry && surface.text_entry_focused() {
            return None;
        }

        let action = action_for_key(key, fullscreen.is_active(backend))?;
        match action {
            Action::Previous => self.previous_slide(surface),
            Action::Next => self.next_slide(surface),
            Action::First => self.go_to(1, surface),
            Action::Last => self.go_to(self.total, surface),
            Action::ExitFullscreen => fullscreen.exit(backend),
        }
        Some(action)
    }

    pub fn handle_swipe<S: Surface + ?Sized>(
        &mut self,
        start: Point,
        end: Point,
        surface: &mut S,
    ) -> Option<Direction> {
        let direction = swipe_direction(start, end)?;
        self.advance(direction, surface);
        Some(direction)
    }

    pub fn touch_start(&mut self, at: Point) {
        self.touch_start = Some(at);
    }

    /// Completes a touch gesture. Ends without a recorded start are ignored.
    pub fn touch_end<S: Surface + ?Sized>(
        &mut self,
        at: Point,
        surface: &mut S,
    ) -> Option<Direction> {
        let start = self.touch_start.take()?;
        self.handle_swipe(start, at, surface)
    }

    pub fn handle_click_zone<S: Surface + ?Sized>(&mut self, zone: Zone, surface: &mut S) {
        self.advance(zone.direction(), surface);
    }

    /// Schedules a reflow once resizing has been quiet for the debounce period.
    pub fn handle_resize(&mut self) {
        if let Some(id) = self.pending_resize.take() {
            self.scheduler.cancel(id);
        }
        let id = self
            .scheduler
            .schedule(Duration::from_millis(RESIZE_DEBOUNCE_MS), Task::Reflow);
        self.pending_resize = Some(id);
    }

    pub fn handle_visibility(&mut self, hidden: bool) {
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;
        if hidden {
            tracing::info!("presentation paused");
        } else {
            tracing::info!("presentation resumed");
        }
    }

    /// Advances the controller's clock by one frame and runs whatever became due.
    pub fn tick<S: Surface + ?Sized>(&mut self, dt: Duration, surface: &mut S) {
        for task in self.scheduler.advance(dt) {
            match task {
                Task::Enter(handoff) => self.enter(handoff, surface),
                Task::Settle(handoff) => self.settle(handoff, surface),
                Task::Reflow => {
                    self.pending_resize = None;
                    tracing::debug!("reflowing slides after resize");
                    surface.reflow();
                }
            }
        }
    }

    fn enter<S: Surface + ?Sized>(&mut self, handoff: Handoff, surface: &mut S) {
        if let Some(target) = surface.slide_mut(handoff.to) {
            target.active = true;
            target.offset = Some(0.0);
            target.opacity = Some(1.0);
        }
        if let Some(current) = surface.slide_mut(handoff.from) {
            current.offset = Some(-handoff.entry_offset());
            current.opacity = Some(0.0);
        }
    }

    fn settle<S: Surface + ?Sized>(&mut self, handoff: Handoff, surface: &mut S) {
        if let Some(current) = surface.slide_mut(handoff.from) {
            current.previous = false;
            current.clear_overrides();
        }
        if let Some(target) = surface.slide_mut(handoff.to) {
            target.clear_overrides();
        }

        self.current = handoff.to;
        self.transitioning = false;
        self.refresh_status(surface);

        if let Some(target) = surface.slide_mut(handoff.to) {
            target.restart_animations();
        }
        tracing::debug!(slide = self.current, "slide transition settled");
    }

    fn refresh_status<S: Surface + ?Sized>(&self, surface: &mut S) {
        if let Some(counter) = surface.counter_mut() {
            counter.current = self.current.to_string();
            counter.total = self.total.to_string();
        }
        if self.profile.progress_bar {
            if let Some(progress) = surface.progress_mut() {
                progress.width = self.current as f32 / self.total as f32 * 100.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Counter, Deck, FullscreenButton, ProgressFill, SlideStyle};
    use crate::fullscreen::tests::FakeBackend;
    use crate::fullscreen::Capability;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup(total: usize) -> (PresentationController, Deck) {
        let mut deck = Deck::new(total).unwrap();
        let controller = PresentationController::new(Profile::modern(), &mut deck).unwrap();
        (controller, deck)
    }

    fn settle(c: &mut PresentationController, deck: &mut Deck) {
        let duration = c.profile().transition;
        c.tick(duration, deck);
    }

    #[test]
    fn starts_on_first_slide_with_status_painted() {
        let (c, deck) = setup(4);
        assert_eq!(c.current_slide(), 1);
        assert_eq!(c.total_slides(), 4);
        assert!(!c.is_transitioning());
        let counter = deck.counter().unwrap();
        assert_eq!(counter.current, "1");
        assert_eq!(counter.total, "4");
        assert_eq!(deck.progress().unwrap().width, 25.0);
    }

    #[test]
    fn out_of_range_targets_are_ignored() {
        let (mut c, mut deck) = setup(3);
        for n in [0, 4, 100] {
            c.go_to(n, &mut deck);
            assert_eq!(c.current_slide(), 1);
            assert!(!c.is_transitioning());
        }
        c.tick(ms(1000), &mut deck);
        assert_eq!(c.current_slide(), 1);
    }

    #[test]
    fn self_target_is_a_no_op() {
        let (mut c, mut deck) = setup(3);
        let before = deck.slide(1).cloned();
        c.go_to(1, &mut deck);
        assert!(!c.is_transitioning());
        assert_eq!(deck.slide(1).cloned(), before);
    }

    #[test]
    fn advancing_walks_to_the_last_slide_and_stops() {
        let (mut c, mut deck) = setup(5);
        for _ in 0..4 {
            c.advance(Direction::Forward, &mut deck);
            settle(&mut c, &mut deck);
        }
        assert_eq!(c.current_slide(), 5);

        c.advance(Direction::Forward, &mut deck);
        assert!(!c.is_transitioning());
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 5);
    }

    #[test]
    fn going_back_from_the_first_slide_is_ignored() {
        let (mut c, mut deck) = setup(3);
        c.advance(Direction::Backward, &mut deck);
        assert!(!c.is_transitioning());
        assert_eq!(c.current_slide(), 1);
    }

    #[test]
    fn requests_during_a_transition_are_dropped() {
        let (mut c, mut deck) = setup(5);
        c.go_to(2, &mut deck);
        assert!(c.is_transitioning());

        c.advance(Direction::Forward, &mut deck);
        c.go_to(4, &mut deck);
        c.tick(ms(299), &mut deck);
        assert!(c.is_transitioning());
        assert_eq!(c.current_slide(), 1);

        c.tick(ms(1), &mut deck);
        assert!(!c.is_transitioning());
        assert_eq!(c.current_slide(), 2);

        // nothing was queued while locked
        c.tick(ms(1000), &mut deck);
        assert_eq!(c.current_slide(), 2);

        c.go_to(4, &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 4);
    }

    #[test]
    fn forward_transition_runs_three_phases() {
        let (mut c, mut deck) = setup(3);
        c.go_to(2, &mut deck);

        let current = deck.slide(1).unwrap();
        assert!(!current.active);
        assert!(current.previous);
        let target = deck.slide(2).unwrap();
        assert!(!target.active);
        assert_eq!(target.offset, Some(30.0));
        assert_eq!(target.opacity, Some(0.0));

        c.tick(ms(10), &mut deck);
        let target = deck.slide(2).unwrap();
        assert!(target.active);
        assert_eq!(target.offset, Some(0.0));
        assert_eq!(target.opacity, Some(1.0));
        let current = deck.slide(1).unwrap();
        assert_eq!(current.offset, Some(-30.0));
        assert_eq!(current.opacity, Some(0.0));
        assert_eq!(c.current_slide(), 1);

        c.tick(ms(290), &mut deck);
        let current = deck.slide(1).unwrap();
        assert!(!current.previous);
        assert_eq!((current.offset, current.opacity), (None, None));
        let target = deck.slide(2).unwrap();
        assert!(target.active);
        assert_eq!((target.offset, target.opacity), (None, None));
        assert_eq!(target.animation_generation(), 1);
        assert_eq!(c.current_slide(), 2);
        assert_eq!(deck.counter().unwrap().current, "2");
    }

    #[test]
    fn backward_transition_mirrors_offsets() {
        let (mut c, mut deck) = setup(3);
        c.go_to(3, &mut deck);
        settle(&mut c, &mut deck);

        c.go_to(1, &mut deck);
        let current = deck.slide(3).unwrap();
        assert!(!current.previous);
        assert_eq!(deck.slide(1).unwrap().offset, Some(-30.0));

        c.tick(ms(10), &mut deck);
        assert_eq!(deck.slide(3).unwrap().offset, Some(30.0));
        assert_eq!(deck.slide(1).unwrap().offset, Some(0.0));
    }

    #[test]
    fn one_long_frame_runs_enter_and_settle_in_order() {
        let (mut c, mut deck) = setup(2);
        c.go_to(2, &mut deck);
        c.tick(ms(1000), &mut deck);
        let target = deck.slide(2).unwrap();
        assert!(target.active);
        assert_eq!(target.offset, None);
        assert!(!deck.slide(1).unwrap().active);
        assert_eq!(c.current_slide(), 2);
    }

    #[test]
    fn classic_profile_uses_its_own_timing_and_distance() {
        let mut deck = Deck::new(3).unwrap();
        let mut c = PresentationController::new(Profile::classic(), &mut deck).unwrap();
        assert_eq!(deck.progress().unwrap().width, 0.0);

        c.go_to(2, &mut deck);
        assert_eq!(deck.slide(2).unwrap().offset, Some(100.0));
        c.tick(ms(300), &mut deck);
        assert!(c.is_transitioning());
        c.tick(ms(200), &mut deck);
        assert_eq!(c.current_slide(), 2);
        assert_eq!(deck.progress().unwrap().width, 0.0);
    }

    #[test]
    fn unresolved_slide_aborts_and_releases_the_guard() {
        let mut deck = Deck::from_slots([true, false, true]).unwrap();
        let mut c = PresentationController::new(Profile::modern(), &mut deck).unwrap();

        c.go_to(2, &mut deck);
        assert!(!c.is_transitioning());
        assert_eq!(c.current_slide(), 1);
        assert!(deck.slide(1).unwrap().active);

        c.go_to(3, &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 3);
    }

    struct Blank;

    impl Surface for Blank {
        fn slide_count(&self) -> usize {
            0
        }
        fn slide(&self, _: usize) -> Option<&SlideStyle> {
            None
        }
        fn slide_mut(&mut self, _: usize) -> Option<&mut SlideStyle> {
            None
        }
        fn counter_mut(&mut self) -> Option<&mut Counter> {
            None
        }
        fn progress_mut(&mut self) -> Option<&mut ProgressFill> {
            None
        }
        fn fullscreen_button_mut(&mut self) -> Option<&mut FullscreenButton> {
            None
        }
        fn text_entry_focused(&self) -> bool {
            false
        }
        fn reflow(&mut self) {}
    }

    #[test]
    fn surface_without_slides_is_rejected() {
        let err = PresentationController::new(Profile::modern(), &mut Blank).unwrap_err();
        assert_eq!(err, DeckError::Empty);
    }

    #[test]
    fn jump_to_first_updates_counter() {
        let (mut c, mut deck) = setup(6);
        c.jump_to_slide(4, &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(deck.counter().unwrap().current, "4");

        c.jump_to_slide(1, &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 1);
        assert_eq!(deck.counter().unwrap().current, "1");
    }

    #[test]
    fn progress_tracks_current_slide() {
        let (mut c, mut deck) = setup(8);
        for k in [3, 8, 5] {
            c.go_to(k, &mut deck);
            settle(&mut c, &mut deck);
            assert_eq!(deck.progress().unwrap().width, k as f32 / 8.0 * 100.0);
        }
    }

    #[test]
    fn missing_status_elements_are_skipped() {
        let mut deck = Deck::new(3).unwrap().without_counter().without_progress();
        let mut c = PresentationController::new(Profile::modern(), &mut deck).unwrap();
        c.go_to(3, &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 3);
        assert!(deck.counter().is_none());
    }

    #[test]
    fn swipes_navigate_only_when_long_and_horizontal() {
        let (mut c, mut deck) = setup(5);

        let dir = c.handle_swipe(Point::new(300.0, 0.0), Point::new(240.0, 0.0), &mut deck);
        assert_eq!(dir, Some(Direction::Forward));
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 2);

        let short = c.handle_swipe(Point::new(300.0, 0.0), Point::new(260.0, 0.0), &mut deck);
        assert_eq!(short, None);
        let steep = c.handle_swipe(Point::new(300.0, 0.0), Point::new(280.0, 60.0), &mut deck);
        assert_eq!(steep, None);
        assert!(!c.is_transitioning());

        c.handle_swipe(Point::new(100.0, 0.0), Point::new(200.0, 0.0), &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 1);
    }

    #[test]
    fn touch_end_needs_a_start() {
        let (mut c, mut deck) = setup(3);
        assert_eq!(c.touch_end(Point::new(0.0, 0.0), &mut deck), None);

        c.touch_start(Point::new(400.0, 50.0));
        assert_eq!(c.touch_end(Point::new(300.0, 60.0), &mut deck), Some(Direction::Forward));
        assert_eq!(c.touch_end(Point::new(200.0, 60.0), &mut deck), None);
    }

    #[test]
    fn click_zones_step_through_slides() {
        let (mut c, mut deck) = setup(3);
        c.handle_click_zone(Zone::Right, &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 2);
        c.handle_click_zone(Zone::Left, &mut deck);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 1);
    }

    #[test]
    fn keys_drive_navigation() {
        let (mut c, mut deck) = setup(4);
        let mut backend = FakeBackend::with(&[Capability::Exclusive]);
        let fs = Fullscreen::detect(&backend);

        assert_eq!(c.handle_key(Key::End, &mut deck, &fs, &mut backend), Some(Action::Last));
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 4);

        c.handle_key(Key::PageUp, &mut deck, &fs, &mut backend);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 3);

        c.handle_key(Key::Home, &mut deck, &fs, &mut backend);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 1);

        c.handle_key(Key::Space, &mut deck, &fs, &mut backend);
        settle(&mut c, &mut deck);
        assert_eq!(c.current_slide(), 2);

        assert_eq!(c.handle_key(Key::Other, &mut deck, &fs, &mut backend), None);
    }

    #[test]
    fn escape_exits_fullscreen_only_when_active() {
        let (mut c, mut deck) = setup(2);
        let mut backend = FakeBackend::with(&[Capability::Borderless]);
        let fs = Fullscreen::detect(&backend);

        assert_eq!(c.handle_key(Key::Escape, &mut deck, &fs, &mut backend), None);

        fs.enter(&mut backend);
        assert_eq!(
            c.handle_key(Key::Escape, &mut deck, &fs, &mut backend),
            Some(Action::ExitFullscreen)
        );
        assert!(!fs.is_active(&backend));
    }

    #[test]
    fn text_entry_focus_suppresses_keys_in_modern_profile() {
        let (mut c, mut deck) = setup(3);
        let mut backend = FakeBackend::with(&[]);
        let fs = Fullscreen::detect(&backend);

        deck.set_text_entry_focused(true);
        assert_eq!(c.handle_key(Key::Right, &mut deck, &fs, &mut backend), None);
        assert!(!c.is_transitioning());

        let mut classic_deck = Deck::new(3).unwrap();
        classic_deck.set_text_entry_focused(true);
        let mut classic =
            PresentationController::new(Profile::classic(), &mut classic_deck).unwrap();
        assert_eq!(
            classic.handle_key(Key::Right, &mut classic_deck, &fs, &mut backend),
            Some(Action::Next)
        );
        assert!(classic.is_transitioning());
    }

    #[test]
    fn resize_is_debounced() {
        let (mut c, mut deck) = setup(2);
        c.handle_resize();
        c.tick(ms(100), &mut deck);
        c.handle_resize();
        c.tick(ms(249), &mut deck);
        assert_eq!(deck.layout_generation(), 0);

        c.tick(ms(1), &mut deck);
        assert_eq!(deck.layout_generation(), 1);
        c.tick(ms(1000), &mut deck);
        assert_eq!(deck.layout_generation(), 1);
    }

    #[test]
    fn resize_does_not_cancel_a_running_transition() {
        let (mut c, mut deck) = setup(2);
        c.go_to(2, &mut deck);
        c.handle_resize();
        c.tick(ms(300), &mut deck);
        assert_eq!(c.current_slide(), 2);
        c.tick(ms(1000), &mut deck);
        assert_eq!(deck.layout_generation(), 1);
    }

    #[test]
    fn visibility_changes_are_tracked() {
        let (mut c, _deck) = setup(1);
        c.handle_visibility(true);
        assert!(c.hidden);
        c.handle_visibility(true);
        c.handle_visibility(false);
        assert!(!c.hidden);
    }
}
