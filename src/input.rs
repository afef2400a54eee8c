//! Input vocabulary: keys, gestures and click zones, and what they mean for navigation.

use crate::constants::SWIPE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Space,
    Enter,
    Home,
    End,
    Escape,
    Backspace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Previous,
    Next,
    First,
    Last,
    ExitFullscreen,
}

/// Maps a key press to a navigation action. Escape only means something while
/// fullscreen is active.
pub fn action_for_key(key: Key, fullscreen_active: bool) -> Option<Action> {
    match key {
        Key::Left | Key::Up | Key::PageUp => Some(Action::Previous),
        Key::Right | Key::Down | Key::Space | Key::Enter | Key::PageDown => Some(Action::Next),
        Key::Home => Some(Action::First),
        Key::End => Some(Action::Last),
        Key::Escape if fullscreen_active => Some(Action::ExitFullscreen),
        Key::Escape | Key::Backspace | Key::Other => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Classifies a gesture from `start` to `end`.
///
/// Only mostly-horizontal gestures longer than the swipe threshold count.
/// Moving the finger left advances, moving it right goes back.
pub fn swipe_direction(start: Point, end: Point) -> Option<Direction> {
    let dx = start.x - end.x;
    let dy = start.y - end.y;

    if dx.abs() <= dy.abs() || dx.abs() <= SWIPE_THRESHOLD {
        return None;
    }
    if dx > 0.0 {
        Some(Direction::Forward)
    } else {
        Some(Direction::Backward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Left,
    Right,
}

impl Zone {
    /// The zone covering horizontal position `x` in a surface `width` wide.
    pub fn at(x: f32, width: f32) -> Self {
        if x < width * 0.5 { Zone::Left } else { Zone::Right }
    }

    pub fn direction(self) -> Direction {
        match self {
            Zone::Left => Direction::Backward,
            Zone::Right => Direction::Forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_keys_map_to_actions() {
        for key in [Key::Left, Key::Up, Key::PageUp] {
            assert_eq!(action_for_key(key, false), Some(Action::Previous));
        }
        for key in [Key::Right, Key::Down, Key::Space, Key::Enter, Key::PageDown] {
            assert_eq!(action_for_key(key, false), Some(Action::Next));
        }
        assert_eq!(action_for_key(Key::Home, false), Some(Action::First));
        assert_eq!(action_for_key(Key::End, false), Some(Action::Last));
        assert_eq!(action_for_key(Key::Other, true), None);
    }

    #[test]
    fn escape_only_acts_in_fullscreen() {
        assert_eq!(action_for_key(Key::Escape, false), None);
        assert_eq!(action_for_key(Key::Escape, true), Some(Action::ExitFullscreen));
    }

    #[test]
    fn swipe_left_of_sixty_goes_forward() {
        let dir = swipe_direction(Point::new(200.0, 100.0), Point::new(140.0, 100.0));
        assert_eq!(dir, Some(Direction::Forward));
    }

    #[test]
    fn swipe_right_of_sixty_goes_back() {
        let dir = swipe_direction(Point::new(100.0, 100.0), Point::new(160.0, 110.0));
        assert_eq!(dir, Some(Direction::Backward));
    }

    #[test]
    fn short_swipe_is_ignored() {
        assert_eq!(swipe_direction(Point::new(200.0, 0.0), Point::new(160.0, 0.0)), None);
        assert_eq!(swipe_direction(Point::new(200.0, 0.0), Point::new(150.0, 0.0)), None);
    }

    #[test]
    fn vertical_swipe_is_ignored() {
        let dir = swipe_direction(Point::new(100.0, 300.0), Point::new(80.0, 240.0));
        assert_eq!(dir, None);
    }

    #[test]
    fn zones_split_the_surface_in_half() {
        assert_eq!(Zone::at(10.0, 800.0), Zone::Left);
        assert_eq!(Zone::at(400.0, 800.0), Zone::Right);
        assert_eq!(Zone::Left.direction(), Direction::Backward);
        assert_eq!(Zone::Right.direction(), Direction::Forward);
    }
}
