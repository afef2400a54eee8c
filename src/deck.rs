//! The document-like surface the presentation controller drives.
//!
//! Slides are addressed by their 1-based ordinal. A slot may be unresolved
//! (its element could not be produced), in which case lookups return `None` but the
//! ordinal sequence keeps its length. Status elements (counter, progress fill,
//! fullscreen button) are optional and simply absent when not wanted.

use crate::error::DeckError;

/// Presentational state of a single slide element.
///
/// `active` and `previous` play the role of style classes. `offset` and
/// `opacity` are inline overrides; `None` leaves the slide to its static
/// style rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideStyle {
    pub active: bool,
    pub previous: bool,
    pub offset: Option<f32>,
    pub opacity: Option<f32>,
    pub hidden: bool,
    animation_generation: u32,
}

impl SlideStyle {
    pub fn clear_overrides(&mut self) {
        self.offset = None;
        self.opacity = None;
    }

    /// Restarts the entry animations of the slide's content from the beginning.
    pub fn restart_animations(&mut self) {
        self.animation_generation = self.animation_generation.wrapping_add(1);
    }

    pub fn animation_generation(&self) -> u32 {
        self.animation_generation
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    pub current: String,
    pub total: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressFill {
    /// Width of the fill in percent of the track.
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenIcon {
    Expand,
    Collapse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullscreenButton {
    pub icon: FullscreenIcon,
    pub title: String,
}

impl Default for FullscreenButton {
    fn default() -> Self {
        Self {
            icon: FullscreenIcon::Expand,
            title: "Enter Fullscreen".to_string(),
        }
    }
}

/// Element lookup and mutation as seen by the presentation controller.
pub trait Surface {
    /// Number of slide positions, resolved or not.
    fn slide_count(&self) -> usize;
    fn slide(&self, ordinal: usize) -> Option<&SlideStyle>;
    fn slide_mut(&mut self, ordinal: usize) -> Option<&mut SlideStyle>;
    fn counter_mut(&mut self) -> Option<&mut Counter>;
    fn progress_mut(&mut self) -> Option<&mut ProgressFill>;
    fn fullscreen_button_mut(&mut self) -> Option<&mut FullscreenButton>;
    /// True while a text-entry field holds keyboard focus.
    fn text_entry_focused(&self) -> bool;
    /// Hides and re-shows every slide so layout is recomputed.
    fn reflow(&mut self);
}

/// In-memory slide surface. The window stage renders from it.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Option<SlideStyle>>,
    counter: Option<Counter>,
    progress: Option<ProgressFill>,
    fullscreen_button: Option<FullscreenButton>,
    text_entry_focused: bool,
    layout_generation: u32,
}

impl Deck {
    /// Creates a deck of `total` resolved slides with every status element present.
    pub fn new(total: usize) -> Result<Self, DeckError> {
        Self::from_slots(std::iter::repeat_n(true, total))
    }

    /// Creates a deck from per-slot resolution flags; `false` marks a slot whose
    /// element could not be produced.
    pub fn from_slots(resolved: impl IntoIterator<Item = bool>) -> Result<Self, DeckError> {
        let mut slides: Vec<Option<SlideStyle>> = resolved
            .into_iter()
            .map(|ok| ok.then(SlideStyle::default))
            .collect();
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        if let Some(first) = slides[0].as_mut() {
            first.active = true;
        }

        Ok(Self {
            slides,
            counter: Some(Counter::default()),
            progress: Some(ProgressFill::default()),
            fullscreen_button: Some(FullscreenButton::default()),
            text_entry_focused: false,
            layout_generation: 0,
        })
    }

    pub fn without_counter(mut self) -> Self {
        self.counter = None;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.progress = None;
        self
    }

    pub fn without_fullscreen_button(mut self) -> Self {
        self.fullscreen_button = None;
        self
    }

    pub fn counter(&self) -> Option<&Counter> {
        self.counter.as_ref()
    }

    pub fn progress(&self) -> Option<&ProgressFill> {
        self.progress.as_ref()
    }

    pub fn fullscreen_button(&self) -> Option<&FullscreenButton> {
        self.fullscreen_button.as_ref()
    }

    pub fn set_text_entry_focused(&mut self, focused: bool) {
        self.text_entry_focused = focused;
    }

    /// Bumped on every reflow; renderers recompute cached layout when it changes.
    pub fn layout_generation(&self) -> u32 {
        self.layout_generation
    }

    /// Iterates `(ordinal, style)` over every resolved slide.
    pub fn slides(&self) -> impl Iterator<Item = (usize, &SlideStyle)> {
        self.slides
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|style| (i + 1, style)))
    }
}

impl Surface for Deck {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn slide(&self, ordinal: usize) -> Option<&SlideStyle> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.slides.get(i))
            .and_then(Option::as_ref)
    }

    fn slide_mut(&mut self, ordinal: usize) -> Option<&mut SlideStyle> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.slides.get_mut(i))
            .and_then(Option::as_mut)
    }

    fn counter_mut(&mut self) -> Option<&mut Counter> {
        self.counter.as_mut()
    }

    fn progress_mut(&mut self) -> Option<&mut ProgressFill> {
        self.progress.as_mut()
    }

    fn fullscreen_button_mut(&mut self) -> Option<&mut FullscreenButton> {
        self.fullscreen_button.as_mut()
    }

    fn text_entry_focused(&self) -> bool {
        self.text_entry_focused
    }

    fn reflow(&mut self) {
        for style in self.slides.iter_mut().flatten() {
            style.hidden = true;
        }
        self.layout_generation = self.layout_generation.wrapping_add(1);
        for style in self.slides.iter_mut().flatten() {
            style.hidden = false;
        }
    }
}
