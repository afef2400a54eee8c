//! Numeric "go to slide" entry field.
//!
//! While open it holds text-entry focus on the deck and owns its editing keys
//! (Enter, Escape, Backspace) before navigation sees them.

use crate::controller::PresentationController;
use crate::deck::Deck;
use crate::input::Key;

const MAX_DIGITS: usize = 4;

#[derive(Debug, Default)]
pub struct GoToPrompt {
    text: Option<String>,
}

impl GoToPrompt {
    pub fn is_open(&self) -> bool {
        self.text.is_some()
    }

    /// Digits typed so far, or `None` when the prompt is closed.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn open(&mut self, deck: &mut Deck) {
        self.text = Some(String::new());
        deck.set_text_entry_focused(true);
    }

    fn close(&mut self, deck: &mut Deck) {
        self.text = None;
        deck.set_text_entry_focused(false);
    }

    /// Appends a typed character; anything but a digit is ignored.
    pub fn push(&mut self, c: char) {
        if let Some(text) = self.text.as_mut() {
            if c.is_ascii_digit() && text.len() < MAX_DIGITS {
                text.push(c);
            }
        }
    }

    /// Returns true when the key was consumed by the open prompt.
    pub fn handle_key(
        &mut self,
        key: Key,
        controller: &mut PresentationController,
        deck: &mut Deck,
    ) -> bool {
        let Some(text) = self.text.as_mut() else {
            return false;
        };
        match key {
            Key::Enter => {
                if let Ok(n) = text.parse::<usize>() {
                    tracing::debug!(slide = n, "go-to prompt submitted");
                    controller.jump_to_slide(n, deck);
                }
                self.close(deck);
                true
            }
            Key::Escape => {
                self.close(deck);
                true
            }
            Key::Backspace => {
                text.pop();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::deck::Surface;
    use crate::profile::Profile;

    fn open_with(profile: Profile, total: usize) -> (GoToPrompt, PresentationController, Deck) {
        let mut deck = Deck::new(total).unwrap();
        let controller = PresentationController::new(profile, &mut deck).unwrap();
        let mut prompt = GoToPrompt::default();
        prompt.open(&mut deck);
        (prompt, controller, deck)
    }

    #[test]
    fn enter_jumps_to_the_typed_slide_in_classic_profile() {
        let (mut prompt, mut c, mut deck) = open_with(Profile::classic(), 5);
        prompt.push('3');

        assert!(prompt.handle_key(Key::Enter, &mut c, &mut deck));
        c.tick(Duration::from_millis(1000), &mut deck);

        assert_eq!(c.current_slide(), 3);
        assert!(!prompt.is_open());
        assert!(!deck.text_entry_focused());
    }

    #[test]
    fn editing_keeps_digits_only_and_backspace_erases() {
        let (mut prompt, mut c, mut deck) = open_with(Profile::modern(), 3);
        assert!(deck.text_entry_focused());
        for ch in ['1', 'x', '2', '3', '4', '5'] {
            prompt.push(ch);
        }
        assert_eq!(prompt.text(), Some("1234"));

        assert!(prompt.handle_key(Key::Backspace, &mut c, &mut deck));
        assert_eq!(prompt.text(), Some("123"));
        assert!(!c.is_transitioning());
    }

    #[test]
    fn escape_closes_without_navigating() {
        let (mut prompt, mut c, mut deck) = open_with(Profile::classic(), 4);
        prompt.push('2');
        assert!(prompt.handle_key(Key::Escape, &mut c, &mut deck));
        assert!(!prompt.is_open());
        assert!(!c.is_transitioning());
        assert_eq!(c.current_slide(), 1);
    }

    #[test]
    fn navigation_keys_pass_through_and_closed_prompt_consumes_nothing() {
        let (mut prompt, mut c, mut deck) = open_with(Profile::modern(), 4);
        assert!(!prompt.handle_key(Key::Right, &mut c, &mut deck));

        prompt.handle_key(Key::Escape, &mut c, &mut deck);
        assert!(!prompt.handle_key(Key::Enter, &mut c, &mut deck));
        prompt.push('2');
        assert_eq!(prompt.text(), None);
    }
}
