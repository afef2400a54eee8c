//! slidedeck: keyboard, pointer and touch driven slide presentations.
//!
//! The navigation core (`controller`, `deck`, `scheduler`, `input`,
//! `fullscreen`) is headless. The `window` feature adds image loading and a
//! raylib stage that renders a [`deck::Deck`].

pub mod constants;
pub mod controller;
pub mod deck;
pub mod error;
pub mod fullscreen;
pub mod input;
pub mod logging;
pub mod profile;
pub mod prompt;
pub mod scheduler;
pub mod texture_loader;

#[cfg(feature = "window")]
pub mod stage;

pub use controller::PresentationController;
pub use deck::{Deck, Surface};
pub use profile::Profile;
