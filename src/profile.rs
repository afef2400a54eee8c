//! Timing and feature profiles for slide transitions.
//!
//! Two profiles ship built in. `modern` uses a short 300ms transition with a
//! 30 unit slide-in, shows the progress bar and ignores navigation keys while a
//! text field has focus. `classic` uses a slower 500ms transition with a 100
//! unit slide-in and neither optional feature.
//!
//! A profile file picks a base profile and may override any field:
//!
//! ```toml
//! base = "classic"
//! transition_ms = 400
//! progress_bar = true
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ProfileError;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    /// Delay between the commit phase and the enter phase.
    pub enter_delay: Duration,
    /// Delay between the commit phase and the settle phase.
    pub transition: Duration,
    /// Horizontal distance a slide travels when entering or leaving.
    pub offset: f32,
    pub progress_bar: bool,
    pub suppress_on_text_entry: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    base: Option<String>,
    enter_delay_ms: Option<u64>,
    transition_ms: Option<u64>,
    offset: Option<f32>,
    progress_bar: Option<bool>,
    suppress_on_text_entry: Option<bool>,
}

impl Profile {
    pub fn modern() -> Self {
        Self {
            name: "modern".to_string(),
            enter_delay: Duration::from_millis(10),
            transition: Duration::from_millis(300),
            offset: 30.0,
            progress_bar: true,
            suppress_on_text_entry: true,
        }
    }

    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            enter_delay: Duration::from_millis(10),
            transition: Duration::from_millis(500),
            offset: 100.0,
            progress_bar: false,
            suppress_on_text_entry: false,
        }
    }

    pub fn by_name(name: &str) -> Result<Self, ProfileError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Self::modern()),
            "classic" => Ok(Self::classic()),
            _ => Err(ProfileError::UnknownProfile(name.to_string())),
        }
    }

    /// Parses a profile file, starting from `fallback` when the file names no base.
    pub fn from_toml_str(text: &str, fallback: &str) -> Result<Self, ProfileError> {
        let file: ProfileFile = toml::from_str(text)?;
        let mut profile = Self::by_name(file.base.as_deref().unwrap_or(fallback))?;

        if let Some(ms) = file.enter_delay_ms {
            profile.enter_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.transition_ms {
            profile.transition = Duration::from_millis(ms);
        }
        if let Some(offset) = file.offset {
            profile.offset = offset;
        }
        if let Some(flag) = file.progress_bar {
            profile.progress_bar = flag;
        }
        if let Some(flag) = file.suppress_on_text_entry {
            profile.suppress_on_text_entry = flag;
        }

        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path, fallback: &str) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, fallback)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.enter_delay >= self.transition {
            return Err(ProfileError::PhaseOrder {
                enter_ms: self.enter_delay.as_millis() as u64,
                duration_ms: self.transition.as_millis() as u64,
            });
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(ProfileError::InvalidOffset(self.offset));
        }
        Ok(())
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::modern()
    }
}
