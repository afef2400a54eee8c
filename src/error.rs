use std::path::PathBuf;

/// Reasons a profile cannot be loaded or used.
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    /// No built-in profile has this name
    #[error("unknown profile '{0}' (expected 'modern' or 'classic')")]
    UnknownProfile(String),

    /// The enter phase would land at or after the settle phase
    #[error("enter delay ({enter_ms}ms) must be shorter than the transition duration ({duration_ms}ms)")]
    PhaseOrder { enter_ms: u64, duration_ms: u64 },

    /// Offset distance is negative, NaN or infinite
    #[error("offset distance must be a finite, non-negative number, got {0}")]
    InvalidOffset(f32),

    /// The config file could not be read
    #[error("failed to read profile file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for a profile
    #[error("failed to parse profile file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A fullscreen request the backend could not honour.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FullscreenError {
    /// The window backend offers no way to go fullscreen
    #[error("fullscreen is not supported by this display backend")]
    Unsupported,

    /// The backend refused the request
    #[error("fullscreen request rejected: {0}")]
    Rejected(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("a presentation needs at least one slide")]
    Empty,
}
