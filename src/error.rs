//! Error types for animation registration, playback and clip loading.
//!
//! Expected control-flow outcomes (a play request that loses the priority
//! gate, a name that resolves to nothing) are reported through boolean
//! returns and `log` warnings, matching the failure policy of the playback
//! API. The variants here cover the cases a caller should handle
//! explicitly rather than ignore.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimatorError {
    /// The animation data failed validation (empty name or no frames).
    #[error("invalid animation data: {0}")]
    InvalidAnimation(String),

    /// No animation with the given name or motion is registered.
    #[error("animation '{0}' not found")]
    NotFound(String),

    /// A seek operation was invoked while nothing is loaded.
    #[error("no active animation")]
    NoActiveAnimation,

    /// A clip definition could not be parsed.
    #[error("invalid clip data: {0}")]
    InvalidClipData(#[from] serde_json::Error),
}
