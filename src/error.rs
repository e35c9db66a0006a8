//! Error types for the engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No audio output capability; fatal to the whole engine.
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// Microphone denied or failed; the rest of the engine keeps running.
    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Invalid pitch: {0} Hz. Must be a finite value above zero")]
    InvalidPitch(f32),

    #[error("Audio graph is not active")]
    Inactive,

    #[error("Graph command queue is full")]
    QueueFull,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, EngineError>;
