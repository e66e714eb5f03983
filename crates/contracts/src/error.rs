//! Layered error definitions
//!
//! Categorized by source: config / colour / audio / detection / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Colour Errors =====
    /// Colour string parse error
    #[error("colour parse error for '{value}': {message}")]
    ColourParse { value: String, message: String },

    // ===== Audio Errors =====
    /// Audio capture device error
    #[error("audio device error: {message}")]
    AudioDevice { message: String },

    /// Audio stream error
    #[error("audio stream error: {message}")]
    AudioStream { message: String },

    /// Beat/pitch detection error
    #[error("detection error: {message}")]
    Detection { message: String },

    // ===== Sink Errors =====
    /// Publish error
    #[error("publish to '{topic}' failed: {message}")]
    SinkPublish { topic: String, message: String },

    /// Sink connection error
    #[error("sink '{sink_name}' connection error: {message}")]
    SinkConnection { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create colour parse error
    pub fn colour_parse(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ColourParse {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create audio device error
    pub fn audio_device(message: impl Into<String>) -> Self {
        Self::AudioDevice {
            message: message.into(),
        }
    }

    /// Create audio stream error
    pub fn audio_stream(message: impl Into<String>) -> Self {
        Self::AudioStream {
            message: message.into(),
        }
    }

    /// Create detection error
    pub fn detection(message: impl Into<String>) -> Self {
        Self::Detection {
            message: message.into(),
        }
    }

    /// Create publish error
    pub fn sink_publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkPublish {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create sink connection error
    pub fn sink_connection(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkConnection {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
