//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the axon kernel
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided at an API boundary
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Container configuration misuse, e.g. module lifecycle violations
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },

    /// No binding satisfied the request and fallback synthesis did not help
    #[error("Unable to resolve service {service}: no matching bindings are available")]
    NotResolved {
        /// The requested service that could not be resolved
        service: String,
    },

    /// Two or more top-precedence candidates tied under a unique request
    #[error(
        "Unable to resolve service {service}: multiple candidate bindings share the highest precedence"
    )]
    Ambiguous {
        /// The requested service that resolved ambiguously
        service: String,
        /// Descriptions of the tied candidate bindings
        candidates: Vec<String>,
    },

    /// Failure surfaced from a provider or the activation pipeline
    #[error("Activation error: {message}")]
    Activation {
        /// Description of the activation failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not-resolved error for the named service
    pub fn not_resolved<S: Into<String>>(service: S) -> Self {
        Self::NotResolved {
            service: service.into(),
        }
    }

    /// Create an ambiguity error for the named service
    pub fn ambiguous<S: Into<String>>(service: S, candidates: Vec<String>) -> Self {
        Self::Ambiguous {
            service: service.into(),
            candidates,
        }
    }

    /// Create an activation error
    pub fn activation<S: Into<String>>(message: S) -> Self {
        Self::Activation {
            message: message.into(),
            source: None,
        }
    }

    /// Create an activation error with an underlying source
    pub fn activation_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Activation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
