use std::{fmt, str::FromStr};

use shared::domain::RecipeId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("recipe {0} not found")]
    NotFound(RecipeId),
    #[error("catalog returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    #[error("interpreter returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("interpreter request failed: {0}")]
    Transport(String),
    #[error("interpreter response could not be decoded: {0}")]
    Decode(String),
}

/// Terminal failure reported by a speech recognizer for one listen session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognitionErrorKind {
    NoSpeech,
    NotAllowed,
    Aborted,
    Network,
    /// The platform has no recognizer at all; voice input stays disabled.
    Unsupported,
}

impl RecognitionErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::NoSpeech => "no-speech",
            Self::NotAllowed => "not-allowed",
            Self::Aborted => "aborted",
            Self::Network => "network",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown recognition error code '{0}'")]
pub struct UnknownRecognitionError(pub String);

impl FromStr for RecognitionErrorKind {
    type Err = UnknownRecognitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-speech" => Ok(Self::NoSpeech),
            "not-allowed" | "service-not-allowed" => Ok(Self::NotAllowed),
            "aborted" => Ok(Self::Aborted),
            "network" => Ok(Self::Network),
            "unsupported" | "language-not-supported" => Ok(Self::Unsupported),
            other => Err(UnknownRecognitionError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionStartError {
    #[error("speech recognition is not supported on this platform")]
    Unsupported,
    #[error("recognizer could not start: {0}")]
    Device(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    RecipeList,
    Recipe(RecipeId),
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecipeList => f.write_str("recipe list"),
            Self::Recipe(id) => write!(f, "recipe {id}"),
        }
    }
}

/// Every failure the assistant can run into. None of them are fatal; each is
/// converted into a status line and narration where it happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    #[error("failed to fetch {target}: {source}")]
    FetchFailure {
        target: FetchTarget,
        #[source]
        source: CatalogError,
    },
    #[error("speech recognition failed: {0}")]
    RecognitionFailure(RecognitionErrorKind),
    #[error("speech synthesis failed: {0}")]
    SynthesisFailure(String),
    #[error("command interpretation failed: {0}")]
    InterpreterFailure(#[from] InterpreterError),
    #[error("step {requested} is out of range for a recipe with {step_count} steps")]
    InvalidStep { requested: usize, step_count: usize },
}
