/// Convenience result type used across the generator.
pub type TestcardResult<T> = Result<T, TestcardError>;

/// Top-level error taxonomy used by generator APIs.
#[derive(thiserror::Error, Debug)]
pub enum TestcardError {
    /// Invalid configuration or caller-provided dimensions.
    #[error("validation error: {0}")]
    Validation(String),

    /// The font bitmap is malformed; diagnostics cannot be rendered without it.
    #[error("font parse error: {0}")]
    FontParse(String),

    /// The frame sink failed in a way the driver loop cannot continue past.
    #[error("sink error: {0}")]
    Sink(String),

    /// The frame sink refused a single frame. Non-fatal for the driver loop.
    #[error("sink rejected frame: {0}")]
    SinkRejected(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TestcardError {
    /// Build a [`TestcardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TestcardError::FontParse`] value.
    pub fn font_parse(msg: impl Into<String>) -> Self {
        Self::FontParse(msg.into())
    }

    /// Build a [`TestcardError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build a [`TestcardError::SinkRejected`] value.
    pub fn sink_rejected(msg: impl Into<String>) -> Self {
        Self::SinkRejected(msg.into())
    }

    /// Return `true` when the driver loop may keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SinkRejected(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
