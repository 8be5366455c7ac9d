use crate::foundation::core::LayerId;

/// Convenience result type used across the crate.
pub type TowerResult<T> = Result<T, TowerError>;

/// Every failure a drawing session, transport or renderer can report.
#[derive(thiserror::Error, Debug)]
pub enum TowerError {
    /// A draw call or commit arrived with no open session.
    #[error("no active session: call start_drawing first")]
    NoActiveSession,

    /// `start_drawing` was called while a session is still open.
    #[error("a drawing session is already open on this client")]
    SessionAlreadyOpen,

    /// A rectangle with `min` beyond `max`.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The renderer has no font registered under this name.
    #[error("unknown font '{0}'")]
    UnknownFont(String),

    /// An autoroll entry index past the layer's text entries.
    #[error("invalid autoroll entry {entry} on layer {layer} ({count} entries)")]
    InvalidEntryIndex {
        layer: LayerId,
        entry: usize,
        count: usize,
    },

    /// The stream to the renderer could not be opened, written or read.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The renderer answered a commit with this non-empty message.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// Invalid user-provided data such as scripts, fonts or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TowerError {
    /// Build a [`TowerError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`TowerError::UnknownFont`] value.
    pub fn unknown_font(name: impl Into<String>) -> Self {
        Self::UnknownFont(name.into())
    }

    /// Build a [`TowerError::TransportFailure`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    /// Build a [`TowerError::RenderFailed`] value.
    pub fn render_failed(msg: impl Into<String>) -> Self {
        Self::RenderFailed(msg.into())
    }

    /// Build a [`TowerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TowerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<std::io::Error> for TowerError {
    fn from(err: std::io::Error) -> Self {
        Self::TransportFailure(err.to_string())
    }
}

impl From<serde_json::Error> for TowerError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return Self::TransportFailure(err.to_string());
        }
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
