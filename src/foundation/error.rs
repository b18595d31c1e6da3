/// Convenience result type used across skinamp.
pub type SkinampResult<T> = Result<T, SkinampError>;

/// Top-level error taxonomy used by skin loading, interaction and playback APIs.
#[derive(thiserror::Error, Debug)]
pub enum SkinampError {
    /// A file requested from the skin bundle is not present.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// Corrupt or unsupported image/audio data.
    #[error("decode error: {0}")]
    Decode(String),

    /// Output device or playback session failure.
    #[error("playback error: {0}")]
    Playback(String),

    /// Invalid sprite declarations or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SkinampError {
    /// Build a [`SkinampError::AssetNotFound`] value.
    pub fn asset_not_found(name: impl Into<String>) -> Self {
        Self::AssetNotFound(name.into())
    }

    /// Build a [`SkinampError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SkinampError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`SkinampError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SkinampError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for [`SkinampError::AssetNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AssetNotFound(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
