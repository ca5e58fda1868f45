use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading intrinsic image geometry.
///
/// These never leave the rewriters: a failed probe means "leave the tag as authored".
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was probed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The header could not be decoded (unknown or corrupt format).
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        /// Path that was probed.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
    /// The header decoded but reported a zero-sized axis.
    #[error("image {} reports empty geometry {width}x{height}", .path.display())]
    EmptyGeometry {
        /// Path that was probed.
        path: PathBuf,
        /// Reported width.
        width: u32,
        /// Reported height.
        height: u32,
    },
}

impl ProbeError {
    /// Path of the image that failed to probe.
    pub fn path(&self) -> &PathBuf {
        match self {
            ProbeError::Io { path, .. } => path,
            ProbeError::Decode { path, .. } => path,
            ProbeError::EmptyGeometry { path, .. } => path,
        }
    }
}

/// Errors emitted while loading a [`crate::PluginConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed into a config.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// An extension entry was empty.
    #[error("Config error: empty extension in `{field}`")]
    EmptyExtension {
        /// Name of the offending field.
        field: &'static str,
    },
}
