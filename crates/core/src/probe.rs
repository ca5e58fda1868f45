//! Reads intrinsic geometry from image headers.

use crate::{Dimensions, ProbeError};
use image::ImageReader;
use std::path::Path;

/// Source of image geometry for a path.
///
/// The cache is generic over this so tests can swap in an in-memory probe.
pub trait ImageProbe: Send + Sync {
    /// Reads the pixel size of the image at `path`.
    fn probe(&self, path: &Path) -> Result<Dimensions, ProbeError>;
}

/// Probe backed by the filesystem and the `image` crate's header decoders.
///
/// Only the header is decoded; pixel data is never read.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl ImageProbe for FsProbe {
    fn probe(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        let io_error = |source| ProbeError::Io {
            path: path.to_path_buf(),
            source,
        };
        let reader = ImageReader::open(path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?;
        let (width, height) = reader.into_dimensions().map_err(|source| ProbeError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Dimensions::new(width, height).ok_or_else(|| ProbeError::EmptyGeometry {
            path: path.to_path_buf(),
            width,
            height,
        })
    }
}
