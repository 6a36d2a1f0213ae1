//! Cube-map loading error types.

use std::path::PathBuf;

use crate::CubeFace;

/// Errors produced while reading, decoding, or validating a face image.
///
/// None of these are fatal to rendering: a face that fails to load is left
/// missing and samples as zero.
#[derive(Debug, thiserror::Error)]
pub enum CubeMapError {
    /// The face file could not be opened or decoded.
    #[error("failed to load {face:?} face from {path}: {source}")]
    Image {
        face: CubeFace,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Cube faces must be square.
    #[error("{face:?} face is {width}x{height}, cube faces must be square")]
    NotSquare {
        face: CubeFace,
        width: u32,
        height: u32,
    },

    /// Every face of one cube map must share a size.
    #[error("{face:?} face is {actual}px but the cube map is {expected}px")]
    SizeMismatch {
        face: CubeFace,
        expected: u32,
        actual: u32,
    },
}

impl CubeMapError {
    /// The face this error concerns.
    pub fn face(&self) -> CubeFace {
        match self {
            Self::Image { face, .. }
            | Self::NotSquare { face, .. }
            | Self::SizeMismatch { face, .. } => *face,
        }
    }
}
