//! The six faces of a cube map, in GPU layer order.

use glam::Vec3;

/// The six faces of a cube map.
///
/// The discriminant is the array layer used by the GPU texture and the index
/// into [`CubeMapSet`](crate::CubeMapSet) storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +X face
    PosX = 0,
    /// −X face
    NegX = 1,
    /// +Y face
    PosY = 2,
    /// −Y face
    NegY = 3,
    /// +Z face
    PosZ = 4,
    /// −Z face
    NegZ = 5,
}

impl CubeFace {
    /// All six faces in layer order: +X, −X, +Y, −Y, +Z, −Z.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Layer index in `0..6`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// File-name suffix used by face images (`face_PX.png`, ...).
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            CubeFace::PosX => "PX",
            CubeFace::NegX => "NX",
            CubeFace::PosY => "PY",
            CubeFace::NegY => "NY",
            CubeFace::PosZ => "PZ",
            CubeFace::NegZ => "NZ",
        }
    }

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn normal(self) -> Vec3 {
        match self {
            CubeFace::PosX => Vec3::X,
            CubeFace::NegX => Vec3::NEG_X,
            CubeFace::PosY => Vec3::Y,
            CubeFace::NegY => Vec3::NEG_Y,
            CubeFace::PosZ => Vec3::Z,
            CubeFace::NegZ => Vec3::NEG_Z,
        }
    }
}
