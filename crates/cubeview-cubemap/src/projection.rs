//! Direction ↔ (face, uv) mapping.
//!
//! Uses the same major-axis convention as WebGPU/Vulkan cube textures so CPU
//! samples agree with `textureSample` on a `texture_cube`. `uv` is in `[0, 1]`
//! with `v = 0` on the first image row.

use glam::{Vec2, Vec3};

use crate::CubeFace;

/// Map a direction to its cube face and face UV.
///
/// The direction does not need to be normalized. Returns `None` for a zero or
/// non-finite direction, which callers treat as a missing sample.
pub fn direction_to_face_uv(dir: Vec3) -> Option<(CubeFace, Vec2)> {
    if !dir.is_finite() || dir.length_squared() == 0.0 {
        return None;
    }
    let abs = dir.abs();
    let (face, sc, tc, ma) = if abs.x >= abs.y && abs.x >= abs.z {
        if dir.x > 0.0 {
            (CubeFace::PosX, -dir.z, -dir.y, abs.x)
        } else {
            (CubeFace::NegX, dir.z, -dir.y, abs.x)
        }
    } else if abs.y >= abs.z {
        if dir.y > 0.0 {
            (CubeFace::PosY, dir.x, dir.z, abs.y)
        } else {
            (CubeFace::NegY, dir.x, -dir.z, abs.y)
        }
    } else if dir.z > 0.0 {
        (CubeFace::PosZ, dir.x, -dir.y, abs.z)
    } else {
        (CubeFace::NegZ, -dir.x, -dir.y, abs.z)
    };
    let uv = Vec2::new(sc / ma, tc / ma) * 0.5 + 0.5;
    Some((face, uv.clamp(Vec2::ZERO, Vec2::ONE)))
}

/// Unit direction through `uv` on `face`. Inverse of [`direction_to_face_uv`].
pub fn face_uv_to_direction(face: CubeFace, uv: Vec2) -> Vec3 {
    let s = uv.x * 2.0 - 1.0;
    let t = uv.y * 2.0 - 1.0;
    let dir = match face {
        CubeFace::PosX => Vec3::new(1.0, -t, -s),
        CubeFace::NegX => Vec3::new(-1.0, -t, s),
        CubeFace::PosY => Vec3::new(s, 1.0, t),
        CubeFace::NegY => Vec3::new(s, -1.0, -t),
        CubeFace::PosZ => Vec3::new(s, -t, 1.0),
        CubeFace::NegZ => Vec3::new(-s, -t, -1.0),
    };
    dir.normalize()
}
