//! Surface normals estimated from a height cube map.

use glam::Vec3;

use crate::{CubeMapSet, Filter};

/// Tangent and bitangent around `dir`, built from world-up, or world-X near the poles.
pub fn tangent_basis(dir: Vec3) -> (Vec3, Vec3) {
    let axis = if dir.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
    let tangent = axis.cross(dir).normalize();
    let bitangent = dir.cross(tangent).normalize();
    (tangent, bitangent)
}

/// Outward normal of the displaced surface `d * (radius + h(d) * scale)` at `dir`.
///
/// Four neighbouring directions `step` apart (along the tangent and bitangent,
/// both ways) are displaced by their bilinear height, and the normals of the
/// two triangles they span are averaged. A flat height map yields `dir`
/// itself. Returns `Vec3::ZERO` for a zero direction.
pub fn finite_difference_normal(
    height: &CubeMapSet,
    dir: Vec3,
    step: f32,
    radius: f32,
    scale: f32,
) -> Vec3 {
    let Some(dir) = dir.try_normalize() else {
        return Vec3::ZERO;
    };
    let (tangent, bitangent) = tangent_basis(dir);

    let displaced = |d: Vec3| {
        let d = d.normalize();
        d * (radius + height.sample(d, Filter::Bilinear).x * scale)
    };
    let p1 = displaced(dir + tangent * step);
    let p2 = displaced(dir + bitangent * step);
    let p3 = displaced(dir - tangent * step);
    let p4 = displaced(dir - bitangent * step);

    let n1 = (p2 - p1).cross(p3 - p1);
    let n2 = (p3 - p1).cross(p4 - p1);
    (n1 + n2).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_flat_height_gives_radial_normal() {
        let flat = CubeMapSet::solid(16, Vec4::splat(0.5));
        for dir in [Vec3::Z, Vec3::NEG_X, Vec3::new(0.3, -0.4, 0.8), Vec3::Y] {
            let n = finite_difference_normal(&flat, dir, 0.01, 1.0, 2.0);
            assert!(n.dot(dir.normalize()) > 0.999, "{dir:?} -> {n:?}");
        }
    }

    #[test]
    fn test_missing_height_map_still_points_outward() {
        let blank = CubeMapSet::blank();
        let n = finite_difference_normal(&blank, Vec3::new(1.0, 1.0, 0.0), 0.01, 1.0, 1.0);
        assert!(n.dot(Vec3::new(1.0, 1.0, 0.0).normalize()) > 0.999);
    }

    #[test]
    fn test_slope_tilts_normal_downhill() {
        // Height grows with x, so the surface leans away from +x.
        let ramp = CubeMapSet::from_fn(64, |_, d| Vec4::new(d.x * 0.5 + 0.5, 0.0, 0.0, 1.0));
        let n = finite_difference_normal(&ramp, Vec3::Z, 0.02, 1.0, 1.0);
        assert!(n.z > 0.0);
        assert!(n.x < -0.1, "{n:?}");
    }

    #[test]
    fn test_larger_radius_flattens_slope() {
        let ramp = CubeMapSet::from_fn(64, |_, d| Vec4::new(d.x * 0.5 + 0.5, 0.0, 0.0, 1.0));
        let unit = finite_difference_normal(&ramp, Vec3::Z, 0.02, 1.0, 1.0);
        let wide = finite_difference_normal(&ramp, Vec3::Z, 0.02, 10.0, 1.0);
        assert!(wide.dot(Vec3::Z) > unit.dot(Vec3::Z), "{unit:?} vs {wide:?}");
    }

    #[test]
    fn test_pole_uses_fallback_basis() {
        let (t, b) = tangent_basis(Vec3::Y);
        assert!(t.is_finite() && b.is_finite());
        assert!(t.dot(Vec3::Y).abs() < 1e-6 && b.dot(Vec3::Y).abs() < 1e-6);
        let blank = CubeMapSet::blank();
        assert!(finite_difference_normal(&blank, Vec3::NEG_Y, 0.01, 1.0, 1.0).y < -0.999);
    }

    #[test]
    fn test_zero_direction_yields_zero() {
        let blank = CubeMapSet::blank();
        assert_eq!(finite_difference_normal(&blank, Vec3::ZERO, 0.01, 1.0, 1.0), Vec3::ZERO);
    }
}
