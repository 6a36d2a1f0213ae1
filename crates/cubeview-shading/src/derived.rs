use glam::{Quat, Vec3};

use cubeview_cubemap::{CubeMapSet, Filter, finite_difference_normal};

/// Normal of the displaced surface `d * (radius + h(d) * k)` rebuilt from
/// three height samples.
///
/// The tangent is `rotate_y(dir, 180°) × dir`. That vanishes on the equator
/// and at the poles; there the four-sample [`finite_difference_normal`] is
/// used instead. The result is flipped to face away from the origin.
pub fn derived_normal(
    height: Option<&CubeMapSet>,
    dir: Vec3,
    epsilon: f32,
    radius: f32,
    displacement_scale: f32,
) -> Vec3 {
    let Some(dir) = dir.try_normalize() else {
        return Vec3::ZERO;
    };
    let rotated = Quat::from_rotation_y(std::f32::consts::PI) * dir;
    let cross = rotated.cross(dir);
    if cross.length_squared() <= 1e-8 {
        let blank = CubeMapSet::blank();
        let map = height.unwrap_or(&blank);
        return finite_difference_normal(map, dir, epsilon, radius, displacement_scale);
    }
    let tangent = cross.normalize();
    let bitangent = dir.cross(tangent).normalize();

    let position = |d: Vec3| {
        let d = d.normalize();
        let h = height.map_or(0.0, |m| m.sample(d, Filter::Bilinear).x);
        d * (radius + h * displacement_scale)
    };
    let p0 = position(dir);
    let p1 = position(dir + tangent * epsilon);
    let p2 = position(dir + bitangent * epsilon);

    let n = (p1 - p0).cross(p2 - p0).normalize_or_zero();
    if n.dot(dir) < 0.0 { -n } else { n }
}
