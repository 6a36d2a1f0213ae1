//! Icosahedral sphere generation.
//!
//! Each of the 20 icosahedron faces is split into a triangular grid with
//! `detail + 1` segments per edge, giving `(detail + 1)²` triangles per face.
//! Grid points are projected onto the sphere. Vertices on shared icosahedron
//! edges and corners are emitted once.

use std::collections::HashMap;

use glam::Vec3;

/// A triangulated sphere centered on the origin.
#[derive(Clone, Debug)]
pub struct IcoSphere {
    /// Sphere radius.
    pub radius: f32,
    /// Edge splits per icosahedron face.
    pub detail: u32,
    /// Vertex positions at distance `radius` from the origin.
    pub positions: Vec<Vec3>,
    /// Outward unit normals, `positions[i] / radius`.
    pub normals: Vec<Vec3>,
    /// Counter-clockwise (outward-facing) triangle list.
    pub indices: Vec<u32>,
}

impl IcoSphere {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The 12 unit vertices and 20 outward-wound faces of a regular icosahedron.
pub fn icosahedron() -> ([Vec3; 12], [[u32; 3]; 20]) {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(Vec3::normalize);
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (corners, faces)
}

/// Identifies a grid point lying on an icosahedron edge or corner, so faces
/// sharing it reuse one vertex. `(lo, hi, steps_from_lo)` with `lo < hi`;
/// corners use `hi == lo` and `steps == 0`.
type SharedKey = (u32, u32, u32);

fn shared_key(weights: [(u32, u32); 3]) -> Option<SharedKey> {
    let mut nonzero = [(0, 0); 3];
    let mut count = 0;
    for (corner, w) in weights {
        if w > 0 {
            nonzero[count] = (corner, w);
            count += 1;
        }
    }
    let hits = &mut nonzero[..count];
    hits.sort_unstable();
    match *hits {
        [(corner, _)] => Some((corner, corner, 0)),
        [(lo, w_lo), (hi, _)] => Some((lo, hi, w_lo)),
        _ => None,
    }
}

/// Largest accepted `detail`. Keeps every vertex index, and the per-face
/// grid arithmetic, inside `u32`.
pub const MAX_DETAIL: u32 = 4095;

/// `detail` limited to [`MAX_DETAIL`].
fn clamp_detail(detail: u32) -> u32 {
    if detail > MAX_DETAIL {
        tracing::warn!("Icosphere detail {detail} exceeds {MAX_DETAIL}, clamping");
        MAX_DETAIL
    } else {
        detail
    }
}

/// Build a sphere of `radius` with `detail` extra edge splits per face.
///
/// `detail = 0` is the bare icosahedron. The total triangle count is
/// `20 * (detail + 1)²`. Values above [`MAX_DETAIL`] are clamped.
pub fn icosphere(radius: f32, detail: u32) -> IcoSphere {
    let detail = clamp_detail(detail);
    let (corners, faces) = icosahedron();
    let n = detail + 1;
    let segments = n as usize;

    let mut positions: Vec<Vec3> = Vec::with_capacity(10 * segments * segments + 2);
    let mut indices: Vec<u32> = Vec::with_capacity(20 * segments * segments * 3);
    let mut shared: HashMap<SharedKey, u32> = HashMap::new();

    // Row-major grid of one face: point (i, j) with i + j <= n.
    let mut grid: Vec<u32> = Vec::with_capacity((segments + 1) * (segments + 2) / 2);

    for face in faces {
        let [ia, ib, ic] = face;
        let (a, b, c) = (corners[ia as usize], corners[ib as usize], corners[ic as usize]);
        grid.clear();

        for i in 0..=n {
            for j in 0..=(n - i) {
                let wa = n - i - j;
                let key = shared_key([(ia, wa), (ib, i), (ic, j)]);
                if let Some(key) = key
                    && let Some(&existing) = shared.get(&key)
                {
                    grid.push(existing);
                    continue;
                }
                let point = (a * wa as f32 + b * i as f32 + c * j as f32) / n as f32;
                let index = positions.len() as u32;
                positions.push(point.normalize());
                if let Some(key) = key {
                    shared.insert(key, index);
                }
                grid.push(index);
            }
        }

        // Offset of row i in `grid`: rows shrink from n + 1 points to 1.
        let row = |i: u32| (i * (2 * n + 3 - i) / 2) as usize;
        let at = |i: u32, j: u32| grid[row(i) + j as usize];
        for i in 0..n {
            for j in 0..(n - i) {
                indices.extend_from_slice(&[at(i, j), at(i + 1, j), at(i, j + 1)]);
                if i + j + 2 <= n {
                    indices.extend_from_slice(&[at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)]);
                }
            }
        }
    }

    let normals = positions.clone();
    for p in &mut positions {
        *p *= radius;
    }

    tracing::debug!(
        "Built icosphere: radius {radius}, detail {detail}, {} vertices, {} triangles",
        positions.len(),
        indices.len() / 3
    );

    IcoSphere {
        radius,
        detail,
        positions,
        normals,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_count_follows_detail() {
        for detail in [0, 1, 2, 7] {
            let mesh = icosphere(1.0, detail);
            let n = (detail + 1) as usize;
            assert_eq!(mesh.triangle_count(), 20 * n * n, "detail {detail}");
        }
    }

    #[test]
    fn test_shared_vertices_are_not_duplicated() {
        // Euler: V = 10 * n² + 2 for a closed frequency-n icosphere.
        for detail in [0, 1, 4] {
            let mesh = icosphere(1.0, detail);
            let n = (detail + 1) as usize;
            assert_eq!(mesh.vertex_count(), 10 * n * n + 2, "detail {detail}");
        }
    }

    #[test]
    fn test_vertices_lie_on_radius() {
        let mesh = icosphere(10.0, 6);
        for pos in &mesh.positions {
            assert!((pos.length() - 10.0).abs() < 1e-4, "vertex off sphere: {pos:?}");
        }
    }

    #[test]
    fn test_normals_are_unit_and_radial() {
        let mesh = icosphere(10.0, 3);
        for (pos, normal) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((normal.length() - 1.0).abs() < 1e-5);
            assert!((*pos / 10.0 - *normal).length() < 1e-5);
        }
    }

    #[test]
    fn test_indices_valid() {
        let mesh = icosphere(1.0, 5);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&idx| idx < n));
    }

    #[test]
    fn test_triangles_wind_outward() {
        let mesh = icosphere(1.0, 3);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn test_bare_icosahedron() {
        let mesh = icosphere(2.0, 0);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);
    }

    #[test]
    fn test_shared_key_identifies_edges_and_corners() {
        assert_eq!(shared_key([(4, 3), (1, 0), (9, 0)]), Some((4, 4, 0)));
        assert_eq!(shared_key([(7, 2), (3, 5), (5, 0)]), Some((3, 7, 5)));
        assert_eq!(shared_key([(0, 1), (1, 1), (2, 1)]), None);
    }

    #[test]
    fn test_detail_is_clamped_before_overflow() {
        assert_eq!(clamp_detail(500), 500);
        assert_eq!(clamp_detail(MAX_DETAIL), MAX_DETAIL);
        assert_eq!(clamp_detail(u32::MAX), MAX_DETAIL);

        // Every index of the largest mesh fits in u32.
        let n = u64::from(MAX_DETAIL) + 1;
        assert!(10 * n * n + 2 <= u64::from(u32::MAX));
    }
}
