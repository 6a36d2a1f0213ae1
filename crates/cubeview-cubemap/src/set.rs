//! In-memory cube maps and CPU sampling.

use glam::{Vec2, Vec3, Vec4};
use image::{Rgba, RgbaImage};

use crate::{CubeFace, CubeMapError, direction_to_face_uv, face_uv_to_direction};

/// Texel filtering used by [`CubeMapSet::sample`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    /// Nearest texel.
    Nearest,
    /// Bilinear between the four nearest texel centers, clamped at face edges.
    #[default]
    Bilinear,
}

/// Six square face images addressed by direction.
///
/// Any face may be missing. Present faces all share one size. Sampling a
/// missing face (or with a degenerate direction) returns `Vec4::ZERO`.
#[derive(Clone, Debug, Default)]
pub struct CubeMapSet {
    faces: [Option<RgbaImage>; 6],
    size: Option<u32>,
}

impl CubeMapSet {
    /// A cube map with every face missing.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Every face filled with one color. `color` channels are in `[0, 1]`.
    pub fn solid(size: u32, color: Vec4) -> Self {
        Self::from_fn(size, |_, _| color)
    }

    /// Build all six faces from a function of the texel-center direction.
    ///
    /// `f` receives the face and the unit direction through the texel center
    /// and returns an RGBA color in `[0, 1]`.
    pub fn from_fn(size: u32, mut f: impl FnMut(CubeFace, Vec3) -> Vec4) -> Self {
        let size = size.max(1);
        let mut set = Self::blank();
        for face in CubeFace::ALL {
            let image = RgbaImage::from_fn(size, size, |x, y| {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / size as f32,
                    (y as f32 + 0.5) / size as f32,
                );
                to_rgba8(f(face, face_uv_to_direction(face, uv)))
            });
            set.faces[face.index()] = Some(image);
        }
        set.size = Some(size);
        set
    }

    /// Install a face image, validating that it is square and matches the
    /// size of faces already present. On error the set is unchanged.
    pub fn set_face(&mut self, face: CubeFace, image: RgbaImage) -> Result<(), CubeMapError> {
        let (width, height) = image.dimensions();
        if width != height || width == 0 {
            return Err(CubeMapError::NotSquare {
                face,
                width,
                height,
            });
        }
        if let Some(expected) = self.size
            && expected != width
            && self.present_count_excluding(face) > 0
        {
            return Err(CubeMapError::SizeMismatch {
                face,
                expected,
                actual: width,
            });
        }
        self.faces[face.index()] = Some(image);
        self.size = Some(width);
        Ok(())
    }

    fn present_count_excluding(&self, face: CubeFace) -> usize {
        CubeFace::ALL
            .iter()
            .filter(|&&f| f != face && self.faces[f.index()].is_some())
            .count()
    }

    /// The image for `face`, if it loaded.
    pub fn face(&self, face: CubeFace) -> Option<&RgbaImage> {
        self.faces[face.index()].as_ref()
    }

    /// Edge length in texels shared by all present faces.
    pub fn face_size(&self) -> Option<u32> {
        self.size
    }

    /// Faces with no image, in layer order.
    pub fn missing_faces(&self) -> Vec<CubeFace> {
        CubeFace::ALL
            .into_iter()
            .filter(|f| self.faces[f.index()].is_none())
            .collect()
    }

    /// Whether all six faces are present.
    pub fn is_complete(&self) -> bool {
        self.faces.iter().all(Option::is_some)
    }

    /// Whether no face is present.
    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(Option::is_none)
    }

    /// Sample the cube map in direction `dir` (need not be normalized).
    pub fn sample(&self, dir: Vec3, filter: Filter) -> Vec4 {
        let Some((face, uv)) = direction_to_face_uv(dir) else {
            return Vec4::ZERO;
        };
        let Some(image) = self.face(face) else {
            return Vec4::ZERO;
        };
        match filter {
            Filter::Nearest => sample_nearest(image, uv),
            Filter::Bilinear => sample_bilinear(image, uv),
        }
    }

    /// Tightly packed RGBA8 texels for all six layers in [`CubeFace::ALL`]
    /// order, plus the face size. Missing faces are zero-filled. An empty set
    /// yields 1x1 zero layers.
    pub fn to_rgba8_layers(&self) -> (u32, Vec<u8>) {
        let size = self.size.unwrap_or(1);
        let layer_len = layer_len(size);
        let mut data = Vec::with_capacity(layer_len * 6);
        for face in CubeFace::ALL {
            match self.face(face) {
                Some(image) => data.extend_from_slice(image.as_raw()),
                None => data.resize(data.len() + layer_len, 0),
            }
        }
        (size, data)
    }
}

/// Bytes in one RGBA8 layer of `size`x`size` texels.
fn layer_len(size: u32) -> usize {
    size as usize * size as usize * 4
}

fn to_rgba8(color: Vec4) -> Rgba<u8> {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
}

fn texel(image: &RgbaImage, x: u32, y: u32) -> Vec4 {
    let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
    Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
}

fn sample_nearest(image: &RgbaImage, uv: Vec2) -> Vec4 {
    let size = image.width();
    let max = size.saturating_sub(1);
    let x = ((uv.x * size as f32).floor() as u32).min(max);
    let y = ((uv.y * size as f32).floor() as u32).min(max);
    texel(image, x, y)
}

fn sample_bilinear(image: &RgbaImage, uv: Vec2) -> Vec4 {
    let size = image.width() as f32;
    let max = size - 1.0;
    let px = (uv.x * size - 0.5).clamp(0.0, max);
    let py = (uv.y * size - 0.5).clamp(0.0, max);
    let (x0, y0) = (px.floor(), py.floor());
    let (x1, y1) = ((x0 + 1.0).min(max), (y0 + 1.0).min(max));
    let (fx, fy) = (px - x0, py - y0);

    let t00 = texel(image, x0 as u32, y0 as u32);
    let t10 = texel(image, x1 as u32, y0 as u32);
    let t01 = texel(image, x0 as u32, y1 as u32);
    let t11 = texel(image, x1 as u32, y1 as u32);
    t00.lerp(t10, fx).lerp(t01.lerp(t11, fx), fy)
}
