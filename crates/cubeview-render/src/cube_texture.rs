//! Cube-map textures on the GPU.

use cubeview_cubemap::CubeMapSet;
use thiserror::Error;

/// Why a cube map could not be uploaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CubeTextureError {
    #[error("{size}x{size} faces exceed the device limit of {max}")]
    TooLarge { size: u32, max: u32 },
}

/// Six-layer RGBA8 texture viewed as a cube.
///
/// Built from a [`CubeMapSet`]; missing faces upload as zero texels and an
/// empty set becomes a 1x1 blank cube, so a binding always exists.
pub struct GpuCubeMap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    face_size: u32,
}

impl GpuCubeMap {
    /// Linear (non-sRGB) so shaders see the stored bytes / 255, as the CPU does.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Upload `set`, refusing faces larger than the device's 2D texture limit.
    pub fn from_set(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        set: &CubeMapSet,
    ) -> Result<Self, CubeTextureError> {
        let max = device.limits().max_texture_dimension_2d;
        match set.face_size() {
            Some(size) if size > max => Err(CubeTextureError::TooLarge { size, max }),
            _ => Ok(Self::upload(device, queue, label, set)),
        }
    }

    /// A 1x1 cube of zero texels.
    pub fn blank(device: &wgpu::Device, queue: &wgpu::Queue, label: &str) -> Self {
        Self::upload(device, queue, label, &CubeMapSet::blank())
    }

    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    fn upload(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, set: &CubeMapSet) -> Self {
        let (face_size, texels) = set.to_rgba8_layers();
        let size = wgpu::Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(face_size * 4),
                rows_per_image: Some(face_size),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let missing = set.missing_faces();
        if missing.is_empty() {
            log::info!("Uploaded cube map '{label}' ({face_size}x{face_size} per face)");
        } else if !set.is_empty() {
            log::info!(
                "Uploaded cube map '{label}' ({face_size}x{face_size} per face), blank faces: {missing:?}"
            );
        }

        Self {
            texture,
            view,
            face_size,
        }
    }

}

/// Linear, edge-clamped sampler shared by every cube map.
pub fn create_cube_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("cube-map-sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
