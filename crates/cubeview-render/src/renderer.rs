//! The whole frame: background sky from the height map, then the displaced,
//! shaded sphere.

use wgpu::util::DeviceExt;

use cubeview_cubemap::{CubeMapSet, CubeMapSlot};
use cubeview_mesh::IcoSphere;
use cubeview_shading::ShadingParameters;

use crate::buffer::MeshBuffer;
use crate::camera::{Camera, CameraUniform};
use crate::cube_texture::{CubeTextureError, GpuCubeMap, create_cube_sampler};
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{SceneLayouts, create_sky_pipeline, create_sphere_pipeline};
use crate::shader::ShaderLibrary;
use crate::wgsl::{SKYBOX_SHADER_SOURCE, ShadingUniform, sphere_shader_source, variant_name};

/// GPU resources for one scene variant.
///
/// Every cube-map slot is bound from the start, to a blank cube until its
/// load arrives through [`set_cube_map`](Self::set_cube_map).
pub struct SceneRenderer {
    layouts: SceneLayouts,
    sphere_pipeline: wgpu::RenderPipeline,
    sky_pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    depth: DepthBuffer,
    camera_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    height: GpuCubeMap,
    normal: GpuCubeMap,
    color: GpuCubeMap,
    maps_bind_group: wgpu::BindGroup,
    frames_rendered: u64,
}

impl SceneRenderer {
    /// Build pipelines for `params` drawing into `target_format` targets of
    /// `size` pixels.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        size: (u32, u32),
        mesh: &IcoSphere,
        params: &ShadingParameters<'_>,
    ) -> Self {
        let layouts = SceneLayouts::new(device);

        let mut shaders = ShaderLibrary::new();
        let sphere_shader =
            shaders.get_or_load(device, &variant_name(params), || sphere_shader_source(params));
        let sky_shader = shaders.load_from_source(device, "sky", SKYBOX_SHADER_SOURCE);
        log::debug!("{} shader modules compiled", shaders.len());
        let sphere_pipeline = create_sphere_pipeline(device, &layouts, &sphere_shader, target_format);
        let sky_pipeline = create_sky_pipeline(device, &layouts, &sky_shader, target_format);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera-uniform"),
            contents: bytemuck::cast_slice(&[Camera::default().to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shading_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shading-uniform"),
            contents: bytemuck::cast_slice(&[ShadingUniform::from_params(params)]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &layouts.frame,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shading_buffer.as_entire_binding(),
                },
            ],
        });

        let sampler = create_cube_sampler(device);
        let height = GpuCubeMap::blank(device, queue, "height-map");
        let normal = GpuCubeMap::blank(device, queue, "normal-map");
        let color = GpuCubeMap::blank(device, queue, "color-map");
        let maps_bind_group =
            create_maps_bind_group(device, &layouts, &height, &normal, &color, &sampler);

        let (width, height_px) = size;
        Self {
            mesh: MeshBuffer::from_icosphere(device, "icosphere", mesh),
            depth: DepthBuffer::new(device, width, height_px),
            layouts,
            sphere_pipeline,
            sky_pipeline,
            camera_buffer,
            frame_bind_group,
            sampler,
            height,
            normal,
            color,
            maps_bind_group,
            frames_rendered: 0,
        }
    }

    /// Replace the texture bound to `slot` with `set`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeTextureError`] when the device cannot hold the faces; the
    /// slot keeps its previous texture.
    pub fn set_cube_map(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: CubeMapSlot,
        set: &CubeMapSet,
    ) -> Result<(), CubeTextureError> {
        let (label, target) = match slot {
            CubeMapSlot::Height => ("height-map", &mut self.height),
            CubeMapSlot::Normal => ("normal-map", &mut self.normal),
            CubeMapSlot::Color => ("color-map", &mut self.color),
        };
        *target = GpuCubeMap::from_set(device, queue, label, set)?;
        self.maps_bind_group = create_maps_bind_group(
            device,
            &self.layouts,
            &self.height,
            &self.normal,
            &self.color,
            &self.sampler,
        );
        Ok(())
    }

    /// Follow a surface resize.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Draw one frame to the surface: sky, then sphere.
    pub fn render(&mut self, ctx: &RenderContext, camera: &Camera) -> Result<(), SurfaceError> {
        self.upload_camera(&ctx.queue, camera);

        let surface_texture = ctx.get_current_texture()?;
        let mut frame = FrameEncoder::new(&ctx.device, &ctx.queue, surface_texture);
        let builder = self.pass_builder();
        if let Some(mut pass) = frame.begin_render_pass(&builder) {
            self.record(&mut pass);
        }
        frame.submit();

        self.frames_rendered += 1;
        Ok(())
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn upload_camera(&self, queue: &wgpu::Queue, camera: &Camera) {
        let uniform: CameraUniform = camera.to_uniform();
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    fn pass_builder(&self) -> RenderPassBuilder {
        RenderPassBuilder::new()
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("scene-pass")
    }

    fn record(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.maps_bind_group, &[]);

        pass.set_pipeline(&self.sky_pipeline);
        pass.draw(0..3, 0..1);

        pass.set_pipeline(&self.sphere_pipeline);
        self.mesh.draw(pass);
    }
}

fn create_maps_bind_group(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    height: &GpuCubeMap,
    normal: &GpuCubeMap,
    color: &GpuCubeMap,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("cube-maps-bind-group"),
        layout: &layouts.maps,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&height.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&normal.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&color.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_device, create_test_device_with};
    use cubeview_config::ShadingPreset;
    use cubeview_cubemap::CubeFace;
    use cubeview_mesh::icosphere;
    use cubeview_shading::fragment_stage;
    use glam::{Vec3, Vec4};

    const SIZE: u32 = 64;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Unit sphere seen head-on from +Z; it covers the center but not the corners.
    fn test_camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            fov_y: std::f32::consts::FRAC_PI_2,
            aspect_ratio: 1.0,
            near: 0.1,
            far: 10.0,
        }
    }

    /// Render one frame into an offscreen texture and read it back as RGBA8 rows.
    fn render_offscreen(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        renderer: &SceneRenderer,
    ) -> Vec<u8> {
        renderer.upload_camera(queue, &test_camera());

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen-target"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        // 64 texels * 4 bytes is already a multiple of COPY_BYTES_PER_ROW_ALIGNMENT.
        let bytes_per_row = SIZE * 4;
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offscreen-readback"),
            size: u64::from(bytes_per_row * SIZE),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("offscreen-encoder"),
        });
        {
            let builder = renderer.pass_builder();
            let mut pass = builder.create_render_pass(&mut encoder, &view);
            renderer.record(&mut pass);
        }
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        queue.submit([encoder.finish()]);

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .unwrap();
        rx.recv().unwrap().unwrap();
        let pixels = slice.get_mapped_range().to_vec();
        readback.unmap();
        pixels
    }

    fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * SIZE + x) * 4) as usize;
        [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
    }

    fn to_rgba8(color: Vec4) -> [u8; 4] {
        let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
        [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(&expected) {
            assert!(
                a.abs_diff(*e) <= 2,
                "GPU pixel {actual:?} differs from CPU {expected:?}"
            );
        }
    }

    /// Flat height map: `h = 0`, the sphere keeps its shape and the sky is green.
    fn flat_height() -> CubeMapSet {
        CubeMapSet::solid(4, Vec4::new(0.0, 0.5, 0.0, 1.0))
    }

    fn build(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        params: &ShadingParameters<'_>,
        maps: [(CubeMapSlot, &CubeMapSet); 3],
    ) -> SceneRenderer {
        let mesh = icosphere(1.0, 4);
        let mut renderer = SceneRenderer::new(device, queue, FORMAT, (SIZE, SIZE), &mesh, params);
        for (slot, set) in maps {
            renderer.set_cube_map(device, queue, slot, set).unwrap();
        }
        renderer
    }

    #[test]
    fn test_color_modulated_sphere_matches_cpu_reference() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let height = flat_height();
        let normal = CubeMapSet::solid(4, Vec4::new(0.0, 1.0, 0.0, 1.0));
        let color = CubeMapSet::from_fn(4, |face, _| {
            if face == CubeFace::PosZ {
                Vec4::new(1.0, 0.0, 0.0, 1.0)
            } else {
                Vec4::new(0.0, 0.0, 1.0, 1.0)
            }
        });
        let params = ShadingParameters::from_preset(ShadingPreset::Biome);
        let renderer = build(
            &device,
            &queue,
            &params,
            [
                (CubeMapSlot::Height, &height),
                (CubeMapSlot::Normal, &normal),
                (CubeMapSlot::Color, &color),
            ],
        );
        let pixels = render_offscreen(&device, &queue, &renderer);

        let center = pixel(&pixels, SIZE / 2, SIZE / 2);
        assert_close(center, [255, 0, 0, 255]);
        let bound = params.with_maps(Some(&height), Some(&normal), Some(&color));
        assert_close(center, to_rgba8(fragment_stage(&bound, Vec3::Z, Vec3::Z)));

        // Corners are sky, painted from the height map.
        assert_close(pixel(&pixels, 0, 0), [0, 128, 0, 255]);
    }

    #[test]
    fn test_grayscale_sphere_matches_cpu_reference() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let height = flat_height();
        let normal = CubeMapSet::solid(4, Vec4::new(0.6, 0.8, 0.0, 1.0));
        let params = ShadingParameters::from_preset(ShadingPreset::Flat);
        let blank = CubeMapSet::blank();
        let renderer = build(
            &device,
            &queue,
            &params,
            [
                (CubeMapSlot::Height, &height),
                (CubeMapSlot::Normal, &normal),
                (CubeMapSlot::Color, &blank),
            ],
        );
        let pixels = render_offscreen(&device, &queue, &renderer);

        let center = pixel(&pixels, SIZE / 2, SIZE / 2);
        assert_eq!(center[0], center[1]);
        assert_eq!(center[1], center[2]);
        let bound = params.with_maps(Some(&height), Some(&normal), None);
        let expected = fragment_stage(&bound, Vec3::Z, Vec3::Z);
        assert!(expected.x > 0.85, "dt {} should be near 0.9", expected.x);
        assert_close(center, to_rgba8(expected));
    }

    #[test]
    fn test_oversized_map_keeps_previous_texture() {
        let Some((device, queue)) = create_test_device_with(|limits| {
            limits.max_texture_dimension_2d = 16;
        }) else {
            return;
        };
        let params = ShadingParameters::from_preset(ShadingPreset::Biome);
        let mut renderer = build(
            &device,
            &queue,
            &params,
            [
                (CubeMapSlot::Height, &CubeMapSet::solid(8, Vec4::ONE)),
                (CubeMapSlot::Normal, &CubeMapSet::blank()),
                (CubeMapSlot::Color, &CubeMapSet::blank()),
            ],
        );

        let oversized = CubeMapSet::solid(32, Vec4::ONE);
        let result = renderer.set_cube_map(&device, &queue, CubeMapSlot::Height, &oversized);
        assert_eq!(result, Err(CubeTextureError::TooLarge { size: 32, max: 16 }));
        assert_eq!(renderer.height.face_size(), 8);
    }
}
