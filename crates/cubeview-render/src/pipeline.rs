//! Bind group layouts and the two render pipelines: the displaced sphere
//! and the background sky.

use std::num::NonZeroU64;

use crate::buffer::SphereVertex;
use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::wgsl::ShadingUniform;

/// Layouts shared by both pipelines.
///
/// Group 0 holds the camera and shading uniforms; group 1 the height,
/// normal and color cube maps plus one sampler.
pub struct SceneLayouts {
    pub frame: wgpu::BindGroupLayout,
    pub maps: wgpu::BindGroupLayout,
    pub pipeline: wgpu::PipelineLayout,
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn cube_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::Cube,
            multisampled: false,
        },
        count: None,
    }
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bind-group-layout"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<CameraUniform>()),
                uniform_entry(1, std::mem::size_of::<ShadingUniform>()),
            ],
        });
        let maps = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cube-maps-bind-group-layout"),
            entries: &[
                cube_entry(0),
                cube_entry(1),
                cube_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&frame, &maps],
            immediate_size: 0,
        });
        Self {
            frame,
            maps,
            pipeline,
        }
    }
}

/// Opaque, depth-tested, back-face-culled sphere.
pub fn create_sphere_pipeline(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("sphere-pipeline"),
        layout: Some(&layouts.pipeline),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[SphereVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: DepthBuffer::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Fullscreen triangle at the far plane; never writes depth.
pub fn create_sky_pipeline(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("sky-pipeline"),
        layout: Some(&layouts.pipeline),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_sky"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_sky"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;
    use crate::wgsl::{SKYBOX_SHADER_SOURCE, sphere_shader_source};
    use cubeview_config::ShadingPreset;
    use cubeview_shading::ShadingParameters;

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
        assert_eq!(std::mem::size_of::<ShadingUniform>(), 16);
    }

    #[test]
    fn test_pipelines_build_against_shared_layout() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let layouts = SceneLayouts::new(&device);
        let format = wgpu::TextureFormat::Bgra8Unorm;
        for preset in [ShadingPreset::Biome, ShadingPreset::Passthrough] {
            let source = sphere_shader_source(&ShadingParameters::from_preset(preset));
            let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("sphere"),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
            let _ = create_sphere_pipeline(&device, &layouts, &module, format);
        }
        let sky = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky"),
            source: wgpu::ShaderSource::Wgsl(SKYBOX_SHADER_SOURCE.into()),
        });
        let _ = create_sky_pipeline(&device, &layouts, &sky, format);
    }
}
