//! Vertex and index buffers for the sphere mesh.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use cubeview_mesh::IcoSphere;

/// Sphere vertex: object-space position and unit outward normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl SphereVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a sphere's positions and normals.
pub fn sphere_vertices(mesh: &IcoSphere) -> Vec<SphereVertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .map(|(p, n)| SphereVertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect()
}

/// Uploaded mesh: vertex buffer plus a u32 index buffer.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn from_icosphere(device: &wgpu::Device, label: &str, mesh: &IcoSphere) -> Self {
        let vertices = sphere_vertices(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::info!(
            "Uploaded mesh '{label}': {} vertices, {} triangles",
            vertices.len(),
            mesh.triangle_count()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Bind buffers and draw every triangle.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;
    use cubeview_mesh::icosphere;

    #[test]
    fn test_vertex_layout_stride_and_locations() {
        let layout = SphereVertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn test_vertices_interleave_positions_and_normals() {
        let mesh = icosphere(10.0, 1);
        let vertices = sphere_vertices(&mesh);
        assert_eq!(vertices.len(), mesh.vertex_count());
        assert_eq!(vertices[3].position, mesh.positions[3].to_array());
        assert_eq!(vertices[3].normal, mesh.normals[3].to_array());
    }

    #[test]
    fn test_upload_counts_indices() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mesh = icosphere(1.0, 2);
        let buffer = MeshBuffer::from_icosphere(&device, "sphere", &mesh);
        assert_eq!(buffer.index_count as usize, mesh.indices.len());
        assert_eq!(buffer.vertex_buffer.size(), (mesh.vertex_count() * 24) as u64);
    }
}
