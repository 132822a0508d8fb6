use bytemuck::{Pod, Zeroable};

/// Cube vertex: position, normal, texture coordinate (8 floats).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const P: f32 = 0.5;

const fn v(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex {
        position,
        normal,
        uv,
    }
}

/// Unit cube centred on the origin: 4 vertices per face so every face gets
/// its own normal and UVs.
#[rustfmt::skip]
pub const CUBE_VERTICES: [Vertex; 24] = [
    // +Z face
    v([-P, -P,  P], [0.0, 0.0, 1.0], [0.0, 0.0]),
    v([ P, -P,  P], [0.0, 0.0, 1.0], [1.0, 0.0]),
    v([ P,  P,  P], [0.0, 0.0, 1.0], [1.0, 1.0]),
    v([-P,  P,  P], [0.0, 0.0, 1.0], [0.0, 1.0]),
    // -Z face
    v([ P, -P, -P], [0.0, 0.0, -1.0], [0.0, 0.0]),
    v([-P, -P, -P], [0.0, 0.0, -1.0], [1.0, 0.0]),
    v([-P,  P, -P], [0.0, 0.0, -1.0], [1.0, 1.0]),
    v([ P,  P, -P], [0.0, 0.0, -1.0], [0.0, 1.0]),
    // +X face
    v([ P, -P,  P], [1.0, 0.0, 0.0], [0.0, 0.0]),
    v([ P, -P, -P], [1.0, 0.0, 0.0], [1.0, 0.0]),
    v([ P,  P, -P], [1.0, 0.0, 0.0], [1.0, 1.0]),
    v([ P,  P,  P], [1.0, 0.0, 0.0], [0.0, 1.0]),
    // -X face
    v([-P, -P, -P], [-1.0, 0.0, 0.0], [0.0, 0.0]),
    v([-P, -P,  P], [-1.0, 0.0, 0.0], [1.0, 0.0]),
    v([-P,  P,  P], [-1.0, 0.0, 0.0], [1.0, 1.0]),
    v([-P,  P, -P], [-1.0, 0.0, 0.0], [0.0, 1.0]),
    // +Y face
    v([-P,  P,  P], [0.0, 1.0, 0.0], [0.0, 0.0]),
    v([ P,  P,  P], [0.0, 1.0, 0.0], [1.0, 0.0]),
    v([ P,  P, -P], [0.0, 1.0, 0.0], [1.0, 1.0]),
    v([-P,  P, -P], [0.0, 1.0, 0.0], [0.0, 1.0]),
    // -Y face
    v([-P, -P, -P], [0.0, -1.0, 0.0], [0.0, 0.0]),
    v([ P, -P, -P], [0.0, -1.0, 0.0], [1.0, 0.0]),
    v([ P, -P,  P], [0.0, -1.0, 0.0], [1.0, 1.0]),
    v([-P, -P,  P], [0.0, -1.0, 0.0], [0.0, 1.0]),
];

/// 6 faces × 2 triangles, counter-clockwise when seen from outside.
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
     0,  1,  2,  2,  3,  0, // +Z
     4,  5,  6,  6,  7,  4, // -Z
     8,  9, 10, 10, 11,  8, // +X
    12, 13, 14, 14, 15, 12, // -X
    16, 17, 18, 18, 19, 16, // +Y
    20, 21, 22, 22, 23, 20, // -Y
];
