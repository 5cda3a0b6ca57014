/// The fundamental geometry container.
///
/// All buffers are contiguous `Vec<f32>` / `Vec<u32>` so UV slices can be
/// handed to the atlas remapper without copying.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Interleaved positions: [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Interleaved normals: [nx, ny, nz, ...] or empty
    pub normals: Vec<f32>,
    /// Interleaved UVs: [u, v, u, v, ...] or empty
    pub uvs: Vec<f32>,
    /// Triangle indices into the vertex buffers
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    /// Number of vertices.
    ///
    /// UV-only meshes (no positions) count their UV pairs instead.
    pub fn vertex_count(&self) -> usize {
        if self.positions.is_empty() {
            self.uv_count()
        } else {
            self.positions.len() / 3
        }
    }

    /// Number of UV pairs.
    pub fn uv_count(&self) -> usize {
        self.uvs.len() / 2
    }

    /// Number of triangles (indices / 3).
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether normals are present.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Whether UV coordinates are present.
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Whether the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.uvs.is_empty()
    }
}
