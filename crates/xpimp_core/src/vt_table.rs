//! Shared vertex and index storage for one import job.
//!
//! `VT` directives append [`VertexRecord`]s and `IDX`/`IDX10` directives
//! append indices. Nothing is validated on append; mesh reconstruction
//! checks ranges when a `TRIS` slice is finally dereferenced.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use xpimp_math::Vec3;

/// One `VT` record: position, normal and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct VertexRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub nx: f32,
    pub ny: f32,
    pub nz: f32,
    pub s: f32,
    pub t: f32,
}

impl VertexRecord {
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            nx: normal.x,
            ny: normal.y,
            nz: normal.z,
            s: uv[0],
            t: uv[1],
        }
    }

    /// Build a record from the eight `VT` fields in file order.
    pub fn from_array(v: [f32; 8]) -> Self {
        Self::new(
            Vec3::new(v[0], v[1], v[2]),
            Vec3::new(v[3], v[4], v[5]),
            [v[6], v[7]],
        )
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.nx, self.ny, self.nz)
    }

    pub fn uv(&self) -> [f32; 2] {
        [self.s, self.t]
    }
}

/// Append-only vertex buffer plus triangle-list index buffer.
#[derive(Clone, Debug, Default)]
pub struct VertexIndexTable {
    vertices: Vec<VertexRecord>,
    indices: Vec<u32>,
}

impl VertexIndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_vertex(&mut self, record: VertexRecord) {
        self.vertices.push(record);
    }

    pub fn append_index(&mut self, index: u32) {
        self.indices.push(index);
    }

    pub fn append_indices(&mut self, indices: &[u32]) {
        self.indices.extend_from_slice(indices);
    }

    pub fn vertices(&self) -> &[VertexRecord] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex(&self, index: u32) -> Option<&VertexRecord> {
        self.vertices.get(index as usize)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// The index run `[start, start + count)` used by one mesh, or `None` if
    /// it reaches past the end of the index buffer.
    pub fn slice(&self, start: usize, count: usize) -> Option<&[u32]> {
        let end = start.checked_add(count)?;
        self.indices.get(start..end)
    }

    /// Like [`slice`](Self::slice) but truncated to the indices that exist.
    pub fn slice_clamped(&self, start: usize, count: usize) -> &[u32] {
        let start = start.min(self.indices.len());
        let end = start.saturating_add(count).min(self.indices.len());
        &self.indices[start..end]
    }

    /// Raw vertex buffer (8 little-endian-native `f32`s per record).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
