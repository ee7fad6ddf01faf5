//! Compacted mesh geometry handed to the host.
//!
//! A [`Mesh`] is the result of reconstructing one `TRIS` slice: a local
//! vertex list (positions with their pass-through normals and texture
//! coordinates) and triangles indexing into it. It is decoupled from any
//! particular scene API so hosts can convert it however they like.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xpimp_math::{Aabb, Vec3};

use crate::vt_table::VertexRecord;

/// Material assigned to every imported mesh.
pub const DEFAULT_MATERIAL: &str = "Material";

/// A structural problem found by [`Mesh::validate`].
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshIssue {
    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count}")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("triangle {triangle} is degenerate (repeated vertex)")]
    DegenerateTriangle { triangle: usize },

    #[error("vertex {vertex} has a non-finite position")]
    NonFinitePosition { vertex: usize },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions, one per local vertex
    pub positions: Vec<Vec3>,

    /// Per-vertex normal overrides, parallel to `positions`
    pub normals: Vec<Vec3>,

    /// Per-vertex texture coordinates, parallel to `positions`
    pub uvs: Vec<[f32; 2]>,

    /// Triangles indexing into `positions`
    pub triangles: Vec<[u32; 3]>,

    /// Material name
    pub material: String,

    /// Axis-aligned bounding box
    #[serde(skip)]
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from local vertex records and triangles.
    pub fn from_records(records: &[VertexRecord], triangles: Vec<[u32; 3]>) -> Self {
        let positions: Vec<Vec3> = records.iter().map(VertexRecord::position).collect();
        let bounds = Aabb::from_positions(&positions);
        Self {
            positions,
            normals: records.iter().map(VertexRecord::normal).collect(),
            uvs: records.iter().map(VertexRecord::uv).collect(),
            triangles,
            material: DEFAULT_MATERIAL.to_string(),
            bounds,
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Find structural problems a scene API would reject.
    pub fn validate(&self) -> Vec<MeshIssue> {
        let vertex_count = self.positions.len();
        let mut issues = Vec::new();

        for (vertex, p) in self.positions.iter().enumerate() {
            if !p.is_finite() {
                issues.push(MeshIssue::NonFinitePosition { vertex });
            }
        }

        for (triangle, face) in self.triangles.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                issues.push(MeshIssue::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
                continue;
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                issues.push(MeshIssue::DegenerateTriangle { triangle });
            }
        }

        issues
    }

    /// Drop triangles that are out of range or degenerate, returning how many
    /// were removed. Vertices are kept so indices stay stable.
    pub fn retain_valid_triangles(&mut self) -> usize {
        let vertex_count = self.positions.len();
        let before = self.triangles.len();
        self.triangles.retain(|face| {
            face.iter().all(|&i| (i as usize) < vertex_count)
                && face[0] != face[1]
                && face[1] != face[2]
                && face[0] != face[2]
        });
        before - self.triangles.len()
    }
}
