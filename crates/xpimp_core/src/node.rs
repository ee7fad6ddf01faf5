//! Pending scene nodes produced by the command builder.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::animation::IntermediateAnimation;
use crate::mesh::Mesh;
use crate::vt_table::{VertexIndexTable, VertexRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Empty,
    Mesh,
}

/// The `[start, start + count)` index run of a mesh node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshSlice {
    pub start: usize,
    pub count: usize,
}

/// A node awaiting materialization.
///
/// The parent is referenced by name and only resolved during finalization.
#[derive(Clone, Debug, PartialEq)]
pub struct IntermediateDatablock {
    pub kind: NodeKind,
    pub name: String,
    /// `None` only for the implicit root.
    pub parent: Option<String>,
    /// Set for mesh nodes only.
    pub slice: Option<MeshSlice>,
    /// Applied in order once the node exists.
    pub animations: Vec<IntermediateAnimation>,
}

/// Output of [`IntermediateDatablock::build_mesh`].
#[derive(Clone, Debug)]
pub struct RebuiltMesh {
    pub mesh: Mesh,
    /// Indices the slice asked for but the table does not have.
    pub missing_indices: usize,
    /// Triangles skipped for referencing a vertex that does not exist or
    /// for being cut short by the end of the slice.
    pub dropped_triangles: usize,
}

impl RebuiltMesh {
    pub fn is_salvaged(&self) -> bool {
        self.missing_indices > 0 || self.dropped_triangles > 0
    }
}

impl IntermediateDatablock {
    pub fn empty(name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            kind: NodeKind::Empty,
            name: name.into(),
            parent,
            slice: None,
            animations: Vec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>, parent: Option<String>, slice: MeshSlice) -> Self {
        Self {
            kind: NodeKind::Mesh,
            name: name.into(),
            parent,
            slice: Some(slice),
            animations: Vec::new(),
        }
    }

    /// Reconstruct this node's geometry from the shared table.
    ///
    /// Vertices are deduplicated in first-seen order, indices remapped into
    /// that compact space and every triangle's winding reversed. Returns
    /// `None` for non-mesh nodes.
    pub fn build_mesh(&self, table: &VertexIndexTable) -> Option<RebuiltMesh> {
        let slice = self.slice?;
        let indices = table.slice_clamped(slice.start, slice.count);
        let missing_indices = slice.count - indices.len();

        let mut mapping: HashMap<u32, u32> = HashMap::new();
        let mut records: Vec<VertexRecord> = Vec::new();
        let mut triangles = Vec::with_capacity(indices.len() / 3);
        let mut dropped_triangles = 0;

        for face in indices.chunks(3) {
            let face = match face {
                [a, b, c] => [*a, *b, *c],
                _ => {
                    dropped_triangles += 1;
                    continue;
                }
            };

            if face.iter().any(|&i| table.vertex(i).is_none()) {
                log::warn!(
                    "{}: triangle {:?} references past {} vertices",
                    self.name,
                    face,
                    table.vertex_count()
                );
                dropped_triangles += 1;
                continue;
            }

            let local = face.map(|i| {
                *mapping.entry(i).or_insert_with(|| {
                    // Checked above
                    records.push(table.vertices()[i as usize]);
                    records.len() as u32 - 1
                })
            });

            // Reverse the winding order to flip the faces
            triangles.push([local[2], local[1], local[0]]);
        }

        Some(RebuiltMesh {
            mesh: Mesh::from_records(&records, triangles),
            missing_indices,
            dropped_triangles,
        })
    }
}
