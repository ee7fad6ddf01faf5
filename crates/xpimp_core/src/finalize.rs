//! Turns the builder's flat node list into host objects.
//!
//! One ordered pass: resolve each node's parent name (nodes parented to the
//! implicit root attach to the collection instead), create the node, then
//! bind every pending animation to it as keyframes.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::builder::{ImportError, ImportResult, ROOT_INDEX};
use crate::host::SceneHost;
use crate::mesh::MeshIssue;
use crate::node::{IntermediateDatablock, NodeKind};
use crate::options::ImportOptions;
use crate::vt_table::VertexIndexTable;

/// Timeline position the finalizer leaves the scene at.
pub const TIMELINE_START: u32 = 1;

/// Problems that were logged but did not stop the import.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ImportWarning {
    #[error("Mesh {node} failed validation with {} issue(s)", .issues.len())]
    MeshValidation { node: String, issues: Vec<MeshIssue> },

    #[error("Mesh {node}: {missing_indices} indices past the end of the table, {dropped_triangles} triangles dropped")]
    MeshSalvaged {
        node: String,
        missing_indices: usize,
        dropped_triangles: usize,
    },

    #[error("Mesh {node} has no usable triangles, imported as an empty")]
    MeshUnsalvageable { node: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FinishStatus {
    /// Every node materialized without warnings.
    Finished,
    /// Every node materialized, some with warnings.
    FinishedWithWarnings,
}

/// Outcome of a finalization pass.
#[derive(Clone, Debug, Serialize)]
pub struct FinalizeReport {
    pub status: FinishStatus,
    pub warnings: Vec<ImportWarning>,
    /// Timeline position after finalization, always [`TIMELINE_START`].
    pub final_frame: u32,
    /// Nodes handed to the host (the implicit root is not one of them).
    pub nodes_created: usize,
}

impl FinalizeReport {
    pub fn is_clean(&self) -> bool {
        self.status == FinishStatus::Finished
    }

    /// False if any mesh could not be salvaged.
    pub fn succeeded(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|w| matches!(w, ImportWarning::MeshUnsalvageable { .. }))
    }
}

pub(crate) fn finalize_blocks<H: SceneHost>(
    options: &ImportOptions,
    table: &VertexIndexTable,
    blocks: Vec<IntermediateDatablock>,
    host: &mut H,
) -> ImportResult<FinalizeReport> {
    host.create_collection(&options.collection_name, options.exportable);

    let root_name = blocks
        .get(ROOT_INDEX)
        .map(|root| root.name.clone())
        .unwrap_or_else(|| options.root_name.clone());

    let mut handles: HashMap<String, H::Handle> = HashMap::new();
    let mut warnings = Vec::new();
    let mut nodes_created = 0;

    for block in blocks.into_iter().skip(ROOT_INDEX + 1) {
        let parent = match block.parent.as_deref() {
            None => None,
            Some(name) if name == root_name => None,
            Some(name) => Some(handles.get(name).cloned().ok_or_else(|| {
                ImportError::UnknownParent {
                    node: block.name.clone(),
                    parent: name.to_string(),
                }
            })?),
        };

        let handle = match block.kind {
            NodeKind::Empty => host.create_empty(&block.name, parent.as_ref()),
            NodeKind::Mesh => {
                materialize_mesh(&block, table, parent.as_ref(), host, &mut warnings)
            }
        };

        for animation in &block.animations {
            let keyframes = animation.keyframes().map_err(|source| {
                ImportError::InconsistentSampleCount {
                    node: block.name.clone(),
                    source,
                }
            })?;
            host.apply_keyframes(&handle, keyframes);
        }

        nodes_created += 1;
        // Parents resolve to the first node of a given name
        match handles.entry(block.name) {
            Entry::Occupied(entry) => {
                log::warn!("Node name {} reused, children keep the first", entry.key());
            }
            Entry::Vacant(entry) => {
                entry.insert(handle);
            }
        }
    }

    let status = if warnings.is_empty() {
        FinishStatus::Finished
    } else {
        FinishStatus::FinishedWithWarnings
    };

    log::info!(
        "Finalized {} nodes into {} ({} warnings)",
        nodes_created,
        options.collection_name,
        warnings.len()
    );

    Ok(FinalizeReport {
        status,
        warnings,
        final_frame: TIMELINE_START,
        nodes_created,
    })
}

fn materialize_mesh<H: SceneHost>(
    block: &IntermediateDatablock,
    table: &VertexIndexTable,
    parent: Option<&H::Handle>,
    host: &mut H,
    warnings: &mut Vec<ImportWarning>,
) -> H::Handle {
    let rebuilt = match block.build_mesh(table) {
        Some(rebuilt) => rebuilt,
        None => return host.create_empty(&block.name, parent),
    };

    if rebuilt.is_salvaged() {
        log::warn!(
            "Mesh {}: {} missing indices, {} triangles dropped",
            block.name,
            rebuilt.missing_indices,
            rebuilt.dropped_triangles
        );
        warnings.push(ImportWarning::MeshSalvaged {
            node: block.name.clone(),
            missing_indices: rebuilt.missing_indices,
            dropped_triangles: rebuilt.dropped_triangles,
        });
    }

    let requested = block.slice.map_or(0, |slice| slice.count);
    if rebuilt.mesh.triangles.is_empty() && requested > 0 {
        log::error!("Mesh {} has no usable triangles, importing as an empty", block.name);
        warnings.push(ImportWarning::MeshUnsalvageable {
            node: block.name.clone(),
        });
        return host.create_empty(&block.name, parent);
    }

    log::debug!(
        "Mesh {}: {} vertices, {} triangles, bounds {:?}",
        block.name,
        rebuilt.mesh.vertex_count(),
        rebuilt.mesh.triangle_count(),
        rebuilt.mesh.bounds
    );
    let created = host.create_mesh(&block.name, parent, rebuilt.mesh);
    if !created.is_valid() {
        log::warn!("Mesh {} was not valid: {:?}", block.name, created.issues);
        warnings.push(ImportWarning::MeshValidation {
            node: block.name.clone(),
            issues: created.issues,
        });
    }
    created.handle
}
