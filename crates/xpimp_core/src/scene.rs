//! In-memory scene graph built from an import.
//!
//! [`ImportedScene`] implements [`SceneHost`] by simply recording what it is
//! asked to create. It is what tests inspect and what hosts without a scene
//! API of their own can serialize.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use crate::animation::KeyframeInfo;
use crate::host::{CreatedMesh, SceneHost};
use crate::mesh::Mesh;

/// Index of a node in an [`ImportedScene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneNodeKind {
    Empty,
    Mesh { mesh: Mesh, valid: bool },
}

/// A materialized node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,

    /// `None` when attached directly to the collection
    pub parent: Option<NodeId>,

    pub kind: SceneNodeKind,

    /// Keyframes from every animation applied to this node, in order
    pub keyframes: Vec<KeyframeInfo>,
}

impl SceneNode {
    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            SceneNodeKind::Mesh { mesh, .. } => Some(mesh),
            SceneNodeKind::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, SceneNodeKind::Empty)
    }
}

/// A complete imported collection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImportedScene {
    /// Collection name (usually from the file name)
    pub name: String,

    /// Whether the collection is an exportable root
    pub exportable: bool,

    /// Nodes in creation order; parents always precede children
    pub nodes: Vec<SceneNode>,

    #[serde(skip)]
    by_name: HashMap<String, NodeId>,
}

impl ImportedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node by name. Reused names resolve to the first node.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name
            .get(name)
            .copied()
            .or_else(|| self.nodes.iter().position(|n| n.name == name).map(NodeId))
    }

    pub fn find_node(&self, name: &str) -> Option<&SceneNode> {
        self.find(name).and_then(|id| self.node(id))
    }

    /// Nodes attached directly to the collection.
    pub fn roots(&self) -> Vec<NodeId> {
        self.ids().filter(|id| self.nodes[id.0].parent.is_none()).collect()
    }

    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.ids()
            .filter(|id| self.nodes[id.0].parent == Some(parent))
            .collect()
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Get node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh().is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_empty()).count()
    }

    /// Get total triangle count across all meshes.
    pub fn total_triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(SceneNode::mesh)
            .map(Mesh::triangle_count)
            .sum()
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.by_name.entry(node.name.clone()).or_insert(id);
        self.nodes.push(node);
        id
    }
}

impl SceneHost for ImportedScene {
    type Handle = NodeId;

    fn create_collection(&mut self, name: &str, exportable: bool) {
        self.name = name.to_string();
        self.exportable = exportable;
    }

    fn create_empty(&mut self, name: &str, parent: Option<&NodeId>) -> NodeId {
        self.push(SceneNode {
            name: name.to_string(),
            parent: parent.copied(),
            kind: SceneNodeKind::Empty,
            keyframes: Vec::new(),
        })
    }

    fn create_mesh(
        &mut self,
        name: &str,
        parent: Option<&NodeId>,
        mut mesh: Mesh,
    ) -> CreatedMesh<NodeId> {
        let issues = mesh.validate();
        if !issues.is_empty() {
            // Keep the object, limited to the faces that are usable
            let dropped = mesh.retain_valid_triangles();
            log::debug!("{}: kept {} faces, dropped {}", name, mesh.triangle_count(), dropped);
        }

        let handle = self.push(SceneNode {
            name: name.to_string(),
            parent: parent.copied(),
            kind: SceneNodeKind::Mesh {
                mesh,
                valid: issues.is_empty(),
            },
            keyframes: Vec::new(),
        });

        CreatedMesh { handle, issues }
    }

    fn apply_keyframes(&mut self, node: &NodeId, keyframes: Vec<KeyframeInfo>) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.keyframes.extend(keyframes);
        }
    }
}
