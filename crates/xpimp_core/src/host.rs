//! The scene API nodes are materialized through.
//!
//! The importer never talks to a concrete scene graph. Finalization drives
//! a [`SceneHost`], which may be an editor's object model, a game engine or
//! the in-memory [`ImportedScene`](crate::scene::ImportedScene).

use crate::animation::KeyframeInfo;
use crate::mesh::{Mesh, MeshIssue};

/// Result of [`SceneHost::create_mesh`].
#[derive(Clone, Debug)]
pub struct CreatedMesh<H> {
    pub handle: H,
    /// Problems the host found with the mesh; empty means valid.
    pub issues: Vec<MeshIssue>,
}

impl<H> CreatedMesh<H> {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

pub trait SceneHost {
    /// Handle to a materialized node.
    type Handle: Clone;

    /// Called once, before any node is created.
    fn create_collection(&mut self, name: &str, exportable: bool);

    /// Create an empty. `parent` of `None` attaches it to the collection.
    fn create_empty(&mut self, name: &str, parent: Option<&Self::Handle>) -> Self::Handle;

    /// Create a mesh object and apply the mesh's per-vertex normal and
    /// texture-coordinate overrides.
    ///
    /// A host that finds the mesh invalid should still create it, keeping
    /// what it can, and report the problems.
    fn create_mesh(
        &mut self,
        name: &str,
        parent: Option<&Self::Handle>,
        mesh: Mesh,
    ) -> CreatedMesh<Self::Handle>;

    /// Attach keyframes (ordered by index) to a node.
    fn apply_keyframes(&mut self, node: &Self::Handle, keyframes: Vec<KeyframeInfo>);
}
