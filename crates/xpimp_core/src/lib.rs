//! XPImp Core - X-Plane OBJ command builder and scene reconstruction.
//!
//! This crate provides:
//!
//! - **Command builder**: a streaming interpreter over typed OBJ directives
//!   (`VT`, `IDX`, `TRIS`, `ANIM_*`) that builds a flat list of pending
//!   empties and meshes with their animation tracks
//! - **Finalizer**: resolves parents, rebuilds compact meshes from the
//!   shared vertex/index table and binds keyframes through a [`SceneHost`]
//! - **In-memory scene**: [`ImportedScene`], a `SceneHost` that records the
//!   materialized node tree
//!
//! # Example
//!
//! ```ignore
//! use xpimp_core::{CommandBuilder, Directive, ImportedScene};
//!
//! let mut builder = CommandBuilder::from_path("hangar.obj");
//! for directive in directives {
//!     builder.process(directive)?;
//! }
//!
//! let mut scene = ImportedScene::new();
//! let report = builder.finalize(&mut scene)?;
//! println!("{} nodes, {} warnings", report.nodes_created, report.warnings.len());
//! ```

pub mod animation;
pub mod builder;
pub mod directive;
pub mod finalize;
pub mod host;
pub mod mesh;
pub mod node;
pub mod options;
pub mod scene;
pub mod vt_table;

// Re-export commonly used types
pub use animation::{AnimType, IntermediateAnimation, IntermediateDataref, KeyframeInfo};
pub use builder::{CommandBuilder, ImportError, ImportResult};
pub use directive::{Directive, DirectiveArg};
pub use finalize::{FinalizeReport, FinishStatus, ImportWarning};
pub use host::{CreatedMesh, SceneHost};
pub use mesh::{Mesh, MeshIssue};
pub use node::{IntermediateDatablock, MeshSlice, NodeKind};
pub use options::ImportOptions;
pub use scene::{ImportedScene, NodeId, SceneNode, SceneNodeKind};
pub use vt_table::{VertexIndexTable, VertexRecord};
