//! Statefully builds OBJ commands into pending scene nodes.
//!
//! [`CommandBuilder`] consumes directives one at a time, in file order. It
//! keeps a stack of open animation contexts; every directive that starts a
//! keyframed track opens a new empty parented to the node on top of that
//! stack, so the node hierarchy mirrors the `ANIM_begin`/`ANIM_end` nesting
//! of the stream. Nothing is materialized until [`CommandBuilder::finalize`].

use std::path::Path;

use thiserror::Error;
use xpimp_math::Vec3;

use crate::animation::{AnimType, IntermediateAnimation, IntermediateDataref, SampleCountMismatch};
use crate::directive::{Directive, DirectiveArg};
use crate::finalize::{finalize_blocks, FinalizeReport};
use crate::host::SceneHost;
use crate::node::{IntermediateDatablock, MeshSlice, NodeKind};
use crate::options::ImportOptions;
use crate::vt_table::VertexIndexTable;

/// Errors that abort an import.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported directive: {0}")]
    UnsupportedDirective(String),

    #[error("Invalid arguments for {directive}: {message}")]
    InvalidArguments { directive: String, message: String },

    #[error("Malformed animation nesting: {0}")]
    MalformedAnimationNesting(String),

    #[error("Inconsistent animation samples on {node}: {source}")]
    InconsistentSampleCount {
        node: String,
        #[source]
        source: SampleCountMismatch,
    },

    #[error("Node {node} references unknown parent {parent}")]
    UnknownParent { node: String, parent: String },
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Position of the implicit root in the node list.
pub const ROOT_INDEX: usize = 0;

/// An open animation and the node it is attached to, both by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AnimContext {
    node: usize,
    animation: usize,
}

pub struct CommandBuilder {
    options: ImportOptions,
    name_tag: String,
    table: VertexIndexTable,
    /// Every node created so far; index 0 is the implicit root.
    blocks: Vec<IntermediateDatablock>,
    contexts: Vec<AnimContext>,
    /// Contexts opened inside each unclosed `ANIM_begin`.
    open_counts: Vec<usize>,
    /// Axis of the `ANIM_rotate_begin` block being read.
    last_axis: Option<Vec3>,
}

impl CommandBuilder {
    pub fn new(options: ImportOptions) -> Self {
        let root = IntermediateDatablock::empty(options.root_name.clone(), None);
        Self {
            name_tag: options.name_tag(),
            options,
            table: VertexIndexTable::new(),
            blocks: vec![root],
            contexts: Vec::new(),
            open_counts: Vec::new(),
            last_axis: None,
        }
    }

    /// Builder for the OBJ file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::new(ImportOptions::from_path(path))
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn table(&self) -> &VertexIndexTable {
        &self.table
    }

    /// All nodes in creation order, root first.
    pub fn blocks(&self) -> &[IntermediateDatablock] {
        &self.blocks
    }

    pub fn root(&self) -> &IntermediateDatablock {
        &self.blocks[ROOT_INDEX]
    }

    /// Number of open animation contexts.
    pub fn context_depth(&self) -> usize {
        self.contexts.len()
    }

    /// Number of `ANIM_begin` brackets not yet closed.
    pub fn open_brackets(&self) -> usize {
        self.open_counts.len()
    }

    pub fn current_axis(&self) -> Option<Vec3> {
        self.last_axis
    }

    /// Coerce a tokenized `(name, args)` pair and process it.
    pub fn process_raw(&mut self, name: &str, args: &[DirectiveArg]) -> ImportResult<()> {
        self.process(Directive::from_parts(name, args)?)
    }

    pub fn process_all<I>(&mut self, directives: I) -> ImportResult<()>
    where
        I: IntoIterator<Item = Directive>,
    {
        directives.into_iter().try_for_each(|d| self.process(d))
    }

    /// Apply one directive to the builder state.
    pub fn process(&mut self, directive: Directive) -> ImportResult<()> {
        match directive {
            Directive::Vt(record) => self.table.append_vertex(record),
            Directive::Idx(index) => self.table.append_index(index),
            Directive::Idx10(indices) => self.table.append_indices(&indices),
            Directive::Tris { start, count, name } => {
                let parent = self.top_node_name();
                let name = name.unwrap_or_else(|| self.next_name(NodeKind::Mesh));
                log::debug!("Mesh {} [{}, +{}) under {}", name, start, count, parent);
                self.blocks.push(IntermediateDatablock::mesh(
                    name,
                    Some(parent),
                    MeshSlice { start, count },
                ));
            }
            Directive::AnimBegin => self.open_counts.push(0),
            Directive::AnimEnd => self.end_bracket()?,
            Directive::AnimTransBegin { path } => {
                self.begin_new_frame().dataref = IntermediateDataref::transform(path);
            }
            Directive::AnimTransKey { value, location } => {
                let animation = self.top_animation("ANIM_trans_key")?;
                animation.push_location(location);
                animation.dataref.values.push(value);
            }
            Directive::AnimTransEnd => {}
            Directive::AnimShow { v1, v2, path } => {
                self.begin_new_frame().dataref =
                    IntermediateDataref::show_hide(AnimType::Show, v1, v2, path);
            }
            Directive::AnimHide { v1, v2, path } => {
                self.begin_new_frame().dataref =
                    IntermediateDataref::show_hide(AnimType::Hide, v1, v2, path);
            }
            Directive::AnimRotateBegin { axis, path } => {
                self.last_axis = Some(axis.abs());
                self.begin_new_frame().dataref = IntermediateDataref::transform(path);
            }
            Directive::AnimRotateKey { value, degrees } => {
                let axis = self.last_axis.ok_or_else(|| {
                    ImportError::MalformedAnimationNesting(
                        "ANIM_rotate_key outside ANIM_rotate_begin/ANIM_rotate_end".to_string(),
                    )
                })?;
                let animation = self.top_animation("ANIM_rotate_key")?;
                animation.push_rotation(axis, degrees);
                animation.dataref.values.push(value);
            }
            Directive::AnimRotateEnd => self.last_axis = None,
            Directive::AnimKeyframeLoop { period } => {
                self.top_animation("ANIM_keyframe_loop")?.dataref.loop_period = period;
            }
            Directive::AnimTrans {
                from,
                to,
                v1,
                v2,
                path,
            } => {
                let animation = self.begin_new_frame();
                animation.push_location(from);
                animation.push_location(to);
                animation.dataref.values.extend([v1, v2]);
                animation.dataref.path = path;
            }
            Directive::AnimRotate {
                axis,
                r1,
                r2,
                v1,
                v2,
                path,
            } => {
                // Keyed by the signed axis, unlike ANIM_rotate_begin
                let animation = self.begin_new_frame();
                animation.push_rotation(axis, r1);
                animation.push_rotation(axis, r2);
                animation.dataref.values.extend([v1, v2]);
                animation.dataref.path = path;
            }
        }
        Ok(())
    }

    /// Materialize every node through `host` and bind its keyframes.
    pub fn finalize<H: SceneHost>(self, host: &mut H) -> ImportResult<FinalizeReport> {
        if !self.open_counts.is_empty() {
            log::warn!(
                "{} ANIM_begin without ANIM_end at end of stream",
                self.open_counts.len()
            );
        }
        finalize_blocks(&self.options, &self.table, self.blocks, host)
    }

    /// Open a new animated empty under the current top node and return its
    /// (still empty) animation, which is already attached to the empty.
    fn begin_new_frame(&mut self) -> &mut IntermediateAnimation {
        let parent = self.top_node_name();
        let name = self.next_name(NodeKind::Empty);
        log::debug!("Animated empty {} under {}", name, parent);

        let mut empty = IntermediateDatablock::empty(name, Some(parent));
        empty.animations.push(IntermediateAnimation::new());

        let node = self.blocks.len();
        self.blocks.push(empty);
        self.contexts.push(AnimContext { node, animation: 0 });

        match self.open_counts.last_mut() {
            Some(count) => *count += 1,
            None => log::warn!("Animation opened outside ANIM_begin/ANIM_end stays open"),
        }

        &mut self.blocks[node].animations[0]
    }

    /// Close the innermost `ANIM_begin` bracket and every context it opened.
    fn end_bracket(&mut self) -> ImportResult<()> {
        let count = self.open_counts.pop().ok_or_else(|| {
            ImportError::MalformedAnimationNesting("ANIM_end without ANIM_begin".to_string())
        })?;

        for _ in 0..count {
            let ctx = self.contexts.pop().ok_or_else(|| {
                ImportError::MalformedAnimationNesting(
                    "ANIM_end closed more animations than are open".to_string(),
                )
            })?;
            let block = &self.blocks[ctx.node];
            if let Some(animation) = block.animations.get(ctx.animation) {
                animation
                    .sample_count()
                    .map_err(|source| ImportError::InconsistentSampleCount {
                        node: block.name.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Name of the node on top of the context stack, or the root.
    fn top_node_name(&self) -> String {
        let node = self.contexts.last().map_or(ROOT_INDEX, |ctx| ctx.node);
        self.blocks[node].name.clone()
    }

    fn top_animation(&mut self, directive: &str) -> ImportResult<&mut IntermediateAnimation> {
        let no_context = || {
            ImportError::MalformedAnimationNesting(format!("{} without an open animation", directive))
        };
        let ctx = self.contexts.last().copied().ok_or_else(no_context)?;
        self.blocks
            .get_mut(ctx.node)
            .and_then(|block| block.animations.get_mut(ctx.animation))
            .ok_or_else(no_context)
    }

    /// `{prefix}.{n:03}_{tag}`, where n counts existing nodes of `kind`
    /// (the root counts as an empty).
    fn next_name(&self, kind: NodeKind) -> String {
        let n = self.blocks.iter().filter(|b| b.kind == kind).count();
        let prefix = match kind {
            NodeKind::Empty => &self.options.empty_prefix,
            NodeKind::Mesh => &self.options.mesh_prefix,
        };
        format!("{}.{:03}_{}", prefix, n, self.name_tag)
    }
}
