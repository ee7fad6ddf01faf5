//! End-to-end imports: directive streams through the builder into an
//! in-memory scene.

use xpimp_core::{
    AnimType, CommandBuilder, Directive, DirectiveArg, FinishStatus, ImportError, ImportOptions,
    ImportedScene, NodeId, SceneNodeKind, VertexRecord,
};
use xpimp_math::Vec3;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn builder() -> CommandBuilder {
    init_logging();
    CommandBuilder::new(ImportOptions::new("test_object"))
}

fn s(v: &str) -> DirectiveArg {
    DirectiveArg::from(v)
}

fn f(v: f32) -> DirectiveArg {
    DirectiveArg::Float(v)
}

fn i(v: i64) -> DirectiveArg {
    DirectiveArg::Int(v)
}

fn add_grid_vertices(b: &mut CommandBuilder, count: usize) {
    for n in 0..count {
        let x = n as f32;
        b.process(Directive::Vt(VertexRecord::from_array([
            x, 0.0, -x, 0.0, 1.0, 0.0, x / 10.0, 0.5,
        ])))
        .unwrap();
    }
}

fn finalize(b: CommandBuilder) -> (xpimp_core::FinalizeReport, ImportedScene) {
    let mut scene = ImportedScene::new();
    let report = b.finalize(&mut scene).unwrap();
    (report, scene)
}

#[test]
fn test_show_yields_single_keyframe() {
    let mut b = builder();
    b.process_raw("ANIM_show", &[f(0.0), f(1.0), s("sim/x")])
        .unwrap();

    let (report, scene) = finalize(b);
    assert_eq!(report.final_frame, 1);

    let node = &scene.nodes[0];
    assert_eq!(node.keyframes.len(), 1);
    let key = &node.keyframes[0];
    assert_eq!(key.idx, 1);
    assert_eq!(key.show_hide, Some([0.0, 1.0]));
    assert_eq!(key.dataref_path, "sim/x");
    assert_eq!(key.dataref_anim_type, AnimType::Show);
}

#[test]
fn test_translation_yields_three_keyframes() {
    let mut b = builder();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw("ANIM_trans_begin", &[s("sim/y")]).unwrap();
    for (n, value) in [0.0, 0.5, 1.0].into_iter().enumerate() {
        b.process_raw(
            "ANIM_trans_key",
            &[f(value), f(0.0), f(n as f32), f(0.0)],
        )
        .unwrap();
    }
    b.process_raw("ANIM_trans_end", &[]).unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();
    assert_eq!(b.context_depth(), 0);

    let (report, scene) = finalize(b);
    assert!(report.is_clean());

    let keyframes = &scene.nodes[0].keyframes;
    let idxs: Vec<u32> = keyframes.iter().map(|k| k.idx).collect();
    assert_eq!(idxs, vec![1, 2, 3]);
    let values: Vec<Option<f32>> = keyframes.iter().map(|k| k.dataref_value).collect();
    assert_eq!(values, vec![Some(0.0), Some(0.5), Some(1.0)]);
    assert_eq!(keyframes[2].location, Some(Vec3::new(0.0, 2.0, 0.0)));
    assert!(keyframes.iter().all(|k| k.rotation.is_none()));
}

#[test]
fn test_tris_slice_is_deduplicated() {
    let mut b = builder();
    add_grid_vertices(&mut b, 8);
    for index in [2, 2, 5, 2, 5, 7] {
        b.process_raw("IDX", &[i(index)]).unwrap();
    }
    b.process_raw("TRIS", &[i(0), i(6)]).unwrap();

    let (report, scene) = finalize(b);

    let mesh = scene.nodes[0].mesh().unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.positions[0], Vec3::new(2.0, 0.0, -2.0));
    assert_eq!(mesh.positions[2], Vec3::new(7.0, 0.0, -7.0));
    // Winding reversed; the (2, 2, 5) face is degenerate and the host
    // reports it, keeping only the usable face.
    assert_eq!(mesh.triangles, vec![[2, 1, 0]]);
    assert_eq!(report.status, FinishStatus::FinishedWithWarnings);
    assert!(report.succeeded());
}

#[test]
fn test_idx10_and_valid_indices_finish_clean() {
    let mut b = builder();
    add_grid_vertices(&mut b, 6);
    b.process_raw(
        "IDX10",
        &[i(0), i(1), i(2), i(0), i(2), i(3), i(3), i(4), i(5), i(1)],
    )
    .unwrap();
    b.process_raw("IDX", &[i(4)]).unwrap();
    b.process_raw("IDX", &[i(5)]).unwrap();

    // Every index resolves to a vertex appended before the mesh is built
    let vertex_count = b.table().vertex_count() as u32;
    assert!(b.table().indices().iter().all(|&idx| idx < vertex_count));

    b.process_raw("TRIS", &[i(0), i(12), s("Box")]).unwrap();
    let (report, scene) = finalize(b);

    assert!(report.is_clean());
    let mesh = scene.find_node("Box").unwrap().mesh().unwrap();
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.triangles[0], [2, 1, 0]);
    assert_eq!(mesh.normals[0], Vec3::Y);
    assert_eq!(mesh.material, "Material");
}

#[test]
fn test_top_level_nodes_attach_to_collection() {
    let mut b = builder();
    add_grid_vertices(&mut b, 3);
    b.process_all([
        Directive::Idx10([0, 1, 2, 0, 1, 2, 0, 1, 2, 0]),
        Directive::Tris {
            start: 0,
            count: 3,
            name: None,
        },
    ])
    .unwrap();
    assert_eq!(b.blocks()[1].parent.as_deref(), Some("INTER_ROOT"));

    let (_, scene) = finalize(b);

    assert_eq!(scene.name, "test_object");
    assert!(scene.exportable);
    assert_eq!(scene.node_count(), 1);
    assert_eq!(scene.nodes[0].parent, None);
}

#[test]
fn test_nested_animation_hierarchy() {
    let mut b = builder();
    add_grid_vertices(&mut b, 3);
    b.process(Directive::Idx10([0, 1, 2, 0, 0, 0, 0, 0, 0, 0]))
        .unwrap();

    // Door: translate, then rotate the panel about -Z (read as +Z)
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw("ANIM_trans_begin", &[s("sim/door/slide")])
        .unwrap();
    b.process_raw("ANIM_trans_key", &[f(0.0), f(0.0), f(0.0), f(0.0)])
        .unwrap();
    b.process_raw("ANIM_trans_key", &[f(1.0), f(1.0), f(0.0), f(0.0)])
        .unwrap();
    b.process_raw("ANIM_trans_end", &[]).unwrap();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw(
        "ANIM_rotate_begin",
        &[DirectiveArg::Vector(Vec3::NEG_Z), s("sim/door/swing")],
    )
    .unwrap();
    b.process_raw("ANIM_rotate_key", &[f(0.0), f(0.0)]).unwrap();
    b.process_raw("ANIM_rotate_key", &[f(1.0), f(90.0)]).unwrap();
    b.process_raw("ANIM_rotate_end", &[]).unwrap();
    b.process_raw("ANIM_keyframe_loop", &[f(2.0)]).unwrap();
    b.process_raw("TRIS", &[i(0), i(3), s("Panel")]).unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();
    assert_eq!(b.context_depth(), 1);
    b.process_raw("ANIM_end", &[]).unwrap();
    assert_eq!(b.context_depth(), 0);

    let (report, scene) = finalize(b);
    assert!(report.is_clean());
    assert_eq!(report.nodes_created, 3);

    let slide = scene.nodes[0].clone();
    let swing_id = scene.children(NodeId(0))[0];
    let swing = scene.node(swing_id).unwrap();
    let panel = scene.find_node("Panel").unwrap();

    assert_eq!(slide.parent, None);
    assert_eq!(slide.keyframes.len(), 2);
    assert_eq!(slide.keyframes[1].location, Some(Vec3::X));

    assert_eq!(panel.parent, Some(swing_id));
    assert!(matches!(panel.kind, SceneNodeKind::Mesh { valid: true, .. }));

    assert_eq!(swing.keyframes.len(), 2);
    assert_eq!(swing.keyframes[1].rotation, Some(Vec3::new(0.0, 0.0, 90.0)));
    assert_eq!(swing.keyframes[1].dataref_loop, 2.0);
    assert_eq!(swing.keyframes[1].dataref_path, "sim/door/swing");
}

#[test]
fn test_mesh_named_like_open_empty_keeps_hierarchy() {
    let mut b = builder();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw("ANIM_trans_begin", &[s("sim/a")]).unwrap();
    let empty_name = b.blocks()[1].name.clone();
    b.process_raw("TRIS", &[i(0), i(0), s(&empty_name)]).unwrap();
    b.process_raw("TRIS", &[i(0), i(0)]).unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();

    let (_, scene) = finalize(b);

    assert_eq!(scene.node_count(), 3);
    assert!(scene.nodes[0].is_empty());
    assert_eq!(scene.nodes[1].name, empty_name);
    assert_eq!(scene.nodes[1].parent, Some(NodeId(0)));
    assert_eq!(scene.nodes[2].parent, Some(NodeId(0)));
    assert_eq!(scene.find(&empty_name), Some(NodeId(0)));
}

#[test]
fn test_static_shorthands() {
    let mut b = builder();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw(
        "ANIM_trans",
        &[
            f(0.0),
            f(0.0),
            f(0.0),
            f(0.0),
            f(2.0),
            f(0.0),
            f(0.0),
            f(1.0),
            s("sim/lift"),
        ],
    )
    .unwrap();
    b.process_raw(
        "ANIM_rotate",
        &[
            DirectiveArg::Vector(Vec3::X),
            f(0.0),
            f(30.0),
            f(0.0),
            f(1.0),
            s("sim/tilt"),
        ],
    )
    .unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();

    let (_, scene) = finalize(b);
    let lift = &scene.nodes[0];
    let tilt = &scene.nodes[1];

    assert_eq!(tilt.parent, Some(NodeId(0)));
    assert_eq!(lift.keyframes[1].location, Some(Vec3::new(0.0, 2.0, 0.0)));
    assert_eq!(tilt.keyframes[1].rotation, Some(Vec3::new(30.0, 0.0, 0.0)));
    assert!(tilt.keyframes[0].location.is_none());
}

#[test]
fn test_rotation_axis_sign_asymmetry() {
    // ANIM_rotate_begin folds the axis to its absolute value while the
    // ANIM_rotate shorthand keeps the sign, so the recomposed rotations
    // point in opposite directions.
    let mut b = builder();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw(
        "ANIM_rotate_begin",
        &[f(0.0), f(-1.0), f(0.0), s("sim/a")],
    )
    .unwrap();
    b.process_raw("ANIM_rotate_key", &[f(0.0), f(10.0)]).unwrap();
    b.process_raw("ANIM_rotate_key", &[f(1.0), f(20.0)]).unwrap();
    b.process_raw("ANIM_rotate_end", &[]).unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw(
        "ANIM_rotate",
        &[f(0.0), f(-1.0), f(0.0), f(10.0), f(20.0), f(0.0), f(1.0), s("sim/b")],
    )
    .unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();

    let (_, scene) = finalize(b);
    let begin_block = scene.nodes[0].keyframes[1].rotation.unwrap();
    let shorthand = scene.nodes[1].keyframes[1].rotation.unwrap();

    assert!((begin_block - Vec3::new(0.0, 20.0, 0.0)).length() < 0.001);
    assert!((shorthand - Vec3::new(0.0, -20.0, 0.0)).length() < 0.001);
}

#[test]
fn test_unsupported_directive_aborts() {
    let mut b = builder();
    let err = b.process_raw("ATTR_shade_flat", &[]).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedDirective(ref name) if name == "ATTR_shade_flat"));
}

#[test]
fn test_malformed_nesting_aborts() {
    let mut b = builder();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();
    let err = b.process_raw("ANIM_end", &[]).unwrap_err();
    assert!(matches!(err, ImportError::MalformedAnimationNesting(_)));
}

#[test]
fn test_scene_serializes_to_json() {
    let mut b = builder();
    add_grid_vertices(&mut b, 3);
    b.process(Directive::Idx10([0, 1, 2, 0, 0, 0, 0, 0, 0, 0]))
        .unwrap();
    b.process_raw("ANIM_begin", &[]).unwrap();
    b.process_raw("ANIM_hide", &[f(0.5), f(1.0), s("sim/lights")])
        .unwrap();
    b.process_raw("TRIS", &[i(0), i(3), s("Lens")]).unwrap();
    b.process_raw("ANIM_end", &[]).unwrap();

    let (report, scene) = finalize(b);
    let json = serde_json::to_value(&scene).unwrap();

    assert_eq!(json["name"], "test_object");
    assert_eq!(json["nodes"][0]["keyframes"][0]["dataref_anim_type"], "hide");
    assert_eq!(json["nodes"][1]["name"], "Lens");
    assert_eq!(json["nodes"][1]["kind"]["type"], "mesh");

    let report_json = serde_json::to_value(&report).unwrap();
    assert_eq!(report_json["status"], "Finished");
}
