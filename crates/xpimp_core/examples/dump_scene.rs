//! Example: Build a small animated object and print the resulting scene.
//!
//! Run with: cargo run --example dump_scene -- [collection-name]

use std::env;

use xpimp_core::{CommandBuilder, DirectiveArg, ImportOptions, ImportedScene};

fn main() {
    env_logger::init();

    let name = env::args().nth(1).unwrap_or_else(|| "demo_beacon".to_string());
    let mut builder = CommandBuilder::new(ImportOptions::new(name));

    let f = DirectiveArg::Float;
    let i = DirectiveArg::Int;
    let s = |v: &str| DirectiveArg::from(v);

    // A quad, spun about Y and hidden when the beacon is off
    let directives: Vec<(&str, Vec<DirectiveArg>)> = vec![
        ("VT", vec![f(-1.0), f(0.0), f(0.0), f(0.0), f(0.0), f(1.0), f(0.0), f(0.0)]),
        ("VT", vec![f(1.0), f(0.0), f(0.0), f(0.0), f(0.0), f(1.0), f(1.0), f(0.0)]),
        ("VT", vec![f(1.0), f(2.0), f(0.0), f(0.0), f(0.0), f(1.0), f(1.0), f(1.0)]),
        ("VT", vec![f(-1.0), f(2.0), f(0.0), f(0.0), f(0.0), f(1.0), f(0.0), f(1.0)]),
        ("IDX10", vec![i(0), i(1), i(2), i(0), i(2), i(3), i(0), i(0), i(0), i(0)]),
        ("ANIM_begin", vec![]),
        ("ANIM_rotate_begin", vec![f(0.0), f(1.0), f(0.0), s("sim/beacon/heading")]),
        ("ANIM_rotate_key", vec![f(0.0), f(0.0)]),
        ("ANIM_rotate_key", vec![f(1.0), f(360.0)]),
        ("ANIM_rotate_end", vec![]),
        ("ANIM_keyframe_loop", vec![f(1.0)]),
        ("ANIM_hide", vec![f(0.0), f(0.0), s("sim/beacon/on")]),
        ("TRIS", vec![i(0), i(6), s("Beacon")]),
        ("ANIM_end", vec![]),
    ];

    for (directive, args) in &directives {
        if let Err(e) = builder.process_raw(directive, args) {
            eprintln!("Error processing {}: {}", directive, e);
            return;
        }
    }

    let mut scene = ImportedScene::new();
    match builder.finalize(&mut scene) {
        Ok(report) => {
            println!("=== Collection: {} ===", scene.name);
            println!("Nodes: {}", scene.node_count());
            println!("Meshes: {}", scene.mesh_count());
            println!("Total triangles: {}", scene.total_triangle_count());
            println!("Status: {:?} ({} warnings)", report.status, report.warnings.len());

            match serde_json::to_string_pretty(&scene) {
                Ok(json) => println!("\n{}", json),
                Err(e) => eprintln!("Error serializing scene: {}", e),
            }
        }
        Err(e) => {
            eprintln!("Error finalizing import: {}", e);
        }
    }
}
