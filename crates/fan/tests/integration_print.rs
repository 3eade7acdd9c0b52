//! Integration tests for print export: STL per part plus a GLB layout.

use std::path::PathBuf;

use cf_fan_lib::export::{solid_to_glb, to_stl};
use cf_fan_lib::fixtures::*;
use cf_fan_lib::use_case;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cf-fan-{}-{}", tag, std::process::id()))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[test]
fn test_write_print_layout() {
    let dir = temp_dir("print");
    let fan = default_fan_builder();

    let written = use_case::write_print_layout(&fan, &dir).unwrap();
    assert_eq!(written.len(), 5);
    assert_eq!(written[0], dir.join("fan_print.glb"));
    assert!(written[1..]
        .iter()
        .all(|p| p.extension().is_some_and(|e| e == "stl")));

    let glb = std::fs::read(&written[0]).unwrap();
    assert_eq!(&glb[0..4], b"glTF");
    assert_eq!(read_u32(&glb, 8) as usize, glb.len());

    for path in &written[1..] {
        let stl = std::fs::read(path).unwrap();
        let triangles = read_u32(&stl, 80) as usize;
        assert!(triangles > 0, "{} is empty", path.display());
        assert_eq!(stl.len(), 84 + triangles * 50);
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_glb_has_node_per_body() {
    let fan = default_fan_builder();
    let (layout, _) = fan.build_for_print().unwrap();
    let glb = solid_to_glb(&layout).unwrap();

    let json_len = read_u32(&glb, 12) as usize;
    let json: serde_json::Value = serde_json::from_slice(&glb[20..20 + json_len]).unwrap();
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), layout.body_count());
    assert_eq!(nodes[0]["name"], "fan_print_0");
}

#[test]
fn test_stl_of_block_matches_triangles() {
    let solid = block("plate", 10.0, 5.0, 1.0);
    let stl = to_stl(&solid).unwrap();
    assert_eq!(read_u32(&stl, 80) as usize, solid.triangle_count());
}
