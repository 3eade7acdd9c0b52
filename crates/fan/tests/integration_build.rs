//! Integration tests for the part builders.
//!
//! Tests end-to-end: default dimensions -> builders -> solids -> validated
//! tessellation.

use cf_fan_lib::build::{
    CylindricalHolderBuilder, JointBuilder, PartBuilder, PartKind, PRINT_GAP,
};
use cf_fan_lib::fixtures::*;
use cf_fan_lib::validation::MeshValidator;

fn assert_valid(solid: &cf_fan_lib::kernel::Solid) {
    let meshes = solid.tessellate();
    assert_eq!(meshes.len(), solid.body_count());
    for mesh in &meshes {
        let errors = MeshValidator::new(mesh).validate_all();
        assert!(errors.is_empty(), "{}: {:?}", solid.name(), errors);
    }
}

#[test]
fn test_every_part_builds() {
    let fan = default_fan_builder();
    for (kind, builder) in fan.part_builders() {
        let solid = builder
            .build()
            .unwrap_or_else(|e| panic!("{kind} failed: {e}"));
        assert!(!solid.is_empty(), "{kind} is empty");
        assert!(solid.volume() > 0.0, "{kind} has no volume");
        assert_valid(&solid);
    }
}

#[test]
fn test_every_print_part_rests_on_bed() {
    let fan = default_fan_builder();
    for (kind, builder) in fan.part_builders() {
        let (solid, parts) = builder.build_for_print().unwrap();
        assert!(!parts.is_empty());
        let bb = solid.bounding_box().unwrap();
        assert!(bb.min.z.abs() < 1e-4, "{kind} floats at {}", bb.min.z);
    }
}

#[test]
fn test_fan_stack() {
    let fan = default_fan_builder();
    let scene = fan.build().unwrap();
    assert_eq!(scene.body_count(), PartKind::ALL.len());

    let bb = scene.bounding_box().unwrap();
    assert!(bb.min.z.abs() < 1e-4);

    // every stacked part except the impeller sits above the previous one
    let bodies = scene.bodies();
    let tops: Vec<f64> = bodies
        .iter()
        .map(|b| b.bounding_box().unwrap().max.z)
        .collect();
    assert!(tops[0] <= tops[1] + 1e-6);
    assert!(tops[1] <= tops[2] + 1e-6);
    assert!(tops[2] <= tops[4] + 1e-6);
}

#[test]
fn test_centrifuge_inside_compartment() {
    let fan = default_fan_builder();
    let scene = fan.build().unwrap();
    let bodies = scene.bodies();
    let compartment = bodies[2].bounding_box().unwrap();
    let centrifuge = bodies[3].bounding_box().unwrap();
    assert!(centrifuge.min.z >= compartment.min.z - 1e-4);
    assert!(centrifuge.max.x < compartment.max.x);
}

#[test]
fn test_print_layout_side_by_side() {
    let fan = default_fan_builder();
    let (layout, parts) = fan.build_for_print().unwrap();
    assert_eq!(parts.len(), 4);
    assert_eq!(layout.body_count(), 4);

    let boxes: Vec<_> = layout
        .bodies()
        .iter()
        .map(|b| b.bounding_box().unwrap())
        .collect();
    for pair in boxes.windows(2) {
        let gap = pair[1].min.x - pair[0].max.x;
        assert!((gap - PRINT_GAP).abs() < 1e-3, "gap {gap}");
    }
    assert!(layout.bounding_box().unwrap().min.z.abs() < 1e-4);
}

#[test]
fn test_build_selected() {
    let fan = default_fan_builder();
    let (scene, parts) = fan
        .build_selected(&[PartKind::Compartment, PartKind::MotorHolder])
        .unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(scene.body_count(), 2);
    assert_eq!(parts[0].name(), "fan_compartment");
}

#[test]
fn test_standalone_builders() {
    let joint = JointBuilder::m3_5();
    let (_, joint_parts) = joint.build_for_print().unwrap();
    assert_eq!(joint_parts.len(), 2);
    for part in &joint_parts {
        assert_valid(part);
    }

    let dims = default_dimensions();
    let holder = CylindricalHolderBuilder::new(
        dims.holder_pen_radius,
        dims.motor_radius,
        dims.holder_thickness * 1.5,
    );
    let solid = holder.build().unwrap();
    assert_valid(&solid);
}
