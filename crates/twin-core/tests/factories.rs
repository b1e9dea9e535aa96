//! Annotation factories and composition against a live world

mod common;

use common::world_with_root;
use twin_core::{
    AnnotationId, AnnotationRef, AnnotationType, ConnectionType, DomainValidationError, Door, DoubleDoor, Drawer,
    Floor, Fridge, Handle, HasCase, Hinge, Scale, Slider, Wall, World, WorldError,
};

#[test]
fn handle_factory_registers_under_parent() {
    let (mut world, root) = world_with_root();
    let handle = Handle::create_with_new_body_in_world(
        &mut world,
        "handle",
        root,
        Scale::new(0.1, 0.2, 0.03),
        0.03,
    )
    .unwrap();

    let handles = world.semantic_annotations::<Handle>();
    assert_eq!(handles, vec![handle]);
    let body = world.resolve(handle).unwrap().body;
    assert_eq!(world.parent_body(body), world.root());
}

#[test]
fn door_factory_and_invalid_dimensions() {
    let (mut world, root) = world_with_root();
    let door = Door::create_with_new_body_in_world(&mut world, "door", root, Scale::new(0.03, 1.0, 2.0)).unwrap();
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Door), vec![door.id()]);

    for scale in [Scale::new(1.0, 1.0, 2.0), Scale::new(1.0, 2.0, 1.0)] {
        let err = Door::create_with_new_body_in_world(&mut world, "door2", root, scale).unwrap_err();
        assert_eq!(
            err,
            WorldError::Domain(DomainValidationError::InvalidDoorDimensions { scale })
        );
    }
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Door), vec![door.id()]);
    assert_eq!(world.body_count(), 2);
}

#[test]
fn door_scenario_with_sibling_hinge() {
    let (mut world, root) = world_with_root();
    let door = Door::create_with_new_body_in_world(&mut world, "door", root, Door::DEFAULT_SCALE).unwrap();
    assert!(Door::create_with_new_body_in_world(&mut world, "wide", root, Scale::new(1.0, 1.0, 2.0)).is_err());
    let hinge = Hinge::create_with_new_body_in_world(&mut world, "hinge", root).unwrap();
    assert_eq!(world.body_count(), 3);

    door.add_hinge(&mut world, hinge).unwrap();

    let door_body = world.resolve(door).unwrap().body;
    let hinge_body = world.resolve(hinge).unwrap().body;
    assert_eq!(world.parent_body(door_body), Some(hinge_body));
    assert_eq!(
        world.parent_connection(door_body).map(|c| c.connection_type()),
        Some(ConnectionType::Revolute)
    );
    assert_eq!(
        world.parent_connection(hinge_body).map(|c| c.connection_type()),
        Some(ConnectionType::Revolute)
    );
    assert_eq!(world.resolve(door).unwrap().hinge, Some(hinge));
    assert_eq!(world.body_count(), 3);
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Door), vec![door.id()]);
}

/// Parent name and incoming connection type of the door body, then of the hinge body
fn hinge_topology(
    world: &World,
    door: AnnotationRef<Door>,
    hinge: AnnotationRef<Hinge>,
) -> Vec<(Option<String>, Option<ConnectionType>)> {
    let door_body = world.resolve(door).unwrap().body;
    let hinge_body = world.resolve(hinge).unwrap().body;
    [door_body, hinge_body]
        .into_iter()
        .map(|body| {
            let parent = world
                .parent_body(body)
                .and_then(|p| world.body(p))
                .map(|p| p.name.to_string());
            let ty = world.parent_connection(body).map(|c| c.connection_type());
            (parent, ty)
        })
        .collect()
}

#[test]
fn add_hinge_converges_for_both_orderings() {
    let (mut sibling_world, root) = world_with_root();
    let door = Door::create_with_new_body_in_world(&mut sibling_world, "door", root, Door::DEFAULT_SCALE).unwrap();
    let hinge = Hinge::create_with_new_body_in_world(&mut sibling_world, "hinge", root).unwrap();
    door.add_hinge(&mut sibling_world, hinge).unwrap();

    let (mut child_world, root) = world_with_root();
    let door2 = Door::create_with_new_body_in_world(&mut child_world, "door", root, Door::DEFAULT_SCALE).unwrap();
    let door_body = child_world.resolve(door2).unwrap().body;
    let hinge2 = Hinge::create_with_new_body_in_world(&mut child_world, "hinge", door_body).unwrap();
    assert_eq!(child_world.body_count(), 3);
    door2.add_hinge(&mut child_world, hinge2).unwrap();

    let expected = vec![
        (Some("hinge".to_string()), Some(ConnectionType::Revolute)),
        (Some("root".to_string()), Some(ConnectionType::Revolute)),
    ];
    assert_eq!(hinge_topology(&sibling_world, door, hinge), expected);
    assert_eq!(hinge_topology(&child_world, door2, hinge2), expected);
    assert_eq!(child_world.resolve(door2).unwrap().hinge, Some(hinge2));
    assert_eq!(sibling_world.dofs().count(), child_world.dofs().count());
}

#[test]
fn add_slider_converges_for_both_orderings() {
    for slider_below_drawer in [false, true] {
        let (mut world, root) = world_with_root();
        let drawer =
            Drawer::create_with_new_body_in_world(&mut world, "drawer", root, Scale::new(0.2, 0.3, 0.2)).unwrap();
        let drawer_body = world.resolve(drawer).unwrap().body;
        let slider_parent = if slider_below_drawer { drawer_body } else { root };
        let slider = Slider::create_with_new_body_in_world(&mut world, "slider", slider_parent).unwrap();
        assert_eq!(world.body_count(), 3);

        drawer.add_slider(&mut world, slider).unwrap();

        let slider_body = world.resolve(slider).unwrap().body;
        assert_eq!(world.parent_body(drawer_body), Some(slider_body));
        assert_eq!(world.parent_body(slider_body), Some(root));
        assert_eq!(
            world.parent_connection(drawer_body).map(|c| c.connection_type()),
            Some(ConnectionType::Prismatic)
        );
        assert_eq!(world.resolve(drawer).unwrap().slider, Some(slider));
    }
}

#[test]
fn add_handle_reparents_handle() {
    let (mut world, root) = world_with_root();
    let door = Door::create_with_new_body_in_world(&mut world, "door", root, Door::DEFAULT_SCALE).unwrap();
    let handle = Handle::create_with_new_body_in_world(
        &mut world,
        "handle",
        root,
        Handle::DEFAULT_SCALE,
        Handle::DEFAULT_THICKNESS,
    )
    .unwrap();
    let handle_body = world.resolve(handle).unwrap().body;
    assert_eq!(world.parent_body(handle_body), Some(root));

    door.add_handle(&mut world, handle).unwrap();

    let door_body = world.resolve(door).unwrap().body;
    assert_eq!(world.parent_body(handle_body), Some(door_body));
    assert_eq!(
        world.parent_connection(handle_body).map(|c| c.connection_type()),
        Some(ConnectionType::Fixed)
    );
    assert_eq!(world.resolve(door).unwrap().handle, Some(handle));
}

#[test]
fn double_door_factory() {
    let (mut world, root) = world_with_root();
    let left = Door::create_with_new_body_in_world(&mut world, "left_door", root, Door::DEFAULT_SCALE).unwrap();
    let right = Door::create_with_new_body_in_world(&mut world, "right_door", root, Door::DEFAULT_SCALE).unwrap();

    let double = DoubleDoor::create_with_left_right_door_in_world(&mut world, left, right).unwrap();

    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::DoubleDoor), vec![double.id()]);
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Door), vec![left.id(), right.id()]);
}

#[test]
fn lookup_returns_every_created_handle_in_order() {
    let (mut world, root) = world_with_root();
    let mut hinges = Vec::new();
    for i in 0..4 {
        hinges.push(Hinge::create_with_new_body_in_world(&mut world, format!("hinge_{}", i), root).unwrap());
        // Other types in between must not leak into the lookup
        Wall::create_with_new_body_in_world(&mut world, format!("wall_{}", i), root, Scale::new(0.1, 3.0, 2.5))
            .unwrap();
    }

    let ids: Vec<AnnotationId> = hinges.iter().map(|h| h.id()).collect();
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Hinge), ids);
    assert_eq!(world.semantic_annotations::<Hinge>(), hinges);
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Wall).len(), 4);
    for (i, hinge) in hinges.iter().enumerate() {
        assert_eq!(world.resolve(*hinge).unwrap().name.name, format!("hinge_{}", i));
    }
}

#[test]
fn case_capability_spans_variants() {
    let (mut world, root) = world_with_root();
    let fridge = Fridge::create_with_new_body_in_world(&mut world, "case", root, Scale::new(1.0, 1.0, 2.0)).unwrap();
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::HasCase).len(), 1);

    Drawer::create_with_new_body_in_world(&mut world, "drawer", root, Scale::new(0.2, 0.3, 0.2)).unwrap();

    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Fridge).len(), 1);
    assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Drawer).len(), 1);
    let cases = world.get_semantic_annotations_by_type(AnnotationType::HasCase);
    assert_eq!(cases.len(), 2);

    let fridge_scale = world.resolve(fridge).unwrap().case_scale();
    let case_scales: Vec<Scale> = cases
        .iter()
        .filter_map(|id| world.annotation(*id))
        .filter_map(|a| a.as_has_case())
        .map(|c| c.case_scale())
        .collect();
    assert_eq!(case_scales, vec![fridge_scale, Scale::new(0.2, 0.3, 0.2)]);
}

#[test]
fn factories_join_an_open_scope() {
    let (mut world, root) = world_with_root();
    let version = world.version();

    let (door, hinge) = world
        .scoped_edit(|edit| {
            let door = Door::create_with_new_body(edit, "door", root, Door::DEFAULT_SCALE)?;
            let hinge = Hinge::create_with_new_body(edit, "hinge", root)?;
            door.add_hinge_in(edit, hinge)?;
            Ok((door, hinge))
        })
        .unwrap();

    assert_eq!(world.version(), version + 1);
    let hinge_body = world.resolve(hinge).unwrap().body;
    assert_eq!(world.parent_body(world.resolve(door).unwrap().body), Some(hinge_body));

    // A failure late in the scope rolls back the earlier factory calls
    let result = world.scoped_edit(|edit| {
        Floor::create_with_new_body(edit, "floor", root, Scale::new(5.0, 5.0, 0.01))?;
        Door::create_with_new_body(edit, "bad", root, Scale::new(1.0, 1.0, 2.0))
    });
    assert!(result.is_err());
    assert!(world.get_semantic_annotations_by_type(AnnotationType::Floor).is_empty());
    assert_eq!(world.body_count(), 3);
}

#[test]
fn lookup_miss_is_empty() {
    let (world, _) = world_with_root();
    assert!(world.get_semantic_annotations_by_type(AnnotationType::Wall).is_empty());
    assert!(world.semantic_annotations::<Fridge>().is_empty());
}
