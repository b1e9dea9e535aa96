//! Shared fixtures for integration tests

#![allow(dead_code)]

use twin_core::{Body, BodyId, Connection, DofId, World};

/// Install a fmt subscriber once; later calls are no-ops
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twin_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// A world holding only a body named `root`
pub fn world_with_root() -> (World, BodyId) {
    init_tracing();
    let mut world = World::new();
    let root = world
        .modify_world(|edit| Ok(edit.add_kinematic_structure_entity(Body::new("root"))?))
        .unwrap();
    (world, root)
}

/// A world whose localization body `map` drives the former root through an omni drive
pub struct MobileBase {
    pub world: World,
    pub map: BodyId,
    pub base: BodyId,
    /// `x`, `y` and `yaw`
    pub dofs: [DofId; 3],
}

pub fn mobile_base() -> MobileBase {
    let (mut world, base) = world_with_root();
    let (map, dofs) = world
        .modify_world(|edit| {
            let map = edit.add_kinematic_structure_entity(Body::new("map"))?;
            let drive = Connection::omni_drive_with_dofs(edit, map, base)?;
            let dofs = drive.dofs();
            edit.add_connection(drive)?;
            Ok((map, [dofs[0], dofs[1], dofs[2]]))
        })
        .unwrap();

    MobileBase {
        world,
        map,
        base,
        dofs,
    }
}
