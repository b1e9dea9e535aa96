//! Mechanism bodies: hinges and sliders
//!
//! A mechanism is created with a moving connection to its parent. Doors and
//! drawers then hang themselves below it (see `add_hinge` / `add_slider`).

use glam::Vec3;

use crate::error::WorldResult;
use crate::types::PrefixedName;
use crate::world::{BodyId, World, WorldEdit};

use super::{AnnotationRef, create_body_with_connection, single_body_annotation};

/// Revolute mechanism a door swings on
#[derive(Debug, Clone, PartialEq)]
pub struct Hinge {
    pub name: PrefixedName,
    pub body: BodyId,
}

single_body_annotation!(Hinge, [HasBody]);

impl Hinge {
    pub fn create_with_new_body_in_world(
        world: &mut World,
        name: impl Into<PrefixedName>,
        parent: BodyId,
    ) -> WorldResult<AnnotationRef<Hinge>> {
        let name = name.into();
        world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent))
    }

    /// Create a hinge body with a revolute connection to `parent`
    pub fn create_with_new_body(
        edit: &mut WorldEdit<'_>,
        name: impl Into<PrefixedName>,
        parent: BodyId,
    ) -> WorldResult<AnnotationRef<Hinge>> {
        let name = name.into();
        let mechanisms = edit.config().mechanisms;
        let axis = Vec3::from(mechanisms.hinge_axis);

        let body = create_body_with_connection(edit, name.clone(), parent, |builder| {
            builder.revolute(axis).limits(mechanisms.hinge_limits)
        })?;
        tracing::info!("Created hinge {}", name);
        Ok(edit.add_semantic_annotation(Hinge { name, body }))
    }
}

/// Prismatic mechanism a drawer slides on
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub name: PrefixedName,
    pub body: BodyId,
}

single_body_annotation!(Slider, [HasBody]);

impl Slider {
    pub fn create_with_new_body_in_world(
        world: &mut World,
        name: impl Into<PrefixedName>,
        parent: BodyId,
    ) -> WorldResult<AnnotationRef<Slider>> {
        let name = name.into();
        world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent))
    }

    /// Create a slider body with a prismatic connection to `parent`
    pub fn create_with_new_body(
        edit: &mut WorldEdit<'_>,
        name: impl Into<PrefixedName>,
        parent: BodyId,
    ) -> WorldResult<AnnotationRef<Slider>> {
        let name = name.into();
        let mechanisms = edit.config().mechanisms;
        let axis = Vec3::from(mechanisms.slider_axis);

        let body = create_body_with_connection(edit, name.clone(), parent, |builder| {
            builder.prismatic(axis).limits(mechanisms.slider_limits)
        })?;
        tracing::info!("Created slider {}", name);
        Ok(edit.add_semantic_annotation(Slider { name, body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationType;
    use crate::connection::ConnectionType;
    use crate::world::Body;

    #[test]
    fn test_mechanisms_use_moving_connections() {
        let mut world = World::new();
        let root = world
            .scoped_edit(|edit| Ok(edit.add_body(Body::new("root"))?))
            .unwrap();

        let hinge = Hinge::create_with_new_body_in_world(&mut world, "hinge", root).unwrap();
        let slider = Slider::create_with_new_body_in_world(&mut world, "slider", root).unwrap();

        let hinge_body = world.resolve(hinge).unwrap().body;
        let slider_body = world.resolve(slider).unwrap().body;
        let hinge_connection = world.parent_connection(hinge_body).unwrap();
        assert_eq!(hinge_connection.connection_type(), ConnectionType::Revolute);
        assert_eq!(hinge_connection.axis(), Some(Vec3::Z));
        let slider_connection = world.parent_connection(slider_body).unwrap();
        assert_eq!(slider_connection.connection_type(), ConnectionType::Prismatic);
        assert_eq!(slider_connection.axis(), Some(Vec3::X));

        assert_eq!(world.parent_body(hinge_body), Some(root));
        assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Hinge), vec![hinge.id()]);
        assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::HasBody).len(), 2);
    }
}
