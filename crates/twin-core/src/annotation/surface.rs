//! Static room surfaces

use crate::connection::ConnectionBuilder;
use crate::error::WorldResult;
use crate::types::{PrefixedName, Scale};
use crate::world::{BodyId, World, WorldEdit};

use super::{AnnotationRef, create_body_with_connection, single_body_annotation, validate_scale};

#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub name: PrefixedName,
    pub body: BodyId,
    pub scale: Scale,
}

single_body_annotation!(Wall, [HasBody]);

#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub name: PrefixedName,
    pub body: BodyId,
    pub scale: Scale,
}

single_body_annotation!(Floor, [HasBody]);

/// Generates the fixed-body factories shared by the surface annotations
macro_rules! surface_factories {
    ($surface:ident, $label:literal) => {
        impl $surface {
            pub fn create_with_new_body_in_world(
                world: &mut World,
                name: impl Into<PrefixedName>,
                parent: BodyId,
                scale: Scale,
            ) -> WorldResult<AnnotationRef<$surface>> {
                let name = name.into();
                world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent, scale))
            }

            pub fn create_with_new_body(
                edit: &mut WorldEdit<'_>,
                name: impl Into<PrefixedName>,
                parent: BodyId,
                scale: Scale,
            ) -> WorldResult<AnnotationRef<$surface>> {
                let name = name.into();
                validate_scale(scale)?;

                let body = create_body_with_connection(edit, name.clone(), parent, ConnectionBuilder::fixed)?;
                tracing::info!("Created {} {} ({:?})", $label, name, scale);
                Ok(edit.add_semantic_annotation($surface { name, body, scale }))
            }
        }
    };
}

surface_factories!(Wall, "wall");
surface_factories!(Floor, "floor");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationType;
    use crate::error::{DomainValidationError, WorldError};
    use crate::world::Body;

    #[test]
    fn test_floor_and_wall_indexed_separately() {
        let mut world = World::new();
        let root = world
            .scoped_edit(|edit| Ok(edit.add_body(Body::new("root"))?))
            .unwrap();

        let floor = Floor::create_with_new_body_in_world(&mut world, "floor", root, Scale::new(5.0, 5.0, 0.01)).unwrap();
        Wall::create_with_new_body_in_world(&mut world, "wall", root, Scale::new(0.1, 4.0, 2.0)).unwrap();

        assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Floor), vec![floor.id()]);
        assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::Wall).len(), 1);

        let flat = Scale::new(5.0, 5.0, 0.0);
        let err = Floor::create_with_new_body_in_world(&mut world, "floor2", root, flat).unwrap_err();
        assert_eq!(err, WorldError::Domain(DomainValidationError::InvalidScale(flat)));
    }
}
